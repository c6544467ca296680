mod common;

use actix_web::{http::header, test};
use serde_json::{json, Value};

use common::{status_of, ScriptedGenerator, TestApp, SAMPLE_ITINERARY};

fn trip() -> Value {
    json!({
        "destination": "Goa",
        "duration_days": 2,
        "budget": "INR 20000",
        "preferences": "beaches, seafood",
        "user_name": "Asha",
        "num_people": 2
    })
}

#[actix_rt::test]
async fn test_itinerary_routes_require_auth() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/api/itineraries").to_request();
    assert_eq!(status_of(&app, req).await, 401);

    let req = test::TestRequest::post()
        .uri("/api/itineraries/generate")
        .set_json(trip())
        .to_request();
    assert_eq!(status_of(&app, req).await, 401);
}

#[actix_rt::test]
async fn test_generate_returns_rendered_itinerary() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let (_, token) = test_app.user_with_token("asha", false).await;

    let req = test::TestRequest::post()
        .uri("/api/itineraries/generate")
        .insert_header((header::AUTHORIZATION, token))
        .set_json(trip())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["content"], SAMPLE_ITINERARY);
    assert_eq!(body["trip"]["destination"], "Goa");

    let nodes = body["rendered"]["nodes"].as_array().unwrap();
    let types: Vec<&str> = nodes.iter().map(|n| n["type"].as_str().unwrap()).collect();
    assert_eq!(types, vec!["greeting", "day", "day", "tips", "total_cost"]);
    assert_eq!(nodes[1]["activities"][1]["price"], "₹3000");
    assert_eq!(nodes[4]["amount"], "₹20000");

    let prompts = test_app.generator.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Goa"));
    assert!(prompts[0].contains("Asha"));
}

#[actix_rt::test]
async fn test_generate_validates_trip() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let (_, token) = test_app.user_with_token("asha", false).await;

    let req = test::TestRequest::post()
        .uri("/api/itineraries/generate")
        .insert_header((header::AUTHORIZATION, token.clone()))
        .set_json(json!({"destination": "", "user_name": "Asha"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Please fill Destination and Name.");

    let req = test::TestRequest::post()
        .uri("/api/itineraries/generate")
        .insert_header((header::AUTHORIZATION, token))
        .set_json(json!({"destination": "Goa", "user_name": "Asha", "duration_days": 45}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    assert!(test_app.generator.prompts.lock().unwrap().is_empty());
}

#[actix_rt::test]
async fn test_generation_failure_leaves_no_pending_itinerary() {
    let test_app = TestApp::with_generator(ScriptedGenerator::failing());
    let app = test::init_service(test_app.create_app()).await;
    let (_, token) = test_app.user_with_token("asha", false).await;

    let req = test::TestRequest::post()
        .uri("/api/itineraries/generate")
        .insert_header((header::AUTHORIZATION, token.clone()))
        .set_json(trip())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 502);

    let req = test::TestRequest::get()
        .uri("/api/itineraries/pending")
        .insert_header((header::AUTHORIZATION, token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_rt::test]
async fn test_save_pending_itinerary() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let (_, token) = test_app.user_with_token("asha", false).await;

    let req = test::TestRequest::post()
        .uri("/api/itineraries/generate")
        .insert_header((header::AUTHORIZATION, token.clone()))
        .set_json(trip())
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/api/itineraries/pending")
        .insert_header((header::AUTHORIZATION, token.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    // A name is required and the pending itinerary survives the rejection.
    let req = test::TestRequest::post()
        .uri("/api/itineraries/pending/save")
        .insert_header((header::AUTHORIZATION, token.clone()))
        .set_json(json!({"name": "   "}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Please name your itinerary.");

    let req = test::TestRequest::post()
        .uri("/api/itineraries/pending/save")
        .insert_header((header::AUTHORIZATION, token.clone()))
        .set_json(json!({"name": "Goa getaway"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "Goa getaway");
    assert_eq!(body["destination"], "Goa");
    assert_eq!(body["num_people"], 2);
    assert_eq!(body["is_public"], false);
    assert_eq!(test_app.repo.itinerary_count(), 1);

    let req = test::TestRequest::post()
        .uri("/api/itineraries/pending/save")
        .insert_header((header::AUTHORIZATION, token.clone()))
        .set_json(json!({"name": "Again"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let req = test::TestRequest::get()
        .uri("/api/itineraries")
        .insert_header((header::AUTHORIZATION, token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Goa getaway");
}

#[actix_rt::test]
async fn test_discard_pending_itinerary() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let (_, token) = test_app.user_with_token("asha", false).await;

    let req = test::TestRequest::post()
        .uri("/api/itineraries/generate")
        .insert_header((header::AUTHORIZATION, token.clone()))
        .set_json(trip())
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::delete()
        .uri("/api/itineraries/pending")
        .insert_header((header::AUTHORIZATION, token.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);

    let req = test::TestRequest::get()
        .uri("/api/itineraries/pending")
        .insert_header((header::AUTHORIZATION, token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

async fn save_itinerary(test_app: &TestApp, token: &str, name: &str, is_public: bool) -> String {
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/itineraries/generate")
        .insert_header((header::AUTHORIZATION, token.to_string()))
        .set_json(trip())
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/itineraries/pending/save")
        .insert_header((header::AUTHORIZATION, token.to_string()))
        .set_json(json!({"name": name, "is_public": is_public}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    body["id"].as_str().unwrap().to_string()
}

#[actix_rt::test]
async fn test_detail_includes_rendered_tree() {
    let test_app = TestApp::new();
    let (_, token) = test_app.user_with_token("asha", false).await;
    let id = save_itinerary(&test_app, &token, "Goa getaway", false).await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/itineraries/{}", id))
        .insert_header((header::AUTHORIZATION, token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], id);
    assert_eq!(body["name"], "Goa getaway");
    assert_eq!(body["content"], SAMPLE_ITINERARY);
    assert_eq!(body["rendered"]["nodes"][0]["text"], "Hello Asha!");
}

#[actix_rt::test]
async fn test_private_itinerary_hidden_from_other_users() {
    let test_app = TestApp::new();
    let (_, owner) = test_app.user_with_token("asha", false).await;
    let (_, other) = test_app.user_with_token("ravi", false).await;
    let id = save_itinerary(&test_app, &owner, "Private trip", false).await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/itineraries/{}", id))
        .insert_header((header::AUTHORIZATION, other.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let req = test::TestRequest::get()
        .uri("/api/itineraries/public")
        .insert_header((header::AUTHORIZATION, other.clone()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body.as_array().unwrap().is_empty());

    let req = test::TestRequest::post()
        .uri(&format!("/api/itineraries/{}/copy", id))
        .insert_header((header::AUTHORIZATION, other))
        .set_json(json!({"name": "Mine now"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_rt::test]
async fn test_invalid_id_is_bad_request() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let (_, token) = test_app.user_with_token("asha", false).await;

    let req = test::TestRequest::get()
        .uri("/api/itineraries/not-an-id")
        .insert_header((header::AUTHORIZATION, token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
async fn test_public_itinerary_can_be_copied() {
    let test_app = TestApp::new();
    let (_, owner) = test_app.user_with_token("asha", false).await;
    let (_, other) = test_app.user_with_token("ravi", false).await;
    let id = save_itinerary(&test_app, &owner, "Shared trip", true).await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/itineraries/public")
        .insert_header((header::AUTHORIZATION, other.clone()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body[0]["id"], id.as_str());

    let req = test::TestRequest::post()
        .uri(&format!("/api/itineraries/{}/copy", id))
        .insert_header((header::AUTHORIZATION, other.clone()))
        .set_json(json!({"name": ""}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let req = test::TestRequest::post()
        .uri(&format!("/api/itineraries/{}/copy", id))
        .insert_header((header::AUTHORIZATION, other.clone()))
        .set_json(json!({"name": "My Goa"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let copy: Value = test::read_body_json(resp).await;
    assert_eq!(copy["name"], "My Goa");
    assert_eq!(copy["is_public"], false);
    assert_eq!(copy["user_name"], "ravi");
    assert_ne!(copy["id"], id.as_str());

    let req = test::TestRequest::get()
        .uri("/api/itineraries")
        .insert_header((header::AUTHORIZATION, other))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[actix_rt::test]
async fn test_flight_suggestions_use_itinerary_destination() {
    let test_app = TestApp::new();
    let (_, token) = test_app.user_with_token("asha", false).await;
    let id = save_itinerary(&test_app, &token, "Goa getaway", false).await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/itineraries/{}/flights", id))
        .insert_header((header::AUTHORIZATION, token))
        .set_json(json!({"origin": ""}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["destination"], "Goa");
    assert_eq!(body["origin"], "Your nearest major airport");

    let prompts = test_app.generator.prompts.lock().unwrap();
    assert!(prompts.last().unwrap().contains("Your nearest major airport"));
}

#[actix_rt::test]
async fn test_public_listing_is_capped_and_newest_first() {
    use chrono::Utc;
    use travel_planner_api::db::repository::{TravelRepository, PUBLIC_ITINERARY_LIMIT};
    use travel_planner_api::models::itinerary::{PendingItinerary, SavedItinerary, TripRequest};

    let test_app = TestApp::new();
    let (owner, token) = test_app.user_with_token("asha", false).await;
    let owner_id = owner.id.unwrap();

    for n in 0..=PUBLIC_ITINERARY_LIMIT {
        let pending = PendingItinerary {
            content: SAMPLE_ITINERARY.to_string(),
            trip: serde_json::from_value::<TripRequest>(trip()).unwrap(),
            generated_at: Utc::now(),
        };
        let itinerary =
            SavedItinerary::from_pending(owner_id, &format!("Trip {}", n), true, pending);
        test_app.repo.insert_itinerary(itinerary).await.unwrap();
    }
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/itineraries/public")
        .insert_header((header::AUTHORIZATION, token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let listed = body.as_array().unwrap();
    assert_eq!(listed.len(), PUBLIC_ITINERARY_LIMIT);
    assert_eq!(listed[0]["name"], format!("Trip {}", PUBLIC_ITINERARY_LIMIT));
}
