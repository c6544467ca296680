use actix_web::{web, HttpResponse};
use chrono::Utc;
use log::info;
use mongodb::bson::oid::ObjectId;

use crate::db::repository::SharedRepository;
use crate::error::AppError;
use crate::middleware::session::{SessionContext, SessionStore};
use crate::models::itinerary::{
    CopyItineraryRequest, GeneratedItinerary, ItineraryDetail, ItinerarySummary,
    PendingItinerary, SaveItineraryRequest, SavedItinerary, TripRequest,
};
use crate::services::generation_service::ItineraryAssistant;
use crate::services::itinerary_renderer::render_text;

pub fn parse_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw).map_err(|_| AppError::BadRequest("Invalid ID".to_string()))
}

/// Itinerary the caller may read: their own or a public one.
pub async fn load_visible(
    repo: &SharedRepository,
    id: &ObjectId,
    session: &SessionContext,
) -> Result<SavedItinerary, AppError> {
    match repo.find_itinerary(id).await? {
        Some(itinerary) if itinerary.is_visible_to(&session.user_id) => Ok(itinerary),
        _ => Err(AppError::NotFound("Itinerary not found".to_string())),
    }
}

fn detail(itinerary: &SavedItinerary) -> ItineraryDetail {
    ItineraryDetail {
        summary: ItinerarySummary::from(itinerary),
        content: itinerary.content.clone(),
        rendered: render_text(&itinerary.content),
    }
}

fn generated(pending: &PendingItinerary) -> GeneratedItinerary {
    GeneratedItinerary {
        content: pending.content.clone(),
        trip: pending.trip.clone(),
        rendered: render_text(&pending.content),
    }
}

/*
    POST /api/itineraries/generate
*/
pub async fn generate(
    session: SessionContext,
    sessions: web::Data<SessionStore>,
    assistant: web::Data<ItineraryAssistant>,
    input: web::Json<TripRequest>,
) -> Result<HttpResponse, AppError> {
    let trip = input.into_inner();
    trip.validate().map_err(AppError::BadRequest)?;

    let content = assistant.generate_itinerary(&trip).await?;
    let pending = PendingItinerary {
        content,
        trip,
        generated_at: Utc::now(),
    };
    let body = generated(&pending);
    sessions.set_pending(session.user_id, pending).await;

    Ok(HttpResponse::Ok().json(body))
}

/*
    GET /api/itineraries/pending
*/
pub async fn get_pending(session: SessionContext) -> Result<HttpResponse, AppError> {
    match &session.pending_itinerary {
        Some(pending) => Ok(HttpResponse::Ok().json(generated(pending))),
        None => Err(AppError::NotFound("No generated itinerary to show".to_string())),
    }
}

/*
    POST /api/itineraries/pending/save
*/
pub async fn save_pending(
    session: SessionContext,
    sessions: web::Data<SessionStore>,
    repo: web::Data<SharedRepository>,
    input: web::Json<SaveItineraryRequest>,
) -> Result<HttpResponse, AppError> {
    let request = input.into_inner();
    if request.name.trim().is_empty() {
        return Err(AppError::BadRequest("Please name your itinerary.".to_string()));
    }

    let pending = sessions
        .take_pending(&session.user_id)
        .await
        .ok_or_else(|| AppError::NotFound("No generated itinerary to save".to_string()))?;

    let itinerary = SavedItinerary::from_pending(
        session.user_id,
        &request.name,
        request.is_public,
        pending.clone(),
    );
    match repo.insert_itinerary(itinerary).await {
        Ok(saved) => {
            info!("{} saved itinerary {}", session.username, saved.name);
            Ok(HttpResponse::Created().json(ItinerarySummary::from(&saved)))
        }
        Err(err) => {
            // Keep the generated text so the user can retry.
            sessions.set_pending(session.user_id, pending).await;
            Err(err.into())
        }
    }
}

/*
    DELETE /api/itineraries/pending
*/
pub async fn discard_pending(
    session: SessionContext,
    sessions: web::Data<SessionStore>,
) -> HttpResponse {
    sessions.take_pending(&session.user_id).await;
    HttpResponse::NoContent().finish()
}

/*
    GET /api/itineraries
*/
pub async fn list_mine(
    session: SessionContext,
    repo: web::Data<SharedRepository>,
) -> Result<HttpResponse, AppError> {
    let itineraries = repo.itineraries_for_user(&session.user_id).await?;
    let summaries: Vec<ItinerarySummary> = itineraries.iter().map(ItinerarySummary::from).collect();
    Ok(HttpResponse::Ok().json(summaries))
}

/*
    GET /api/itineraries/public
*/
pub async fn list_public(repo: web::Data<SharedRepository>) -> Result<HttpResponse, AppError> {
    let itineraries = repo.public_itineraries().await?;
    let summaries: Vec<ItinerarySummary> = itineraries.iter().map(ItinerarySummary::from).collect();
    Ok(HttpResponse::Ok().json(summaries))
}

/*
    GET /api/itineraries/{id}
*/
pub async fn get_by_id(
    session: SessionContext,
    path: web::Path<String>,
    repo: web::Data<SharedRepository>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&path.into_inner())?;
    let itinerary = load_visible(&repo, &id, &session).await?;
    Ok(HttpResponse::Ok().json(detail(&itinerary)))
}

/*
    POST /api/itineraries/{id}/copy
*/
pub async fn copy(
    session: SessionContext,
    path: web::Path<String>,
    repo: web::Data<SharedRepository>,
    input: web::Json<CopyItineraryRequest>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&path.into_inner())?;
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("Enter a name before saving.".to_string()));
    }

    let source = load_visible(&repo, &id, &session).await?;
    let copy = source.copy_for(session.user_id, &session.username, &input.name);
    let saved = repo.insert_itinerary(copy).await?;
    info!("{} copied itinerary {} as {}", session.username, id, saved.name);

    Ok(HttpResponse::Created().json(ItinerarySummary::from(&saved)))
}
