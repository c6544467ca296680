use actix_web::{web, HttpResponse};

use crate::db::repository::SharedRepository;
use crate::error::AppError;
use crate::middleware::session::SessionContext;
use crate::models::itinerary::{FlightSearchRequest, FlightSuggestions};
use crate::routes::itinerary::{load_visible, parse_id};
use crate::services::generation_service::ItineraryAssistant;

/*
    POST /api/itineraries/{id}/flights
*/
pub async fn find_flights(
    session: SessionContext,
    path: web::Path<String>,
    repo: web::Data<SharedRepository>,
    assistant: web::Data<ItineraryAssistant>,
    input: Option<web::Json<FlightSearchRequest>>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&path.into_inner())?;
    let itinerary = load_visible(&repo, &id, &session).await?;
    let request = input.map(|json| json.into_inner()).unwrap_or_default();

    let (origin, suggestions) = assistant
        .suggest_flights(&request.origin, &itinerary.destination)
        .await?;

    Ok(HttpResponse::Ok().json(FlightSuggestions {
        origin,
        destination: itinerary.destination,
        suggestions,
    }))
}
