use actix_web::{web, HttpResponse};
use log::info;
use mongodb::bson::oid::ObjectId;

use crate::db::repository::SharedRepository;
use crate::error::AppError;
use crate::middleware::session::SessionContext;
use crate::models::chat::{ChatExchange, ChatMessage, ChatMessageView, ChatRequest, ChatRole};
use crate::models::itinerary::SavedItinerary;
use crate::routes::itinerary::{load_visible, parse_id};
use crate::services::generation_service::ItineraryAssistant;

/// Chat is only available on the caller's own itineraries.
async fn load_owned(
    repo: &SharedRepository,
    id: &ObjectId,
    session: &SessionContext,
) -> Result<SavedItinerary, AppError> {
    let itinerary = load_visible(repo, id, session).await?;
    if itinerary.user_id != session.user_id {
        return Err(AppError::Forbidden(
            "Chat is only available on your own itineraries".to_string(),
        ));
    }
    Ok(itinerary)
}

/*
    GET /api/itineraries/{id}/chat
*/
pub async fn history(
    session: SessionContext,
    path: web::Path<String>,
    repo: web::Data<SharedRepository>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&path.into_inner())?;
    load_owned(&repo, &id, &session).await?;

    let messages = repo.chat_history(&id).await?;
    let views: Vec<ChatMessageView> = messages.iter().map(ChatMessageView::from).collect();
    Ok(HttpResponse::Ok().json(views))
}

/*
    POST /api/itineraries/{id}/chat
*/
pub async fn ask(
    session: SessionContext,
    path: web::Path<String>,
    repo: web::Data<SharedRepository>,
    assistant: web::Data<ItineraryAssistant>,
    input: web::Json<ChatRequest>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&path.into_inner())?;
    let question = input.message.trim();
    if question.is_empty() {
        return Err(AppError::BadRequest("Message cannot be empty".to_string()));
    }

    let itinerary = load_owned(&repo, &id, &session).await?;
    let question = repo
        .insert_chat_message(ChatMessage::new(id, ChatRole::User, question))
        .await?;

    let answer = assistant
        .answer_question(&itinerary.content, &question.content)
        .await?;
    let answer = repo
        .insert_chat_message(ChatMessage::new(id, ChatRole::Assistant, &answer))
        .await?;
    info!("Answered chat question on itinerary {}", id);

    Ok(HttpResponse::Ok().json(ChatExchange {
        question: ChatMessageView::from(&question),
        answer: ChatMessageView::from(&answer),
    }))
}
