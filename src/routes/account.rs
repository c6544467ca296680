use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::db::repository::SharedRepository;
use crate::error::AppError;
use crate::middleware::session::SessionContext;
use crate::models::user::{Credentials, UserSummary};
use crate::services::auth_service::{authenticate, generate_token, register};

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub auth_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub user_id: String,
    pub username: String,
    pub is_admin: bool,
    pub has_pending_itinerary: bool,
}

/*
    POST /api/auth/signup
*/
pub async fn signup(
    repo: web::Data<SharedRepository>,
    config: web::Data<AppConfig>,
    input: web::Json<Credentials>,
) -> Result<HttpResponse, AppError> {
    let user = register(repo.get_ref().as_ref(), &config, &input).await?;
    Ok(HttpResponse::Created().json(UserSummary::from(&user)))
}

/*
    POST /api/auth/signin
*/
pub async fn signin(
    repo: web::Data<SharedRepository>,
    config: web::Data<AppConfig>,
    input: web::Json<Credentials>,
) -> Result<HttpResponse, AppError> {
    let user = authenticate(repo.get_ref().as_ref(), &config, &input).await?;
    let auth_token = generate_token(&config, &user)?;
    Ok(HttpResponse::Ok().json(TokenResponse { auth_token }))
}

/*
    GET /api/auth/session
*/
pub async fn user_session(session: SessionContext) -> HttpResponse {
    HttpResponse::Ok().json(SessionResponse {
        user_id: session.user_id.to_hex(),
        username: session.username,
        is_admin: session.is_admin,
        has_pending_itinerary: session.pending_itinerary.is_some(),
    })
}
