use actix_web::{web, HttpResponse};
use log::info;
use serde::{Deserialize, Serialize};

use crate::db::repository::SharedRepository;
use crate::error::AppError;
use crate::models::user::UserSummary;
use crate::routes::itinerary::parse_id;

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateRoleRequest {
    pub is_admin: bool,
}

/*
    GET /api/admin/users
*/
pub async fn list_users(repo: web::Data<SharedRepository>) -> Result<HttpResponse, AppError> {
    let users = repo.list_users().await?;
    let summaries: Vec<UserSummary> = users.iter().map(UserSummary::from).collect();
    Ok(HttpResponse::Ok().json(summaries))
}

/*
    PUT /api/admin/users/{id}/role
*/
pub async fn update_user_role(
    path: web::Path<String>,
    repo: web::Data<SharedRepository>,
    input: web::Json<UpdateRoleRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = parse_id(&path.into_inner())?;

    if !repo.set_user_admin(&user_id, input.is_admin).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    info!("Set admin={} for user {}", input.is_admin, user_id);

    match repo.find_user(&user_id).await? {
        Some(user) => Ok(HttpResponse::Ok().json(UserSummary::from(&user))),
        None => Err(AppError::NotFound("User not found".to_string())),
    }
}
