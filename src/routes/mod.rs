use actix_web::web;

use crate::middleware::auth::AuthMiddleware;
use crate::middleware::role_auth::RequireRole;
use crate::models::user::UserRole;

pub mod account;
pub mod admin;
pub mod chat;
pub mod flights;
pub mod health;
pub mod itinerary;

/// Registers every route. Expects `AppConfig`, `SharedRepository`,
/// `SessionStore` and `ItineraryAssistant` as app data.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check)).service(
        web::scope("/api")
            // Public routes
            .service(
                web::scope("/auth")
                    .route("/signup", web::post().to(account::signup))
                    .route("/signin", web::post().to(account::signin))
                    .service(
                        web::scope("")
                            .wrap(AuthMiddleware)
                            .route("/session", web::get().to(account::user_session)),
                    ),
            )
            // Admin routes; RequireRole runs after AuthMiddleware has stored the claims
            .service(
                web::scope("/admin")
                    .wrap(RequireRole::new(UserRole::Admin))
                    .wrap(AuthMiddleware)
                    .route("/users", web::get().to(admin::list_users))
                    .route("/users/{id}/role", web::put().to(admin::update_user_role)),
            )
            // Protected routes
            .service(
                web::scope("/itineraries")
                    .wrap(AuthMiddleware)
                    .route("", web::get().to(itinerary::list_mine))
                    .route("/generate", web::post().to(itinerary::generate))
                    .route("/public", web::get().to(itinerary::list_public))
                    .route("/pending", web::get().to(itinerary::get_pending))
                    .route("/pending", web::delete().to(itinerary::discard_pending))
                    .route("/pending/save", web::post().to(itinerary::save_pending))
                    .route("/{id}", web::get().to(itinerary::get_by_id))
                    .route("/{id}/copy", web::post().to(itinerary::copy))
                    .route("/{id}/flights", web::post().to(flights::find_flights))
                    .route("/{id}/chat", web::get().to(chat::history))
                    .route("/{id}/chat", web::post().to(chat::ask)),
            ),
    );
}
