use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;
use std::env;

use crate::config::AppConfig;
use crate::db::repository::SharedRepository;
use crate::services::generation_service::ItineraryAssistant;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check(
    repo: web::Data<SharedRepository>,
    assistant: web::Data<ItineraryAssistant>,
    config: web::Data<AppConfig>,
) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let database = check_database(&repo).await;
    let generator = check_generator(&assistant, &config);

    if database.status != "ok" || generator.status != "ok" {
        health.status = "degraded".to_string();
    }
    health.services.insert("database".to_string(), database);
    health.services.insert("text_generation".to_string(), generator);

    HttpResponse::Ok().json(health)
}

async fn check_database(repo: &SharedRepository) -> ServiceStatus {
    match repo.ping().await {
        Ok(_) => ServiceStatus {
            status: "ok".to_string(),
            details: Some("Database reachable".to_string()),
        },
        Err(e) => {
            log::error!("Database health check failed: {}", e);
            ServiceStatus {
                status: "error".to_string(),
                details: Some(format!("Failed to connect: {}", e)),
            }
        }
    }
}

fn check_generator(assistant: &ItineraryAssistant, config: &AppConfig) -> ServiceStatus {
    match &config.generation.api_token {
        Some(token) => {
            let masked = if token.is_ascii() && token.len() > 8 {
                format!("{}***{}", &token[0..4], &token[token.len() - 4..])
            } else {
                "***".to_string()
            };
            ServiceStatus {
                status: "ok".to_string(),
                details: Some(format!("{} (token {})", assistant.describe(), masked)),
            }
        }
        None => ServiceStatus {
            status: "error".to_string(),
            details: Some("HUGGINGFACEHUB_API_TOKEN not configured".to_string()),
        },
    }
}
