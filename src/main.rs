use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{error, info};

use travel_planner_api::config::AppConfig;
use travel_planner_api::db::mongo::{create_mongo_client, MongoRepository};
use travel_planner_api::db::repository::SharedRepository;
use travel_planner_api::middleware::session::SessionStore;
use travel_planner_api::routes;
use travel_planner_api::services::generation_service::{HttpTextGenerator, ItineraryAssistant};

fn invalid_setup(err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    info!("Application starting...");

    let config = AppConfig::from_env().map_err(|e| {
        error!("Configuration error: {}", e);
        invalid_setup(e)
    })?;

    let client = create_mongo_client(&config.mongo_uri)
        .await
        .map_err(invalid_setup)?;
    let mongo = MongoRepository::new(&client, &config.database);
    if let Err(e) = mongo.ensure_indexes().await {
        error!("Failed to create indexes: {}", e);
    }
    let repo: SharedRepository = Arc::new(mongo);

    let generator = HttpTextGenerator::new(config.generation.clone()).map_err(invalid_setup)?;
    let assistant = ItineraryAssistant::new(Arc::new(generator));
    info!("Text generation via {}", assistant.describe());

    let host = config.host.clone();
    let port = config.port;
    let config = web::Data::new(config);
    let repo = web::Data::new(repo);
    let sessions = web::Data::new(SessionStore::default());
    let assistant = web::Data::new(assistant);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .app_data(config.clone())
            .app_data(repo.clone())
            .app_data(sessions.clone())
            .app_data(assistant.clone())
            .configure(routes::config)
    })
    .bind((host, port))?
    .run()
    .await
}
