pub mod auth_service;
pub mod generation_service;
pub mod itinerary_parser;
pub mod itinerary_renderer;
pub mod markdown;
pub mod prompt_templates;
