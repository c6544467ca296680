pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

pub use models::parsed_itinerary::{DaySection, ParsedItinerary};
pub use models::render_tree::{ActivityNode, IconCategory, RenderNode, RenderTree};
pub use services::itinerary_parser::parse;
pub use services::itinerary_renderer::{render, render_text};
