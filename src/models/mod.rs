pub mod chat;
pub mod itinerary;
pub mod parsed_itinerary;
pub mod render_tree;
pub mod user;
