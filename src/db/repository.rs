use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use thiserror::Error;

use crate::models::chat::ChatMessage;
use crate::models::itinerary::SavedItinerary;
use crate::models::user::User;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0} already exists")]
    Duplicate(String),

    #[error("{0}")]
    Database(String),
}

pub type SharedRepository = Arc<dyn TravelRepository>;

/// Most public itineraries returned by one listing.
pub const PUBLIC_ITINERARY_LIMIT: usize = 100;

/// Storage for users, saved itineraries and their chat history.
#[async_trait]
pub trait TravelRepository: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;

    /// Fails with `StoreError::Duplicate` when the username is taken.
    async fn create_user(&self, user: User) -> Result<User, StoreError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn find_user(&self, id: &ObjectId) -> Result<Option<User>, StoreError>;
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;
    /// Returns `false` when no such user exists.
    async fn set_user_admin(&self, id: &ObjectId, is_admin: bool) -> Result<bool, StoreError>;

    async fn insert_itinerary(&self, itinerary: SavedItinerary) -> Result<SavedItinerary, StoreError>;
    /// Newest first.
    async fn itineraries_for_user(&self, user_id: &ObjectId) -> Result<Vec<SavedItinerary>, StoreError>;
    /// Newest first, at most `PUBLIC_ITINERARY_LIMIT` of them.
    async fn public_itineraries(&self) -> Result<Vec<SavedItinerary>, StoreError>;
    async fn find_itinerary(&self, id: &ObjectId) -> Result<Option<SavedItinerary>, StoreError>;

    async fn insert_chat_message(&self, message: ChatMessage) -> Result<ChatMessage, StoreError>;
    /// Oldest first.
    async fn chat_history(&self, itinerary_id: &ObjectId) -> Result<Vec<ChatMessage>, StoreError>;
}
