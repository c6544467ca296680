use async_trait::async_trait;
use futures::TryStreamExt;
use log::{info, warn};
use mongodb::{
    bson::{doc, oid::ObjectId},
    error::{ErrorKind, WriteFailure},
    options::{ClientOptions, IndexOptions, ServerApi, ServerApiVersion},
    Client, Collection, Database, IndexModel,
};
use std::time::Duration;

use crate::db::repository::{StoreError, TravelRepository, PUBLIC_ITINERARY_LIMIT};
use crate::models::chat::ChatMessage;
use crate::models::itinerary::SavedItinerary;
use crate::models::user::User;

const USERS: &str = "Users";
const ITINERARIES: &str = "Itineraries";
const CHAT_MESSAGES: &str = "ChatMessages";
const DUPLICATE_KEY: i32 = 11000;

pub async fn create_mongo_client(uri: &str) -> Result<Client, mongodb::error::Error> {
    info!("Connecting to MongoDB");

    let mut client_options = ClientOptions::parse(uri).await?;

    client_options.connect_timeout = Some(Duration::from_secs(10));
    client_options.server_selection_timeout = Some(Duration::from_secs(10));
    client_options.max_pool_size = Some(10);
    client_options.min_pool_size = Some(1);

    let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
    client_options.server_api = Some(server_api);

    let client = Client::with_options(client_options)?;

    match client.database("admin").run_command(doc! {"ping": 1}).await {
        Ok(_) => info!("Connected to MongoDB and verified with ping"),
        Err(e) => {
            warn!("Connected to MongoDB but ping failed: {}", e);
            warn!("The API may still work, but some functionality might be impaired");
        }
    }

    Ok(client)
}

pub struct MongoRepository {
    db: Database,
}

impl MongoRepository {
    pub fn new(client: &Client, database: &str) -> Self {
        Self {
            db: client.database(database),
        }
    }

    /// Unique username index; safe to call on every start.
    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let index = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.users().create_index(index).await.map_err(db_error)?;
        Ok(())
    }

    fn users(&self) -> Collection<User> {
        self.db.collection(USERS)
    }

    fn itineraries(&self) -> Collection<SavedItinerary> {
        self.db.collection(ITINERARIES)
    }

    fn chat_messages(&self) -> Collection<ChatMessage> {
        self.db.collection(CHAT_MESSAGES)
    }
}

fn db_error(err: mongodb::error::Error) -> StoreError {
    StoreError::Database(err.to_string())
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

#[async_trait]
impl TravelRepository for MongoRepository {
    async fn ping(&self) -> Result<(), StoreError> {
        self.db.run_command(doc! {"ping": 1}).await.map_err(db_error)?;
        Ok(())
    }

    async fn create_user(&self, mut user: User) -> Result<User, StoreError> {
        match self.users().insert_one(&user).await {
            Ok(result) => {
                user.id = result.inserted_id.as_object_id();
                Ok(user)
            }
            Err(err) if is_duplicate_key(&err) => Err(StoreError::Duplicate("Username".to_string())),
            Err(err) => Err(db_error(err)),
        }
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.users()
            .find_one(doc! { "username": username })
            .await
            .map_err(db_error)
    }

    async fn find_user(&self, id: &ObjectId) -> Result<Option<User>, StoreError> {
        self.users().find_one(doc! { "_id": *id }).await.map_err(db_error)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let cursor = self
            .users()
            .find(doc! {})
            .sort(doc! { "_id": 1 })
            .await
            .map_err(db_error)?;
        cursor.try_collect().await.map_err(db_error)
    }

    async fn set_user_admin(&self, id: &ObjectId, is_admin: bool) -> Result<bool, StoreError> {
        let result = self
            .users()
            .update_one(doc! { "_id": *id }, doc! { "$set": { "is_admin": is_admin } })
            .await
            .map_err(db_error)?;
        Ok(result.matched_count > 0)
    }

    async fn insert_itinerary(&self, mut itinerary: SavedItinerary) -> Result<SavedItinerary, StoreError> {
        let result = self
            .itineraries()
            .insert_one(&itinerary)
            .await
            .map_err(db_error)?;
        itinerary.id = result.inserted_id.as_object_id();
        Ok(itinerary)
    }

    async fn itineraries_for_user(&self, user_id: &ObjectId) -> Result<Vec<SavedItinerary>, StoreError> {
        let cursor = self
            .itineraries()
            .find(doc! { "user_id": *user_id })
            .sort(doc! { "_id": -1 })
            .await
            .map_err(db_error)?;
        cursor.try_collect().await.map_err(db_error)
    }

    async fn public_itineraries(&self) -> Result<Vec<SavedItinerary>, StoreError> {
        let cursor = self
            .itineraries()
            .find(doc! { "is_public": true })
            .sort(doc! { "_id": -1 })
            .limit(PUBLIC_ITINERARY_LIMIT as i64)
            .await
            .map_err(db_error)?;
        cursor.try_collect().await.map_err(db_error)
    }

    async fn find_itinerary(&self, id: &ObjectId) -> Result<Option<SavedItinerary>, StoreError> {
        self.itineraries()
            .find_one(doc! { "_id": *id })
            .await
            .map_err(db_error)
    }

    async fn insert_chat_message(&self, mut message: ChatMessage) -> Result<ChatMessage, StoreError> {
        let result = self
            .chat_messages()
            .insert_one(&message)
            .await
            .map_err(db_error)?;
        message.id = result.inserted_id.as_object_id();
        Ok(message)
    }

    async fn chat_history(&self, itinerary_id: &ObjectId) -> Result<Vec<ChatMessage>, StoreError> {
        let cursor = self
            .chat_messages()
            .find(doc! { "itinerary_id": *itinerary_id })
            .sort(doc! { "_id": 1 })
            .await
            .map_err(db_error)?;
        cursor.try_collect().await.map_err(db_error)
    }
}
