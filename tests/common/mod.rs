#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use actix_web::{
    dev::{Service, ServiceResponse},
    http::StatusCode,
    test, web, App, ResponseError,
};
use async_trait::async_trait;
use chrono::Utc;
use mongodb::bson::oid::ObjectId;

use travel_planner_api::config::AppConfig;
use travel_planner_api::db::repository::{
    SharedRepository, StoreError, TravelRepository, PUBLIC_ITINERARY_LIMIT,
};
use travel_planner_api::middleware::session::SessionStore;
use travel_planner_api::models::chat::ChatMessage;
use travel_planner_api::models::itinerary::SavedItinerary;
use travel_planner_api::models::user::User;
use travel_planner_api::routes;
use travel_planner_api::services::auth_service::{generate_token, hash_password};
use travel_planner_api::services::generation_service::{
    GenerationError, ItineraryAssistant, TextGenerator,
};

pub const SAMPLE_ITINERARY: &str = "Hello Asha!\n\
Day 1: Arrival\n\
- Morning: Check in at the hotel - ₹3000\n\
- Dinner at a beach shack\n\
Day 2: Explore\n\
- Visit Fort Aguada\n\
Tips:\n\
- Carry sunscreen\n\
Total Estimated Cost: ₹20000";

#[derive(Default)]
pub struct InMemoryRepository {
    users: Mutex<Vec<User>>,
    itineraries: Mutex<Vec<SavedItinerary>>,
    messages: Mutex<Vec<ChatMessage>>,
}

impl InMemoryRepository {
    pub fn itinerary_count(&self) -> usize {
        self.itineraries.lock().unwrap().len()
    }
}

#[async_trait]
impl TravelRepository for InMemoryRepository {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn create_user(&self, mut user: User) -> Result<User, StoreError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::Duplicate("Username".to_string()));
        }
        user.id = Some(ObjectId::new());
        users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_user(&self, id: &ObjectId) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id.as_ref() == Some(id)).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn set_user_admin(&self, id: &ObjectId, is_admin: bool) -> Result<bool, StoreError> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id.as_ref() == Some(id)) {
            Some(user) => {
                user.is_admin = is_admin;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn insert_itinerary(
        &self,
        mut itinerary: SavedItinerary,
    ) -> Result<SavedItinerary, StoreError> {
        itinerary.id = Some(ObjectId::new());
        self.itineraries.lock().unwrap().push(itinerary.clone());
        Ok(itinerary)
    }

    async fn itineraries_for_user(
        &self,
        user_id: &ObjectId,
    ) -> Result<Vec<SavedItinerary>, StoreError> {
        let itineraries = self.itineraries.lock().unwrap();
        Ok(itineraries
            .iter()
            .rev()
            .filter(|i| &i.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn public_itineraries(&self) -> Result<Vec<SavedItinerary>, StoreError> {
        let itineraries = self.itineraries.lock().unwrap();
        Ok(itineraries
            .iter()
            .rev()
            .filter(|i| i.is_public)
            .take(PUBLIC_ITINERARY_LIMIT)
            .cloned()
            .collect())
    }

    async fn find_itinerary(&self, id: &ObjectId) -> Result<Option<SavedItinerary>, StoreError> {
        let itineraries = self.itineraries.lock().unwrap();
        Ok(itineraries.iter().find(|i| i.id.as_ref() == Some(id)).cloned())
    }

    async fn insert_chat_message(&self, mut message: ChatMessage) -> Result<ChatMessage, StoreError> {
        message.id = Some(ObjectId::new());
        self.messages.lock().unwrap().push(message.clone());
        Ok(message)
    }

    async fn chat_history(&self, itinerary_id: &ObjectId) -> Result<Vec<ChatMessage>, StoreError> {
        let messages = self.messages.lock().unwrap();
        Ok(messages
            .iter()
            .filter(|m| &m.itinerary_id == itinerary_id)
            .cloned()
            .collect())
    }
}

/// Returns a fixed reply, or fails every call when `reply` is `None`.
pub struct ScriptedGenerator {
    reply: Option<String>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => Err(GenerationError::Api {
                status: 503,
                body: "model is loading".to_string(),
            }),
        }
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}

pub struct TestApp {
    pub config: AppConfig,
    pub repo: Arc<InMemoryRepository>,
    pub sessions: web::Data<SessionStore>,
    pub generator: Arc<ScriptedGenerator>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_generator(ScriptedGenerator::replying(SAMPLE_ITINERARY))
    }

    pub fn with_generator(generator: ScriptedGenerator) -> Self {
        let config = AppConfig {
            jwt_secret: "test_secret".to_string(),
            bcrypt_cost: 4,
            admin_username: "admin".to_string(),
            admin_password: "admin123".to_string(),
            ..AppConfig::default()
        };

        Self {
            config,
            repo: Arc::new(InMemoryRepository::default()),
            sessions: web::Data::new(SessionStore::default()),
            generator: Arc::new(generator),
        }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let repo: SharedRepository = self.repo.clone();
        let assistant = ItineraryAssistant::new(self.generator.clone());

        App::new()
            .app_data(web::Data::new(self.config.clone()))
            .app_data(web::Data::new(repo))
            .app_data(self.sessions.clone())
            .app_data(web::Data::new(assistant))
            .configure(routes::config)
    }

    /// Stores a user directly and returns it with a signed bearer header value.
    pub async fn user_with_token(&self, username: &str, is_admin: bool) -> (User, String) {
        let user = User {
            id: None,
            username: username.to_string(),
            password_hash: hash_password("password1", self.config.bcrypt_cost).unwrap(),
            is_admin,
            created_at: Some(Utc::now()),
        };
        let user = self.repo.create_user(user).await.unwrap();
        let token = generate_token(&self.config, &user).unwrap();
        (user, format!("Bearer {}", token))
    }
}

/// Status of a request whether it was answered by a handler or rejected by middleware.
pub async fn status_of<S, R, B>(app: &S, req: R) -> StatusCode
where
    S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    match test::try_call_service(app, req).await {
        Ok(resp) => resp.status(),
        Err(err) => err.as_response_error().status_code(),
    }
}
