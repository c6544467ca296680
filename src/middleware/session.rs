use std::collections::HashMap;

use actix_web::{
    dev::Payload, error::ErrorUnauthorized, web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::LocalBoxFuture;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::middleware::auth::Claims;
use crate::models::itinerary::PendingItinerary;
use crate::models::user::UserRole;

/// Generated-but-unsaved itineraries, one slot per user. Shared by all workers.
#[derive(Default)]
pub struct SessionStore {
    pending: RwLock<HashMap<ObjectId, PendingItinerary>>,
}

impl SessionStore {
    pub async fn pending(&self, user_id: &ObjectId) -> Option<PendingItinerary> {
        self.pending.read().await.get(user_id).cloned()
    }

    /// Replaces whatever was pending before.
    pub async fn set_pending(&self, user_id: ObjectId, itinerary: PendingItinerary) {
        self.pending.write().await.insert(user_id, itinerary);
    }

    pub async fn take_pending(&self, user_id: &ObjectId) -> Option<PendingItinerary> {
        self.pending.write().await.remove(user_id)
    }
}

/// Everything a handler knows about the caller, built from the token claims
/// and the session store.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub user_id: ObjectId,
    pub username: String,
    pub is_admin: bool,
    pub pending_itinerary: Option<PendingItinerary>,
}

impl FromRequest for SessionContext {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<Claims>().cloned();
        let sessions = req.app_data::<web::Data<SessionStore>>().cloned();

        Box::pin(async move {
            let claims = claims.ok_or_else(|| ErrorUnauthorized("User not authenticated"))?;
            let user_id = ObjectId::parse_str(&claims.user_id)
                .map_err(|_| ErrorUnauthorized("Invalid user id in token"))?;

            let pending_itinerary = match sessions {
                Some(sessions) => sessions.pending(&user_id).await,
                None => None,
            };

            Ok(SessionContext {
                user_id,
                username: claims.sub,
                is_admin: claims.role == UserRole::Admin,
                pending_itinerary,
            })
        })
    }
}
