use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::render_tree::RenderTree;

const MIN_DAYS: u32 = 1;
const MAX_DAYS: u32 = 30;
const MIN_PEOPLE: u32 = 1;
const MAX_PEOPLE: u32 = 20;

fn default_duration() -> u32 {
    5
}

fn default_people() -> u32 {
    1
}

/// Trip parameters submitted to the generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRequest {
    pub destination: String,
    #[serde(default = "default_duration")]
    pub duration_days: u32,
    #[serde(default)]
    pub budget: String,
    #[serde(default)]
    pub preferences: String,
    #[serde(default)]
    pub user_questions: String,
    pub user_name: String,
    #[serde(default = "default_people")]
    pub num_people: u32,
}

impl TripRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.destination.trim().is_empty() || self.user_name.trim().is_empty() {
            return Err("Please fill Destination and Name.".to_string());
        }
        if !(MIN_DAYS..=MAX_DAYS).contains(&self.duration_days) {
            return Err(format!(
                "Duration must be between {} and {} days",
                MIN_DAYS, MAX_DAYS
            ));
        }
        if !(MIN_PEOPLE..=MAX_PEOPLE).contains(&self.num_people) {
            return Err(format!(
                "People must be between {} and {}",
                MIN_PEOPLE, MAX_PEOPLE
            ));
        }
        Ok(())
    }
}

/// Generated text waiting for the user to name and save it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingItinerary {
    pub content: String,
    pub trip: TripRequest,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SavedItinerary {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub name: String,
    pub content: String,
    pub destination: String,
    pub duration_days: u32,
    pub budget: String,
    pub preferences: String,
    pub user_name: String,
    pub num_people: u32,
    #[serde(default)]
    pub is_public: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl SavedItinerary {
    pub fn from_pending(
        user_id: ObjectId,
        name: &str,
        is_public: bool,
        pending: PendingItinerary,
    ) -> Self {
        Self {
            id: None,
            user_id,
            name: name.trim().to_string(),
            content: pending.content,
            destination: pending.trip.destination,
            duration_days: pending.trip.duration_days,
            budget: pending.trip.budget,
            preferences: pending.trip.preferences,
            user_name: pending.trip.user_name,
            num_people: pending.trip.num_people,
            is_public,
            created_at: Some(Utc::now()),
        }
    }

    /// Private copy owned by another user.
    pub fn copy_for(&self, user_id: ObjectId, username: &str, name: &str) -> Self {
        Self {
            id: None,
            user_id,
            name: name.trim().to_string(),
            user_name: username.to_string(),
            is_public: false,
            created_at: Some(Utc::now()),
            ..self.clone()
        }
    }

    pub fn is_visible_to(&self, user_id: &ObjectId) -> bool {
        self.is_public || &self.user_id == user_id
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ItinerarySummary {
    pub id: String,
    pub name: String,
    pub destination: String,
    pub duration_days: u32,
    pub budget: String,
    pub preferences: String,
    pub num_people: u32,
    pub user_name: String,
    pub is_public: bool,
}

impl From<&SavedItinerary> for ItinerarySummary {
    fn from(itinerary: &SavedItinerary) -> Self {
        Self {
            id: itinerary.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: itinerary.name.clone(),
            destination: itinerary.destination.clone(),
            duration_days: itinerary.duration_days,
            budget: itinerary.budget.clone(),
            preferences: itinerary.preferences.clone(),
            num_people: itinerary.num_people,
            user_name: itinerary.user_name.clone(),
            is_public: itinerary.is_public,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ItineraryDetail {
    #[serde(flatten)]
    pub summary: ItinerarySummary,
    pub content: String,
    pub rendered: RenderTree,
}

#[derive(Debug, Serialize)]
pub struct GeneratedItinerary {
    pub content: String,
    pub trip: TripRequest,
    pub rendered: RenderTree,
}

#[derive(Debug, Deserialize)]
pub struct SaveItineraryRequest {
    pub name: String,
    #[serde(default)]
    pub is_public: bool,
}

#[derive(Debug, Deserialize)]
pub struct CopyItineraryRequest {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct FlightSearchRequest {
    #[serde(default)]
    pub origin: String,
}

#[derive(Debug, Serialize)]
pub struct FlightSuggestions {
    pub origin: String,
    pub destination: String,
    pub suggestions: String,
}
