use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::services::generation_service::GenerationError;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-z_]+)\}").expect("valid placeholder regex"));

/// A prompt with `{name}` placeholders and the variables it declares.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub input_variables: &'static [&'static str],
    pub template: &'static str,
}

impl PromptTemplate {
    /// Fill in every placeholder. All declared variables must be supplied.
    pub fn render(&self, vars: &HashMap<String, String>) -> Result<String, GenerationError> {
        if let Some(missing) = self
            .input_variables
            .iter()
            .find(|name| !vars.contains_key(**name))
        {
            return Err(GenerationError::MissingVariable(missing.to_string()));
        }

        let rendered = PLACEHOLDER.replace_all(self.template, |caps: &regex::Captures| {
            let name = &caps[1];
            match vars.get(name) {
                Some(value) if self.input_variables.contains(&name) => value.clone(),
                _ => caps[0].to_string(),
            }
        });
        Ok(rendered.trim().to_string())
    }
}

pub const ITINERARY_PROMPT: PromptTemplate = PromptTemplate {
    input_variables: &[
        "destination",
        "duration_days",
        "budget",
        "preferences",
        "user_questions",
        "user_name",
        "num_people",
    ],
    template: r#"
You are a friendly, professional travel planner AI.
Generate a detailed, day-wise itinerary for {destination}.

Duration: {duration_days} days
Budget: {budget}
Preferences: {preferences}
User: {user_name}, traveling with {num_people} people.

If user provided questions: {user_questions}

Start with a one-line greeting such as "Hello {user_name}!".
Output clearly structured text with headings:
Day 1:, Day 2:, etc., including activities, restaurants, timing, prices and short notes.
Then a "Tips:" section and finally a "Total Estimated Cost:" line.
Avoid photos or image placeholders.
"#,
};

pub const FLIGHTS_PROMPT: PromptTemplate = PromptTemplate {
    input_variables: &["origin", "destination"],
    template: r#"
You are a travel assistant. Provide top 3 flight options
from {origin} to {destination}. For each: airline, price (INR), duration, stops, and short note.
"#,
};

pub const CHAT_PROMPT: PromptTemplate = PromptTemplate {
    input_variables: &["itinerary", "question"],
    template: "You are a travel assistant. Given this itinerary: {itinerary}. Answer: {question}",
};
