//! Orchestrates prompt building, the external generation call, response
//! parsing, and fallback synthesis into one canonical itinerary document.
//! Over valid input the public operations are total: a collaborator outage
//! or garbage reply downgrades to the fallback synthesizer, it never fails
//! the request.

use chrono::NaiveDate;
use log::warn;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

use crate::models::itinerary::{Activity, Day, Itinerary, TripPreferences};
use crate::services::engine_error::EngineError;
use crate::services::fallback_service;
use crate::services::generation_client::{GenerationClient, GenerationRequest};
use crate::services::prompt_builder::{
    self, ActivityPromptParams, ACTIVITY_SYSTEM_PROMPT, ITINERARY_SYSTEM_PROMPT,
};
use crate::services::response_parser;

pub struct ItineraryAssembler {
    client: Arc<dyn GenerationClient>,
}

impl ItineraryAssembler {
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self { client }
    }

    fn validate(preferences: &TripPreferences) -> Result<(), EngineError> {
        if preferences.destination.trim().is_empty() {
            return Err(EngineError::Validation("destination is required".to_string()));
        }
        if preferences.end_date < preferences.start_date {
            return Err(EngineError::Validation(
                "endDate must be on or after startDate".to_string(),
            ));
        }
        if let Some(budget) = preferences.budget {
            if budget < 0.0 {
                return Err(EngineError::Validation("budget must not be negative".to_string()));
            }
        }
        Ok(())
    }

    /// Builds a complete itinerary document for the given owner. Stateless;
    /// persisting the result is the caller's job.
    pub async fn assemble(
        &self,
        preferences: &TripPreferences,
        owner: ObjectId,
    ) -> Result<Itinerary, EngineError> {
        Self::validate(preferences)?;

        let trip_duration_days = (preferences.end_date - preferences.start_date).num_days() + 1;
        let days = self.generate_days(preferences, trip_duration_days).await;

        Ok(Itinerary {
            id: None,
            title: format!(
                "{}-Day {} Adventure",
                trip_duration_days, preferences.destination
            ),
            destination: preferences.destination.clone(),
            start_date: preferences.start_date,
            end_date: preferences.end_date,
            user: owner,
            budget: preferences.budget,
            interests: preferences.interests.clone(),
            pace: preferences.pace,
            days,
            is_public: false,
            shareable_link: None,
            created_at: Some(mongodb::bson::DateTime::now()),
            updated_at: Some(mongodb::bson::DateTime::now()),
        })
    }

    /// Generation + parse, with a single unconditional downgrade to fallback
    /// synthesis. No retry of the external call.
    async fn generate_days(
        &self,
        preferences: &TripPreferences,
        trip_duration_days: i64,
    ) -> Vec<Day> {
        let prompt = prompt_builder::build_itinerary_prompt(preferences, trip_duration_days);

        match self
            .client
            .complete(GenerationRequest::new(ITINERARY_SYSTEM_PROMPT, prompt))
            .await
        {
            Ok(raw) => match response_parser::parse_generated_days(
                &raw,
                preferences.start_date,
                trip_duration_days,
            ) {
                Ok(days) => return days,
                Err(err) => {
                    warn!("Generated itinerary failed to parse: {}. Using fallback.", err);
                }
            },
            Err(err) => {
                warn!("Itinerary generation unavailable: {}. Using fallback.", err);
            }
        }

        fallback_service::synthesize_days(
            &mut rand::thread_rng(),
            preferences.start_date,
            trip_duration_days,
            &preferences.destination,
        )
    }

    /// Produces a replacement for exactly one activity slot. The input
    /// document is never mutated; the caller writes the returned activity
    /// back into `days[day_index].activities[activity_index]` and persists.
    pub async fn regenerate_activity(
        &self,
        itinerary: &Itinerary,
        day_index: usize,
        activity_index: usize,
    ) -> Result<Activity, EngineError> {
        let day = itinerary
            .days
            .get(day_index)
            .ok_or_else(|| EngineError::Index(format!("day {} not found", day_index)))?;
        let current = day.activities.get(activity_index).ok_or_else(|| {
            EngineError::Index(format!(
                "activity {} not found on day {}",
                activity_index, day_index
            ))
        })?;

        let prompt = prompt_builder::build_activity_prompt(&ActivityPromptParams {
            destination: &itinerary.destination,
            interests: &itinerary.interests,
            pace: itinerary.pace,
            budget: itinerary.budget,
            day_number: day.day_number,
            current,
        });

        match self
            .client
            .complete(GenerationRequest::new(ACTIVITY_SYSTEM_PROMPT, prompt))
            .await
        {
            Ok(raw) => match response_parser::parse_generated_activity(&raw, current.category) {
                Ok(activity) => return Ok(activity),
                Err(err) => {
                    warn!("Regenerated activity failed to parse: {}. Using fallback.", err);
                }
            },
            Err(err) => {
                warn!("Activity regeneration unavailable: {}. Using fallback.", err);
            }
        }

        Ok(fallback_service::synthesize_activity(
            &mut rand::thread_rng(),
            current.category,
            &itinerary.destination,
        ))
    }
}

/// Convenience used by tests and seed tooling to build a valid preferences
/// value without going through HTTP deserialization.
pub fn preferences(
    destination: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> TripPreferences {
    TripPreferences {
        destination: destination.to_string(),
        start_date,
        end_date,
        interests: Vec::new(),
        pace: Default::default(),
        budget: None,
    }
}
