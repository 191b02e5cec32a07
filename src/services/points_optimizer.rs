//! Point-redemption trip options: builds the optimization request from a
//! user's balances and runs it through the same generate → parse → fallback
//! pipeline as itinerary assembly.

use log::warn;
use std::sync::Arc;

use crate::models::points::{
    BalanceWithProgram, OptimizationPreferences, OptimizationStrategy, TripOption,
};
use crate::services::engine_error::EngineError;
use crate::services::fallback_service;
use crate::services::generation_client::{GenerationClient, GenerationRequest};
use crate::services::prompt_builder::{self, POINTS_SYSTEM_PROMPT};
use crate::services::response_parser;

pub struct PointsOptimizer {
    client: Arc<dyn GenerationClient>,
}

impl PointsOptimizer {
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self { client }
    }

    /// Validates the inputs and renders the optimization request text.
    /// Exposed separately from `optimize_trips` so the request can be
    /// inspected without an external call.
    pub fn build_optimization_request(
        balances: &[BalanceWithProgram],
        preferences: &OptimizationPreferences,
        additional_budget: f64,
        strategy: OptimizationStrategy,
    ) -> Result<String, EngineError> {
        if balances.is_empty() {
            return Err(EngineError::Validation(
                "at least one points balance is required before generating optimized trips"
                    .to_string(),
            ));
        }
        if additional_budget < 0.0 {
            return Err(EngineError::Validation(
                "additional budget must not be negative".to_string(),
            ));
        }

        Ok(prompt_builder::build_optimization_prompt(
            balances,
            preferences,
            additional_budget,
            strategy,
        ))
    }

    /// Total over valid input: collaborator outages and malformed replies
    /// downgrade to deterministic option synthesis, mirroring itinerary
    /// generation.
    pub async fn optimize_trips(
        &self,
        balances: &[BalanceWithProgram],
        preferences: &OptimizationPreferences,
        additional_budget: f64,
        strategy: OptimizationStrategy,
    ) -> Result<Vec<TripOption>, EngineError> {
        let prompt =
            Self::build_optimization_request(balances, preferences, additional_budget, strategy)?;

        match self
            .client
            .complete(GenerationRequest::new(POINTS_SYSTEM_PROMPT, prompt))
            .await
        {
            Ok(raw) => match response_parser::parse_trip_options(&raw) {
                Ok(options) => return Ok(options),
                Err(err) => {
                    warn!("Trip options failed to parse: {}. Using fallback.", err);
                }
            },
            Err(err) => {
                warn!("Trip optimization unavailable: {}. Using fallback.", err);
            }
        }

        Ok(fallback_service::synthesize_trip_options(
            balances,
            preferences,
            additional_budget,
        ))
    }
}
