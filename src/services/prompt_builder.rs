//! Builds the textual requests sent to the generation collaborator. Pure
//! string assembly; the JSON shapes embedded here come from
//! `generation_schema` so the parser always agrees with what was asked for.

use chrono::NaiveDate;

use crate::models::itinerary::{Activity, Pace, TimeOfDay, TripPreferences};
use crate::models::points::{BalanceWithProgram, OptimizationPreferences, OptimizationStrategy};
use crate::services::generation_schema::{
    ACTIVITY_RESPONSE_SHAPE, ITINERARY_RESPONSE_SHAPE, TRIP_OPTIONS_RESPONSE_SHAPE,
};

pub const ITINERARY_SYSTEM_PROMPT: &str = "You are a travel expert that creates detailed, \
    personalized travel itineraries. Always respond with well-structured JSON only.";

pub const ACTIVITY_SYSTEM_PROMPT: &str = "You are a travel expert that creates personalized \
    travel activities. Respond with JSON only.";

pub const POINTS_SYSTEM_PROMPT: &str = "You are a credit card points expert that specializes \
    in optimizing travel redemptions. Provide detailed, realistic recommendations for \
    maximizing point value. Respond with JSON only.";

/// All dates are embedded in this one canonical format.
fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Full-itinerary generation prompt. Enumerates one activity per time-of-day
/// slot per day and pins the exact response shape.
pub fn build_itinerary_prompt(preferences: &TripPreferences, trip_duration_days: i64) -> String {
    let mut prompt = format!(
        "Create a detailed {}-day travel itinerary for {} from {} to {}.\n",
        trip_duration_days,
        preferences.destination,
        format_date(preferences.start_date),
        format_date(preferences.end_date),
    );

    if !preferences.interests.is_empty() {
        prompt.push_str(&format!("Interests: {}\n", preferences.interests.join(", ")));
    }
    prompt.push_str(&format!("Pace: {}\n", preferences.pace.as_str()));
    if let Some(budget) = preferences.budget {
        prompt.push_str(&format!("Budget: ${}\n", budget));
    }

    prompt.push_str("\nFor each day, include exactly three activities, in this order:\n");
    for slot in TimeOfDay::ALL {
        prompt.push_str(&format!(
            "- One {} activity (category \"{}\") with time, title, description, duration, \
             cost, and location\n",
            slot, slot
        ));
    }

    prompt.push_str("\nFormat the response as a JSON object with this structure:\n");
    prompt.push_str(ITINERARY_RESPONSE_SHAPE);
    prompt.push_str(&format!(
        "\n\nThe \"days\" array must contain exactly {} entries. Return JSON only.",
        trip_duration_days
    ));

    prompt
}

/// Parameters for a single-activity regeneration prompt, read off the
/// itinerary the slot lives in.
#[derive(Debug, Clone)]
pub struct ActivityPromptParams<'a> {
    pub destination: &'a str,
    pub interests: &'a [String],
    pub pace: Pace,
    pub budget: Option<f64>,
    pub day_number: u32,
    pub current: &'a Activity,
}

/// Regeneration-scoped prompt: same slot, same destination, different
/// activity.
pub fn build_activity_prompt(params: &ActivityPromptParams<'_>) -> String {
    let mut prompt = format!(
        "Generate a new {} activity for day {} of a trip to {} that is different from \"{}\".\n",
        params.current.category, params.day_number, params.destination, params.current.title,
    );

    if !params.interests.is_empty() {
        prompt.push_str(&format!(
            "The activity should match these interests: {}\n",
            params.interests.join(", ")
        ));
    }
    prompt.push_str(&format!("It should fit a {} pace.\n", params.pace.as_str()));
    if let Some(budget) = params.budget {
        prompt.push_str(&format!("Overall trip budget: ${}\n", budget));
    }

    prompt.push_str(&format!(
        "\nThe \"category\" field must be \"{}\".\n",
        params.current.category
    ));
    prompt.push_str("Return the response as JSON with this structure:\n");
    prompt.push_str(ACTIVITY_RESPONSE_SHAPE);

    prompt
}

/// Points-optimization prompt. Spells out every balance with its transfer
/// partners so the model can reason about concrete conversion options.
pub fn build_optimization_prompt(
    balances: &[BalanceWithProgram],
    preferences: &OptimizationPreferences,
    additional_budget: f64,
    strategy: OptimizationStrategy,
) -> String {
    let mut prompt = String::from("I have the following reward points:\n");

    for entry in balances {
        prompt.push_str(&format!(
            "- {} ({}): {} points, portal redemption value {} cents per point\n",
            entry.program.name,
            entry.program.short_code,
            entry.balance.points_balance,
            entry.program.portal_redemption_value,
        ));
        for partner in &entry.program.transfer_partners {
            prompt.push_str(&format!(
                "  * transfer partner {} ({:?}): ratio {}, average value {} cents per point\n",
                partner.name,
                partner.category,
                partner.transfer_ratio,
                partner.average_cent_value_per_point,
            ));
        }
    }

    prompt.push_str("\nPreferences:\n");
    prompt.push_str(&format!(
        "- Destination type: {}\n",
        preferences.destination_type.as_deref().unwrap_or("Flexible")
    ));
    prompt.push_str(&format!(
        "- Specific destination (optional): {}\n",
        preferences
            .specific_destination
            .as_deref()
            .unwrap_or("Not specified")
    ));
    prompt.push_str(&format!("- Additional cash budget: ${}\n", additional_budget));
    prompt.push_str(&format!("- Optimization strategy: {}\n", strategy.as_str()));

    prompt.push_str(
        "\nGenerate 3 optimized trip options using my points balances. For each option:\n\
         1. Identify which transfer partners offer the best value\n\
         2. Calculate how many points to use from each program\n\
         3. Determine any additional cash needed\n\
         4. Provide approximate redemption value in cents per point\n",
    );
    prompt.push_str("\nFormat the response as a JSON object with this structure:\n");
    prompt.push_str(TRIP_OPTIONS_RESPONSE_SHAPE);

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::itinerary::ActivityLocation;

    fn paris_prefs() -> TripPreferences {
        TripPreferences {
            destination: "Paris".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(),
            interests: vec!["Food".to_string(), "Art".to_string()],
            pace: Pace::Balanced,
            budget: Some(2000.0),
        }
    }

    #[test]
    fn itinerary_prompt_pins_dates_and_shape() {
        let prompt = build_itinerary_prompt(&paris_prefs(), 3);
        assert!(prompt.contains("3-day travel itinerary for Paris"));
        assert!(prompt.contains("2025-06-01"));
        assert!(prompt.contains("2025-06-03"));
        assert!(prompt.contains("Interests: Food, Art"));
        assert!(prompt.contains("Budget: $2000"));
        assert!(prompt.contains("\"dayNumber\""));
        assert!(prompt.contains("exactly 3 entries"));
    }

    #[test]
    fn itinerary_prompt_omits_empty_sections() {
        let mut prefs = paris_prefs();
        prefs.interests.clear();
        prefs.budget = None;
        let prompt = build_itinerary_prompt(&prefs, 3);
        assert!(!prompt.contains("Interests:"));
        assert!(!prompt.contains("Budget:"));
    }

    #[test]
    fn activity_prompt_fixes_category() {
        let current = Activity {
            title: "Louvre Visit".to_string(),
            description: "Museum morning".to_string(),
            time: "9:00 AM".to_string(),
            category: crate::models::itinerary::TimeOfDay::Afternoon,
            duration: "3 hours".to_string(),
            cost: "$20".to_string(),
            location: ActivityLocation::default(),
        };
        let prompt = build_activity_prompt(&ActivityPromptParams {
            destination: "Paris",
            interests: &[],
            pace: Pace::Relaxed,
            budget: None,
            day_number: 2,
            current: &current,
        });
        assert!(prompt.contains("new afternoon activity for day 2"));
        assert!(prompt.contains("different from \"Louvre Visit\""));
        assert!(prompt.contains("must be \"afternoon\""));
    }
}
