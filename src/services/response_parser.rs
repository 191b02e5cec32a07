//! Validates raw collaborator output against the shapes promised in the
//! prompts. Nothing here escapes past its boundary: callers catch
//! `ParseError` and fall through to deterministic fallback synthesis.

use chrono::{Duration, NaiveDate};
use std::error::Error;
use std::fmt;

use crate::models::itinerary::{Activity, Day, TimeOfDay};
use crate::models::points::{PartnerAllocation, TripOption};
use crate::services::generation_schema::{ActivityDraft, ItineraryDraft, TripOptionsDraft};

#[derive(Debug)]
pub struct ParseError(pub String);

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parse error: {}", self.0)
    }
}

impl Error for ParseError {}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        ParseError(err.to_string())
    }
}

/// Extracts the first balanced top-level JSON object from free text. The
/// collaborator is allowed to wrap its JSON in prose; brace counting is
/// string- and escape-aware so braces inside values do not confuse it.
pub fn extract_first_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Requires exactly one activity per category, in morning → afternoon →
/// evening order. Structural, not cosmetic: the frontend renders slots by
/// position.
fn validate_slot_order(activities: &[ActivityDraft], day_index: usize) -> Result<(), ParseError> {
    if activities.len() != TimeOfDay::ALL.len() {
        return Err(ParseError(format!(
            "day {} has {} activities, expected {}",
            day_index + 1,
            activities.len(),
            TimeOfDay::ALL.len()
        )));
    }
    for (slot, activity) in TimeOfDay::ALL.iter().zip(activities) {
        if activity.category != *slot {
            return Err(ParseError(format!(
                "day {} slot {} has category {}",
                day_index + 1,
                slot,
                activity.category
            )));
        }
    }
    Ok(())
}

/// Parses a full generated itinerary. Day dates and numbers from the model
/// are discarded and re-derived from the array index, so an off-by-one from
/// the collaborator cannot corrupt the document.
pub fn parse_generated_days(
    raw: &str,
    start_date: NaiveDate,
    expected_days: i64,
) -> Result<Vec<Day>, ParseError> {
    let json = extract_first_object(raw)
        .ok_or_else(|| ParseError("no JSON object in response".to_string()))?;
    let draft: ItineraryDraft = serde_json::from_str(json)?;

    if draft.days.is_empty() {
        return Err(ParseError("days array is empty".to_string()));
    }
    if draft.days.len() as i64 != expected_days {
        return Err(ParseError(format!(
            "expected {} days, got {}",
            expected_days,
            draft.days.len()
        )));
    }

    let mut days = Vec::with_capacity(draft.days.len());
    for (index, day) in draft.days.into_iter().enumerate() {
        validate_slot_order(&day.activities, index)?;
        days.push(Day {
            date: start_date + Duration::days(index as i64),
            day_number: index as u32 + 1,
            activities: day
                .activities
                .into_iter()
                .map(ActivityDraft::into_activity)
                .collect(),
        });
    }

    Ok(days)
}

/// Parses a single regenerated activity and enforces that the collaborator
/// kept the slot's category.
pub fn parse_generated_activity(
    raw: &str,
    expected_category: TimeOfDay,
) -> Result<Activity, ParseError> {
    let json = extract_first_object(raw)
        .ok_or_else(|| ParseError("no JSON object in response".to_string()))?;
    let draft: ActivityDraft = serde_json::from_str(json)?;

    if draft.category != expected_category {
        return Err(ParseError(format!(
            "category changed from {} to {}",
            expected_category, draft.category
        )));
    }

    Ok(draft.into_activity())
}

/// Parses points-optimization trip options with the same extraction and
/// structural validation discipline as itinerary generation.
pub fn parse_trip_options(raw: &str) -> Result<Vec<TripOption>, ParseError> {
    let json = extract_first_object(raw)
        .ok_or_else(|| ParseError("no JSON object in response".to_string()))?;
    let draft: TripOptionsDraft = serde_json::from_str(json)?;

    if draft.trip_options.is_empty() {
        return Err(ParseError("tripOptions array is empty".to_string()));
    }

    let options = draft
        .trip_options
        .into_iter()
        .map(|option| TripOption {
            destination: option.destination,
            description: option.description,
            transfer_partners: option
                .transfer_partners
                .into_iter()
                .map(|p| PartnerAllocation {
                    name: p.name,
                    program_name: p.program_name,
                    points_used: p.points_used,
                    value_per_point: p.value_per_point,
                    cash_value: p.cash_value,
                })
                .collect(),
            additional_cash: option.additional_cash,
            total_value: option.total_value,
            redemption_strategy: option.redemption_strategy,
        })
        .collect();

    Ok(options)
}
