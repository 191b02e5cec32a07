//! The JSON shapes the prompt builder asks the model for and the response
//! parser deserializes back out. Keeping both sides on these structs means a
//! drifted field name is a compile-time problem, not a silent parse failure.

use serde::Deserialize;

use crate::models::itinerary::{Activity, ActivityLocation, TimeOfDay};

/// Untrusted activity as emitted by the model. Everything optional except
/// the fields the frontend cannot render without.
#[derive(Debug, Deserialize, Clone)]
pub struct ActivityDraft {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub time: Option<String>,
    pub category: TimeOfDay,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub cost: Option<String>,
    #[serde(default)]
    pub location: Option<LocationDraft>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LocationDraft {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub coordinates: Option<[f64; 2]>,
}

/// Untrusted day as emitted by the model. `date` and `dayNumber` are
/// accepted but always overwritten by the parser; the array index is the
/// source of truth.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DayDraft {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub day_number: Option<u32>,
    pub activities: Vec<ActivityDraft>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ItineraryDraft {
    pub days: Vec<DayDraft>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TripOptionsDraft {
    pub trip_options: Vec<TripOptionDraft>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TripOptionDraft {
    pub destination: String,
    pub description: String,
    pub transfer_partners: Vec<PartnerAllocationDraft>,
    #[serde(default)]
    pub additional_cash: f64,
    #[serde(default)]
    pub total_value: f64,
    #[serde(default)]
    pub redemption_strategy: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PartnerAllocationDraft {
    pub name: String,
    pub program_name: String,
    pub points_used: u64,
    #[serde(default)]
    pub value_per_point: f64,
    #[serde(default)]
    pub cash_value: f64,
}

impl ActivityDraft {
    /// Fill the gaps a model reply is allowed to leave and produce the
    /// canonical document shape.
    pub fn into_activity(self) -> Activity {
        let location = self.location.unwrap_or_default();
        Activity {
            title: self.title,
            description: self.description,
            time: self
                .time
                .unwrap_or_else(|| self.category.default_time_label().to_string()),
            category: self.category,
            duration: self.duration.unwrap_or_else(|| "2 hours".to_string()),
            cost: self.cost.unwrap_or_else(|| "Varies".to_string()),
            location: ActivityLocation {
                address: location.address,
                coordinates: location.coordinates.unwrap_or([0.0, 0.0]),
            },
        }
    }
}

/// The itinerary shape spelled out for the model, field for field what
/// `ItineraryDraft` deserializes.
pub const ITINERARY_RESPONSE_SHAPE: &str = r#"{
  "days": [
    {
      "date": "YYYY-MM-DD",
      "dayNumber": 1,
      "activities": [
        {
          "title": "activity name",
          "description": "detailed description",
          "time": "9:00 AM",
          "category": "morning",
          "duration": "2 hours",
          "cost": "$25 per person",
          "location": { "address": "street address", "coordinates": [0, 0] }
        }
      ]
    }
  ]
}"#;

/// Single-activity shape used by regeneration, matching `ActivityDraft`.
pub const ACTIVITY_RESPONSE_SHAPE: &str = r#"{
  "title": "activity name",
  "description": "detailed description",
  "time": "2:00 PM",
  "category": "afternoon",
  "duration": "2 hours",
  "cost": "$25 per person",
  "location": { "address": "street address", "coordinates": [0, 0] }
}"#;

/// Trip-options shape for points optimization, matching `TripOptionsDraft`.
pub const TRIP_OPTIONS_RESPONSE_SHAPE: &str = r#"{
  "tripOptions": [
    {
      "destination": "destination name",
      "description": "brief overview of the trip",
      "transferPartners": [
        {
          "name": "partner name",
          "programName": "reward program name",
          "pointsUsed": 50000,
          "valuePerPoint": 2.1,
          "cashValue": 1050
        }
      ],
      "additionalCash": 350,
      "totalValue": 1400,
      "redemptionStrategy": "detailed explanation of how to book this trip"
    }
  ]
}"#;
