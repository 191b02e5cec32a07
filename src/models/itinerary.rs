use chrono::NaiveDate;
use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// How packed each day of the trip should be.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pace {
    Relaxed,
    #[default]
    Balanced,
    Ambitious,
}

impl Pace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pace::Relaxed => "Relaxed",
            Pace::Balanced => "Balanced",
            Pace::Ambitious => "Ambitious",
        }
    }
}

/// Time-of-day slot an activity belongs to. The slot is fixed for the
/// lifetime of an activity position: regeneration replaces content, never
/// the category.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
}

impl TimeOfDay {
    /// Canonical per-day slot order.
    pub const ALL: [TimeOfDay; 3] = [TimeOfDay::Morning, TimeOfDay::Afternoon, TimeOfDay::Evening];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
        }
    }

    /// Default clock label for a slot, used when the generator omits one.
    pub fn default_time_label(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "9:00 AM",
            TimeOfDay::Afternoon => "2:00 PM",
            TimeOfDay::Evening => "7:00 PM",
        }
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ActivityLocation {
    pub address: String,
    /// [longitude, latitude]; [0, 0] means the address was never geocoded.
    pub coordinates: [f64; 2],
}

impl Default for ActivityLocation {
    fn default() -> Self {
        Self {
            address: String::new(),
            coordinates: [0.0, 0.0],
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Activity {
    pub title: String,
    pub description: String,
    /// Display label like "9:00 AM"; not parsed, only shown.
    pub time: String,
    pub category: TimeOfDay,
    pub duration: String,
    pub cost: String,
    #[serde(default)]
    pub location: ActivityLocation,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    pub date: NaiveDate,
    pub day_number: u32,
    pub activities: Vec<Activity>,
}

/// The persisted trip document. Field names here are the wire contract the
/// frontend and the document store share; renaming one breaks both.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub user: ObjectId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub pace: Pace,
    pub days: Vec<Day>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shareable_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime>,
}

impl Itinerary {
    pub fn trip_duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

/// Free-form trip preferences as submitted by the caller.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TripPreferences {
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub pace: Pace,
    #[serde(default)]
    pub budget: Option<f64>,
}
