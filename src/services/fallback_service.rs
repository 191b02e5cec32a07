//! Deterministic-shape itinerary synthesis for when the generation
//! collaborator is down or unparsable. Content is randomized per call from
//! fixed pools; shape is always one activity per time-of-day slot, in slot
//! order, with every field populated. The randomness source is injected so
//! tests can pin a seed.

use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::itinerary::{Activity, ActivityLocation, Day, TimeOfDay};
use crate::models::points::{BalanceWithProgram, OptimizationPreferences, PartnerAllocation, TripOption};

struct ActivityTemplate {
    title: &'static str,
    description: &'static str,
    time: &'static str,
    duration: &'static str,
    cost: &'static str,
}

const MORNING_POOL: [ActivityTemplate; 4] = [
    ActivityTemplate {
        title: "Historic Walking Tour of {destination}",
        description: "Start the day with a guided walk through the old quarter of {destination}, covering its landmark squares and hidden side streets.",
        time: "9:00 AM",
        duration: "2.5 hours",
        cost: "$25 per person",
    },
    ActivityTemplate {
        title: "{destination} Market Morning",
        description: "Browse the main market of {destination} while it is at its liveliest, sampling local produce and pastries along the way.",
        time: "8:30 AM",
        duration: "2 hours",
        cost: "$15 per person",
    },
    ActivityTemplate {
        title: "Museum Highlights in {destination}",
        description: "Beat the crowds with an early visit to the most celebrated museum in {destination} and its signature collection.",
        time: "9:30 AM",
        duration: "3 hours",
        cost: "$20 per person",
    },
    ActivityTemplate {
        title: "Scenic Viewpoint Hike near {destination}",
        description: "An easy morning hike to a viewpoint with panoramic views over {destination}, with plenty of photo stops.",
        time: "8:00 AM",
        duration: "3 hours",
        cost: "Free",
    },
];

const AFTERNOON_POOL: [ActivityTemplate; 4] = [
    ActivityTemplate {
        title: "Local Food Tasting in {destination}",
        description: "A relaxed afternoon tasting the dishes {destination} is known for, hopping between a handful of well-loved spots.",
        time: "1:30 PM",
        duration: "2.5 hours",
        cost: "$45 per person",
    },
    ActivityTemplate {
        title: "Neighborhood Exploration in {destination}",
        description: "Wander the most characterful neighborhood of {destination}, with time for galleries, boutiques, and a coffee stop.",
        time: "2:00 PM",
        duration: "3 hours",
        cost: "Free",
    },
    ActivityTemplate {
        title: "{destination} River and Park Stroll",
        description: "An unhurried loop along the waterfront and through the central park of {destination}, ideal for a slower afternoon.",
        time: "3:00 PM",
        duration: "2 hours",
        cost: "Free",
    },
    ActivityTemplate {
        title: "Artisan Workshop Visit in {destination}",
        description: "Visit a workshop keeping a traditional craft of {destination} alive, with a short hands-on demonstration.",
        time: "2:30 PM",
        duration: "2 hours",
        cost: "$30 per person",
    },
];

const EVENING_POOL: [ActivityTemplate; 4] = [
    ActivityTemplate {
        title: "Dinner at a Classic {destination} Restaurant",
        description: "An evening meal at a long-standing favorite in {destination}, featuring regional specialties.",
        time: "7:00 PM",
        duration: "2 hours",
        cost: "$60 per person",
    },
    ActivityTemplate {
        title: "Sunset Walk in {destination}",
        description: "Catch the best evening light from the favorite sunset spot of {destination}, followed by a slow walk back through town.",
        time: "6:30 PM",
        duration: "1.5 hours",
        cost: "Free",
    },
    ActivityTemplate {
        title: "Live Music Night in {destination}",
        description: "End the day with live local music at an intimate venue in {destination}.",
        time: "8:00 PM",
        duration: "2.5 hours",
        cost: "$20 per person",
    },
    ActivityTemplate {
        title: "{destination} Evening Food Stalls",
        description: "Graze through the evening food stalls of {destination}, the easiest way to try a bit of everything.",
        time: "7:30 PM",
        duration: "2 hours",
        cost: "$25 per person",
    },
];

fn pool_for(category: TimeOfDay) -> &'static [ActivityTemplate] {
    match category {
        TimeOfDay::Morning => &MORNING_POOL,
        TimeOfDay::Afternoon => &AFTERNOON_POOL,
        TimeOfDay::Evening => &EVENING_POOL,
    }
}

fn instantiate(template: &ActivityTemplate, category: TimeOfDay, destination: &str) -> Activity {
    Activity {
        title: template.title.replace("{destination}", destination),
        description: template.description.replace("{destination}", destination),
        time: template.time.to_string(),
        category,
        duration: template.duration.to_string(),
        cost: template.cost.to_string(),
        location: ActivityLocation {
            address: destination.to_string(),
            coordinates: [0.0, 0.0],
        },
    }
}

/// One random pick from the fixed pool for a slot.
pub fn synthesize_activity<R: Rng>(
    rng: &mut R,
    category: TimeOfDay,
    destination: &str,
) -> Activity {
    let pool = pool_for(category);
    // Pools are non-empty by construction.
    let template = pool.choose(rng).unwrap_or(&pool[0]);
    instantiate(template, category, destination)
}

/// Full-itinerary synthesis. Assumes `trip_duration_days >= 1`; upstream
/// validation rejects inverted date ranges before this runs.
pub fn synthesize_days<R: Rng>(
    rng: &mut R,
    start_date: NaiveDate,
    trip_duration_days: i64,
    destination: &str,
) -> Vec<Day> {
    (0..trip_duration_days)
        .map(|index| Day {
            date: start_date + Duration::days(index),
            day_number: index as u32 + 1,
            activities: TimeOfDay::ALL
                .iter()
                .map(|&slot| synthesize_activity(rng, slot, destination))
                .collect(),
        })
        .collect()
}

const OPTION_DESTINATIONS: [(&str, &str); 3] = [
    (
        "Lisbon, Portugal",
        "A week of coastal city wandering, funded almost entirely with transferred points.",
    ),
    (
        "Kyoto, Japan",
        "Temples, gardens, and rail day trips, with flights covered by airline partners.",
    ),
    (
        "Cancun, Mexico",
        "A resort stay booked through hotel partners, leaving cash for day trips.",
    ),
];

/// Deterministic-shape trip options used when the optimization collaborator
/// is unavailable. Allocations are arithmetic over real balances: the best
/// transfer partner of each program by cent value, or the portal rate when a
/// program has no partners.
pub fn synthesize_trip_options(
    balances: &[BalanceWithProgram],
    preferences: &OptimizationPreferences,
    additional_budget: f64,
) -> Vec<TripOption> {
    OPTION_DESTINATIONS
        .iter()
        .map(|(destination, description)| {
            let destination = preferences
                .specific_destination
                .clone()
                .unwrap_or_else(|| destination.to_string());

            let allocations: Vec<PartnerAllocation> = balances
                .iter()
                .map(|entry| {
                    let best = entry
                        .program
                        .transfer_partners
                        .iter()
                        .max_by(|a, b| {
                            a.average_cent_value_per_point
                                .total_cmp(&b.average_cent_value_per_point)
                        });
                    let (partner_name, value_per_point) = match best {
                        Some(partner) => (
                            partner.name.clone(),
                            partner.average_cent_value_per_point,
                        ),
                        None => (
                            "Travel portal".to_string(),
                            entry.program.portal_redemption_value,
                        ),
                    };
                    let points_used = entry.balance.points_balance;
                    PartnerAllocation {
                        name: partner_name,
                        program_name: entry.program.name.clone(),
                        points_used,
                        value_per_point,
                        cash_value: points_used as f64 * value_per_point / 100.0,
                    }
                })
                .collect();

            let points_value: f64 = allocations.iter().map(|a| a.cash_value).sum();

            TripOption {
                destination: destination.clone(),
                description: description.to_string(),
                additional_cash: additional_budget,
                total_value: points_value + additional_budget,
                redemption_strategy: format!(
                    "Transfer each balance to its highest-value partner and book {} directly \
                     through the partner programs, using the cash budget for anything points \
                     cannot cover.",
                    destination
                ),
                transfer_partners: allocations,
            }
        })
        .collect()
}
