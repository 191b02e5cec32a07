pub mod itinerary;
pub mod points;
