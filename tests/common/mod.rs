#![allow(dead_code)]

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, Responder};
use async_trait::async_trait;
use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;
use serde_json::json;

use tripsmith_api::models::itinerary::{
    Activity, ActivityLocation, Day, Itinerary, Pace, TimeOfDay, TripPreferences,
};
use tripsmith_api::models::points::{
    BalanceWithProgram, PartnerCategory, PointsBalance, RewardProgram, TransferPartner,
};
use tripsmith_api::services::generation_client::{
    GenerationClient, GenerationRequest, GenerationUnavailable,
};

/// App with the production route table and mock handlers, so routing and
/// the wire contract can be exercised without MongoDB or a generation key.
pub struct TestApp;

impl TestApp {
    pub fn new() -> Self {
        Self
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .route("/health", web::get().to(health_check))
            .service(
                web::scope("/api")
                    .service(
                        web::scope("/itineraries")
                            .route("/{id}", web::get().to(get_itinerary_by_id))
                            .route("", web::get().to(unauthorized_handler))
                            .route("/generate", web::post().to(unauthorized_handler))
                            .route(
                                "/{id}/regenerate-activity",
                                web::post().to(unauthorized_handler),
                            )
                            .route("/{id}", web::delete().to(unauthorized_handler)),
                    )
                    .service(
                        web::scope("/points")
                            .route("/programs", web::get().to(get_programs))
                            .route("/programs", web::post().to(unauthorized_handler))
                            .route("/balance", web::post().to(unauthorized_handler))
                            .route("/balance", web::get().to(unauthorized_handler))
                            .route("/balance/{id}", web::put().to(unauthorized_handler))
                            .route("/balance/{id}", web::delete().to(unauthorized_handler))
                            .route("/optimized-trips", web::post().to(unauthorized_handler)),
                    ),
            )
    }
}

// Mock handler functions for testing
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(json!({"status": "ok"}))
}

async fn get_programs() -> impl Responder {
    HttpResponse::Ok().json(json!([]))
}

async fn get_itinerary_by_id() -> impl Responder {
    HttpResponse::NotFound().json(json!({"message": "Itinerary not found"}))
}

async fn unauthorized_handler() -> impl Responder {
    HttpResponse::Unauthorized().json(json!({"message": "Unauthorized"}))
}

/// Generation collaborator that always answers with a canned reply.
pub struct ScriptedClient {
    pub response: String,
}

impl ScriptedClient {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

#[async_trait]
impl GenerationClient for ScriptedClient {
    async fn complete(&self, _request: GenerationRequest) -> Result<String, GenerationUnavailable> {
        Ok(self.response.clone())
    }
}

/// Generation collaborator that is always down.
pub struct UnreachableClient;

#[async_trait]
impl GenerationClient for UnreachableClient {
    async fn complete(&self, _request: GenerationRequest) -> Result<String, GenerationUnavailable> {
        Err(GenerationUnavailable::Http("connection refused".to_string()))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn paris_preferences() -> TripPreferences {
    TripPreferences {
        destination: "Paris".to_string(),
        start_date: date(2025, 6, 1),
        end_date: date(2025, 6, 3),
        interests: vec!["Food".to_string()],
        pace: Pace::Balanced,
        budget: None,
    }
}

pub fn slot_activity(category: TimeOfDay, title: &str) -> Activity {
    Activity {
        title: title.to_string(),
        description: format!("{} in town", title),
        time: category.default_time_label().to_string(),
        category,
        duration: "2 hours".to_string(),
        cost: "$20".to_string(),
        location: ActivityLocation::default(),
    }
}

/// A persisted-shape itinerary with three slots per day.
pub fn sample_itinerary(owner: ObjectId, days: u32) -> Itinerary {
    let start = date(2025, 6, 1);
    Itinerary {
        id: Some(ObjectId::new()),
        title: format!("{}-Day Paris Adventure", days),
        destination: "Paris".to_string(),
        start_date: start,
        end_date: start + chrono::Duration::days(days as i64 - 1),
        user: owner,
        budget: Some(1500.0),
        interests: vec!["Food".to_string()],
        pace: Pace::Balanced,
        days: (0..days)
            .map(|i| Day {
                date: start + chrono::Duration::days(i as i64),
                day_number: i + 1,
                activities: vec![
                    slot_activity(TimeOfDay::Morning, "Market Walk"),
                    slot_activity(TimeOfDay::Afternoon, "Museum Visit"),
                    slot_activity(TimeOfDay::Evening, "Bistro Dinner"),
                ],
            })
            .collect(),
        is_public: false,
        shareable_link: None,
        created_at: None,
        updated_at: None,
    }
}

pub fn chase_balance(owner: ObjectId, points: u64) -> BalanceWithProgram {
    let program_id = ObjectId::new();
    BalanceWithProgram {
        balance: PointsBalance {
            id: Some(ObjectId::new()),
            user: owner,
            program: program_id,
            points_balance: points,
            created_at: None,
            updated_at: None,
        },
        program: RewardProgram {
            id: Some(program_id),
            name: "Chase Ultimate Rewards".to_string(),
            short_code: "UR".to_string(),
            transfer_partners: vec![
                TransferPartner {
                    name: "World of Hyatt".to_string(),
                    transfer_ratio: 1.0,
                    average_cent_value_per_point: 2.1,
                    category: PartnerCategory::Hotel,
                },
                TransferPartner {
                    name: "United MileagePlus".to_string(),
                    transfer_ratio: 1.0,
                    average_cent_value_per_point: 1.3,
                    category: PartnerCategory::Airline,
                },
            ],
            portal_redemption_value: 1.25,
            created_at: None,
            updated_at: None,
        },
    }
}

/// A model reply for a 3-day Paris itinerary with deliberately wrong dates
/// and day numbers, wrapped in prose the way chat models like to.
pub fn scripted_paris_response() -> String {
    let mut days = Vec::new();
    for day in 1..=3 {
        days.push(format!(
            r#"{{"date":"1999-12-3{day}","dayNumber":{wrong},"activities":[
                {{"title":"Montmartre Stroll {day}","description":"Morning in Paris","time":"9:00 AM","category":"morning","duration":"2 hours","cost":"Free","location":{{"address":"Montmartre, Paris","coordinates":[2.34,48.88]}}}},
                {{"title":"Seine Picnic {day}","description":"Afternoon in Paris","time":"1:00 PM","category":"afternoon","duration":"2 hours","cost":"$15","location":{{"address":"Seine, Paris"}}}},
                {{"title":"Jazz Club {day}","description":"Evening in Paris","time":"8:00 PM","category":"evening","duration":"3 hours","cost":"$30","location":{{"address":"Saint-Germain, Paris"}}}}
            ]}}"#,
            day = day,
            wrong = day + 10,
        ));
    }
    format!(
        "Here is your itinerary!\n{{\"days\":[{}]}}\nHave a great trip.",
        days.join(",")
    )
}
