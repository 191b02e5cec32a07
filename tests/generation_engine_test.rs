mod common;

use std::sync::Arc;

use chrono::Duration;
use mongodb::bson::oid::ObjectId;

use common::{date, paris_preferences, scripted_paris_response, ScriptedClient, UnreachableClient};
use tripsmith_api::models::itinerary::TimeOfDay;
use tripsmith_api::services::engine_error::EngineError;
use tripsmith_api::services::itinerary_assembler::ItineraryAssembler;

#[actix_rt::test]
async fn generate_is_total_when_collaborator_is_down() {
    let assembler = ItineraryAssembler::new(Arc::new(UnreachableClient));
    let preferences = paris_preferences();

    let itinerary = assembler
        .assemble(&preferences, ObjectId::new())
        .await
        .expect("fallback must make generate total over valid input");

    assert_eq!(itinerary.title, "3-Day Paris Adventure");
    assert_eq!(itinerary.days.len(), 3);
    for (i, day) in itinerary.days.iter().enumerate() {
        assert_eq!(day.day_number as usize, i + 1);
        assert_eq!(day.date, preferences.start_date + Duration::days(i as i64));
        let categories: Vec<_> = day.activities.iter().map(|a| a.category).collect();
        assert_eq!(categories, TimeOfDay::ALL.to_vec());
        for activity in &day.activities {
            assert!(
                activity.title.contains("Paris") || activity.description.contains("Paris"),
                "fallback activities are destination-templated"
            );
        }
    }
}

#[actix_rt::test]
async fn generated_days_are_corrected_from_the_index() {
    let assembler = ItineraryAssembler::new(Arc::new(ScriptedClient::new(
        scripted_paris_response(),
    )));
    let preferences = paris_preferences();

    let itinerary = assembler
        .assemble(&preferences, ObjectId::new())
        .await
        .unwrap();

    // Content came from the model...
    assert_eq!(itinerary.days[0].activities[0].title, "Montmartre Stroll 1");
    assert_eq!(
        itinerary.days[0].activities[0].location.coordinates,
        [2.34, 48.88]
    );
    // ...but dates and day numbers are re-derived, not trusted.
    for (i, day) in itinerary.days.iter().enumerate() {
        assert_eq!(day.date, date(2025, 6, 1) + Duration::days(i as i64));
        assert_eq!(day.day_number as usize, i + 1);
    }
    // Coordinates the model omitted default to unresolved.
    assert_eq!(
        itinerary.days[0].activities[1].location.coordinates,
        [0.0, 0.0]
    );
}

#[actix_rt::test]
async fn unparsable_response_downgrades_to_fallback() {
    let assembler = ItineraryAssembler::new(Arc::new(ScriptedClient::new(
        "I'm sorry, I can't produce an itinerary right now.",
    )));

    let itinerary = assembler
        .assemble(&paris_preferences(), ObjectId::new())
        .await
        .unwrap();

    assert_eq!(itinerary.days.len(), 3);
    for day in &itinerary.days {
        assert_eq!(day.activities.len(), 3);
    }
}

#[actix_rt::test]
async fn wrong_day_count_from_model_downgrades_to_fallback() {
    // One scripted day for a three-day trip: structurally invalid.
    let truncated = r#"{"days":[{"activities":[
        {"title":"Montmartre Stroll 1","description":"Morning","category":"morning"},
        {"title":"Seine Picnic 1","description":"Afternoon","category":"afternoon"},
        {"title":"Jazz Club 1","description":"Evening","category":"evening"}
    ]}]}"#;

    let assembler = ItineraryAssembler::new(Arc::new(ScriptedClient::new(truncated)));
    let itinerary = assembler
        .assemble(&paris_preferences(), ObjectId::new())
        .await
        .unwrap();

    // Still three days; the malformed reply never reaches the document.
    assert_eq!(itinerary.days.len(), 3);
    assert!(itinerary.days[0].activities[0].title != "Montmartre Stroll 1");
}

#[actix_rt::test]
async fn one_day_trip_yields_one_day_with_three_activities() {
    let assembler = ItineraryAssembler::new(Arc::new(UnreachableClient));
    let mut preferences = paris_preferences();
    preferences.end_date = preferences.start_date;

    let itinerary = assembler
        .assemble(&preferences, ObjectId::new())
        .await
        .unwrap();

    assert_eq!(itinerary.title, "1-Day Paris Adventure");
    assert_eq!(itinerary.days.len(), 1);
    assert_eq!(itinerary.days[0].activities.len(), 3);
}

#[actix_rt::test]
async fn inverted_date_range_is_rejected() {
    let assembler = ItineraryAssembler::new(Arc::new(UnreachableClient));
    let mut preferences = paris_preferences();
    preferences.end_date = preferences.start_date - Duration::days(1);

    let err = assembler
        .assemble(&preferences, ObjectId::new())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[actix_rt::test]
async fn empty_destination_is_rejected() {
    let assembler = ItineraryAssembler::new(Arc::new(UnreachableClient));
    let mut preferences = paris_preferences();
    preferences.destination = "   ".to_string();

    let err = assembler
        .assemble(&preferences, ObjectId::new())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[actix_rt::test]
async fn negative_budget_is_rejected() {
    let assembler = ItineraryAssembler::new(Arc::new(UnreachableClient));
    let mut preferences = paris_preferences();
    preferences.budget = Some(-50.0);

    let err = assembler
        .assemble(&preferences, ObjectId::new())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[actix_rt::test]
async fn preferences_are_copied_into_the_document() {
    let assembler = ItineraryAssembler::new(Arc::new(UnreachableClient));
    let owner = ObjectId::new();
    let mut preferences = paris_preferences();
    preferences.budget = Some(2000.0);

    let itinerary = assembler.assemble(&preferences, owner).await.unwrap();

    assert_eq!(itinerary.destination, "Paris");
    assert_eq!(itinerary.user, owner);
    assert_eq!(itinerary.budget, Some(2000.0));
    assert_eq!(itinerary.interests, vec!["Food".to_string()]);
    assert!(!itinerary.is_public);
}
