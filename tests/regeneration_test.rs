mod common;

use std::sync::Arc;

use mongodb::bson::oid::ObjectId;

use common::{sample_itinerary, ScriptedClient, UnreachableClient};
use tripsmith_api::models::itinerary::TimeOfDay;
use tripsmith_api::services::engine_error::EngineError;
use tripsmith_api::services::itinerary_assembler::ItineraryAssembler;

#[actix_rt::test]
async fn regeneration_preserves_category_on_fallback() {
    let assembler = ItineraryAssembler::new(Arc::new(UnreachableClient));
    let itinerary = sample_itinerary(ObjectId::new(), 2);

    // Slot (0, 1) is the afternoon slot.
    let replacement = assembler
        .regenerate_activity(&itinerary, 0, 1)
        .await
        .unwrap();

    assert_eq!(replacement.category, TimeOfDay::Afternoon);
    assert_ne!(replacement.title, itinerary.days[0].activities[1].title);
    assert!(!replacement.time.is_empty());
    assert!(!replacement.cost.is_empty());
}

#[actix_rt::test]
async fn regeneration_accepts_a_well_formed_reply() {
    let reply = r#"Here you go: {"title":"Rodin Garden Visit","description":"Sculpture garden afternoon","time":"2:30 PM","category":"afternoon","duration":"2 hours","cost":"$14","location":{"address":"77 Rue de Varenne, Paris"}}"#;
    let assembler = ItineraryAssembler::new(Arc::new(ScriptedClient::new(reply)));
    let itinerary = sample_itinerary(ObjectId::new(), 2);

    let replacement = assembler
        .regenerate_activity(&itinerary, 0, 1)
        .await
        .unwrap();

    assert_eq!(replacement.title, "Rodin Garden Visit");
    assert_eq!(replacement.category, TimeOfDay::Afternoon);
    assert_eq!(replacement.location.coordinates, [0.0, 0.0]);
}

#[actix_rt::test]
async fn category_drift_from_the_model_falls_back_to_the_slot_pool() {
    // Model answers with an evening activity for an afternoon slot.
    let reply = r#"{"title":"Night Market","description":"Evening stalls","category":"evening"}"#;
    let assembler = ItineraryAssembler::new(Arc::new(ScriptedClient::new(reply)));
    let itinerary = sample_itinerary(ObjectId::new(), 2);

    let replacement = assembler
        .regenerate_activity(&itinerary, 0, 1)
        .await
        .unwrap();

    assert_eq!(replacement.category, TimeOfDay::Afternoon);
    assert_ne!(replacement.title, "Night Market");
}

#[actix_rt::test]
async fn out_of_range_day_is_an_index_error() {
    let assembler = ItineraryAssembler::new(Arc::new(UnreachableClient));
    let itinerary = sample_itinerary(ObjectId::new(), 2);

    let err = assembler
        .regenerate_activity(&itinerary, 99, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Index(_)));
}

#[actix_rt::test]
async fn out_of_range_activity_is_an_index_error() {
    let assembler = ItineraryAssembler::new(Arc::new(UnreachableClient));
    let itinerary = sample_itinerary(ObjectId::new(), 2);

    let err = assembler
        .regenerate_activity(&itinerary, 0, 7)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Index(_)));
}

#[actix_rt::test]
async fn regeneration_never_mutates_the_input_document() {
    let assembler = ItineraryAssembler::new(Arc::new(UnreachableClient));
    let itinerary = sample_itinerary(ObjectId::new(), 2);
    let before = itinerary.clone();

    let replacement = assembler
        .regenerate_activity(&itinerary, 1, 2)
        .await
        .unwrap();

    // The engine only returns a value; the document is untouched until the
    // caller writes it back.
    assert_eq!(itinerary.days, before.days);

    // Caller-side write-back keeps the document shape.
    let mut updated = itinerary.clone();
    updated.days[1].activities[2] = replacement;
    assert_eq!(updated.days.len(), before.days.len());
    for (updated_day, original_day) in updated.days.iter().zip(&before.days) {
        assert_eq!(updated_day.activities.len(), original_day.activities.len());
    }
    assert_eq!(updated.days[0].activities, before.days[0].activities);
}
