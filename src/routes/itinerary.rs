use actix_web::{web, HttpRequest, HttpResponse, Responder};
use bson::doc;
use futures::TryStreamExt;
use mongodb::{bson::oid::ObjectId, Client};
use serde::Deserialize;
use std::sync::Arc;

use crate::db::mongo::{DATABASE, ITINERARIES};
use crate::middleware::auth::decode_bearer;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::itinerary::{Itinerary, TripPreferences};
use crate::services::engine_error::EngineError;
use crate::services::itinerary_assembler::ItineraryAssembler;

fn collection(client: &Client) -> mongodb::Collection<Itinerary> {
    client.database(DATABASE).collection(ITINERARIES)
}

fn engine_error_response(err: EngineError) -> HttpResponse {
    match err {
        EngineError::Validation(msg) => HttpResponse::BadRequest().json(doc! { "message": msg }),
        EngineError::Index(msg) => HttpResponse::BadRequest().json(doc! { "message": msg }),
        EngineError::Ownership => HttpResponse::Forbidden()
            .json(doc! { "message": "Not authorized to modify this itinerary" }),
    }
}

/*
    POST /api/itineraries/generate
*/
pub async fn generate(
    user: AuthenticatedUser,
    body: web::Json<TripPreferences>,
    data: web::Data<Arc<Client>>,
    assembler: web::Data<Arc<ItineraryAssembler>>,
) -> impl Responder {
    let preferences = body.into_inner();

    let mut itinerary = match assembler.assemble(&preferences, user.user_id).await {
        Ok(itinerary) => itinerary,
        Err(err) => return engine_error_response(err),
    };

    let collection = collection(&data);
    match collection.insert_one(&itinerary).await {
        Ok(result) => {
            itinerary.id = result.inserted_id.as_object_id();
            HttpResponse::Created().json(serde_json::json!({
                "message": "Itinerary created successfully",
                "itinerary": itinerary,
            }))
        }
        Err(err) => {
            eprintln!("Failed to save itinerary: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to save itinerary")
        }
    }
}

/*
    GET /api/itineraries/{id}

    Public itineraries are readable by anyone; private ones only by their
    owner, so this route sits outside the auth scope and decodes a bearer
    token opportunistically.
*/
pub async fn get_by_id(
    req: HttpRequest,
    path: web::Path<String>,
    data: web::Data<Arc<Client>>,
) -> impl Responder {
    let id: ObjectId = match ObjectId::parse_str(path.into_inner().as_str()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid ID"),
    };

    match collection(&data).find_one(doc! { "_id": id }).await {
        Ok(Some(itinerary)) => {
            if itinerary.is_public {
                return HttpResponse::Ok().json(itinerary);
            }
            let is_owner = decode_bearer(&req)
                .and_then(|claims| ObjectId::parse_str(&claims.user_id).ok())
                .map(|caller| caller == itinerary.user)
                .unwrap_or(false);
            if is_owner {
                HttpResponse::Ok().json(itinerary)
            } else {
                HttpResponse::Forbidden().body("Not authorized to view this itinerary")
            }
        }
        Ok(None) => HttpResponse::NotFound().body("Itinerary not found"),
        Err(err) => {
            eprintln!("Failed to retrieve itinerary: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to retrieve itinerary")
        }
    }
}

/*
    GET /api/itineraries (the caller's own itineraries)
*/
pub async fn get_mine(user: AuthenticatedUser, data: web::Data<Arc<Client>>) -> impl Responder {
    let cursor = collection(&data)
        .find(doc! { "user": user.user_id })
        .sort(doc! { "createdAt": -1 })
        .await;

    match cursor {
        Ok(cursor) => match cursor.try_collect::<Vec<Itinerary>>().await {
            Ok(itineraries) => HttpResponse::Ok().json(itineraries),
            Err(err) => {
                eprintln!("Failed to collect itineraries: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to process itineraries")
            }
        },
        Err(err) => {
            eprintln!("Failed to retrieve itineraries: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to retrieve itineraries")
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenerateActivityRequest {
    pub day_index: usize,
    pub activity_index: usize,
}

/*
    POST /api/itineraries/{id}/regenerate-activity

    Whole-document read-modify-write: the engine returns a replacement
    activity, this handler splices it into the slot and saves the full
    document. Concurrent regenerations race; last writer wins.
*/
pub async fn regenerate_activity(
    user: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<RegenerateActivityRequest>,
    data: web::Data<Arc<Client>>,
    assembler: web::Data<Arc<ItineraryAssembler>>,
) -> impl Responder {
    let id: ObjectId = match ObjectId::parse_str(path.into_inner().as_str()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid ID"),
    };

    let collection = collection(&data);
    let mut itinerary = match collection.find_one(doc! { "_id": id }).await {
        Ok(Some(itinerary)) => itinerary,
        Ok(None) => return HttpResponse::NotFound().body("Itinerary not found"),
        Err(err) => {
            eprintln!("Failed to retrieve itinerary: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to retrieve itinerary");
        }
    };

    if itinerary.user != user.user_id {
        return engine_error_response(EngineError::Ownership);
    }

    let activity = match assembler
        .regenerate_activity(&itinerary, body.day_index, body.activity_index)
        .await
    {
        Ok(activity) => activity,
        Err(err) => return engine_error_response(err),
    };

    itinerary.days[body.day_index].activities[body.activity_index] = activity.clone();
    itinerary.updated_at = Some(mongodb::bson::DateTime::now());

    match collection
        .replace_one(doc! { "_id": id }, &itinerary)
        .await
    {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Activity regenerated successfully",
            "activity": activity,
            "itinerary": itinerary,
        })),
        Err(err) => {
            eprintln!("Failed to save regenerated activity: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to save itinerary")
        }
    }
}

/*
    DELETE /api/itineraries/{id}
*/
pub async fn delete(
    user: AuthenticatedUser,
    path: web::Path<String>,
    data: web::Data<Arc<Client>>,
) -> impl Responder {
    let id: ObjectId = match ObjectId::parse_str(path.into_inner().as_str()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid ID"),
    };

    let collection = collection(&data);
    match collection.find_one(doc! { "_id": id }).await {
        Ok(Some(itinerary)) => {
            if itinerary.user != user.user_id {
                return engine_error_response(EngineError::Ownership);
            }
        }
        Ok(None) => return HttpResponse::NotFound().body("Itinerary not found"),
        Err(err) => {
            eprintln!("Failed to retrieve itinerary: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to retrieve itinerary");
        }
    }

    match collection.delete_one(doc! { "_id": id }).await {
        Ok(_) => HttpResponse::Ok().json(doc! { "message": "Itinerary deleted" }),
        Err(err) => {
            eprintln!("Failed to delete itinerary: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to delete itinerary")
        }
    }
}
