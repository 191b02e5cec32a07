use actix_web::{web, HttpResponse, Responder};
use bson::doc;
use futures::TryStreamExt;
use mongodb::{bson::oid::ObjectId, Client};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::mongo::{DATABASE, POINTS_BALANCES, REWARD_PROGRAMS};
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::points::{
    BalanceWithProgram, OptimizationPreferences, OptimizationStrategy, PointsBalance,
    RewardProgram,
};
use crate::services::engine_error::EngineError;
use crate::services::points_optimizer::PointsOptimizer;

fn programs(client: &Client) -> mongodb::Collection<RewardProgram> {
    client.database(DATABASE).collection(REWARD_PROGRAMS)
}

fn balances(client: &Client) -> mongodb::Collection<PointsBalance> {
    client.database(DATABASE).collection(POINTS_BALANCES)
}

/*
    GET /api/points/programs
*/
pub async fn get_programs(data: web::Data<Arc<Client>>) -> impl Responder {
    let cursor = programs(&data).find(doc! {}).sort(doc! { "name": 1 }).await;

    match cursor {
        Ok(cursor) => match cursor.try_collect::<Vec<RewardProgram>>().await {
            Ok(found) => HttpResponse::Ok().json(found),
            Err(err) => {
                eprintln!("Failed to collect reward programs: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to get programs")
            }
        },
        Err(err) => {
            eprintln!("Failed to retrieve reward programs: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to get programs")
        }
    }
}

/*
    POST /api/points/programs
*/
pub async fn create_program(
    _user: AuthenticatedUser,
    body: web::Json<RewardProgram>,
    data: web::Data<Arc<Client>>,
) -> impl Responder {
    let mut program = body.into_inner();
    program.id = None;
    program.created_at = Some(mongodb::bson::DateTime::now());
    program.updated_at = Some(mongodb::bson::DateTime::now());

    if program.name.trim().is_empty() || program.short_code.trim().is_empty() {
        return HttpResponse::BadRequest()
            .json(doc! { "message": "name and shortCode are required" });
    }

    let collection = programs(&data);
    match collection
        .find_one(doc! { "shortCode": &program.short_code })
        .await
    {
        Ok(Some(_)) => {
            return HttpResponse::Conflict()
                .json(doc! { "message": "A program with this shortCode already exists" })
        }
        Ok(None) => {}
        Err(err) => {
            eprintln!("Failed to check program uniqueness: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to create program");
        }
    }

    match collection.insert_one(&program).await {
        Ok(result) => {
            program.id = result.inserted_id.as_object_id();
            HttpResponse::Created().json(serde_json::json!({
                "message": "Reward program created successfully",
                "program": program,
            }))
        }
        Err(err) => {
            eprintln!("Failed to create reward program: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to create program")
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddBalanceRequest {
    pub program_id: String,
    pub points_balance: u64,
}

/// Balance document with its program catalog entry inlined, the shape the
/// frontend renders.
#[derive(Debug, Serialize)]
pub struct BalanceView {
    #[serde(flatten)]
    pub balance: PointsBalance,
    pub program_details: RewardProgram,
}

/*
    POST /api/points/balance
*/
pub async fn add_balance(
    user: AuthenticatedUser,
    body: web::Json<AddBalanceRequest>,
    data: web::Data<Arc<Client>>,
) -> impl Responder {
    let program_id = match ObjectId::parse_str(&body.program_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid program ID"),
    };

    let program = match programs(&data).find_one(doc! { "_id": program_id }).await {
        Ok(Some(program)) => program,
        Ok(None) => return HttpResponse::NotFound().body("Reward program not found"),
        Err(err) => {
            eprintln!("Failed to retrieve reward program: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to add points balance");
        }
    };

    let collection = balances(&data);

    // One balance per (user, program).
    let filter = doc! { "user": user.user_id, "program": program_id };
    match collection.find_one(filter).await {
        Ok(Some(_)) => {
            return HttpResponse::Conflict().json(doc! {
                "message": "You already have a balance for this program. Please update it instead."
            })
        }
        Ok(None) => {}
        Err(err) => {
            eprintln!("Failed to check for existing balance: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to add points balance");
        }
    }

    let mut balance = PointsBalance {
        id: None,
        user: user.user_id,
        program: program_id,
        points_balance: body.points_balance,
        created_at: Some(mongodb::bson::DateTime::now()),
        updated_at: Some(mongodb::bson::DateTime::now()),
    };

    match collection.insert_one(&balance).await {
        Ok(result) => {
            balance.id = result.inserted_id.as_object_id();
            HttpResponse::Created().json(serde_json::json!({
                "message": "Points balance added successfully",
                "balance": BalanceView { balance, program_details: program },
            }))
        }
        Err(err) => {
            eprintln!("Failed to add points balance: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to add points balance")
        }
    }
}

async fn load_balances_with_programs(
    client: &Client,
    user_id: ObjectId,
) -> Result<Vec<BalanceWithProgram>, mongodb::error::Error> {
    let cursor = balances(client)
        .find(doc! { "user": user_id })
        .sort(doc! { "updatedAt": -1 })
        .await?;
    let found: Vec<PointsBalance> = cursor.try_collect().await?;

    let mut joined = Vec::with_capacity(found.len());
    for balance in found {
        if let Some(program) = programs(client)
            .find_one(doc! { "_id": balance.program })
            .await?
        {
            joined.push(BalanceWithProgram { balance, program });
        }
        // A balance whose program was deleted is skipped rather than failing
        // the whole listing.
    }
    Ok(joined)
}

/*
    GET /api/points/balance
*/
pub async fn get_balances(user: AuthenticatedUser, data: web::Data<Arc<Client>>) -> impl Responder {
    match load_balances_with_programs(&data, user.user_id).await {
        Ok(joined) => {
            let views: Vec<BalanceView> = joined
                .into_iter()
                .map(|entry| BalanceView {
                    balance: entry.balance,
                    program_details: entry.program,
                })
                .collect();
            HttpResponse::Ok().json(views)
        }
        Err(err) => {
            eprintln!("Failed to get points balances: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to get points balances")
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBalanceRequest {
    pub points_balance: u64,
}

/*
    PUT /api/points/balance/{id}
*/
pub async fn update_balance(
    user: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<UpdateBalanceRequest>,
    data: web::Data<Arc<Client>>,
) -> impl Responder {
    let id: ObjectId = match ObjectId::parse_str(path.into_inner().as_str()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid ID"),
    };

    let collection = balances(&data);
    let mut balance = match collection.find_one(doc! { "_id": id }).await {
        Ok(Some(balance)) => balance,
        Ok(None) => return HttpResponse::NotFound().body("Points balance not found"),
        Err(err) => {
            eprintln!("Failed to retrieve points balance: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to update points balance");
        }
    };

    if balance.user != user.user_id {
        return HttpResponse::Forbidden()
            .json(doc! { "message": "Not authorized to update this balance" });
    }

    balance.points_balance = body.points_balance;
    balance.updated_at = Some(mongodb::bson::DateTime::now());

    match collection.replace_one(doc! { "_id": id }, &balance).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Points balance updated successfully",
            "balance": balance,
        })),
        Err(err) => {
            eprintln!("Failed to update points balance: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to update points balance")
        }
    }
}

/*
    DELETE /api/points/balance/{id}
*/
pub async fn delete_balance(
    user: AuthenticatedUser,
    path: web::Path<String>,
    data: web::Data<Arc<Client>>,
) -> impl Responder {
    let id: ObjectId = match ObjectId::parse_str(path.into_inner().as_str()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid ID"),
    };

    let collection = balances(&data);
    match collection.find_one(doc! { "_id": id }).await {
        Ok(Some(balance)) => {
            if balance.user != user.user_id {
                return HttpResponse::Forbidden()
                    .json(doc! { "message": "Not authorized to delete this balance" });
            }
        }
        Ok(None) => return HttpResponse::NotFound().body("Points balance not found"),
        Err(err) => {
            eprintln!("Failed to retrieve points balance: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to delete points balance");
        }
    }

    match collection.delete_one(doc! { "_id": id }).await {
        Ok(_) => HttpResponse::Ok().json(doc! { "message": "Points balance deleted successfully" }),
        Err(err) => {
            eprintln!("Failed to delete points balance: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to delete points balance")
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizedTripsRequest {
    #[serde(default)]
    pub preferences: OptimizationPreferences,
    #[serde(default)]
    pub additional_budget: f64,
    #[serde(default)]
    pub optimization_strategy: OptimizationStrategy,
}

/*
    POST /api/points/optimized-trips
*/
pub async fn optimized_trips(
    user: AuthenticatedUser,
    body: web::Json<OptimizedTripsRequest>,
    data: web::Data<Arc<Client>>,
    optimizer: web::Data<Arc<PointsOptimizer>>,
) -> impl Responder {
    let joined = match load_balances_with_programs(&data, user.user_id).await {
        Ok(joined) => joined,
        Err(err) => {
            eprintln!("Failed to load balances for optimization: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to generate optimized trips");
        }
    };

    if joined.is_empty() {
        return HttpResponse::BadRequest().json(doc! {
            "message": "You need to add points balances before generating optimized trips"
        });
    }

    match optimizer
        .optimize_trips(
            &joined,
            &body.preferences,
            body.additional_budget,
            body.optimization_strategy,
        )
        .await
    {
        Ok(options) => HttpResponse::Ok().json(serde_json::json!({ "tripOptions": options })),
        Err(EngineError::Validation(msg)) => {
            HttpResponse::BadRequest().json(doc! { "message": msg })
        }
        Err(err) => {
            eprintln!("Failed to generate optimized trips: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to generate optimized trips")
        }
    }
}
