use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use tripsmith_api::db;
use tripsmith_api::middleware::auth::AuthMiddleware;
use tripsmith_api::routes;
use tripsmith_api::services::generation_client::{GenerationClient, OpenAiClient, UnconfiguredClient};
use tripsmith_api::services::itinerary_assembler::ItineraryAssembler;
use tripsmith_api::services::points_optimizer::PointsOptimizer;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;

fn create_generation_client() -> Arc<dyn GenerationClient> {
    match OpenAiClient::from_env() {
        Ok(client) => {
            println!("Generation client configured");
            Arc::new(client)
        }
        Err(e) => {
            eprintln!("Generation client not available: {}. All generation will use the deterministic fallback.", e);
            Arc::new(UnconfiguredClient)
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    println!("Application starting...");

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    let host = std::env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);
    println!("Attempting to bind to {}:{}", host, port);

    let mongo_uri = std::env::var("MONGODB_URI").expect("MONGODB_URI must be set");
    let client = db::mongo::create_mongo_client(&mongo_uri).await;
    println!("MongoDB connection established");

    let generation_client = create_generation_client();
    let assembler = Arc::new(ItineraryAssembler::new(generation_client.clone()));
    let optimizer = Arc::new(PointsOptimizer::new(generation_client));

    println!("Starting HTTP server...");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .app_data(web::Data::new(client.clone()))
            .app_data(web::Data::new(assembler.clone()))
            .app_data(web::Data::new(optimizer.clone()))
            .route("/health", web::get().to(routes::health::health_check))
            .service(
                web::scope("/api")
                    .service(
                        web::scope("/itineraries")
                            .route("/{id}", web::get().to(routes::itinerary::get_by_id))
                            .service(
                                web::scope("")
                                    .wrap(AuthMiddleware)
                                    .route("", web::get().to(routes::itinerary::get_mine))
                                    .route(
                                        "/generate",
                                        web::post().to(routes::itinerary::generate),
                                    )
                                    .route(
                                        "/{id}/regenerate-activity",
                                        web::post().to(routes::itinerary::regenerate_activity),
                                    )
                                    .route("/{id}", web::delete().to(routes::itinerary::delete)),
                            ),
                    )
                    .service(
                        web::scope("/points")
                            .route("/programs", web::get().to(routes::points::get_programs))
                            .service(
                                web::scope("")
                                    .wrap(AuthMiddleware)
                                    .route(
                                        "/programs",
                                        web::post().to(routes::points::create_program),
                                    )
                                    .route("/balance", web::post().to(routes::points::add_balance))
                                    .route("/balance", web::get().to(routes::points::get_balances))
                                    .route(
                                        "/balance/{id}",
                                        web::put().to(routes::points::update_balance),
                                    )
                                    .route(
                                        "/balance/{id}",
                                        web::delete().to(routes::points::delete_balance),
                                    )
                                    .route(
                                        "/optimized-trips",
                                        web::post().to(routes::points::optimized_trips),
                                    ),
                            ),
                    ),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
