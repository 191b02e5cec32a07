pub mod engine_error;
pub mod fallback_service;
pub mod generation_client;
pub mod generation_schema;
pub mod itinerary_assembler;
pub mod points_optimizer;
pub mod prompt_builder;
pub mod response_parser;
