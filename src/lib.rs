pub mod config;
pub mod csrf;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod session_cache;
pub mod state;
pub mod store;
pub mod templates_structs;
pub mod validate;
pub mod workflow;
