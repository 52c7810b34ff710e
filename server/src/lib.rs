pub mod config;
pub mod filters;
pub mod handlers;
pub mod models;
pub mod pagination;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod utils;
