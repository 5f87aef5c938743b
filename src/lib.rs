pub mod app;
pub mod auth;
pub mod client;
pub mod config;
pub mod connectivity;
pub mod db;
pub mod models;
pub mod presentation;
pub mod repositories;
pub mod schema;
pub mod session;
pub mod sync;
pub mod use_cases;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;
