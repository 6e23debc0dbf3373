//! Drinks API: CRUD over drinks behind scope-based bearer-token authorization.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;
