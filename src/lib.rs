//! FitTrack API server: workouts, training programs and nutrition logs over
//! PostgreSQL, behind bearer-token authentication.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod stats;

pub use error::ApiError;
