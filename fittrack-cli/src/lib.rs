// Library exports for the FitTrack CLI so integration tests can reach the client.

pub mod api;
pub mod commands;
pub mod config;
pub mod models;
pub mod ui;
