// src/lib.rs
pub mod banner;
pub mod checks;
pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod runner;
pub mod semester;
