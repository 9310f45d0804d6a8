// ABOUTME: Tessera application library: controllers, configuration and startup wiring
// ABOUTME: The binary in main.rs only parses arguments, sets up logging and calls in here

pub mod application;
pub mod cli;
pub mod config;
pub mod controller;


pub use application::{Application, Services};
pub use config::AppConfig;
