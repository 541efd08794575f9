// chinachu-api: Async Rust client for the Chinachu recording server REST API

pub mod client;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod transport;

pub use client::ChinachuClient;
pub use error::Error;
pub use models::{Feature, Program, Rule, Status};
pub use transport::TransportConfig;
