pub mod auth;
pub mod lessons;
pub mod progress;
pub mod reading;
pub mod stats;
pub mod user;
