pub mod auth;
pub mod generate;
pub mod health;
pub mod status;
