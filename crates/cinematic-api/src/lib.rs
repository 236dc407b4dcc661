//! # Cinematic API
//! 
//! HTTP surface of the front end: the session gate, the login endpoint and the
//! generation proxy in front of the pipeline server.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod pipeline;
pub mod response;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
