//! # Cinematic Client
//! 
//! Typed client for the front end's API, the job view model and the status polling loop.

pub mod client;
pub mod error;
pub mod job;
pub mod poller;
pub mod request;

pub use client::CinematicClient;
pub use error::ClientError;
pub use job::{Job, JobStatus, StatusUpdate};
pub use poller::{JobPoller, PollerConfig, StatusSource};
pub use request::{AspectRatio, GenerationRequest, MediaType, SubmitResponse};
