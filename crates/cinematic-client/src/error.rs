use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid password")]
    InvalidCredentials,

    #[error("Not logged in or session expired")]
    Unauthenticated,

    #[error("Server did not return a session cookie")]
    MissingSessionCookie,

    #[error("Generation rejected: {0}")]
    Rejected(String),

    #[error("Pipeline unavailable: {0}")]
    Unavailable(String),

    #[error("Unexpected response ({status}): {body}")]
    UnexpectedResponse { status: u16, body: String },
}
