//! # Cinematic Security
//! 
//! Session tokens, the password check and the session cookie.

pub mod cookie;
pub mod password;
pub mod session;

pub use cookie::SessionCookie;
pub use password::PasswordService;
pub use session::{SessionClaims, SessionCodec, TokenError};
