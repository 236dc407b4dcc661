//! Shared-password check

use subtle::ConstantTimeEq;

pub struct PasswordService;

impl PasswordService {
    /// Compare a submitted password with the configured one in constant time.
    /// An empty configured password never matches.
    pub fn verify(provided: &str, expected: &str) -> bool {
        if expected.is_empty() {
            return false;
        }
        provided.as_bytes().ct_eq(expected.as_bytes()).into()
    }
}
