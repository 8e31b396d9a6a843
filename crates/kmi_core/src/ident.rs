//! Paste identifier generation.

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Length of generated identifiers, in characters.
pub const ID_LEN: usize = 8;

/// Generate a random identifier.
///
/// Each of the [`ID_LEN`] positions is drawn uniformly and independently
/// from the 62-symbol alphanumeric alphabet. `thread_rng` gives every
/// calling thread its own OS-seeded generator, so concurrent requests
/// never share or correlate streams. 62^8 possible values; collisions are
/// the insertion policy's problem, not this function's.
pub fn generate() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LEN)
        .map(char::from)
        .collect()
}

/// Whether `token` has the shape of a lookup token (`[A-Za-z0-9_]+`).
pub fn is_valid_token(token: &str) -> bool {
    !token.is_empty()
        && token
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}
