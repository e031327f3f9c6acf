//! Username rules applied when a user is added to the ledger.

use crate::{identity::ADMIN_USERNAME, Error, Result};

/// Minimum username length, in UTF-16 code units.
///
/// Counted the way browser clients measure string length, so a name they
/// accept is never rejected here.
pub const MIN_USERNAME_LEN: usize = 3;

/// Validate a username for registration.
///
/// # Errors
///
/// Returns `Error::InvalidUsername` if the name is reserved or too short.
pub fn validate_username(username: &str) -> Result<()> {
    if username.eq_ignore_ascii_case(ADMIN_USERNAME) {
        return Err(Error::InvalidUsername(format!(
            "'{username}' is reserved"
        )));
    }
    if username.encode_utf16().count() < MIN_USERNAME_LEN {
        return Err(Error::InvalidUsername(format!(
            "must be at least {MIN_USERNAME_LEN} characters long"
        )));
    }
    Ok(())
}
