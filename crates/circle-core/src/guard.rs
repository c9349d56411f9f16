//! Token guard - turns a raw auth header value into an authenticated user id.
//!
//! Never touches storage; the resolved id is trusted downstream without
//! re-verification.

use uuid::Uuid;

use crate::ports::{AuthError, TokenService};

/// Header carrying the signed token.
pub const AUTH_HEADER: &str = "x-auth-token";

/// Resolve the user id embedded in `token`.
///
/// Absent or blank → `MissingAuth`; bad signature, malformed or expired →
/// `InvalidToken` / `TokenExpired`.
pub fn authenticate(token: Option<&str>, tokens: &dyn TokenService) -> Result<Uuid, AuthError> {
    let token = token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingAuth)?;

    tokens.validate_token(token).map(|claims| claims.user_id)
}
