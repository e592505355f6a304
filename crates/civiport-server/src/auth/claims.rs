//! JWT claims structure for CiviPort session tokens.

use serde::{Deserialize, Serialize};

/// JWT claims embedded in session tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// JWT ID (unique per token).
    pub jti: String,
    /// Subject (administrator ID or verified email address).
    pub sub: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
    /// Token type: "admin" or "email".
    pub token_type: String,
}

impl Claims {
    /// True for tokens issued through the administrator login path.
    pub fn is_admin(&self) -> bool {
        self.token_type == "admin"
    }

    /// True for tokens issued through one-time-code verification.
    pub fn is_email(&self) -> bool {
        self.token_type == "email"
    }
}
