//! JWT session token issuance and validation.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};

use super::claims::Claims;

/// Manages session token creation and validation.
///
/// Tokens are stateless: validity is determined purely by signature and
/// expiry, no server-side session row exists.
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    session_ttl_secs: i64,
}

impl JwtManager {
    /// Create a new `JwtManager` with the given secret.
    pub fn new(secret: &[u8], session_ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            session_ttl_secs,
        }
    }

    /// Issue a session token bound to an administrator id.
    pub fn issue_admin_token(
        &self,
        admin_id: &str,
    ) -> Result<(String, i64), jsonwebtoken::errors::Error> {
        self.issue(admin_id, "admin")
    }

    /// Issue a session token bound to a verified email address.
    pub fn issue_email_token(
        &self,
        email: &str,
    ) -> Result<(String, i64), jsonwebtoken::errors::Error> {
        self.issue(email, "email")
    }

    fn issue(
        &self,
        sub: &str,
        token_type: &str,
    ) -> Result<(String, i64), jsonwebtoken::errors::Error> {
        let now = now_secs();
        let exp = now + self.session_ttl_secs;

        let claims = Claims {
            jti: uuid::Uuid::new_v4().to_string(),
            sub: sub.to_string(),
            iat: now,
            exp,
            token_type: token_type.to_string(),
        };

        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok((token, self.session_ttl_secs))
    }

    /// Validate a token's signature and expiry and return its claims.
    pub fn validate(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let data =
            jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        Ok(data.claims)
    }
}

fn now_secs() -> i64 {
    #[allow(clippy::cast_possible_wrap)]
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;
    secs
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_jwt() -> JwtManager {
        JwtManager::new(b"test-secret-key-for-testing", 86_400)
    }

    #[test]
    fn issue_and_validate_admin_token() {
        let jwt = test_jwt();
        let (token, ttl) = jwt.issue_admin_token("admin-1").unwrap();
        assert_eq!(ttl, 86_400);

        let claims = jwt.validate(&token).unwrap();
        assert_eq!(claims.sub, "admin-1");
        assert!(claims.is_admin());
        assert!(!claims.is_email());
    }

    #[test]
    fn issue_and_validate_email_token() {
        let jwt = test_jwt();
        let (token, _ttl) = jwt.issue_email_token("citizen@example.com").unwrap();

        let claims = jwt.validate(&token).unwrap();
        assert_eq!(claims.sub, "citizen@example.com");
        assert!(claims.is_email());
        assert!(!claims.is_admin());
    }

    #[test]
    fn invalid_token_fails_validation() {
        let jwt = test_jwt();
        assert!(jwt.validate("not-a-valid-token").is_err());
    }

    #[test]
    fn wrong_secret_fails_validation() {
        let jwt1 = test_jwt();
        let jwt2 = JwtManager::new(b"different-secret", 86_400);

        let (token, _) = jwt1.issue_admin_token("admin-1").unwrap();
        assert!(jwt2.validate(&token).is_err());
    }

    #[test]
    fn expired_token_fails_validation() {
        // Past the default 60s validation leeway
        let jwt = JwtManager::new(b"test-secret-key-for-testing", -120);
        let (token, _) = jwt.issue_admin_token("admin-1").unwrap();
        assert!(jwt.validate(&token).is_err());
    }
}
