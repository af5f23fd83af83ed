//! JWT access-token validation.
//!
//! Access tokens are HS256-signed JWTs containing a [`Claims`] payload.

use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use trainhub_core::types::DbId;

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// The user's role name (e.g. `"admin"`, `"athlete"`).
    pub role: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret shared with the token issuer.
    pub secret: String,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var      | Required | Default |
    /// |--------------|----------|---------|
    /// | `JWT_SECRET` | **yes**  | --      |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");
        Self { secret }
    }
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
        }
    }

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("encoding should succeed")
    }

    fn claims(exp_offset_secs: i64) -> Claims {
        let now = chrono::Utc::now().timestamp();
        Claims {
            sub: 42,
            role: "admin".to_string(),
            exp: now + exp_offset_secs,
            iat: now - 10,
        }
    }

    #[test]
    fn valid_token_decodes() {
        let token = sign(&claims(900), "secret-alpha");
        let decoded = validate_token(&token, &config("secret-alpha")).unwrap();
        assert_eq!(decoded.sub, 42);
        assert_eq!(decoded.role, "admin");
    }

    #[test]
    fn expired_token_fails() {
        // Well past the default 60-second leeway.
        let token = sign(&claims(-300), "secret-alpha");
        assert!(validate_token(&token, &config("secret-alpha")).is_err());
    }

    #[test]
    fn different_secret_fails() {
        let token = sign(&claims(900), "secret-alpha");
        assert!(validate_token(&token, &config("secret-bravo")).is_err());
    }
}
