use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::time::Duration;

use crate::core::config::AuthConfig;
use crate::core::error::AppError;
use crate::features::auth::model::{AuthenticatedUser, Claims};

/// Validates bearer tokens issued by the external identity provider.
///
/// Tokens are HS256-signed with a shared secret; issuer, audience, and
/// expiry (with configurable leeway) are all enforced.
pub struct JwtValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtValidator {
    pub fn new(config: &AuthConfig) -> Self {
        Self::with_parts(
            &config.jwt_secret,
            &config.issuer,
            &config.audience,
            config.jwt_leeway,
        )
    }

    fn with_parts(secret: &str, issuer: &str, audience: &str, leeway: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.leeway = leeway.as_secs();

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))?;

        Ok(AuthenticatedUser {
            sub: data.claims.sub,
            roles: data.claims.roles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    const SECRET: &str = "test-secret";
    const ISSUER: &str = "https://id.example.com";
    const AUDIENCE: &str = "printshelf";

    fn validator() -> JwtValidator {
        JwtValidator::with_parts(SECRET, ISSUER, AUDIENCE, Duration::from_secs(0))
    }

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn valid_claims() -> Claims {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap();
        Claims {
            sub: "user-123".to_string(),
            iss: ISSUER.to_string(),
            aud: AUDIENCE.to_string(),
            exp: now.as_secs() + 3600,
            roles: vec!["admin".to_string()],
        }
    }

    #[test]
    fn test_accepts_valid_token() {
        let token = sign(&valid_claims(), SECRET);
        let user = validator().validate_token(&token).unwrap();
        assert_eq!(user.sub, "user-123");
        assert!(user.is_admin());
    }

    #[test]
    fn test_rejects_wrong_secret() {
        let token = sign(&valid_claims(), "other-secret");
        assert!(validator().validate_token(&token).is_err());
    }

    #[test]
    fn test_rejects_expired_token() {
        let mut claims = valid_claims();
        claims.exp = 1; // long past
        let token = sign(&claims, SECRET);
        assert!(validator().validate_token(&token).is_err());
    }

    #[test]
    fn test_rejects_wrong_audience() {
        let mut claims = valid_claims();
        claims.aud = "some-other-api".to_string();
        let token = sign(&claims, SECRET);
        assert!(validator().validate_token(&token).is_err());
    }

    #[test]
    fn test_missing_roles_default_to_none() {
        let mut claims = valid_claims();
        claims.roles = Vec::new();
        let token = sign(&claims, SECRET);
        let user = validator().validate_token(&token).unwrap();
        assert!(!user.is_admin());
    }
}
