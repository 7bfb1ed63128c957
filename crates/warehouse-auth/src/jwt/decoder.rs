//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use warehouse_core::config::AuthConfig;
use warehouse_core::error::AppError;

use super::claims::{Claims, TOKEN_ISSUER};

/// Validates JWT access tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = 5;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token string.
    pub fn decode_access_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::unauthorized("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::unauthorized("Invalid token format")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::unauthorized("Invalid token signature")
                    }
                    _ => AppError::unauthorized(format!("Token validation failed: {e}")),
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use warehouse_core::error::ErrorKind;
    use warehouse_entity::user::{User, UserRole};

    use super::*;
    use crate::jwt::encoder::JwtEncoder;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            ..AuthConfig::default()
        }
    }

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "stock.keeper".to_string(),
            display_name: "Stock Keeper".to_string(),
            password_hash: String::new(),
            role: UserRole::Warehouse,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_round_trip_preserves_identity() {
        let cfg = config("test-secret");
        let user = user();
        let token = JwtEncoder::new(&cfg).generate_access_token(&user).unwrap();
        let claims = JwtDecoder::new(&cfg)
            .decode_access_token(&token.access_token)
            .unwrap();

        assert_eq!(claims.user_id(), user.id);
        assert_eq!(claims.role, UserRole::Warehouse);
        assert_eq!(claims.name, "Stock Keeper");
        assert_eq!(claims.expires_at().timestamp(), token.expires_at.timestamp());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtEncoder::new(&config("one"))
            .generate_access_token(&user())
            .unwrap();
        let err = JwtDecoder::new(&config("two"))
            .decode_access_token(&token.access_token)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[test]
    fn test_foreign_issuer_rejected() {
        let cfg = config("shared-secret");
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            iss: "another-service".to_string(),
            role: UserRole::Admin,
            name: "Intruder".to_string(),
            iat: now,
            exp: now + 600,
        };
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
        )
        .unwrap();

        let err = JwtDecoder::new(&cfg).decode_access_token(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[test]
    fn test_garbage_rejected() {
        let err = JwtDecoder::new(&config("secret"))
            .decode_access_token("not.a.token")
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }
}
