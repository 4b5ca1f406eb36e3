//! Local access token verification.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use erp_core::error::AppError;
use erp_core::types::SessionUser;

use super::claims::Claims;

/// Verifies HS256 access tokens against the project's JWT secret.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("leeway", &self.validation.leeway)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a decoder for `secret`, tolerating `leeway_seconds` of
    /// clock skew.
    pub fn new(secret: &str, leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = leeway_seconds;
        // Hosted tokens carry `aud: authenticated`; the audience is not
        // part of what the console checks.
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token string.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::authentication("Session has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::authentication("Invalid token format")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::authentication("Invalid token signature")
                    }
                    _ => AppError::authentication(format!("Token validation failed: {e}")),
                }
            })?;

        Ok(token_data.claims)
    }

    /// Decode a token and return its user.
    pub fn decode_user(&self, token: &str) -> Result<SessionUser, AppError> {
        Ok(self.decode(token)?.to_user())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::JwtEncoder;
    use chrono::{Duration, Utc};
    use erp_core::error::ErrorKind;
    use erp_core::types::UserId;
    use uuid::Uuid;

    const SECRET: &str = "super-secret-jwt-token-with-at-least-32-characters";

    #[test]
    fn test_round_trip_user() {
        let encoder = JwtEncoder::new(SECRET, Duration::minutes(5));
        let user_id = UserId::from_uuid(Uuid::new_v4());
        let (token, expires_at) = encoder
            .access_token(user_id, Some("ops@example.com"))
            .expect("encode");
        assert!(expires_at > Utc::now());

        let user = JwtDecoder::new(SECRET, 5).decode_user(&token).expect("decode");
        assert_eq!(user.id, user_id);
        assert_eq!(user.email.as_deref(), Some("ops@example.com"));
    }

    #[test]
    fn test_rejects_wrong_secret_and_expired() {
        let user_id = UserId::from_uuid(Uuid::new_v4());
        let (token, _) = JwtEncoder::new("another-secret", Duration::minutes(5))
            .access_token(user_id, None)
            .expect("encode");
        let err = JwtDecoder::new(SECRET, 5).decode(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);

        let (expired, _) = JwtEncoder::new(SECRET, Duration::minutes(-10))
            .access_token(user_id, None)
            .expect("encode");
        let err = JwtDecoder::new(SECRET, 5).decode(&expired).unwrap_err();
        assert_eq!(err.message, "Session has expired");
    }
}
