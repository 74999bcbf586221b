//! JWT (JSON Web Token) signing and verification.
//!
//! Invalid signatures, malformed payloads and expired tokens all fail
//! verification the same way; callers cannot tell them apart.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use gatekeep_config::JwtConfig;
use gatekeep_core::AppError;

use crate::claims::Claims;

/// Creates a signed access token embedding the user's identity and scopes.
///
/// # Errors
///
/// Returns an internal error if token encoding fails.
pub fn create_access_token(
    user_id: Uuid,
    email: &str,
    application_id: Uuid,
    scopes: Vec<String>,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp();
    let exp = (now + jwt_config.access_token_expiry).max(0) as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        application_id,
        scopes,
        exp,
        iat: now as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow::Error::new(e).context("Failed to create token")))
}

/// Verifies an access token and returns the embedded claims.
///
/// # Errors
///
/// Returns an unauthorized error if the signature is invalid, the token has
/// expired or the payload does not match [`Claims`].
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            access_token_expiry: 3600,
        }
    }

    #[test]
    fn test_create_and_verify_token() {
        let config = get_test_jwt_config();
        let user_id = Uuid::new_v4();
        let application_id = Uuid::new_v4();

        let token = create_access_token(
            user_id,
            "test@example.com",
            application_id,
            vec!["posts:read".to_string()],
            &config,
        )
        .unwrap();

        let claims = verify_token(&token, &config).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "test@example.com");
        assert_eq!(claims.application_id, application_id);
        assert_eq!(claims.scopes, vec!["posts:read".to_string()]);
        assert_eq!(claims.exp, claims.iat + 3600);
    }

    #[test]
    fn test_verify_token_invalid() {
        let config = get_test_jwt_config();
        assert!(verify_token("invalid-token", &config).is_err());
    }

    #[test]
    fn test_verify_token_wrong_secret() {
        let config = get_test_jwt_config();
        let token =
            create_access_token(Uuid::new_v4(), "a@b.com", Uuid::new_v4(), vec![], &config)
                .unwrap();

        let wrong_config = JwtConfig {
            secret: "different-secret-key-at-least-32-characters".to_string(),
            access_token_expiry: 3600,
        };

        assert!(verify_token(&token, &wrong_config).is_err());
    }

    #[test]
    fn test_verify_token_expired() {
        let config = JwtConfig {
            access_token_expiry: -600,
            ..get_test_jwt_config()
        };
        let token =
            create_access_token(Uuid::new_v4(), "a@b.com", Uuid::new_v4(), vec![], &config)
                .unwrap();

        let err = verify_token(&token, &get_test_jwt_config()).unwrap_err();
        assert_eq!(err.code, gatekeep_core::ErrorCode::Unauthorized);
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let config = get_test_jwt_config();
        let token =
            create_access_token(Uuid::new_v4(), "a@b.com", Uuid::new_v4(), vec![], &config)
                .unwrap();

        let mut parts: Vec<&str> = token.split('.').collect();
        let forged = "eyJzdWIiOiJ4In0";
        parts[1] = forged;
        let tampered = parts.join(".");

        assert!(verify_token(&tampered, &config).is_err());
    }

    #[test]
    fn test_token_with_multiple_scopes() {
        let config = get_test_jwt_config();
        let scopes = vec![
            "posts:read".to_string(),
            "posts:write".to_string(),
            "roles:write".to_string(),
        ];

        let token = create_access_token(
            Uuid::new_v4(),
            "admin@example.com",
            Uuid::new_v4(),
            scopes.clone(),
            &config,
        )
        .unwrap();

        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.scopes, scopes);
    }
}
