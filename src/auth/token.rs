use crate::error::AppError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifetime of an issued session token, in seconds.
pub const TOKEN_TTL_SECS: u64 = 60 * 60;

/// Represents the claims encoded within a session token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Identifier of the user the token was issued to.
    pub user_id: Uuid,
    /// Email of that user at issuance time.
    pub email: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: u64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: u64,
}

/// Signs and verifies HS256 session tokens under the process-wide secret.
///
/// Built once at startup and shared through `web::Data`; changing the secret
/// invalidates every outstanding token.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issues a token for `{user_id, email}` that expires one hour from now.
    pub fn issue(&self, user_id: Uuid, email: &str) -> Result<String, AppError> {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        let claims = Claims {
            user_id,
            email: email.to_string(),
            iat: now,
            exp: now + TOKEN_TTL_SECS,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::InternalServerError(format!("Failed to sign token: {}", e)))
    }

    /// Verifies signature and expiry and returns the decoded claims.
    ///
    /// Every failure (bad signature, malformed token, expired) is the same
    /// `AppError::Unauthorized`; the cause is only logged.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret_for_codec";

    fn sign_with(secret: &str, claims: &Claims) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims_expiring_at(exp: i64) -> Claims {
        Claims {
            user_id: Uuid::new_v4(),
            email: "john@example.com".into(),
            iat: (exp - TOKEN_TTL_SECS as i64) as u64,
            exp: exp as u64,
        }
    }

    #[test]
    fn test_token_generation_and_verification() {
        let codec = TokenCodec::new(SECRET);
        let user_id = Uuid::new_v4();

        let token = codec.issue(user_id, "john@example.com").unwrap();
        let claims = codec.verify(&token).unwrap();

        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.email, "john@example.com");
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
    }

    #[test]
    fn test_payload_uses_camel_case_keys() {
        let claims = claims_expiring_at(chrono::Utc::now().timestamp() + 60);
        let json = serde_json::to_value(&claims).unwrap();
        assert!(json.get("userId").is_some());
        assert!(json.get("email").is_some());
    }

    #[test]
    fn test_token_expiration() {
        let codec = TokenCodec::new(SECRET);
        let two_hours_ago = chrono::Utc::now().timestamp() - 2 * 60 * 60;
        let expired_token = sign_with(SECRET, &claims_expiring_at(two_hours_ago));

        match codec.verify(&expired_token) {
            Err(AppError::Unauthorized(_)) => {}
            other => panic!("expired token should be rejected, got {:?}", other),
        }
    }

    #[test]
    fn test_token_just_past_expiry_is_rejected() {
        let codec = TokenCodec::new(SECRET);
        let a_second_ago = chrono::Utc::now().timestamp() - 1;
        let token = sign_with(SECRET, &claims_expiring_at(a_second_ago));

        assert!(codec.verify(&token).is_err());
    }

    #[test]
    fn test_invalid_token_signature() {
        let codec = TokenCodec::new(SECRET);
        let future = chrono::Utc::now().timestamp() + 600;
        let forged = sign_with("a_completely_different_secret", &claims_expiring_at(future));

        assert!(matches!(
            codec.verify(&forged),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_malformed_token() {
        let codec = TokenCodec::new(SECRET);
        for token in ["", "not-a-token", "a.b.c"] {
            assert!(matches!(
                codec.verify(token),
                Err(AppError::Unauthorized(_))
            ));
        }
    }

    #[test]
    fn test_failures_are_indistinguishable() {
        let codec = TokenCodec::new(SECRET);
        let expired = sign_with(
            SECRET,
            &claims_expiring_at(chrono::Utc::now().timestamp() - 7200),
        );
        let forged = sign_with(
            "other",
            &claims_expiring_at(chrono::Utc::now().timestamp() + 600),
        );

        let messages: Vec<String> = [expired.as_str(), forged.as_str(), "garbage"]
            .iter()
            .map(|t| codec.verify(t).unwrap_err().to_string())
            .collect();
        assert!(messages.windows(2).all(|w| w[0] == w[1]));
    }
}
