use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::Deserialize;

use crate::errors::{Error, Result};

#[derive(Debug, Deserialize)]
struct Claims {
    exp: i64,
}

/// Reads the `exp` claim of a bearer token. The signature is not verified;
/// the service is the only party that needs to trust it.
pub fn expires_at(token: &str) -> Result<DateTime<Utc>> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;

    let claims = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)?.claims;
    DateTime::from_timestamp(claims.exp, 0)
        .ok_or_else(|| Error::UnexpectedResponse(format!("token expiry out of range: {}", claims.exp)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    #[test]
    fn test_reads_exp_claim() {
        let token = encode(&Header::default(), &json!({"exp": 1627417600}), &EncodingKey::from_secret(b"secret")).unwrap();
        assert_eq!(expires_at(&token).unwrap().timestamp(), 1627417600);
    }

    #[test]
    fn test_missing_exp_is_an_error() {
        let token = encode(&Header::default(), &json!({"sub": "user"}), &EncodingKey::from_secret(b"secret")).unwrap();
        assert!(matches!(expires_at(&token), Err(Error::Token(_))));
    }

    #[test]
    fn test_garbage_token_is_an_error() {
        assert!(matches!(expires_at("not-a-jwt"), Err(Error::Token(_))));
    }
}
