//! Best-effort JWT claim decoding for status display.
//!
//! The signature is NOT verified. Nothing here may be used to decide whether
//! a request is authorized; the backend does that.

use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::AuthError;

fn decode_claims(jwt: &str) -> Result<Value, AuthError> {
    let parts: Vec<&str> = jwt.split('.').collect();
    if parts.len() != 3 {
        return Err(AuthError::TokenFormat("invalid JWT format".into()));
    }
    let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(parts[1].trim_end_matches('='))
        .map_err(|e| AuthError::TokenFormat(format!("base64 decode failed: {e}")))?;
    serde_json::from_slice(&payload)
        .map_err(|e| AuthError::TokenFormat(format!("JSON parse failed: {e}")))
}

/// Decode the `exp` claim.
///
/// # Errors
///
/// Returns `AuthError::TokenFormat` if the token is not a JWT or `exp` is
/// missing or out of range.
pub fn decode_expiry(jwt: &str) -> Result<DateTime<Utc>, AuthError> {
    let claims = decode_claims(jwt)?;
    let exp = claims["exp"]
        .as_i64()
        .ok_or_else(|| AuthError::TokenFormat("missing exp claim".into()))?;
    DateTime::from_timestamp(exp, 0)
        .ok_or_else(|| AuthError::TokenFormat("invalid exp timestamp".into()))
}

/// Decode the `sub` claim. The backend puts the account email there.
///
/// # Errors
///
/// Returns `AuthError::TokenFormat` if the token is not a JWT or `sub` is
/// missing.
pub fn decode_subject(jwt: &str) -> Result<String, AuthError> {
    let claims = decode_claims(jwt)?;
    claims["sub"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| AuthError::TokenFormat("missing sub claim".into()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn make_jwt(payload: &str) -> String {
        let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
        let header = engine.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = engine.encode(payload);
        let signature = engine.encode("fake_sig");
        format!("{header}.{payload}.{signature}")
    }

    #[test]
    fn decodes_expiry_and_subject() {
        let exp = Utc::now().timestamp() + 1800;
        let jwt = make_jwt(&format!(r#"{{"sub":"a@b.com","exp":{exp}}}"#));

        assert_eq!(decode_expiry(&jwt).expect("exp").timestamp(), exp);
        assert_eq!(decode_subject(&jwt).expect("sub"), "a@b.com");
    }

    #[test]
    fn expired_token_still_decodes() {
        let exp = Utc::now().timestamp() - 60;
        let jwt = make_jwt(&format!(r#"{{"sub":"a@b.com","exp":{exp}}}"#));
        assert!(decode_expiry(&jwt).expect("exp") < Utc::now());
    }

    #[test]
    fn rejects_non_jwt() {
        let err = decode_expiry("opaque-token").expect_err("not a jwt");
        assert!(err.to_string().contains("invalid JWT format"));
    }

    #[test]
    fn missing_claims() {
        let jwt = make_jwt(r#"{"role":"admin"}"#);
        assert!(
            decode_expiry(&jwt)
                .expect_err("no exp")
                .to_string()
                .contains("missing exp claim")
        );
        assert!(
            decode_subject(&jwt)
                .expect_err("no sub")
                .to_string()
                .contains("missing sub claim")
        );
    }

    #[test]
    fn bad_base64() {
        let err = decode_subject("header.!!!invalid!!!.signature").expect_err("bad payload");
        assert!(err.to_string().contains("base64 decode failed"));
    }
}
