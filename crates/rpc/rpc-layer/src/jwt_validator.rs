use crate::{AuthValidator, JwtError, JwtSecret};
use http::{header, HeaderMap, StatusCode};
use jsonrpsee_http_client::{HttpBody, HttpResponse};
use tracing::warn;

/// Engine-endpoint JWT validation: checks the `Authorization: Bearer` header
/// of every request against the shared secret.
#[derive(Debug, Clone)]
pub struct JwtAuthValidator {
    secret: JwtSecret,
}

impl JwtAuthValidator {
    /// Creates a validator for the given secret.
    pub fn new(secret: JwtSecret) -> Self {
        Self { secret }
    }
}

impl AuthValidator for JwtAuthValidator {
    fn validate(&self, headers: &HeaderMap) -> Result<(), HttpResponse> {
        match get_bearer(headers) {
            Some(jwt) => match self.secret.validate(&jwt) {
                Ok(()) => Ok(()),
                Err(error) => {
                    warn!(target: "rpc::jwt", %error, "Invalid JWT");
                    Err(err_response(error))
                }
            },
            None => {
                let error = JwtError::MissingOrInvalidAuthorizationHeader;
                warn!(target: "rpc::jwt", %error, "Rejecting unauthenticated request");
                Err(err_response(error))
            }
        }
    }
}

/// The bearer token of the `Authorization` header, if any.
fn get_bearer(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(header::AUTHORIZATION)?;
    let auth = header.to_str().ok()?;
    auth.strip_prefix("Bearer ").map(str::to_string)
}

fn err_response(err: JwtError) -> HttpResponse {
    let mut response = HttpResponse::new(HttpBody::from(err.to_string()));
    *response.status_mut() = StatusCode::UNAUTHORIZED;
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Claims;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn fresh_claims() -> Claims {
        let iat = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs();
        Claims { iat, exp: None }
    }

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn accepts_valid_bearer() {
        let secret = JwtSecret::random();
        let jwt = secret.encode(&fresh_claims()).unwrap();
        let validator = JwtAuthValidator::new(secret);
        assert!(validator.validate(&headers_with_auth(&format!("Bearer {jwt}"))).is_ok());
    }

    #[test]
    fn refuses_missing_header_with_401() {
        let validator = JwtAuthValidator::new(JwtSecret::random());
        let response = validator.validate(&HeaderMap::new()).unwrap_err();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn refuses_stale_iat_with_401() {
        let secret = JwtSecret::random();
        let jwt = secret.encode(&Claims { iat: 1, exp: None }).unwrap();
        let validator = JwtAuthValidator::new(secret);
        let response =
            validator.validate(&headers_with_auth(&format!("Bearer {jwt}"))).unwrap_err();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn refuses_foreign_token_with_401() {
        let secret = JwtSecret::random();
        let other = JwtSecret::random();
        let jwt = other.encode(&fresh_claims()).unwrap();
        let validator = JwtAuthValidator::new(secret);
        let response =
            validator.validate(&headers_with_auth(&format!("Bearer {jwt}"))).unwrap_err();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
