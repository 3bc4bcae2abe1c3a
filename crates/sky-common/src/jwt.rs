//! HS256 tokens issued at login and verified by the admin interceptor.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

pub type JwtError = jsonwebtoken::errors::Error;

#[derive(Debug, Clone)]
pub struct JwtProperties {
    pub admin_secret_key: String,
    pub admin_ttl: Duration,
    /// Request header carrying the admin token.
    pub admin_token_name: String,
}

impl Default for JwtProperties {
    fn default() -> Self {
        Self {
            admin_secret_key: "itcast".to_string(),
            admin_ttl: Duration::from_millis(7_200_000),
            admin_token_name: "token".to_string(),
        }
    }
}

/// Claims carried by an admin (employee) token.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmployeeClaims {
    #[serde(rename = "empId")]
    pub emp_id: i64,
}

#[derive(Serialize, Deserialize)]
struct Signed<C> {
    #[serde(flatten)]
    claims: C,
    exp: u64,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

pub fn create_jwt<C: Serialize>(secret: &str, ttl: Duration, claims: C) -> Result<String, JwtError> {
    let signed = Signed {
        claims,
        exp: now_secs().saturating_add(ttl.as_secs()),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &signed,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify signature and expiry, returning the custom claims.
pub fn parse_jwt<C: DeserializeOwned>(secret: &str, token: &str) -> Result<C, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    let data = decode::<Signed<C>>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(data.claims.claims)
}
