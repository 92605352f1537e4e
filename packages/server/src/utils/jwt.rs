use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// JWT Claims structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Username
    pub uid: i32,    // User ID
    pub exp: i64,    // Expiration timestamp
}

/// A freshly minted bearer token.
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Sign a new JWT token for a user, valid for `ttl_secs` seconds.
pub fn sign(user_id: i32, username: &str, secret: &str, ttl_secs: u64) -> Result<IssuedToken> {
    let ttl = Duration::try_seconds(i64::try_from(ttl_secs)?).context("token ttl out of range")?;
    let expires_at = Utc::now()
        .checked_add_signed(ttl)
        .context("token expiry out of range")?;

    let claims = Claims {
        sub: username.to_owned(),
        uid: user_id,
        exp: expires_at.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(IssuedToken { token, expires_at })
}

/// Verify and decode a JWT token. Expired tokens are rejected.
pub fn verify(token: &str, secret: &str) -> Result<Claims> {
    let mut validation = Validation::default();
    validation.leeway = 0;
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}
