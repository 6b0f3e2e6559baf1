use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// JWT Claims structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Username
    pub uid: i32,    // User ID
    pub adm: bool,   // Club admin flag
    pub exp: usize,  // Expiration timestamp
}

/// Token lifetime in days.
const TOKEN_DAYS: i64 = 7;

/// Sign a new JWT token for a user.
pub fn sign(user_id: i32, username: &str, is_admin: bool, secret: &str) -> Result<String> {
    let expiration = (Utc::now() + Duration::days(TOKEN_DAYS)).timestamp();

    let claims = Claims {
        sub: username.to_owned(),
        uid: user_id,
        adm: is_admin,
        exp: expiration as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Verify and decode a JWT token.
pub fn verify(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}
