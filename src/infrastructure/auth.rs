//! Password hashing and JWT issuing/validation

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{DomainError, RefreshToken, User};

const REFRESH_TOKEN_BYTES: usize = 64;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub email: String,
    pub given_name: String,
    pub family_name: String,
    pub cpf: String,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
}

impl Claims {
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

#[derive(Debug, Clone)]
pub struct JwtOptions {
    pub key: String,
    pub issuer: String,
    pub audience: String,
    pub expiration_days: i64,
}

/// Access token returned to clients together with its refresh token
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub access_token: String,
    pub refresh_token: RefreshToken,
}

pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| e.to_string())?
        .to_string();
    Ok(password_hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, String> {
    let parsed_hash = PasswordHash::new(password_hash).map_err(|e| e.to_string())?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub struct TokenService {
    options: JwtOptions,
}

impl TokenService {
    pub fn new(options: JwtOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &JwtOptions {
        &self.options
    }

    pub fn generate_access_token(&self, user: &User) -> Result<String, DomainError> {
        let now = Utc::now();
        let expiration = now + Duration::days(self.options.expiration_days);

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            given_name: user.first_name.clone(),
            family_name: user.last_name.clone(),
            cpf: user.cpf.clone(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            iss: self.options.issuer.clone(),
            aud: self.options.audience.clone(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.options.key.as_bytes()),
        )
        .map_err(|e| DomainError::Security(e.to_string()))
    }

    pub fn generate_refresh_token(&self, user: &User) -> Result<RefreshToken, DomainError> {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        rand::rngs::OsRng.fill_bytes(&mut bytes);

        RefreshToken::new(
            user.id,
            URL_SAFE_NO_PAD.encode(bytes),
            Utc::now() + Duration::days(self.options.expiration_days),
        )
    }

    pub fn issue(&self, user: &User) -> Result<IssuedTokens, DomainError> {
        Ok(IssuedTokens {
            access_token: self.generate_access_token(user)?,
            refresh_token: self.generate_refresh_token(user)?,
        })
    }

    /// Full validation: signature, issuer, audience and lifetime.
    pub fn validate(&self, token: &str) -> Result<Claims, DomainError> {
        self.decode(token, true)
    }

    /// Reads the claims of a token that may already be expired. Signature,
    /// issuer and audience are still enforced.
    pub fn principal_from_expired(&self, token: &str) -> Result<Claims, DomainError> {
        self.decode(token, false)
    }

    fn decode(&self, token: &str, validate_exp: bool) -> Result<Claims, DomainError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.options.issuer]);
        validation.set_audience(&[&self.options.audience]);
        validation.validate_exp = validate_exp;
        validation.leeway = 0;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.options.key.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| DomainError::Security(e.to_string()))
    }
}
