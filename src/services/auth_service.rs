//! Registration, login and token refresh

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::mediator::{HandlerContext, Request, RequestHandler, complete};
use super::response::ServiceResponse;
use super::validators::{self, Validate};
use crate::auth::{IssuedTokens, TokenService, hash_password, verify_password};
use crate::domain::formats::is_safe_for_sql_input;
use crate::domain::validation::Validator;
use crate::domain::{
    DomainError, NewUser, Notification, RefreshToken, Repositories, SelfValidating, Transaction,
    UnitOfWork, User, UserType,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub refresh_token: String,
}

impl From<IssuedTokens> for AuthResponse {
    fn from(tokens: IssuedTokens) -> Self {
        Self {
            token: tokens.access_token,
            refresh_token: tokens.refresh_token.token,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(rename = "type")]
    pub user_type: UserType,
    pub first_name: String,
    pub last_name: String,
    pub cpf: String,
    pub phone_number: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub teacher_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub token: String,
    pub refresh_token: String,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), Vec<Notification>> {
        let mut v = Validator::new();
        validators::person_name(&mut v, "FirstName", &self.first_name);
        validators::person_name(&mut v, "LastName", &self.last_name);
        validators::cpf(&mut v, &self.cpf);
        validators::phone_number(&mut v, &self.phone_number);
        validators::email(&mut v, &self.email);
        validators::new_password(&mut v, &self.password);
        validators::optional_id(&mut v, "TeacherId", self.teacher_id.as_deref());
        v.finish()
    }
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), Vec<Notification>> {
        let mut v = Validator::new();
        validators::email(&mut v, &self.email);
        v.text(&self.password)
            .not_empty("Password is required.")
            .must(is_safe_for_sql_input, "Password contains invalid characters.");
        v.finish()
    }
}

impl Validate for RefreshTokenRequest {
    fn validate(&self) -> Result<(), Vec<Notification>> {
        let mut v = Validator::new();
        // Base64url tokens may legitimately contain "--".
        v.text(&self.token).not_empty("Token is required.");
        v.text(&self.refresh_token)
            .not_empty("RefreshToken is required.");
        v.finish()
    }
}

impl Request for RegisterRequest {
    type Output = AuthResponse;
    type Handler = RegisterHandler;
}

impl Request for LoginRequest {
    type Output = AuthResponse;
    type Handler = LoginHandler;
}

impl Request for RefreshTokenRequest {
    type Output = AuthResponse;
    type Handler = RefreshTokenHandler;
}

/// Stores a freshly issued refresh token and answers with the token pair.
async fn issue_tokens(
    txn: &dyn Transaction,
    tokens: &TokenService,
    user: &User,
) -> Result<ServiceResponse<AuthResponse>, DomainError> {
    let issued = tokens.issue(user)?;
    txn.refresh_tokens().create(&issued.refresh_token).await?;
    Ok(ServiceResponse::success(issued.into()))
}

pub struct RegisterHandler {
    store: Arc<dyn UnitOfWork>,
    tokens: Arc<TokenService>,
}

#[async_trait]
impl RequestHandler<RegisterRequest> for RegisterHandler {
    fn resolve(context: &HandlerContext) -> Self {
        Self {
            store: context.store.clone(),
            tokens: context.tokens.clone(),
        }
    }

    async fn handle(
        &self,
        request: RegisterRequest,
    ) -> Result<ServiceResponse<AuthResponse>, DomainError> {
        let taken = self
            .store
            .users()
            .exists_with_email_or_cpf(&request.email, &request.cpf)
            .await?;
        if taken {
            return Ok(ServiceResponse::operation(
                "A user already exists with given email or cpf.",
            ));
        }

        let password_hash = hash_password(&request.password).map_err(DomainError::Security)?;
        let user = User::create(NewUser {
            user_type: request.user_type,
            first_name: request.first_name,
            last_name: request.last_name,
            cpf: request.cpf,
            phone_number: request.phone_number,
            email: request.email,
            password_hash,
            teacher_id: validators::parse_optional_id(request.teacher_id.as_deref()),
        });

        if !user.is_valid() {
            return Ok(ServiceResponse::failure(user.notifications().to_vec()));
        }

        let txn = self.store.begin().await?;
        let outcome = register(&*txn, &self.tokens, &user).await;
        let response = complete(txn, outcome, "Registration attempt failed.").await;

        if response.successful {
            tracing::info!("User {} registered", user.id);
        }
        Ok(response)
    }
}

async fn register(
    txn: &dyn Transaction,
    tokens: &TokenService,
    user: &User,
) -> Result<ServiceResponse<AuthResponse>, DomainError> {
    txn.users().create(user).await?;
    issue_tokens(txn, tokens, user).await
}

pub struct LoginHandler {
    store: Arc<dyn UnitOfWork>,
    tokens: Arc<TokenService>,
}

const INVALID_LOGIN: &str = "Invalid login attempt.";

#[async_trait]
impl RequestHandler<LoginRequest> for LoginHandler {
    fn resolve(context: &HandlerContext) -> Self {
        Self {
            store: context.store.clone(),
            tokens: context.tokens.clone(),
        }
    }

    async fn handle(&self, request: LoginRequest) -> Result<ServiceResponse<AuthResponse>, DomainError> {
        let Some(user) = self.store.users().find_by_email(&request.email).await? else {
            tracing::warn!("Login attempt for unknown email");
            return Ok(ServiceResponse::not_found(INVALID_LOGIN));
        };

        if !verify_password(&request.password, &user.password).unwrap_or(false) {
            tracing::warn!("Password verification failed for user {}", user.id);
            return Ok(ServiceResponse::not_found(INVALID_LOGIN));
        }

        let active = self.store.refresh_tokens().find_active_by_user(user.id).await?;

        let txn = self.store.begin().await?;
        let outcome = login(&*txn, &self.tokens, &user, active).await;
        Ok(complete(txn, outcome, "Login attempt failed.").await)
    }
}

async fn login(
    txn: &dyn Transaction,
    tokens: &TokenService,
    user: &User,
    active: Vec<RefreshToken>,
) -> Result<ServiceResponse<AuthResponse>, DomainError> {
    for mut token in active {
        token.revoke();
        txn.refresh_tokens().update(&token).await?;
    }
    issue_tokens(txn, tokens, user).await
}

pub struct RefreshTokenHandler {
    store: Arc<dyn UnitOfWork>,
    tokens: Arc<TokenService>,
}

#[async_trait]
impl RequestHandler<RefreshTokenRequest> for RefreshTokenHandler {
    fn resolve(context: &HandlerContext) -> Self {
        Self {
            store: context.store.clone(),
            tokens: context.tokens.clone(),
        }
    }

    async fn handle(
        &self,
        request: RefreshTokenRequest,
    ) -> Result<ServiceResponse<AuthResponse>, DomainError> {
        let user_id = match self.tokens.principal_from_expired(&request.token) {
            Ok(claims) => claims.user_id(),
            Err(e) => {
                tracing::debug!("Unreadable access token: {}", e);
                None
            }
        };
        let Some(user_id) = user_id else {
            return Ok(ServiceResponse::operation("Invalid access token."));
        };

        let Some(user) = self.store.users().find_by_id(user_id).await? else {
            return Ok(ServiceResponse::not_found("User not found."));
        };

        let stored = self
            .store
            .refresh_tokens()
            .find_by_token(user.id, &request.refresh_token)
            .await?
            .filter(RefreshToken::is_valid);
        let Some(stored) = stored else {
            return Ok(ServiceResponse::operation(
                "Refresh token is used, revoked or does not exists.",
            ));
        };

        let txn = self.store.begin().await?;
        let outcome = rotate(&*txn, &self.tokens, &user, stored).await;
        Ok(complete(txn, outcome, "Refresh token attempt failed.").await)
    }
}

async fn rotate(
    txn: &dyn Transaction,
    tokens: &TokenService,
    user: &User,
    mut stored: RefreshToken,
) -> Result<ServiceResponse<AuthResponse>, DomainError> {
    stored.mark_used();
    txn.refresh_tokens().update(&stored).await?;
    issue_tokens(txn, tokens, user).await
}
