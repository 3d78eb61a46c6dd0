//! Request dispatching
//!
//! Every use case is a request type paired with the handler that serves it.
//! Controllers build the request and hand it to the [`Mediator`], which
//! resolves the handler from the shared [`HandlerContext`] and logs the
//! outcome.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::response::ServiceResponse;
use crate::auth::TokenService;
use crate::domain::{DomainError, Repositories, Transaction, UnitOfWork, User};

pub trait Request: Send + Sized + 'static {
    type Output: Send + 'static;
    type Handler: RequestHandler<Self>;
}

#[async_trait]
pub trait RequestHandler<R: Request>: Send + Sync {
    fn resolve(context: &HandlerContext) -> Self
    where
        Self: Sized;

    async fn handle(&self, request: R) -> Result<ServiceResponse<R::Output>, DomainError>;
}

/// Services shared by all handlers
#[derive(Clone)]
pub struct HandlerContext {
    pub store: Arc<dyn UnitOfWork>,
    pub tokens: Arc<TokenService>,
}

#[derive(Clone)]
pub struct Mediator {
    context: HandlerContext,
}

impl Mediator {
    pub fn new(context: HandlerContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &HandlerContext {
        &self.context
    }

    pub async fn send<R: Request>(
        &self,
        request: R,
    ) -> Result<ServiceResponse<R::Output>, DomainError> {
        let name = request_name::<R>();
        let handler = R::Handler::resolve(&self.context);

        tracing::debug!("Handling {}", name);
        let result = handler.handle(request).await;

        match &result {
            Ok(response) if !response.successful => {
                tracing::info!(
                    "{} rejected: {:?}",
                    name,
                    response
                        .notifications()
                        .iter()
                        .map(|n| n.message.as_str())
                        .collect::<Vec<_>>()
                );
            }
            Err(e) => tracing::error!("{} failed: {}", name, e),
            _ => {}
        }

        result
    }
}

fn request_name<R>() -> &'static str {
    let full = std::any::type_name::<R>();
    full.rsplit("::").next().unwrap_or(full)
}

/// Loads the user named by the access token of the request.
pub(crate) async fn find_requester<S>(store: &S, user_id: Uuid) -> Result<Option<User>, DomainError>
where
    S: Repositories + ?Sized,
{
    store.users().find_by_id(user_id).await
}

pub(crate) const REQUESTER_NOT_FOUND: &str =
    "User not found with provided UserId in request token.";

/// Commits a successful outcome and rolls back anything else. Errors and
/// failed commits become an `Operation` notification carrying `failure`.
pub(crate) async fn complete<T>(
    txn: Box<dyn Transaction>,
    outcome: Result<ServiceResponse<T>, DomainError>,
    failure: &str,
) -> ServiceResponse<T> {
    match outcome {
        Ok(response) if response.successful => match txn.commit().await {
            Ok(()) => response,
            Err(e) => {
                tracing::error!("{} Commit failed: {}", failure, e);
                ServiceResponse::operation(failure)
            }
        },
        Ok(response) => {
            rollback(txn).await;
            response
        }
        Err(e) => {
            tracing::error!("{} {}", failure, e);
            rollback(txn).await;
            ServiceResponse::operation(failure)
        }
    }
}

async fn rollback(txn: Box<dyn Transaction>) {
    if let Err(e) = txn.rollback().await {
        tracing::error!("Rollback failed: {}", e);
    } else {
        tracing::debug!("Transaction rolled back");
    }
}
