//! Application state shared by every route

use axum::extract::FromRef;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::auth::{JwtOptions, TokenService};
use crate::infrastructure::unit_of_work::SeaOrmUnitOfWork;
use crate::services::{HandlerContext, Mediator};

#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    pub mediator: Mediator,
    /// Also used by the authentication middleware
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, jwt: JwtOptions) -> Self {
        let tokens = Arc::new(TokenService::new(jwt));
        let mediator = Mediator::new(HandlerContext {
            store: Arc::new(SeaOrmUnitOfWork::new(db.clone())),
            tokens: tokens.clone(),
        });

        Self {
            db,
            mediator,
            tokens,
        }
    }
}

impl FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for Mediator {
    fn from_ref(state: &AppState) -> Self {
        state.mediator.clone()
    }
}
