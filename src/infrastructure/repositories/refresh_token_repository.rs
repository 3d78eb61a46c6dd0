//! SeaORM implementation of RefreshTokenRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::{format_timestamp, ids_to_strings, parse_id, parse_timestamp, update_result};
use crate::domain::{DomainError, RefreshToken, RefreshTokenRepository, Repository};
use crate::models::refresh_tokens::{ActiveModel, Column, Entity as RefreshTokenEntity, Model};

pub struct SeaOrmRefreshTokenRepository<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> SeaOrmRefreshTokenRepository<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }
}

fn to_domain(model: Model) -> Result<RefreshToken, DomainError> {
    Ok(RefreshToken {
        id: parse_id(&model.id)?,
        user_id: parse_id(&model.user_id)?,
        token: model.token,
        expires: parse_timestamp(&model.expires)?,
        is_revoked: model.is_revoked,
        is_used: model.is_used,
    })
}

fn to_active(token: &RefreshToken) -> ActiveModel {
    ActiveModel {
        id: Set(token.id.to_string()),
        user_id: Set(token.user_id.to_string()),
        token: Set(token.token.clone()),
        expires: Set(format_timestamp(&token.expires)),
        is_revoked: Set(token.is_revoked),
        is_used: Set(token.is_used),
    }
}

fn to_domain_all(models: Vec<Model>) -> Result<Vec<RefreshToken>, DomainError> {
    models.into_iter().map(to_domain).collect()
}

#[async_trait]
impl<'c, C> Repository<RefreshToken> for SeaOrmRefreshTokenRepository<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_by_id(&self, id: Uuid) -> Result<Option<RefreshToken>, DomainError> {
        RefreshTokenEntity::find_by_id(id.to_string())
            .one(self.conn)
            .await?
            .map(to_domain)
            .transpose()
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<RefreshToken>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let tokens = RefreshTokenEntity::find()
            .filter(Column::Id.is_in(ids_to_strings(ids)))
            .all(self.conn)
            .await?;

        to_domain_all(tokens)
    }

    async fn find_all(&self) -> Result<Vec<RefreshToken>, DomainError> {
        let tokens = RefreshTokenEntity::find()
            .order_by_desc(Column::Expires)
            .all(self.conn)
            .await?;

        to_domain_all(tokens)
    }

    async fn create(&self, token: &RefreshToken) -> Result<(), DomainError> {
        RefreshTokenEntity::insert(to_active(token))
            .exec(self.conn)
            .await?;
        Ok(())
    }

    async fn update(&self, token: &RefreshToken) -> Result<(), DomainError> {
        update_result(to_active(token).update(self.conn).await)
    }

    async fn kill(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = RefreshTokenEntity::delete_by_id(id.to_string())
            .exec(self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl<'c, C> RefreshTokenRepository for SeaOrmRefreshTokenRepository<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_active_by_user(&self, user_id: Uuid) -> Result<Vec<RefreshToken>, DomainError> {
        let tokens = RefreshTokenEntity::find()
            .filter(Column::UserId.eq(user_id.to_string()))
            .filter(Column::IsUsed.eq(false))
            .filter(Column::IsRevoked.eq(false))
            .all(self.conn)
            .await?;

        to_domain_all(tokens)
    }

    async fn find_by_token(
        &self,
        user_id: Uuid,
        token: &str,
    ) -> Result<Option<RefreshToken>, DomainError> {
        RefreshTokenEntity::find()
            .filter(Column::UserId.eq(user_id.to_string()))
            .filter(Column::Token.eq(token))
            .one(self.conn)
            .await?
            .map(to_domain)
            .transpose()
    }
}
