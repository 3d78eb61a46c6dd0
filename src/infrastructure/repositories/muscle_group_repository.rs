//! SeaORM implementation of MuscleGroupRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::{format_timestamp, ids_to_strings, parse_id, parse_timestamp, update_result};
use crate::domain::{
    DomainError, MuscleGroup, MuscleGroupRepository, NotificationContext, Repository,
};
use crate::models::muscle_groups::{ActiveModel, Column, Entity as MuscleGroupEntity, Model};

pub struct SeaOrmMuscleGroupRepository<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> SeaOrmMuscleGroupRepository<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }
}

fn to_domain(model: Model) -> Result<MuscleGroup, DomainError> {
    Ok(MuscleGroup {
        id: parse_id(&model.id)?,
        created_at_utc: parse_timestamp(&model.created_at_utc)?,
        updated_at_utc: parse_timestamp(&model.updated_at_utc)?,
        name: model.name,
        notifications: NotificationContext::new(),
    })
}

fn to_active(group: &MuscleGroup) -> ActiveModel {
    ActiveModel {
        id: Set(group.id.to_string()),
        name: Set(group.name.clone()),
        created_at_utc: Set(format_timestamp(&group.created_at_utc)),
        updated_at_utc: Set(format_timestamp(&group.updated_at_utc)),
    }
}

fn to_domain_all(models: Vec<Model>) -> Result<Vec<MuscleGroup>, DomainError> {
    models.into_iter().map(to_domain).collect()
}

#[async_trait]
impl<'c, C> Repository<MuscleGroup> for SeaOrmMuscleGroupRepository<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_by_id(&self, id: Uuid) -> Result<Option<MuscleGroup>, DomainError> {
        MuscleGroupEntity::find_by_id(id.to_string())
            .one(self.conn)
            .await?
            .map(to_domain)
            .transpose()
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<MuscleGroup>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let groups = MuscleGroupEntity::find()
            .filter(Column::Id.is_in(ids_to_strings(ids)))
            .order_by_asc(Column::Name)
            .all(self.conn)
            .await?;

        to_domain_all(groups)
    }

    async fn find_all(&self) -> Result<Vec<MuscleGroup>, DomainError> {
        let groups = MuscleGroupEntity::find()
            .order_by_asc(Column::Name)
            .all(self.conn)
            .await?;

        to_domain_all(groups)
    }

    async fn create(&self, group: &MuscleGroup) -> Result<(), DomainError> {
        MuscleGroupEntity::insert(to_active(group))
            .exec(self.conn)
            .await?;
        Ok(())
    }

    async fn update(&self, group: &MuscleGroup) -> Result<(), DomainError> {
        update_result(to_active(group).update(self.conn).await)
    }

    async fn kill(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = MuscleGroupEntity::delete_by_id(id.to_string())
            .exec(self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl<'c, C> MuscleGroupRepository for SeaOrmMuscleGroupRepository<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_by_name(&self, name: &str) -> Result<Option<MuscleGroup>, DomainError> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(None);
        }

        let groups = self.find_all().await?;

        // An exact name wins over a partial match.
        let exact = groups.iter().position(|g| g.name.to_lowercase() == needle);
        let found = exact.or_else(|| {
            groups
                .iter()
                .position(|g| g.name.to_lowercase().contains(&needle))
        });

        Ok(found.map(|index| groups[index].clone()))
    }
}
