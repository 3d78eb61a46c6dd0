//! SeaORM implementation of ExerciseHistoryRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::{
    format_timestamp, ids_to_strings, parse_id, parse_name, parse_timestamp, update_result,
};
use crate::domain::{
    DomainError, ExerciseHistory, ExerciseHistoryRepository, NotificationContext, Repository,
};
use crate::models::exercise_history::{
    ActiveModel, Column, Entity as ExerciseHistoryEntity, Model,
};

pub struct SeaOrmExerciseHistoryRepository<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> SeaOrmExerciseHistoryRepository<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }
}

fn to_domain(model: Model) -> Result<ExerciseHistory, DomainError> {
    Ok(ExerciseHistory {
        id: parse_id(&model.id)?,
        created_at_utc: parse_timestamp(&model.created_at_utc)?,
        updated_at_utc: parse_timestamp(&model.updated_at_utc)?,
        created_by: parse_id(&model.created_by)?,
        exercise_id: parse_id(&model.exercise_id)?,
        weight_unit: parse_name(&model.weight_unit)?,
        set: model.set_number,
        reps: model.reps,
        weight: model.weight,
        notifications: NotificationContext::new(),
    })
}

fn to_active(history: &ExerciseHistory) -> ActiveModel {
    ActiveModel {
        id: Set(history.id.to_string()),
        exercise_id: Set(history.exercise_id.to_string()),
        weight_unit: Set(history.weight_unit.to_string()),
        set_number: Set(history.set),
        reps: Set(history.reps),
        weight: Set(history.weight),
        created_by: Set(history.created_by.to_string()),
        created_at_utc: Set(format_timestamp(&history.created_at_utc)),
        updated_at_utc: Set(format_timestamp(&history.updated_at_utc)),
    }
}

fn to_domain_all(models: Vec<Model>) -> Result<Vec<ExerciseHistory>, DomainError> {
    models.into_iter().map(to_domain).collect()
}

#[async_trait]
impl<'c, C> Repository<ExerciseHistory> for SeaOrmExerciseHistoryRepository<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ExerciseHistory>, DomainError> {
        ExerciseHistoryEntity::find_by_id(id.to_string())
            .one(self.conn)
            .await?
            .map(to_domain)
            .transpose()
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<ExerciseHistory>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let entries = ExerciseHistoryEntity::find()
            .filter(Column::Id.is_in(ids_to_strings(ids)))
            .order_by_asc(Column::CreatedAtUtc)
            .all(self.conn)
            .await?;

        to_domain_all(entries)
    }

    async fn find_all(&self) -> Result<Vec<ExerciseHistory>, DomainError> {
        let entries = ExerciseHistoryEntity::find()
            .order_by_asc(Column::CreatedAtUtc)
            .all(self.conn)
            .await?;

        to_domain_all(entries)
    }

    async fn create(&self, history: &ExerciseHistory) -> Result<(), DomainError> {
        ExerciseHistoryEntity::insert(to_active(history))
            .exec(self.conn)
            .await?;
        Ok(())
    }

    async fn update(&self, history: &ExerciseHistory) -> Result<(), DomainError> {
        update_result(to_active(history).update(self.conn).await)
    }

    async fn kill(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = ExerciseHistoryEntity::delete_by_id(id.to_string())
            .exec(self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl<'c, C> ExerciseHistoryRepository for SeaOrmExerciseHistoryRepository<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_by_creator(
        &self,
        user_id: Uuid,
        exercise_id: Option<Uuid>,
    ) -> Result<Vec<ExerciseHistory>, DomainError> {
        let mut query =
            ExerciseHistoryEntity::find().filter(Column::CreatedBy.eq(user_id.to_string()));
        if let Some(exercise_id) = exercise_id {
            query = query.filter(Column::ExerciseId.eq(exercise_id.to_string()));
        }

        let entries = query
            .order_by_desc(Column::CreatedAtUtc)
            .order_by_asc(Column::SetNumber)
            .all(self.conn)
            .await?;

        to_domain_all(entries)
    }
}
