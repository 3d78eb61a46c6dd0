//! SeaORM implementation of WorkoutHistoryRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::{
    format_timestamp, ids_to_strings, join_ids, parse_id, parse_timestamp, split_ids,
    update_result,
};
use crate::domain::{
    DomainError, NotificationContext, Repository, WorkoutHistory, WorkoutHistoryRepository,
};
use crate::models::workout_history::{ActiveModel, Column, Entity as WorkoutHistoryEntity, Model};

pub struct SeaOrmWorkoutHistoryRepository<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> SeaOrmWorkoutHistoryRepository<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }
}

fn to_domain(model: Model) -> Result<WorkoutHistory, DomainError> {
    Ok(WorkoutHistory {
        id: parse_id(&model.id)?,
        created_at_utc: parse_timestamp(&model.created_at_utc)?,
        updated_at_utc: parse_timestamp(&model.updated_at_utc)?,
        created_by: parse_id(&model.created_by)?,
        workout_id: parse_id(&model.workout_id)?,
        workout_exercise_ids: split_ids(&model.workout_exercise_ids)?,
        notifications: NotificationContext::new(),
    })
}

fn to_active(history: &WorkoutHistory) -> ActiveModel {
    ActiveModel {
        id: Set(history.id.to_string()),
        workout_id: Set(history.workout_id.to_string()),
        workout_exercise_ids: Set(join_ids(&history.workout_exercise_ids)),
        created_by: Set(history.created_by.to_string()),
        created_at_utc: Set(format_timestamp(&history.created_at_utc)),
        updated_at_utc: Set(format_timestamp(&history.updated_at_utc)),
    }
}

fn to_domain_all(models: Vec<Model>) -> Result<Vec<WorkoutHistory>, DomainError> {
    models.into_iter().map(to_domain).collect()
}

#[async_trait]
impl<'c, C> Repository<WorkoutHistory> for SeaOrmWorkoutHistoryRepository<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_by_id(&self, id: Uuid) -> Result<Option<WorkoutHistory>, DomainError> {
        WorkoutHistoryEntity::find_by_id(id.to_string())
            .one(self.conn)
            .await?
            .map(to_domain)
            .transpose()
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<WorkoutHistory>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sessions = WorkoutHistoryEntity::find()
            .filter(Column::Id.is_in(ids_to_strings(ids)))
            .order_by_asc(Column::CreatedAtUtc)
            .all(self.conn)
            .await?;

        to_domain_all(sessions)
    }

    async fn find_all(&self) -> Result<Vec<WorkoutHistory>, DomainError> {
        let sessions = WorkoutHistoryEntity::find()
            .order_by_asc(Column::CreatedAtUtc)
            .all(self.conn)
            .await?;

        to_domain_all(sessions)
    }

    async fn create(&self, history: &WorkoutHistory) -> Result<(), DomainError> {
        WorkoutHistoryEntity::insert(to_active(history))
            .exec(self.conn)
            .await?;
        Ok(())
    }

    async fn update(&self, history: &WorkoutHistory) -> Result<(), DomainError> {
        update_result(to_active(history).update(self.conn).await)
    }

    async fn kill(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = WorkoutHistoryEntity::delete_by_id(id.to_string())
            .exec(self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl<'c, C> WorkoutHistoryRepository for SeaOrmWorkoutHistoryRepository<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_by_creator(
        &self,
        user_id: Uuid,
        workout_id: Option<Uuid>,
    ) -> Result<Vec<WorkoutHistory>, DomainError> {
        let mut query =
            WorkoutHistoryEntity::find().filter(Column::CreatedBy.eq(user_id.to_string()));
        if let Some(workout_id) = workout_id {
            query = query.filter(Column::WorkoutId.eq(workout_id.to_string()));
        }

        let sessions = query
            .order_by_desc(Column::CreatedAtUtc)
            .all(self.conn)
            .await?;

        to_domain_all(sessions)
    }
}
