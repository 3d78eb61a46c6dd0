//! SeaORM implementation of WorkoutExerciseRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::{
    format_timestamp, ids_to_strings, parse_id, parse_name, parse_timestamp, update_result,
};
use crate::domain::{
    DomainError, NotificationContext, Repository, WorkoutExercise, WorkoutExerciseRepository,
};
use crate::models::workout_exercises::{
    ActiveModel, Column, Entity as WorkoutExerciseEntity, Model,
};

pub struct SeaOrmWorkoutExerciseRepository<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> SeaOrmWorkoutExerciseRepository<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }
}

fn to_domain(model: Model) -> Result<WorkoutExercise, DomainError> {
    Ok(WorkoutExercise {
        id: parse_id(&model.id)?,
        created_at_utc: parse_timestamp(&model.created_at_utc)?,
        updated_at_utc: parse_timestamp(&model.updated_at_utc)?,
        created_by: parse_id(&model.created_by)?,
        updated_by: parse_id(&model.updated_by)?,
        exercise_id: parse_id(&model.exercise_id)?,
        exercise_name: model.exercise_name,
        weight_unit: parse_name(&model.weight_unit)?,
        sets: model.sets,
        reps: model.reps,
        weight: model.weight,
        notifications: NotificationContext::new(),
    })
}

fn to_active(exercise: &WorkoutExercise) -> ActiveModel {
    ActiveModel {
        id: Set(exercise.id.to_string()),
        exercise_id: Set(exercise.exercise_id.to_string()),
        exercise_name: Set(exercise.exercise_name.clone()),
        weight_unit: Set(exercise.weight_unit.to_string()),
        sets: Set(exercise.sets),
        reps: Set(exercise.reps),
        weight: Set(exercise.weight),
        created_by: Set(exercise.created_by.to_string()),
        updated_by: Set(exercise.updated_by.to_string()),
        created_at_utc: Set(format_timestamp(&exercise.created_at_utc)),
        updated_at_utc: Set(format_timestamp(&exercise.updated_at_utc)),
    }
}

fn to_domain_all(models: Vec<Model>) -> Result<Vec<WorkoutExercise>, DomainError> {
    models.into_iter().map(to_domain).collect()
}

#[async_trait]
impl<'c, C> Repository<WorkoutExercise> for SeaOrmWorkoutExerciseRepository<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_by_id(&self, id: Uuid) -> Result<Option<WorkoutExercise>, DomainError> {
        WorkoutExerciseEntity::find_by_id(id.to_string())
            .one(self.conn)
            .await?
            .map(to_domain)
            .transpose()
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<WorkoutExercise>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let exercises = WorkoutExerciseEntity::find()
            .filter(Column::Id.is_in(ids_to_strings(ids)))
            .all(self.conn)
            .await?;

        to_domain_all(exercises)
    }

    async fn find_all(&self) -> Result<Vec<WorkoutExercise>, DomainError> {
        let exercises = WorkoutExerciseEntity::find()
            .order_by_asc(Column::CreatedAtUtc)
            .all(self.conn)
            .await?;

        to_domain_all(exercises)
    }

    async fn create(&self, exercise: &WorkoutExercise) -> Result<(), DomainError> {
        WorkoutExerciseEntity::insert(to_active(exercise))
            .exec(self.conn)
            .await?;
        Ok(())
    }

    async fn update(&self, exercise: &WorkoutExercise) -> Result<(), DomainError> {
        update_result(to_active(exercise).update(self.conn).await)
    }

    async fn kill(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = WorkoutExerciseEntity::delete_by_id(id.to_string())
            .exec(self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl<'c, C> WorkoutExerciseRepository for SeaOrmWorkoutExerciseRepository<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn kill_many(&self, ids: &[Uuid]) -> Result<u64, DomainError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = WorkoutExerciseEntity::delete_many()
            .filter(Column::Id.is_in(ids_to_strings(ids)))
            .exec(self.conn)
            .await?;

        Ok(result.rows_affected)
    }
}
