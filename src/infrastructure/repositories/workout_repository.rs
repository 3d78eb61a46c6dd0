//! SeaORM implementation of WorkoutRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::{
    format_timestamp, ids_to_strings, join_ids, parse_id, parse_name, parse_timestamp, split_ids,
    update_result,
};
use crate::domain::formats::fold_for_search;
use crate::domain::{DomainError, NotificationContext, Repository, Workout, WorkoutRepository};
use crate::models::workouts::{ActiveModel, Column, Entity as WorkoutEntity, Model};

pub struct SeaOrmWorkoutRepository<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> SeaOrmWorkoutRepository<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }
}

fn to_domain(model: Model) -> Result<Workout, DomainError> {
    Ok(Workout {
        id: parse_id(&model.id)?,
        created_at_utc: parse_timestamp(&model.created_at_utc)?,
        updated_at_utc: parse_timestamp(&model.updated_at_utc)?,
        created_by: parse_id(&model.created_by)?,
        updated_by: parse_id(&model.updated_by)?,
        name: model.name,
        day_of_week: parse_name(&model.day_of_week)?,
        workout_exercise_ids: split_ids(&model.workout_exercise_ids)?,
        created_for_user_ids: split_ids(&model.created_for_user_ids)?,
        notifications: NotificationContext::new(),
    })
}

fn to_active(workout: &Workout) -> ActiveModel {
    ActiveModel {
        id: Set(workout.id.to_string()),
        name: Set(workout.name.clone()),
        day_of_week: Set(workout.day_of_week.to_string()),
        workout_exercise_ids: Set(join_ids(&workout.workout_exercise_ids)),
        created_for_user_ids: Set(join_ids(&workout.created_for_user_ids)),
        created_by: Set(workout.created_by.to_string()),
        updated_by: Set(workout.updated_by.to_string()),
        created_at_utc: Set(format_timestamp(&workout.created_at_utc)),
        updated_at_utc: Set(format_timestamp(&workout.updated_at_utc)),
    }
}

fn to_domain_all(models: Vec<Model>) -> Result<Vec<Workout>, DomainError> {
    models.into_iter().map(to_domain).collect()
}

/// Matches an id inside a `;`-separated list column.
fn list_contains(column: Column, id: Uuid) -> Condition {
    Condition::all().add(column.contains(id.to_string()))
}

#[async_trait]
impl<'c, C> Repository<Workout> for SeaOrmWorkoutRepository<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Workout>, DomainError> {
        WorkoutEntity::find_by_id(id.to_string())
            .one(self.conn)
            .await?
            .map(to_domain)
            .transpose()
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Workout>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let workouts = WorkoutEntity::find()
            .filter(Column::Id.is_in(ids_to_strings(ids)))
            .all(self.conn)
            .await?;

        to_domain_all(workouts)
    }

    async fn find_all(&self) -> Result<Vec<Workout>, DomainError> {
        let workouts = WorkoutEntity::find()
            .order_by_asc(Column::Name)
            .all(self.conn)
            .await?;

        to_domain_all(workouts)
    }

    async fn create(&self, workout: &Workout) -> Result<(), DomainError> {
        WorkoutEntity::insert(to_active(workout))
            .exec(self.conn)
            .await?;
        Ok(())
    }

    async fn update(&self, workout: &Workout) -> Result<(), DomainError> {
        update_result(to_active(workout).update(self.conn).await)
    }

    async fn kill(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = WorkoutEntity::delete_by_id(id.to_string())
            .exec(self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl<'c, C> WorkoutRepository for SeaOrmWorkoutRepository<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_for_user(&self, user_id: Uuid) -> Result<Vec<Workout>, DomainError> {
        let workouts = WorkoutEntity::find()
            .filter(
                Condition::any()
                    .add(list_contains(Column::CreatedForUserIds, user_id))
                    .add(Column::CreatedBy.eq(user_id.to_string())),
            )
            .order_by_asc(Column::Name)
            .all(self.conn)
            .await?;

        to_domain_all(workouts)
    }

    async fn find_shared_with(
        &self,
        user_id: Uuid,
        workout_id: Option<Uuid>,
    ) -> Result<Vec<Workout>, DomainError> {
        let mut query =
            WorkoutEntity::find().filter(list_contains(Column::CreatedForUserIds, user_id));

        if let Some(workout_id) = workout_id {
            query = query.filter(Column::Id.eq(workout_id.to_string()));
        }

        let workouts = query.order_by_asc(Column::Name).all(self.conn).await?;

        to_domain_all(workouts)
    }

    async fn find_by_name(&self, user_id: Uuid, name: &str) -> Result<Vec<Workout>, DomainError> {
        let needle = fold_for_search(name.trim());

        // Accent folding is not available in SQLite, filter after the fetch.
        let workouts = self.find_shared_with(user_id, None).await?;

        Ok(workouts
            .into_iter()
            .filter(|w| fold_for_search(&w.name).contains(&needle))
            .collect())
    }
}
