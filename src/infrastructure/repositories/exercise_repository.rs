//! SeaORM implementation of ExerciseRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::{
    format_timestamp, ids_to_strings, join_ids, parse_id, parse_timestamp, split_ids,
    update_result,
};
use crate::domain::{DomainError, Exercise, ExerciseRepository, NotificationContext, Repository};
use crate::models::exercises::{ActiveModel, Column, Entity as ExerciseEntity, Model};

pub struct SeaOrmExerciseRepository<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> SeaOrmExerciseRepository<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }
}

fn to_domain(model: Model) -> Result<Exercise, DomainError> {
    Ok(Exercise {
        id: parse_id(&model.id)?,
        created_at_utc: parse_timestamp(&model.created_at_utc)?,
        updated_at_utc: parse_timestamp(&model.updated_at_utc)?,
        name: model.name,
        muscle_group_ids: split_ids(&model.muscle_group_ids)?,
        notifications: NotificationContext::new(),
    })
}

fn to_active(exercise: &Exercise) -> ActiveModel {
    ActiveModel {
        id: Set(exercise.id.to_string()),
        name: Set(exercise.name.clone()),
        muscle_group_ids: Set(join_ids(&exercise.muscle_group_ids)),
        created_at_utc: Set(format_timestamp(&exercise.created_at_utc)),
        updated_at_utc: Set(format_timestamp(&exercise.updated_at_utc)),
    }
}

fn to_domain_all(models: Vec<Model>) -> Result<Vec<Exercise>, DomainError> {
    models.into_iter().map(to_domain).collect()
}

#[async_trait]
impl<'c, C> Repository<Exercise> for SeaOrmExerciseRepository<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Exercise>, DomainError> {
        ExerciseEntity::find_by_id(id.to_string())
            .one(self.conn)
            .await?
            .map(to_domain)
            .transpose()
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Exercise>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let exercises = ExerciseEntity::find()
            .filter(Column::Id.is_in(ids_to_strings(ids)))
            .all(self.conn)
            .await?;

        to_domain_all(exercises)
    }

    async fn find_all(&self) -> Result<Vec<Exercise>, DomainError> {
        let exercises = ExerciseEntity::find()
            .order_by_asc(Column::Name)
            .all(self.conn)
            .await?;

        to_domain_all(exercises)
    }

    async fn create(&self, exercise: &Exercise) -> Result<(), DomainError> {
        ExerciseEntity::insert(to_active(exercise))
            .exec(self.conn)
            .await?;
        Ok(())
    }

    async fn update(&self, exercise: &Exercise) -> Result<(), DomainError> {
        update_result(to_active(exercise).update(self.conn).await)
    }

    async fn kill(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = ExerciseEntity::delete_by_id(id.to_string())
            .exec(self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl<'c, C> ExerciseRepository for SeaOrmExerciseRepository<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_by_muscle_group(&self, muscle_group_id: Uuid) -> Result<Vec<Exercise>, DomainError> {
        let exercises = ExerciseEntity::find()
            .filter(Column::MuscleGroupIds.contains(muscle_group_id.to_string()))
            .order_by_asc(Column::Name)
            .all(self.conn)
            .await?;

        to_domain_all(exercises)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Exercise>, DomainError> {
        ExerciseEntity::find()
            .filter(Column::Name.eq(name))
            .one(self.conn)
            .await?
            .map(to_domain)
            .transpose()
    }
}
