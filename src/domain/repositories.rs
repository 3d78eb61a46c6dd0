//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;
use uuid::Uuid;

use super::DomainError;
use super::entities::{
    Exercise, ExerciseHistory, MuscleGroup, RefreshToken, User, Workout, WorkoutExercise,
    WorkoutHistory,
};

/// CRUD contract shared by every repository
#[async_trait]
pub trait Repository<T: Send + Sync + 'static>: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, DomainError>;

    /// Entities whose id is in `ids`; missing ids are skipped.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<T>, DomainError>;

    async fn find_all(&self) -> Result<Vec<T>, DomainError>;

    async fn create(&self, entity: &T) -> Result<(), DomainError>;

    /// Replaces the stored row; `DomainError::NotFound` when it does not exist.
    async fn update(&self, entity: &T) -> Result<(), DomainError>;

    /// Deletes by id. Returns whether a row was removed.
    async fn kill(&self, id: Uuid) -> Result<bool, DomainError>;
}

#[async_trait]
pub trait UserRepository: Repository<User> {
    async fn exists_with_email_or_cpf(&self, email: &str, cpf: &str) -> Result<bool, DomainError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    async fn find_by_cpf(&self, cpf: &str) -> Result<Option<User>, DomainError>;

    /// Everyone except `user_id`, newest first.
    async fn find_all_except(&self, user_id: Uuid) -> Result<Vec<User>, DomainError>;

    /// Users whose search text contains any whitespace-separated term of
    /// `search`, ignoring case and accents. Newest first.
    async fn find_by_search(&self, search: &str) -> Result<Vec<User>, DomainError>;
}

#[async_trait]
pub trait RefreshTokenRepository: Repository<RefreshToken> {
    /// Tokens of the user that are neither used nor revoked.
    async fn find_active_by_user(&self, user_id: Uuid) -> Result<Vec<RefreshToken>, DomainError>;

    async fn find_by_token(
        &self,
        user_id: Uuid,
        token: &str,
    ) -> Result<Option<RefreshToken>, DomainError>;
}

#[async_trait]
pub trait WorkoutRepository: Repository<Workout> {
    /// Workouts shared with or created by the user.
    async fn find_for_user(&self, user_id: Uuid) -> Result<Vec<Workout>, DomainError>;

    /// Workouts shared with the user, optionally narrowed to one id.
    async fn find_shared_with(
        &self,
        user_id: Uuid,
        workout_id: Option<Uuid>,
    ) -> Result<Vec<Workout>, DomainError>;

    /// Workouts shared with the user whose name contains `name`, ignoring
    /// case and accents.
    async fn find_by_name(&self, user_id: Uuid, name: &str) -> Result<Vec<Workout>, DomainError>;
}

#[async_trait]
pub trait WorkoutExerciseRepository: Repository<WorkoutExercise> {
    /// Deletes the given rows. Returns how many were removed.
    async fn kill_many(&self, ids: &[Uuid]) -> Result<u64, DomainError>;
}

#[async_trait]
pub trait ExerciseRepository: Repository<Exercise> {
    async fn find_by_muscle_group(&self, muscle_group_id: Uuid) -> Result<Vec<Exercise>, DomainError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Exercise>, DomainError>;
}

#[async_trait]
pub trait MuscleGroupRepository: Repository<MuscleGroup> {
    /// First group whose name contains `name`, ignoring case.
    async fn find_by_name(&self, name: &str) -> Result<Option<MuscleGroup>, DomainError>;
}

#[async_trait]
pub trait ExerciseHistoryRepository: Repository<ExerciseHistory> {
    /// Sets logged by the user, optionally for one exercise. Newest first.
    async fn find_by_creator(
        &self,
        user_id: Uuid,
        exercise_id: Option<Uuid>,
    ) -> Result<Vec<ExerciseHistory>, DomainError>;
}

#[async_trait]
pub trait WorkoutHistoryRepository: Repository<WorkoutHistory> {
    async fn find_by_creator(
        &self,
        user_id: Uuid,
        workout_id: Option<Uuid>,
    ) -> Result<Vec<WorkoutHistory>, DomainError>;
}

/// Access to every repository over one connection or transaction.
pub trait Repositories: Send + Sync {
    fn users(&self) -> Box<dyn UserRepository + '_>;
    fn refresh_tokens(&self) -> Box<dyn RefreshTokenRepository + '_>;
    fn workouts(&self) -> Box<dyn WorkoutRepository + '_>;
    fn workout_exercises(&self) -> Box<dyn WorkoutExerciseRepository + '_>;
    fn exercises(&self) -> Box<dyn ExerciseRepository + '_>;
    fn muscle_groups(&self) -> Box<dyn MuscleGroupRepository + '_>;
    fn exercise_history(&self) -> Box<dyn ExerciseHistoryRepository + '_>;
    fn workout_history(&self) -> Box<dyn WorkoutHistoryRepository + '_>;
}

/// Entry point of the persistence layer. Reads go through the plain
/// repositories; writes open a [`Transaction`].
#[async_trait]
pub trait UnitOfWork: Repositories {
    async fn begin(&self) -> Result<Box<dyn Transaction>, DomainError>;
}

/// Repositories bound to an open database transaction. Dropping the
/// transaction without committing rolls it back.
#[async_trait]
pub trait Transaction: Repositories {
    async fn commit(self: Box<Self>) -> Result<(), DomainError>;

    async fn rollback(self: Box<Self>) -> Result<(), DomainError>;
}
