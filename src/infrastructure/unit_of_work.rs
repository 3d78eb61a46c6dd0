//! Unit of work over SeaORM connections and transactions

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use super::repositories::{
    SeaOrmExerciseHistoryRepository, SeaOrmExerciseRepository, SeaOrmMuscleGroupRepository,
    SeaOrmRefreshTokenRepository, SeaOrmUserRepository, SeaOrmWorkoutExerciseRepository,
    SeaOrmWorkoutHistoryRepository, SeaOrmWorkoutRepository,
};
use crate::domain::{
    DomainError, ExerciseHistoryRepository, ExerciseRepository, MuscleGroupRepository,
    RefreshTokenRepository, Repositories, Transaction, UnitOfWork, UserRepository,
    WorkoutExerciseRepository, WorkoutHistoryRepository, WorkoutRepository,
};

/// Implements [`Repositories`] for a type holding a connection field.
macro_rules! repositories_over {
    ($ty:ty, $field:ident) => {
        impl Repositories for $ty {
            fn users(&self) -> Box<dyn UserRepository + '_> {
                Box::new(SeaOrmUserRepository::new(&self.$field))
            }

            fn refresh_tokens(&self) -> Box<dyn RefreshTokenRepository + '_> {
                Box::new(SeaOrmRefreshTokenRepository::new(&self.$field))
            }

            fn workouts(&self) -> Box<dyn WorkoutRepository + '_> {
                Box::new(SeaOrmWorkoutRepository::new(&self.$field))
            }

            fn workout_exercises(&self) -> Box<dyn WorkoutExerciseRepository + '_> {
                Box::new(SeaOrmWorkoutExerciseRepository::new(&self.$field))
            }

            fn exercises(&self) -> Box<dyn ExerciseRepository + '_> {
                Box::new(SeaOrmExerciseRepository::new(&self.$field))
            }

            fn muscle_groups(&self) -> Box<dyn MuscleGroupRepository + '_> {
                Box::new(SeaOrmMuscleGroupRepository::new(&self.$field))
            }

            fn exercise_history(&self) -> Box<dyn ExerciseHistoryRepository + '_> {
                Box::new(SeaOrmExerciseHistoryRepository::new(&self.$field))
            }

            fn workout_history(&self) -> Box<dyn WorkoutHistoryRepository + '_> {
                Box::new(SeaOrmWorkoutHistoryRepository::new(&self.$field))
            }
        }
    };
}

#[derive(Clone)]
pub struct SeaOrmUnitOfWork {
    db: DatabaseConnection,
}

impl SeaOrmUnitOfWork {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub struct SeaOrmTransaction {
    txn: DatabaseTransaction,
}

repositories_over!(SeaOrmUnitOfWork, db);
repositories_over!(SeaOrmTransaction, txn);

#[async_trait]
impl UnitOfWork for SeaOrmUnitOfWork {
    async fn begin(&self) -> Result<Box<dyn Transaction>, DomainError> {
        let txn = self.db.begin().await?;
        Ok(Box::new(SeaOrmTransaction { txn }))
    }
}

#[async_trait]
impl Transaction for SeaOrmTransaction {
    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        self.txn.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), DomainError> {
        self.txn.rollback().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    use crate::domain::{MuscleGroup, Repository, WorkoutHistory};
    use crate::infrastructure::db;

    async fn store() -> SeaOrmUnitOfWork {
        SeaOrmUnitOfWork::new(db::init_db("sqlite::memory:").await.unwrap())
    }

    #[tokio::test]
    async fn committed_writes_are_visible() {
        let store = store().await;
        let group = MuscleGroup::create("Chest");

        let txn = store.begin().await.unwrap();
        txn.muscle_groups().create(&group).await.unwrap();
        txn.commit().await.unwrap();

        let found = store.muscle_groups().find_by_id(group.id).await.unwrap();
        assert_eq!(found.map(|g| g.name), Some("Chest".to_string()));
    }

    #[tokio::test]
    async fn rolled_back_writes_are_discarded() {
        let store = store().await;
        let group = MuscleGroup::create("Back");

        let txn = store.begin().await.unwrap();
        txn.muscle_groups().create(&group).await.unwrap();
        txn.rollback().await.unwrap();

        assert!(store.muscle_groups().find_by_id(group.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn dropped_transaction_rolls_back() {
        let store = store().await;
        let group = MuscleGroup::create("Neck");

        {
            let txn = store.begin().await.unwrap();
            txn.muscle_groups().create(&group).await.unwrap();
        }

        assert!(store.muscle_groups().find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn history_is_written_through_the_transaction() {
        let store = store().await;
        let athlete = Uuid::new_v4();
        let session = WorkoutHistory::create(athlete, Uuid::new_v4(), vec![Uuid::new_v4()]);

        let txn = store.begin().await.unwrap();
        txn.workout_history().create(&session).await.unwrap();
        txn.commit().await.unwrap();

        let sessions = store
            .workout_history()
            .find_by_creator(athlete, None)
            .await
            .unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, session.id);
    }
}
