//! Services Layer
//!
//! One request type and one handler per use case, dispatched through the
//! [`Mediator`]. Handlers never see HTTP; they answer with a
//! [`ServiceResponse`] whose notifications the API layer maps to status codes.

pub mod auth_service;
pub mod exercise_service;
pub mod mediator;
pub mod response;
pub mod user_service;
pub mod validators;
pub mod workout_service;

// Re-export for convenience
pub use auth_service::{AuthResponse, LoginRequest, RefreshTokenRequest, RegisterRequest};
pub use exercise_service::{
    ExerciseResponse, FindExercisesRequest, FindMuscleGroupsRequest, MuscleGroupResponse,
};
pub use mediator::{HandlerContext, Mediator, Request, RequestHandler};
pub use response::ServiceResponse;
pub use user_service::{
    FindSelfRequest, FindUsersRequest, SelfResponse, UpdateUserRequest, UserResponse,
};
pub use validators::Validate;
pub use workout_service::{
    CreateWorkoutRequest, DeleteWorkoutRequest, FindWorkoutsRequest, UpdateWorkoutRequest,
    WorkoutExerciseRequest, WorkoutExerciseResponse, WorkoutResponse,
};

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use uuid::Uuid;

    use super::{HandlerContext, Mediator, RegisterRequest};
    use crate::auth::{JwtOptions, TokenService};
    use crate::domain::{Repositories, UnitOfWork, UserType};
    use crate::infrastructure::unit_of_work::SeaOrmUnitOfWork;
    use crate::infrastructure::{db, seed};

    pub fn jwt_options() -> JwtOptions {
        JwtOptions {
            key: "test-signing-key-with-at-least-32-chars".to_string(),
            issuer: "liftlog".to_string(),
            audience: "liftlog-clients".to_string(),
            expiration_days: 7,
        }
    }

    /// Mediator over a fresh in-memory database with reference data.
    pub async fn context() -> (Mediator, Arc<dyn UnitOfWork>) {
        let db = db::init_db("sqlite::memory:").await.unwrap();
        seed::seed_reference_data(&db).await.unwrap();

        let store: Arc<dyn UnitOfWork> = Arc::new(SeaOrmUnitOfWork::new(db));
        let mediator = Mediator::new(HandlerContext {
            store: store.clone(),
            tokens: Arc::new(TokenService::new(jwt_options())),
        });
        (mediator, store)
    }

    pub fn register_request(email: &str, cpf: &str) -> RegisterRequest {
        RegisterRequest {
            user_type: UserType::Student,
            first_name: "Ana".to_string(),
            last_name: "Souza".to_string(),
            cpf: cpf.to_string(),
            phone_number: "+55 (11) 91234-5678".to_string(),
            email: email.to_string(),
            password: "Str0ng!Passw".to_string(),
            teacher_id: None,
        }
    }

    /// Registers a user and returns their id.
    pub async fn register(mediator: &Mediator, first_name: &str, email: &str, cpf: &str) -> Uuid {
        let mut request = register_request(email, cpf);
        request.first_name = first_name.to_string();

        let response = mediator.send(request).await.unwrap();
        assert!(response.successful, "{:?}", response.errors);

        mediator
            .context()
            .store
            .users()
            .find_by_email(email)
            .await
            .unwrap()
            .unwrap()
            .id
    }

    pub async fn exercise_id<S: Repositories + ?Sized>(store: &S, name: &str) -> Uuid {
        store.exercises().find_by_name(name).await.unwrap().unwrap().id
    }
}
