//! Workout queries and edits

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::mediator::{
    HandlerContext, REQUESTER_NOT_FOUND, Request, RequestHandler, complete, find_requester,
};
use super::response::ServiceResponse;
use super::validators::{self, Validate};
use crate::domain::formats::{ONLY_LETTERS_PATTERN, is_safe_for_sql_input};
use crate::domain::validation::{Rule, Validator};
use crate::domain::{
    DayOfWeek, DomainError, Exercise, Notification, Repositories, SelfValidating, Transaction,
    UnitOfWork, WeightUnit, Workout, WorkoutChanges, WorkoutExercise,
};

const WORKOUT_NOT_FOUND: &str = "Workout not found with provided in request.";
const CREATOR_ONLY: &str = "Only the creator of the workout can change it.";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutExerciseResponse {
    pub id: Uuid,
    pub name: String,
    pub weight_unit: WeightUnit,
    pub sets: i32,
    pub reps: i32,
    pub weight: f32,
}

impl From<&WorkoutExercise> for WorkoutExerciseResponse {
    fn from(exercise: &WorkoutExercise) -> Self {
        Self {
            id: exercise.id,
            name: exercise.exercise_name.clone(),
            weight_unit: exercise.weight_unit,
            sets: exercise.sets,
            reps: exercise.reps,
            weight: exercise.weight,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutResponse {
    pub id: Uuid,
    pub created_by: Uuid,
    pub updated_at_utc: DateTime<Utc>,
    pub name: String,
    pub day_of_week: DayOfWeek,
    pub exercises: Vec<WorkoutExerciseResponse>,
    pub has_access: Vec<Uuid>,
}

impl WorkoutResponse {
    /// Builds the response with the exercises in the order the workout lists them.
    fn assemble(workout: &Workout, exercises: &HashMap<Uuid, WorkoutExercise>) -> Self {
        Self {
            id: workout.id,
            created_by: workout.created_by,
            updated_at_utc: workout.updated_at_utc,
            name: workout.name.clone(),
            day_of_week: workout.day_of_week,
            exercises: workout
                .workout_exercise_ids
                .iter()
                .filter_map(|id| exercises.get(id))
                .map(WorkoutExerciseResponse::from)
                .collect(),
            has_access: workout.created_for_user_ids.clone(),
        }
    }
}

/// One exercise prescription in a create or update body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutExerciseRequest {
    pub id: Uuid,
    pub sets: i32,
    pub reps: i32,
    pub weight: f32,
    pub unit: WeightUnit,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindWorkoutsRequest {
    pub workout_id: Option<String>,
    pub search: Option<String>,
    #[serde(skip)]
    pub requested_by: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkoutRequest {
    pub name: String,
    pub day_of_week: DayOfWeek,
    #[serde(default)]
    pub exercises: Vec<WorkoutExerciseRequest>,
    #[serde(skip)]
    pub requested_by: Uuid,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkoutRequest {
    #[serde(skip)]
    pub id: Uuid,
    pub name: Option<String>,
    pub day_of_week: Option<DayOfWeek>,
    /// Prescriptions appended to the workout
    pub exercises: Option<Vec<WorkoutExerciseRequest>>,
    /// Workout exercise ids to drop
    pub remove_exercises: Option<Vec<Uuid>>,
    pub share_with: Option<Vec<Uuid>>,
    pub unshare: Option<Vec<Uuid>>,
    #[serde(skip)]
    pub requested_by: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct DeleteWorkoutRequest {
    pub id: Uuid,
    pub requested_by: Uuid,
}

fn workout_name(v: &mut Validator, name: &str) {
    v.text(name)
        .not_empty("Name is required.")
        .max_len(20, "Name must be up to 20 characters.")
        .matches(&ONLY_LETTERS_PATTERN, "Name contains invalid characters.")
        .must(is_safe_for_sql_input, "Name contains invalid characters.");
}

fn prescriptions(v: &mut Validator, exercises: &[WorkoutExerciseRequest]) {
    for exercise in exercises {
        v.must(!exercise.id.is_nil(), "Exercise Id must be a valid Guid.");
        validators::positive_count(v, "Sets", exercise.sets);
        validators::positive_count(v, "Reps", exercise.reps);
        v.check(
            exercise.weight.is_finite() && exercise.weight >= 0.0,
            Rule::GreaterThanOrEqual,
            "Weight must be a positive number.",
        );
    }
}

impl Validate for FindWorkoutsRequest {
    fn validate(&self) -> Result<(), Vec<Notification>> {
        let mut v = Validator::new();
        validators::optional_id(&mut v, "WorkoutId", self.workout_id.as_deref());
        validators::optional_search(&mut v, self.search.as_deref());
        v.finish()
    }
}

impl Validate for CreateWorkoutRequest {
    fn validate(&self) -> Result<(), Vec<Notification>> {
        let mut v = Validator::new();
        workout_name(&mut v, &self.name);
        v.check(
            !self.exercises.is_empty(),
            Rule::NotEmpty,
            "Exercises are required.",
        );
        prescriptions(&mut v, &self.exercises);
        v.finish()
    }
}

impl Validate for UpdateWorkoutRequest {
    fn validate(&self) -> Result<(), Vec<Notification>> {
        let mut v = Validator::new();
        v.check(!self.id.is_nil(), Rule::NotEmpty, "Workout id is required");
        if let Some(name) = &self.name {
            workout_name(&mut v, name);
        }
        if let Some(exercises) = &self.exercises {
            prescriptions(&mut v, exercises);
        }
        let users = self.share_with.iter().chain(self.unshare.iter()).flatten();
        for id in users {
            v.must(!id.is_nil(), "User Id must be a valid Guid.");
        }
        v.finish()
    }
}

impl Validate for DeleteWorkoutRequest {
    fn validate(&self) -> Result<(), Vec<Notification>> {
        let mut v = Validator::new();
        v.check(!self.id.is_nil(), Rule::NotEmpty, "Workout id is required");
        v.finish()
    }
}

impl Request for FindWorkoutsRequest {
    type Output = Vec<WorkoutResponse>;
    type Handler = FindWorkoutsHandler;
}

impl Request for CreateWorkoutRequest {
    type Output = WorkoutResponse;
    type Handler = CreateWorkoutHandler;
}

impl Request for UpdateWorkoutRequest {
    type Output = WorkoutResponse;
    type Handler = UpdateWorkoutHandler;
}

impl Request for DeleteWorkoutRequest {
    type Output = bool;
    type Handler = DeleteWorkoutHandler;
}

/// Loads the workout exercises of `workouts`, keyed by id.
async fn exercises_of<S>(
    store: &S,
    workouts: &[Workout],
) -> Result<HashMap<Uuid, WorkoutExercise>, DomainError>
where
    S: Repositories + ?Sized,
{
    let ids: Vec<Uuid> = workouts
        .iter()
        .flat_map(|w| w.workout_exercise_ids.iter().copied())
        .collect();

    Ok(store
        .workout_exercises()
        .find_by_ids(&ids)
        .await?
        .into_iter()
        .map(|e| (e.id, e))
        .collect())
}

fn join_missing(ids: &[Uuid]) -> String {
    ids.iter().map(Uuid::to_string).collect::<Vec<_>>().join(", ")
}

/// Resolves the catalogue exercises named by `requests` and builds one
/// workout exercise per entry. Unknown ids or invalid prescriptions come back
/// as a failed response.
async fn prescribe<S>(
    store: &S,
    created_by: Uuid,
    requests: &[WorkoutExerciseRequest],
) -> Result<Result<Vec<WorkoutExercise>, ServiceResponse<()>>, DomainError>
where
    S: Repositories + ?Sized,
{
    let mut wanted: Vec<Uuid> = requests.iter().map(|r| r.id).collect();
    wanted.dedup();

    let catalogue: HashMap<Uuid, Exercise> = store
        .exercises()
        .find_by_ids(&wanted)
        .await?
        .into_iter()
        .map(|e| (e.id, e))
        .collect();

    let mut missing: Vec<Uuid> = wanted
        .into_iter()
        .filter(|id| !catalogue.contains_key(id))
        .collect();
    if !missing.is_empty() {
        missing.sort();
        missing.dedup();
        return Ok(Err(ServiceResponse::not_found(format!(
            "Some exercises were not found: {}",
            join_missing(&missing)
        ))));
    }

    let mut created = Vec::with_capacity(requests.len());
    for request in requests {
        let Some(exercise) = catalogue.get(&request.id) else {
            continue;
        };
        let workout_exercise = WorkoutExercise::create(
            created_by,
            exercise.id,
            exercise.name.clone(),
            request.sets,
            request.reps,
            request.weight,
            request.unit,
        );
        if !workout_exercise.is_valid() {
            return Ok(Err(ServiceResponse::failure(
                workout_exercise.notifications().to_vec(),
            )));
        }
        created.push(workout_exercise);
    }

    Ok(Ok(created))
}

pub struct FindWorkoutsHandler {
    store: Arc<dyn UnitOfWork>,
}

#[async_trait]
impl RequestHandler<FindWorkoutsRequest> for FindWorkoutsHandler {
    fn resolve(context: &HandlerContext) -> Self {
        Self {
            store: context.store.clone(),
        }
    }

    async fn handle(
        &self,
        request: FindWorkoutsRequest,
    ) -> Result<ServiceResponse<Vec<WorkoutResponse>>, DomainError> {
        let Some(requester) = find_requester(&*self.store, request.requested_by).await? else {
            return Ok(ServiceResponse::not_found(REQUESTER_NOT_FOUND));
        };

        let repo = self.store.workouts();
        let workouts = if let Some(id) = validators::parse_optional_id(request.workout_id.as_deref())
        {
            repo.find_shared_with(requester.id, Some(id)).await?
        } else if let Some(search) = validators::non_blank(request.search.as_deref()) {
            repo.find_by_name(requester.id, search).await?
        } else {
            repo.find_for_user(requester.id).await?
        };

        if workouts.is_empty() {
            return Ok(ServiceResponse::not_found(
                "No workout found with given parameters.",
            ));
        }

        let exercises = exercises_of(&*self.store, &workouts).await?;
        Ok(ServiceResponse::success(
            workouts
                .iter()
                .map(|w| WorkoutResponse::assemble(w, &exercises))
                .collect(),
        ))
    }
}

pub struct CreateWorkoutHandler {
    store: Arc<dyn UnitOfWork>,
}

#[async_trait]
impl RequestHandler<CreateWorkoutRequest> for CreateWorkoutHandler {
    fn resolve(context: &HandlerContext) -> Self {
        Self {
            store: context.store.clone(),
        }
    }

    async fn handle(
        &self,
        request: CreateWorkoutRequest,
    ) -> Result<ServiceResponse<WorkoutResponse>, DomainError> {
        let Some(requester) = find_requester(&*self.store, request.requested_by).await? else {
            return Ok(ServiceResponse::not_found(REQUESTER_NOT_FOUND));
        };

        let exercises = match prescribe(&*self.store, requester.id, &request.exercises).await? {
            Ok(exercises) => exercises,
            Err(failure) => return Ok(failure.cast()),
        };

        let workout = Workout::create(
            requester.id,
            request.name,
            request.day_of_week,
            exercises.iter().map(|e| e.id).collect(),
            vec![requester.id],
        );
        if !workout.is_valid() {
            return Ok(ServiceResponse::failure(workout.notifications().to_vec()));
        }

        let txn = self.store.begin().await?;
        let outcome = create_workout(&*txn, &workout, &exercises).await;
        let response = complete(txn, outcome, "Workout creation attempt failed.").await;

        if response.successful {
            tracing::info!("Workout {} created by {}", workout.id, requester.id);
        }
        Ok(response)
    }
}

async fn create_workout(
    txn: &dyn Transaction,
    workout: &Workout,
    exercises: &[WorkoutExercise],
) -> Result<ServiceResponse<WorkoutResponse>, DomainError> {
    for exercise in exercises {
        txn.workout_exercises().create(exercise).await?;
    }
    txn.workouts().create(workout).await?;

    let by_id = exercises.iter().map(|e| (e.id, e.clone())).collect();
    Ok(ServiceResponse::success(WorkoutResponse::assemble(
        workout, &by_id,
    )))
}

pub struct UpdateWorkoutHandler {
    store: Arc<dyn UnitOfWork>,
}

/// Loads a workout the requester may edit: hidden workouts are reported as
/// missing, visible ones owned by someone else as forbidden.
async fn owned_workout<S>(
    store: &S,
    workout_id: Uuid,
    requester: Uuid,
) -> Result<Result<Workout, ServiceResponse<()>>, DomainError>
where
    S: Repositories + ?Sized,
{
    let workout = store
        .workouts()
        .find_by_id(workout_id)
        .await?
        .filter(|w| w.is_visible_to(requester));

    Ok(match workout {
        None => Err(ServiceResponse::not_found(WORKOUT_NOT_FOUND)),
        Some(w) if w.created_by != requester => Err(ServiceResponse::forbidden(CREATOR_ONLY)),
        Some(w) => Ok(w),
    })
}

#[async_trait]
impl RequestHandler<UpdateWorkoutRequest> for UpdateWorkoutHandler {
    fn resolve(context: &HandlerContext) -> Self {
        Self {
            store: context.store.clone(),
        }
    }

    async fn handle(
        &self,
        request: UpdateWorkoutRequest,
    ) -> Result<ServiceResponse<WorkoutResponse>, DomainError> {
        let Some(requester) = find_requester(&*self.store, request.requested_by).await? else {
            return Ok(ServiceResponse::not_found(REQUESTER_NOT_FOUND));
        };

        let mut workout = match owned_workout(&*self.store, request.id, requester.id).await? {
            Ok(workout) => workout,
            Err(failure) => return Ok(failure.cast()),
        };

        let added = match &request.exercises {
            Some(requests) => match prescribe(&*self.store, requester.id, requests).await? {
                Ok(added) => added,
                Err(failure) => return Ok(failure.cast()),
            },
            None => Vec::new(),
        };

        if let Some(share_with) = &request.share_with {
            let found = self.store.users().find_by_ids(share_with).await?;
            let mut missing: Vec<Uuid> = share_with
                .iter()
                .copied()
                .filter(|id| !found.iter().any(|u| u.id == *id))
                .collect();
            if !missing.is_empty() {
                missing.sort();
                missing.dedup();
                return Ok(ServiceResponse::not_found(format!(
                    "Some users were not found: {}",
                    join_missing(&missing)
                )));
            }
        }

        let removed: Vec<Uuid> = request
            .remove_exercises
            .unwrap_or_default()
            .into_iter()
            .filter(|id| workout.workout_exercise_ids.contains(id))
            .collect();

        workout.update(
            requester.id,
            WorkoutChanges {
                name: request.name,
                day_of_week: request.day_of_week,
                workout_exercise_ids: Some(added.iter().map(|e| e.id).collect()),
                created_for_user_ids: request.share_with,
            },
        );
        if !removed.is_empty() {
            workout.remove_workout_exercises(requester.id, &removed);
        }
        for user_id in request.unshare.unwrap_or_default() {
            workout.remove_user(requester.id, user_id);
        }

        if !workout.is_valid() {
            return Ok(ServiceResponse::failure(workout.notifications().to_vec()));
        }

        let txn = self.store.begin().await?;
        let outcome = update_workout(&*txn, &workout, &added, &removed).await;
        Ok(complete(txn, outcome, "Workout updating attempt failed.").await)
    }
}

async fn update_workout(
    txn: &dyn Transaction,
    workout: &Workout,
    added: &[WorkoutExercise],
    removed: &[Uuid],
) -> Result<ServiceResponse<WorkoutResponse>, DomainError> {
    for exercise in added {
        txn.workout_exercises().create(exercise).await?;
    }
    txn.workout_exercises().kill_many(removed).await?;
    txn.workouts().update(workout).await?;

    let exercises = exercises_of(txn, std::slice::from_ref(workout)).await?;
    Ok(ServiceResponse::success(WorkoutResponse::assemble(
        workout, &exercises,
    )))
}

pub struct DeleteWorkoutHandler {
    store: Arc<dyn UnitOfWork>,
}

#[async_trait]
impl RequestHandler<DeleteWorkoutRequest> for DeleteWorkoutHandler {
    fn resolve(context: &HandlerContext) -> Self {
        Self {
            store: context.store.clone(),
        }
    }

    async fn handle(&self, request: DeleteWorkoutRequest) -> Result<ServiceResponse<bool>, DomainError> {
        let Some(requester) = find_requester(&*self.store, request.requested_by).await? else {
            return Ok(ServiceResponse::not_found(REQUESTER_NOT_FOUND));
        };

        let workout = match owned_workout(&*self.store, request.id, requester.id).await? {
            Ok(workout) => workout,
            Err(failure) => return Ok(failure.cast()),
        };

        let txn = self.store.begin().await?;
        let outcome = delete_workout(&*txn, &workout).await;
        let response = complete(txn, outcome, "Workout deletion attempt failed.").await;

        if response.successful {
            tracing::info!("Workout {} deleted by {}", workout.id, requester.id);
        }
        Ok(response)
    }
}

async fn delete_workout(
    txn: &dyn Transaction,
    workout: &Workout,
) -> Result<ServiceResponse<bool>, DomainError> {
    txn.workout_exercises()
        .kill_many(&workout.workout_exercise_ids)
        .await?;
    let deleted = txn.workouts().kill(workout.id).await?;
    Ok(ServiceResponse::success(deleted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{context, exercise_id, register};

    fn bench(id: Uuid) -> WorkoutExerciseRequest {
        WorkoutExerciseRequest {
            id,
            sets: 4,
            reps: 8,
            weight: 60.0,
            unit: WeightUnit::Kilograms,
        }
    }

    #[test]
    fn create_request_rules() {
        let request = CreateWorkoutRequest {
            name: "Push Day 1".to_string(),
            day_of_week: DayOfWeek::Monday,
            exercises: vec![WorkoutExerciseRequest {
                id: Uuid::nil(),
                sets: 0,
                reps: 10,
                weight: -1.0,
                unit: WeightUnit::Kilograms,
            }],
            requested_by: Uuid::new_v4(),
        };

        let errors = request.validate().unwrap_err();
        let keys: Vec<_> = errors.iter().map(|n| (n.key.as_str(), n.message.as_str())).collect();

        assert!(keys.contains(&("RegularExpressionValidator", "Name contains invalid characters.")));
        assert!(keys.contains(&("PredicateValidator", "Exercise Id must be a valid Guid.")));
        assert!(keys.contains(&("GreaterThanValidator", "Sets must be a positive integer.")));
        assert!(keys.contains(&(
            "GreaterThanOrEqualValidator",
            "Weight must be a positive number."
        )));
    }

    #[tokio::test]
    async fn created_workout_is_found_with_ordered_exercises() {
        let (mediator, store) = context().await;
        let ana = register(&mediator, "Ana", "ana@liftlog.app", "529.982.247-25").await;
        let press = exercise_id(&*store, "Bench Press").await;
        let raise = exercise_id(&*store, "Lateral Raise").await;

        let created = mediator
            .send(CreateWorkoutRequest {
                name: "Push Day".to_string(),
                day_of_week: DayOfWeek::Monday,
                exercises: vec![bench(raise), bench(press)],
                requested_by: ana,
            })
            .await
            .unwrap();
        assert!(created.successful, "{:?}", created.errors);

        let found = mediator
            .send(FindWorkoutsRequest {
                search: Some("push".to_string()),
                requested_by: ana,
                ..Default::default()
            })
            .await
            .unwrap()
            .data
            .unwrap();

        assert_eq!(found.len(), 1);
        let names: Vec<_> = found[0].exercises.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Lateral Raise", "Bench Press"]);
        assert_eq!(found[0].has_access, vec![ana]);
    }

    #[tokio::test]
    async fn unknown_exercise_is_reported() {
        let (mediator, _) = context().await;
        let ana = register(&mediator, "Ana", "ana@liftlog.app", "529.982.247-25").await;
        let ghost = Uuid::new_v4();

        let response = mediator
            .send(CreateWorkoutRequest {
                name: "Legs".to_string(),
                day_of_week: DayOfWeek::Friday,
                exercises: vec![bench(ghost)],
                requested_by: ana,
            })
            .await
            .unwrap();

        assert!(response.notifications()[0].is("NotFound"));
        assert_eq!(
            response.notifications()[0].message,
            format!("Some exercises were not found: {}", ghost)
        );
    }

    #[tokio::test]
    async fn sharing_and_deleting_respect_ownership() {
        let (mediator, store) = context().await;
        let ana = register(&mediator, "Ana", "ana@liftlog.app", "529.982.247-25").await;
        let bruno = register(&mediator, "Bruno", "bruno@liftlog.app", "111.444.777-35").await;
        let press = exercise_id(&*store, "Bench Press").await;

        let workout = mediator
            .send(CreateWorkoutRequest {
                name: "Push Day".to_string(),
                day_of_week: DayOfWeek::Monday,
                exercises: vec![bench(press)],
                requested_by: ana,
            })
            .await
            .unwrap()
            .data
            .unwrap();

        let shared = mediator
            .send(UpdateWorkoutRequest {
                id: workout.id,
                share_with: Some(vec![bruno]),
                requested_by: ana,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(shared.data.unwrap().has_access, vec![ana, bruno]);

        let seen_by_bruno = mediator
            .send(FindWorkoutsRequest {
                workout_id: Some(workout.id.to_string()),
                requested_by: bruno,
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(seen_by_bruno.successful);

        let denied = mediator
            .send(DeleteWorkoutRequest {
                id: workout.id,
                requested_by: bruno,
            })
            .await
            .unwrap();
        assert!(denied.notifications()[0].is("Forbidden"));

        let deleted = mediator
            .send(DeleteWorkoutRequest {
                id: workout.id,
                requested_by: ana,
            })
            .await
            .unwrap();
        assert_eq!(deleted.data, Some(true));
        assert!(store.workout_exercises().find_all().await.unwrap().is_empty());

        let gone = mediator
            .send(FindWorkoutsRequest {
                requested_by: ana,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(
            gone.notifications()[0].message,
            "No workout found with given parameters."
        );
    }

    #[tokio::test]
    async fn update_appends_and_removes_exercises() {
        let (mediator, store) = context().await;
        let ana = register(&mediator, "Ana", "ana@liftlog.app", "529.982.247-25").await;
        let press = exercise_id(&*store, "Bench Press").await;
        let dip = exercise_id(&*store, "Triceps Pushdown").await;

        let workout = mediator
            .send(CreateWorkoutRequest {
                name: "Push Day".to_string(),
                day_of_week: DayOfWeek::Monday,
                exercises: vec![bench(press)],
                requested_by: ana,
            })
            .await
            .unwrap()
            .data
            .unwrap();
        let first = workout.exercises[0].id;

        let updated = mediator
            .send(UpdateWorkoutRequest {
                id: workout.id,
                name: Some("Chest Day".to_string()),
                day_of_week: Some(DayOfWeek::Tuesday),
                exercises: Some(vec![bench(dip)]),
                remove_exercises: Some(vec![first]),
                requested_by: ana,
                ..Default::default()
            })
            .await
            .unwrap()
            .data
            .unwrap();

        assert_eq!(updated.name, "Chest Day");
        assert_eq!(updated.day_of_week, DayOfWeek::Tuesday);
        let names: Vec<_> = updated.exercises.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Triceps Pushdown"]);
        assert_eq!(store.workout_exercises().find_all().await.unwrap().len(), 1);
    }
}
