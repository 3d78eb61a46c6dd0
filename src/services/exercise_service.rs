//! Exercise catalogue and muscle groups

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::mediator::{HandlerContext, Request, RequestHandler};
use super::response::ServiceResponse;
use super::validators::{self, Validate};
use crate::domain::formats::{fold_for_search, is_safe_for_sql_input};
use crate::domain::validation::Validator;
use crate::domain::{
    DomainError, Exercise, MuscleGroup, MuscleGroupParam, Notification, Repositories, UnitOfWork,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseResponse {
    pub id: Uuid,
    pub name: String,
    pub muscle_groups: Vec<String>,
}

impl ExerciseResponse {
    fn assemble(exercise: &Exercise, groups: &[MuscleGroup]) -> Self {
        Self {
            id: exercise.id,
            name: exercise.name.clone(),
            muscle_groups: exercise
                .muscle_group_ids
                .iter()
                .filter_map(|id| groups.iter().find(|g| g.id == *id))
                .map(|g| g.name.clone())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MuscleGroupResponse {
    pub id: Uuid,
    pub name: String,
}

impl From<&MuscleGroup> for MuscleGroupResponse {
    fn from(group: &MuscleGroup) -> Self {
        Self {
            id: group.id,
            name: group.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindExercisesRequest {
    /// Muscle group name or numeric code
    pub muscle: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FindMuscleGroupsRequest;

impl Validate for FindExercisesRequest {
    fn validate(&self) -> Result<(), Vec<Notification>> {
        let mut v = Validator::new();
        if let Some(muscle) = &self.muscle {
            v.must(
                MuscleGroupParam::parse(muscle).is_some(),
                "MuscleGroupParam must be a valid enum value when provided.",
            );
            v.must(
                is_safe_for_sql_input(muscle),
                "MuscleGroupParam contains invalid characters.",
            );
        }
        validators::optional_search(&mut v, self.search.as_deref());
        v.finish()
    }
}

impl Validate for FindMuscleGroupsRequest {
    fn validate(&self) -> Result<(), Vec<Notification>> {
        Ok(())
    }
}

impl Request for FindExercisesRequest {
    type Output = Vec<ExerciseResponse>;
    type Handler = FindExercisesHandler;
}

impl Request for FindMuscleGroupsRequest {
    type Output = Vec<MuscleGroupResponse>;
    type Handler = FindMuscleGroupsHandler;
}

pub struct FindExercisesHandler {
    store: Arc<dyn UnitOfWork>,
}

#[async_trait]
impl RequestHandler<FindExercisesRequest> for FindExercisesHandler {
    fn resolve(context: &HandlerContext) -> Self {
        Self {
            store: context.store.clone(),
        }
    }

    async fn handle(
        &self,
        request: FindExercisesRequest,
    ) -> Result<ServiceResponse<Vec<ExerciseResponse>>, DomainError> {
        let groups = self.store.muscle_groups().find_all().await?;

        let param = request.muscle.as_deref().and_then(MuscleGroupParam::parse);
        let exercises = match param {
            Some(param) => {
                let Some(group) = self.store.muscle_groups().find_by_name(param.as_str()).await?
                else {
                    return Ok(ServiceResponse::not_found(
                        "No muscle group found for provided query parameter",
                    ));
                };
                self.store.exercises().find_by_muscle_group(group.id).await?
            }
            None => self.store.exercises().find_all().await?,
        };

        let needle = validators::non_blank(request.search.as_deref()).map(fold_for_search);
        let mut response: Vec<ExerciseResponse> = exercises
            .iter()
            .filter(|e| {
                needle
                    .as_deref()
                    .is_none_or(|n| fold_for_search(&e.name).contains(n))
            })
            .map(|e| ExerciseResponse::assemble(e, &groups))
            .collect();
        response.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(ServiceResponse::success(response))
    }
}

pub struct FindMuscleGroupsHandler {
    store: Arc<dyn UnitOfWork>,
}

#[async_trait]
impl RequestHandler<FindMuscleGroupsRequest> for FindMuscleGroupsHandler {
    fn resolve(context: &HandlerContext) -> Self {
        Self {
            store: context.store.clone(),
        }
    }

    async fn handle(
        &self,
        _request: FindMuscleGroupsRequest,
    ) -> Result<ServiceResponse<Vec<MuscleGroupResponse>>, DomainError> {
        let groups = self.store.muscle_groups().find_all().await?;
        if groups.is_empty() {
            return Ok(ServiceResponse::operation("Error during query execution."));
        }

        let mut response: Vec<MuscleGroupResponse> =
            groups.iter().map(MuscleGroupResponse::from).collect();
        response.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(ServiceResponse::success(response))
    }
}
