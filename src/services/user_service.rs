//! Profile lookup and editing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::mediator::{
    HandlerContext, REQUESTER_NOT_FOUND, Request, RequestHandler, complete, find_requester,
};
use super::response::ServiceResponse;
use super::validators::{self, Validate};
use crate::domain::validation::Validator;
use crate::domain::{
    DomainError, Gender, HeightUnit, Notification, Repositories, SelfValidating, Transaction,
    UnitOfWork, User, UserChanges, UserType, WeightUnit,
};

/// The caller's own profile
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfResponse {
    pub id: Uuid,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
    #[serde(rename = "type")]
    pub user_type: UserType,
    pub gender: Option<Gender>,
    pub first_name: String,
    pub last_name: String,
    pub cpf: String,
    pub phone_number: String,
    pub email: String,
    pub height_unit: Option<HeightUnit>,
    pub height: Option<f32>,
    pub weight_unit: Option<WeightUnit>,
    pub weight: Option<f32>,
    pub teacher_id: Option<Uuid>,
}

impl From<&User> for SelfResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            created_at_utc: user.created_at_utc,
            updated_at_utc: user.updated_at_utc,
            user_type: user.user_type,
            gender: user.gender,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            cpf: user.cpf.clone(),
            phone_number: user.phone_number.clone(),
            email: user.email.clone(),
            height_unit: user.height_unit,
            height: user.height,
            weight_unit: user.weight_unit,
            weight: user.weight,
            teacher_id: user.teacher_id,
        }
    }
}

/// Another user as seen in listings
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
    #[serde(rename = "type")]
    pub user_type: UserType,
    pub gender: Option<Gender>,
    pub name: String,
    pub cpf: String,
    pub phone_number: String,
    pub email: String,
    pub height_unit: Option<HeightUnit>,
    pub height: Option<f32>,
    pub weight_unit: Option<WeightUnit>,
    pub weight: Option<f32>,
    pub teacher_id: Option<Uuid>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            created_at_utc: user.created_at_utc,
            updated_at_utc: user.updated_at_utc,
            user_type: user.user_type,
            gender: user.gender,
            name: user.full_name(),
            cpf: user.cpf.clone(),
            phone_number: user.phone_number.clone(),
            email: user.email.clone(),
            height_unit: user.height_unit,
            height: user.height,
            weight_unit: user.weight_unit,
            weight: user.weight,
            teacher_id: user.teacher_id,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FindSelfRequest {
    pub requested_by: Uuid,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindUsersRequest {
    pub id: Option<String>,
    pub search: Option<String>,
    #[serde(skip)]
    pub requested_by: Uuid,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(rename = "type")]
    pub user_type: Option<UserType>,
    pub gender: Option<Gender>,
    pub height_unit: Option<HeightUnit>,
    pub weight_unit: Option<WeightUnit>,
    pub teacher_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub cpf: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub height: Option<f32>,
    pub weight: Option<f32>,
    #[serde(skip)]
    pub requested_by: Uuid,
}

impl Validate for FindSelfRequest {
    fn validate(&self) -> Result<(), Vec<Notification>> {
        Ok(())
    }
}

impl Validate for FindUsersRequest {
    fn validate(&self) -> Result<(), Vec<Notification>> {
        let mut v = Validator::new();
        validators::optional_id(&mut v, "UserId", self.id.as_deref());
        validators::optional_search(&mut v, self.search.as_deref());
        v.finish()
    }
}

impl Validate for UpdateUserRequest {
    fn validate(&self) -> Result<(), Vec<Notification>> {
        let mut v = Validator::new();
        validators::optional_id(&mut v, "TeacherId", self.teacher_id.as_deref());
        if let Some(first_name) = &self.first_name {
            validators::person_name(&mut v, "FirstName", first_name);
        }
        if let Some(last_name) = &self.last_name {
            validators::person_name(&mut v, "LastName", last_name);
        }
        if let Some(cpf) = &self.cpf {
            validators::cpf(&mut v, cpf);
        }
        if let Some(phone_number) = &self.phone_number {
            validators::phone_number(&mut v, phone_number);
        }
        if let Some(email) = &self.email {
            validators::email(&mut v, email);
        }
        validators::measure(&mut v, "Height", self.height);
        validators::measure(&mut v, "Weight", self.weight);
        v.finish()
    }
}

impl Request for FindSelfRequest {
    type Output = SelfResponse;
    type Handler = FindSelfHandler;
}

impl Request for FindUsersRequest {
    type Output = Vec<UserResponse>;
    type Handler = FindUsersHandler;
}

impl Request for UpdateUserRequest {
    type Output = UserResponse;
    type Handler = UpdateUserHandler;
}

pub struct FindSelfHandler {
    store: Arc<dyn UnitOfWork>,
}

#[async_trait]
impl RequestHandler<FindSelfRequest> for FindSelfHandler {
    fn resolve(context: &HandlerContext) -> Self {
        Self {
            store: context.store.clone(),
        }
    }

    async fn handle(&self, request: FindSelfRequest) -> Result<ServiceResponse<SelfResponse>, DomainError> {
        let response = match find_requester(&*self.store, request.requested_by).await? {
            Some(user) => ServiceResponse::success(SelfResponse::from(&user)),
            None => ServiceResponse::not_found(REQUESTER_NOT_FOUND),
        };
        Ok(response)
    }
}

pub struct FindUsersHandler {
    store: Arc<dyn UnitOfWork>,
}

#[async_trait]
impl RequestHandler<FindUsersRequest> for FindUsersHandler {
    fn resolve(context: &HandlerContext) -> Self {
        Self {
            store: context.store.clone(),
        }
    }

    async fn handle(
        &self,
        request: FindUsersRequest,
    ) -> Result<ServiceResponse<Vec<UserResponse>>, DomainError> {
        let Some(requester) = find_requester(&*self.store, request.requested_by).await? else {
            return Ok(ServiceResponse::not_found(REQUESTER_NOT_FOUND));
        };

        let users = self.store.users();
        let found = if let Some(id) = validators::parse_optional_id(request.id.as_deref()) {
            if id == requester.id {
                Vec::new()
            } else {
                users.find_by_id(id).await?.into_iter().collect()
            }
        } else if let Some(search) = validators::non_blank(request.search.as_deref()) {
            users
                .find_by_search(search)
                .await?
                .into_iter()
                .filter(|u| u.id != requester.id)
                .collect()
        } else {
            users.find_all_except(requester.id).await?
        };

        if found.is_empty() {
            return Ok(ServiceResponse::not_found("No user found with given parameters."));
        }

        let mut response: Vec<UserResponse> = found.iter().map(UserResponse::from).collect();
        response.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(ServiceResponse::success(response))
    }
}

pub struct UpdateUserHandler {
    store: Arc<dyn UnitOfWork>,
}

#[async_trait]
impl RequestHandler<UpdateUserRequest> for UpdateUserHandler {
    fn resolve(context: &HandlerContext) -> Self {
        Self {
            store: context.store.clone(),
        }
    }

    async fn handle(
        &self,
        request: UpdateUserRequest,
    ) -> Result<ServiceResponse<UserResponse>, DomainError> {
        let Some(mut user) = find_requester(&*self.store, request.requested_by).await? else {
            return Ok(ServiceResponse::not_found(REQUESTER_NOT_FOUND));
        };

        if let Some(conflict) = self.find_conflict(&user, &request).await? {
            return Ok(ServiceResponse::operation(conflict));
        }

        user.update(UserChanges {
            user_type: request.user_type,
            gender: request.gender,
            height_unit: request.height_unit,
            weight_unit: request.weight_unit,
            teacher_id: validators::parse_optional_id(request.teacher_id.as_deref()),
            first_name: request.first_name,
            last_name: request.last_name,
            cpf: request.cpf,
            phone_number: request.phone_number,
            email: request.email,
            height: request.height,
            weight: request.weight,
        });

        if !user.is_valid() {
            return Ok(ServiceResponse::failure(user.notifications().to_vec()));
        }

        let txn = self.store.begin().await?;
        let outcome = save_user(&*txn, &user).await;
        Ok(complete(txn, outcome, "User updating attempt failed.").await)
    }
}

impl UpdateUserHandler {
    /// Email and cpf must stay unique across users.
    async fn find_conflict(
        &self,
        user: &User,
        request: &UpdateUserRequest,
    ) -> Result<Option<&'static str>, DomainError> {
        let users = self.store.users();

        if let Some(email) = validators::non_blank(request.email.as_deref())
            && email != user.email
            && users.find_by_email(email).await?.is_some()
        {
            return Ok(Some("A user already exists with given email."));
        }

        if let Some(cpf) = validators::non_blank(request.cpf.as_deref())
            && cpf != user.cpf
            && users.find_by_cpf(cpf).await?.is_some()
        {
            return Ok(Some("A user already exists with given cpf."));
        }

        Ok(None)
    }
}

async fn save_user(
    txn: &dyn Transaction,
    user: &User,
) -> Result<ServiceResponse<UserResponse>, DomainError> {
    txn.users().update(user).await?;
    Ok(ServiceResponse::success(UserResponse::from(user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{context, register};

    #[tokio::test]
    async fn find_users_excludes_the_requester_and_sorts_by_name() {
        let (mediator, _) = context().await;
        let ana = register(&mediator, "Ana", "ana@liftlog.app", "529.982.247-25").await;
        register(&mediator, "Bruno", "bruno@liftlog.app", "111.444.777-35").await;
        register(&mediator, "Alice", "alice@liftlog.app", "390.533.447-05").await;

        let response = mediator
            .send(FindUsersRequest {
                requested_by: ana,
                ..Default::default()
            })
            .await
            .unwrap();

        let names: Vec<_> = response.data.unwrap().into_iter().map(|u| u.name).collect();
        assert_eq!(names, vec!["Alice Souza", "Bruno Souza"]);
    }

    #[tokio::test]
    async fn find_users_by_search_ignores_accents() {
        let (mediator, _) = context().await;
        let ana = register(&mediator, "Ana", "ana@liftlog.app", "529.982.247-25").await;
        register(&mediator, "José", "jose@liftlog.app", "111.444.777-35").await;

        let response = mediator
            .send(FindUsersRequest {
                search: Some("jose".to_string()),
                requested_by: ana,
                ..Default::default()
            })
            .await
            .unwrap();

        let users = response.data.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "José Souza");
    }

    #[tokio::test]
    async fn looking_up_yourself_by_id_finds_nobody() {
        let (mediator, _) = context().await;
        let ana = register(&mediator, "Ana", "ana@liftlog.app", "529.982.247-25").await;

        let response = mediator
            .send(FindUsersRequest {
                id: Some(ana.to_string()),
                requested_by: ana,
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(!response.successful);
        assert_eq!(
            response.notifications()[0].message,
            "No user found with given parameters."
        );
    }

    #[tokio::test]
    async fn update_user_changes_profile() {
        let (mediator, _) = context().await;
        let ana = register(&mediator, "Ana", "ana@liftlog.app", "529.982.247-25").await;

        let response = mediator
            .send(UpdateUserRequest {
                last_name: Some("Lima".to_string()),
                weight: Some(61.5),
                gender: Some(Gender::Female),
                requested_by: ana,
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(response.successful);

        let me = mediator
            .send(FindSelfRequest { requested_by: ana })
            .await
            .unwrap()
            .data
            .unwrap();
        assert_eq!(me.last_name, "Lima");
        assert_eq!(me.weight, Some(61.5));
        assert_eq!(me.gender, Some(Gender::Female));
    }

    #[tokio::test]
    async fn update_user_rejects_taken_email() {
        let (mediator, _) = context().await;
        let ana = register(&mediator, "Ana", "ana@liftlog.app", "529.982.247-25").await;
        register(&mediator, "Bruno", "bruno@liftlog.app", "111.444.777-35").await;

        let response = mediator
            .send(UpdateUserRequest {
                email: Some("bruno@liftlog.app".to_string()),
                requested_by: ana,
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(!response.successful);
        assert!(response.notifications()[0].is("Operation"));
    }

    #[tokio::test]
    async fn unknown_requester_is_not_found() {
        let (mediator, _) = context().await;

        let response = mediator
            .send(FindSelfRequest {
                requested_by: Uuid::new_v4(),
            })
            .await
            .unwrap();

        assert_eq!(response.notifications()[0].message, REQUESTER_NOT_FOUND);
    }
}
