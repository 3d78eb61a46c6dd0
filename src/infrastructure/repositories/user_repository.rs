//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::{
    format_timestamp, ids_to_strings, parse_id, parse_name, parse_optional_id,
    parse_optional_name, parse_timestamp, update_result,
};
use crate::domain::formats::fold_for_search;
use crate::domain::{DomainError, NotificationContext, Repository, User, UserRepository};
use crate::models::users::{ActiveModel, Column, Entity as UserEntity, Model};

pub struct SeaOrmUserRepository<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> SeaOrmUserRepository<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }
}

fn to_domain(model: Model) -> Result<User, DomainError> {
    Ok(User {
        id: parse_id(&model.id)?,
        created_at_utc: parse_timestamp(&model.created_at_utc)?,
        updated_at_utc: parse_timestamp(&model.updated_at_utc)?,
        user_type: parse_name(&model.user_type)?,
        gender: parse_optional_name(model.gender.as_deref())?,
        height_unit: parse_optional_name(model.height_unit.as_deref())?,
        weight_unit: parse_optional_name(model.weight_unit.as_deref())?,
        teacher_id: parse_optional_id(model.teacher_id.as_deref())?,
        first_name: model.first_name,
        last_name: model.last_name,
        cpf: model.cpf,
        phone_number: model.phone_number,
        email: model.email,
        password: model.password,
        search_text: model.search_text,
        height: model.height,
        weight: model.weight,
        notifications: NotificationContext::new(),
    })
}

fn to_active(user: &User) -> ActiveModel {
    ActiveModel {
        id: Set(user.id.to_string()),
        user_type: Set(user.user_type.to_string()),
        gender: Set(user.gender.map(|g| g.to_string())),
        height_unit: Set(user.height_unit.map(|u| u.to_string())),
        weight_unit: Set(user.weight_unit.map(|u| u.to_string())),
        teacher_id: Set(user.teacher_id.map(|id| id.to_string())),
        first_name: Set(user.first_name.clone()),
        last_name: Set(user.last_name.clone()),
        cpf: Set(user.cpf.clone()),
        phone_number: Set(user.phone_number.clone()),
        email: Set(user.email.clone()),
        password: Set(user.password.clone()),
        search_text: Set(user.search_text.clone()),
        height: Set(user.height),
        weight: Set(user.weight),
        created_at_utc: Set(format_timestamp(&user.created_at_utc)),
        updated_at_utc: Set(format_timestamp(&user.updated_at_utc)),
    }
}

fn to_domain_all(models: Vec<Model>) -> Result<Vec<User>, DomainError> {
    models.into_iter().map(to_domain).collect()
}

#[async_trait]
impl<'c, C> Repository<User> for SeaOrmUserRepository<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        UserEntity::find_by_id(id.to_string())
            .one(self.conn)
            .await?
            .map(to_domain)
            .transpose()
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = UserEntity::find()
            .filter(Column::Id.is_in(ids_to_strings(ids)))
            .all(self.conn)
            .await?;

        to_domain_all(users)
    }

    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        let users = UserEntity::find()
            .order_by_desc(Column::CreatedAtUtc)
            .all(self.conn)
            .await?;

        to_domain_all(users)
    }

    async fn create(&self, user: &User) -> Result<(), DomainError> {
        UserEntity::insert(to_active(user)).exec(self.conn).await?;
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        update_result(to_active(user).update(self.conn).await)
    }

    async fn kill(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = UserEntity::delete_by_id(id.to_string())
            .exec(self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl<'c, C> UserRepository for SeaOrmUserRepository<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn exists_with_email_or_cpf(&self, email: &str, cpf: &str) -> Result<bool, DomainError> {
        let count = UserEntity::find()
            .filter(
                Condition::any()
                    .add(Column::Email.eq(email))
                    .add(Column::Cpf.eq(cpf)),
            )
            .count(self.conn)
            .await?;

        Ok(count > 0)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        UserEntity::find()
            .filter(Column::Email.eq(email))
            .one(self.conn)
            .await?
            .map(to_domain)
            .transpose()
    }

    async fn find_by_cpf(&self, cpf: &str) -> Result<Option<User>, DomainError> {
        UserEntity::find()
            .filter(Column::Cpf.eq(cpf))
            .one(self.conn)
            .await?
            .map(to_domain)
            .transpose()
    }

    async fn find_all_except(&self, user_id: Uuid) -> Result<Vec<User>, DomainError> {
        let users = UserEntity::find()
            .filter(Column::Id.ne(user_id.to_string()))
            .order_by_desc(Column::CreatedAtUtc)
            .all(self.conn)
            .await?;

        to_domain_all(users)
    }

    async fn find_by_search(&self, search: &str) -> Result<Vec<User>, DomainError> {
        let mut terms: Vec<String> = search.split_whitespace().map(fold_for_search).collect();
        terms.sort();
        terms.dedup();

        if terms.is_empty() {
            return Ok(Vec::new());
        }

        // SQLite has no accent folding, so matching happens after the fetch.
        let users = self.find_all().await?;

        Ok(users
            .into_iter()
            .filter(|user| {
                let haystack = fold_for_search(&user.search_text);
                terms.iter().any(|term| haystack.contains(term.as_str()))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::hash_password;
    use crate::domain::{NewUser, UserType};
    use crate::infrastructure::db;

    fn user(first_name: &str, email: &str, cpf: &str) -> User {
        User::create(NewUser {
            user_type: UserType::Student,
            first_name: first_name.to_string(),
            last_name: "Souza".to_string(),
            cpf: cpf.to_string(),
            phone_number: "+55 (11) 91234-5678".to_string(),
            email: email.to_string(),
            password_hash: hash_password("Str0ng!Passw").unwrap(),
            teacher_id: None,
        })
    }

    #[tokio::test]
    async fn lookups_by_unique_fields() {
        let conn = db::init_db("sqlite::memory:").await.unwrap();
        let repo = SeaOrmUserRepository::new(&conn);
        let ana = user("Ana", "ana@liftlog.app", "529.982.247-25");
        repo.create(&ana).await.unwrap();

        assert!(repo.exists_with_email_or_cpf("other@liftlog.app", "529.982.247-25").await.unwrap());
        assert!(!repo.exists_with_email_or_cpf("other@liftlog.app", "111.444.777-35").await.unwrap());
        assert_eq!(repo.find_by_email("ana@liftlog.app").await.unwrap().unwrap().id, ana.id);
        assert_eq!(repo.find_by_cpf("529.982.247-25").await.unwrap().unwrap().id, ana.id);
        assert!(repo.find_all_except(ana.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_ignores_accents_and_case() {
        let conn = db::init_db("sqlite::memory:").await.unwrap();
        let repo = SeaOrmUserRepository::new(&conn);
        let joao = user("João", "joao@liftlog.app", "529.982.247-25");
        let maria = user("Maria", "maria@liftlog.app", "111.444.777-35");
        repo.create(&joao).await.unwrap();
        repo.create(&maria).await.unwrap();

        let found = repo.find_by_search("JOAO").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, joao.id);

        // Any term may match
        assert_eq!(repo.find_by_search("joao maria").await.unwrap().len(), 2);
        assert!(repo.find_by_search("   ").await.unwrap().is_empty());
    }
}
