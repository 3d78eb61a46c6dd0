use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_type: String,
    pub gender: Option<String>,
    pub height_unit: Option<String>,
    pub weight_unit: Option<String>,
    pub teacher_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub cpf: String,
    pub phone_number: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password: String,
    pub search_text: String,
    pub height: Option<f32>,
    pub weight: Option<f32>,
    pub created_at_utc: String,
    pub updated_at_utc: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::refresh_tokens::Entity")]
    RefreshToken,
}

impl Related<super::refresh_tokens::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RefreshToken.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
