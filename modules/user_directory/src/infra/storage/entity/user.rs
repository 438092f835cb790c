use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    /// `CONSULTANT` or `CLIENT`.
    pub user_type: String,
    pub phone: Option<String>,
    pub age: Option<String>,
    pub cpf: Option<String>,
    pub zip_code: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub complement: Option<String>,
    /// `name` after `fold_case`; searched instead of `name`.
    pub name_folded: String,
    pub email_folded: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
