use sea_orm::entity::prelude::*;

/// SeaORM entity for the login_events table
///
/// username is the attempted identity, kept even for failed logins where no
/// user ever resolved.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "login_events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub login_type: i16,
    pub username: Option<String>,
    pub user_id: Option<i64>,
    pub remote_ip: Option<String>,
    pub datetime: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
