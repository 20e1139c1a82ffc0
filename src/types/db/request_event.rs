use sea_orm::entity::prelude::*;

/// SeaORM entity for the request_events table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "request_events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_type = "Text")]
    pub url: String,
    pub method: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub query_string: Option<String>,
    pub user_id: Option<i64>,
    pub remote_ip: Option<String>,
    pub datetime: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
