use sea_orm::entity::prelude::*;

/// SeaORM entity for crud_events, the 32-bit integer key variant
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "crud_events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub event_type: i16,
    pub content_type_id: i32,
    pub object_id: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub object_repr: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub object_json_repr: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub changed_fields: Option<String>,
    pub user_id: Option<i64>,
    pub user_pk_as_string: Option<String>,
    pub datetime: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
