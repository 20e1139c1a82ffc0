use sea_orm::entity::prelude::*;

/// SeaORM entity for the content_types registry table
///
/// key_variant persists the storage variant chosen at registration; see
/// KeyVariant::from_code for the code table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "content_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub key_variant: i16,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
