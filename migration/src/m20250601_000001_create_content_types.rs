use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContentTypes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ContentTypes::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(ContentTypes::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(ContentTypes::KeyVariant).small_integer().not_null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ContentTypes::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum ContentTypes {
    Table,
    Id,
    Name,
    KeyVariant,
}
