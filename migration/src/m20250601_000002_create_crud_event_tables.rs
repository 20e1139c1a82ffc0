use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One table per primary key shape, otherwise identical
        manager
            .create_table(crud_event_table(CrudEvents::Table.into_table_ref(), ColumnType::Integer))
            .await?;
        manager
            .create_table(crud_event_table(CrudEventsBigInteger::Table.into_table_ref(), ColumnType::BigInteger))
            .await?;
        manager
            .create_table(crud_event_table(CrudEventsUuid::Table.into_table_ref(), ColumnType::Uuid))
            .await?;

        for statement in crud_event_indexes("crud_events", CrudEvents::Table.into_table_ref())
            .into_iter()
            .chain(crud_event_indexes(
                "crud_events_big_integer",
                CrudEventsBigInteger::Table.into_table_ref(),
            ))
            .chain(crud_event_indexes(
                "crud_events_uuid",
                CrudEventsUuid::Table.into_table_ref(),
            ))
        {
            manager.create_index(statement).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CrudEventsUuid::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CrudEventsBigInteger::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CrudEvents::Table).to_owned())
            .await?;

        Ok(())
    }
}

fn crud_event_table(table: TableRef, object_id: ColumnType) -> TableCreateStatement {
    Table::create()
        .table(table)
        .if_not_exists()
        .col(ColumnDef::new(CrudEventCol::Id).big_integer().not_null().auto_increment().primary_key())
        .col(ColumnDef::new(CrudEventCol::EventType).small_integer().not_null())
        .col(ColumnDef::new(CrudEventCol::ContentTypeId).integer().not_null())
        .col(ColumnDef::new_with_type(CrudEventCol::ObjectId, object_id).not_null())
        .col(ColumnDef::new(CrudEventCol::ObjectRepr).text())
        .col(ColumnDef::new(CrudEventCol::ObjectJsonRepr).text())
        .col(ColumnDef::new(CrudEventCol::ChangedFields).text())
        .col(ColumnDef::new(CrudEventCol::UserId).big_integer())
        .col(ColumnDef::new(CrudEventCol::UserPkAsString).string())
        .col(ColumnDef::new(CrudEventCol::Datetime).timestamp_with_time_zone().not_null())
        .to_owned()
}

fn crud_event_indexes(table_name: &str, table: TableRef) -> Vec<IndexCreateStatement> {
    vec![
        // Lookups by audited row come through (object_id, content_type_id)
        Index::create()
            .name(format!("idx_{table_name}_object_id_content_type_id"))
            .table(table.clone())
            .col(CrudEventCol::ObjectId)
            .col(CrudEventCol::ContentTypeId)
            .to_owned(),
        Index::create()
            .name(format!("idx_{table_name}_user_id"))
            .table(table.clone())
            .col(CrudEventCol::UserId)
            .to_owned(),
        Index::create()
            .name(format!("idx_{table_name}_datetime"))
            .table(table)
            .col(CrudEventCol::Datetime)
            .to_owned(),
    ]
}

#[derive(DeriveIden)]
enum CrudEvents {
    Table,
}

#[derive(DeriveIden)]
enum CrudEventsBigInteger {
    Table,
}

#[derive(DeriveIden)]
enum CrudEventsUuid {
    Table,
}

#[derive(DeriveIden)]
enum CrudEventCol {
    Id,
    EventType,
    ContentTypeId,
    ObjectId,
    ObjectRepr,
    ObjectJsonRepr,
    ChangedFields,
    UserId,
    UserPkAsString,
    Datetime,
}
