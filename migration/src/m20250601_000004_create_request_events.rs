use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RequestEvents::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(RequestEvents::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(RequestEvents::Url).text().not_null())
                    .col(ColumnDef::new(RequestEvents::Method).string().not_null())
                    .col(ColumnDef::new(RequestEvents::QueryString).text())
                    .col(ColumnDef::new(RequestEvents::UserId).big_integer())
                    .col(ColumnDef::new(RequestEvents::RemoteIp).string())
                    .col(ColumnDef::new(RequestEvents::Datetime).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_request_events_method")
                    .table(RequestEvents::Table)
                    .col(RequestEvents::Method)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_request_events_remote_ip")
                    .table(RequestEvents::Table)
                    .col(RequestEvents::RemoteIp)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_request_events_user_id")
                    .table(RequestEvents::Table)
                    .col(RequestEvents::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_request_events_datetime")
                    .table(RequestEvents::Table)
                    .col(RequestEvents::Datetime)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RequestEvents::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum RequestEvents {
    Table,
    Id,
    Url,
    Method,
    QueryString,
    UserId,
    RemoteIp,
    Datetime,
}
