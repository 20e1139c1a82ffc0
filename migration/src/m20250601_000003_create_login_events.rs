use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LoginEvents::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(LoginEvents::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(LoginEvents::LoginType).small_integer().not_null())
                    .col(ColumnDef::new(LoginEvents::Username).string())
                    .col(ColumnDef::new(LoginEvents::UserId).big_integer())
                    .col(ColumnDef::new(LoginEvents::RemoteIp).string())
                    .col(ColumnDef::new(LoginEvents::Datetime).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_login_events_remote_ip")
                    .table(LoginEvents::Table)
                    .col(LoginEvents::RemoteIp)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_login_events_user_id")
                    .table(LoginEvents::Table)
                    .col(LoginEvents::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_login_events_datetime")
                    .table(LoginEvents::Table)
                    .col(LoginEvents::Datetime)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LoginEvents::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum LoginEvents {
    Table,
    Id,
    LoginType,
    Username,
    UserId,
    RemoteIp,
    Datetime,
}
