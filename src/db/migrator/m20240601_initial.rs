use crate::entities::prelude::*;
use crate::entities::{attendance, sessions};
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Users)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Sessions)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Depends on sessions for the cascading foreign key.
        manager
            .create_table(
                schema
                    .create_table_from_entity(Attendance)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // One response per user per session; attendance upserts target this index.
        manager
            .create_index(
                Index::create()
                    .name("idx_attendance_session_user")
                    .table(Attendance)
                    .col(attendance::Column::SessionId)
                    .col(attendance::Column::UserId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sessions_date")
                    .table(Sessions)
                    .col(sessions::Column::Date)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(RosterPlayers)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RosterPlayers).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Attendance).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sessions).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users).to_owned())
            .await?;

        Ok(())
    }
}
