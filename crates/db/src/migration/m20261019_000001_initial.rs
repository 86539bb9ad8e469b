//! Initial schema: users, game sessions, players and settlements.
//!
//! Money columns hold whole cents as BIGINT.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Email).string_len(255).not_null().unique_key())
                    .col(ColumnDef::new(Users::Username).string_len(64).not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Users::IsSuperuser).boolean().not_null().default(false))
                    .col(ColumnDef::new(Users::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GameSessions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GameSessions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(GameSessions::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(GameSessions::Title).string_len(255).not_null())
                    .col(ColumnDef::new(GameSessions::Description).text().null())
                    .col(
                        ColumnDef::new(GameSessions::GameDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameSessions::IsSettled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(GameSessions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameSessions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_sessions_owner")
                            .from(GameSessions::Table, GameSessions::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_game_sessions_owner_date")
                    .table(GameSessions::Table)
                    .col(GameSessions::OwnerId)
                    .col(GameSessions::GameDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Players::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Players::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Players::GameSessionId).uuid().not_null())
                    .col(ColumnDef::new(Players::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Players::BuyInMinor).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Players::CashOutMinor).big_integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Players::EntryMode)
                            .string_len(16)
                            .not_null()
                            .default("buyin-cashout"),
                    )
                    .col(ColumnDef::new(Players::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Players::UpdatedAt).timestamp_with_time_zone().not_null())
                    .check(Expr::col(Players::BuyInMinor).gte(0))
                    .check(Expr::col(Players::CashOutMinor).gte(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_players_game_session")
                            .from(Players::Table, Players::GameSessionId)
                            .to(GameSessions::Table, GameSessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_players_session_order")
                    .table(Players::Table)
                    .col(Players::GameSessionId)
                    .col(Players::CreatedAt)
                    .col(Players::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Settlements::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Settlements::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Settlements::GameSessionId).uuid().not_null())
                    .col(ColumnDef::new(Settlements::Position).integer().not_null())
                    .col(ColumnDef::new(Settlements::FromPlayer).string_len(255).not_null())
                    .col(ColumnDef::new(Settlements::ToPlayer).string_len(255).not_null())
                    .col(ColumnDef::new(Settlements::AmountMinor).big_integer().not_null())
                    .col(
                        ColumnDef::new(Settlements::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .check(Expr::col(Settlements::AmountMinor).gt(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_settlements_game_session")
                            .from(Settlements::Table, Settlements::GameSessionId)
                            .to(GameSessions::Table, GameSessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_settlements_session_position")
                    .table(Settlements::Table)
                    .col(Settlements::GameSessionId)
                    .col(Settlements::Position)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Settlements::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Players::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GameSessions::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    Username,
    PasswordHash,
    IsActive,
    IsSuperuser,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum GameSessions {
    Table,
    Id,
    OwnerId,
    Title,
    Description,
    GameDate,
    IsSettled,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Players {
    Table,
    Id,
    GameSessionId,
    Name,
    BuyInMinor,
    CashOutMinor,
    EntryMode,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Settlements {
    Table,
    Id,
    GameSessionId,
    Position,
    FromPlayer,
    ToPlayer,
    AmountMinor,
    CreatedAt,
}
