//! Ledger entries table.
//!
//! One row per entry. Rows are only ever inserted; `updated_at` is store
//! bookkeeping and equals `created_at` for every row the engine writes.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum LedgerEntries {
    Table,
    Id,
    LedgerableType,
    LedgerableId,
    MoneyTo,
    MoneyFrom,
    Reason,
    Credit,
    Debit,
    Amount,
    CurrentBalance,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LedgerEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LedgerEntries::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LedgerEntries::LedgerableType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LedgerEntries::LedgerableId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LedgerEntries::MoneyTo).string())
                    .col(ColumnDef::new(LedgerEntries::MoneyFrom).string())
                    .col(ColumnDef::new(LedgerEntries::Reason).text())
                    .col(
                        ColumnDef::new(LedgerEntries::Credit)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(LedgerEntries::Debit)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(LedgerEntries::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LedgerEntries::CurrentBalance)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LedgerEntries::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LedgerEntries::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ledger_entries-ledgerable")
                    .table(LedgerEntries::Table)
                    .col(LedgerEntries::LedgerableType)
                    .col(LedgerEntries::LedgerableId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LedgerEntries::Table).to_owned())
            .await?;
        Ok(())
    }
}
