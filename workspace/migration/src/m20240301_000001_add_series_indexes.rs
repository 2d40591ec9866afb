use crate::entity_iden::EntityIden;
use model::entities::prelude::*;
use model::entities::transaction;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Series lookups fetch whole sibling sets by parent id.
        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_parent")
                    .table(Transaction::table())
                    .col(Transaction::column(transaction::Column::ParentTransactionId))
                    .to_owned(),
            )
            .await?;

        // Account pages and monthly summaries filter by account and date.
        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_account_date")
                    .table(Transaction::table())
                    .col(Transaction::column(transaction::Column::AccountId))
                    .col(Transaction::column(transaction::Column::Date))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_transactions_account_date")
                    .table(Transaction::table())
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_transactions_parent")
                    .table(Transaction::table())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
