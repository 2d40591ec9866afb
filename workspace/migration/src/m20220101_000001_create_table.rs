use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create accounts table
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(pk_auto(Accounts::Id))
                    .col(string(Accounts::Name))
                    .col(string(Accounts::Kind).string_len(20))
                    .col(big_integer(Accounts::BalanceCents).default(0))
                    .col(big_integer_null(Accounts::LimitCents))
                    .col(integer_null(Accounts::ClosingDay))
                    .col(integer_null(Accounts::DueDay))
                    .col(string(Accounts::Color))
                    .to_owned(),
            )
            .await?;

        // Create categories table
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(pk_auto(Categories::Id))
                    .col(string(Categories::Name).unique_key())
                    .col(string(Categories::Color))
                    .col(integer_null(Categories::ParentId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_category_parent")
                            .from(Categories::Table, Categories::ParentId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create transactions table. The parent and linked-transaction
        // columns are plain integers on purpose: a settled child may outlive
        // its principal, so these links are not constrained by foreign keys.
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(pk_auto(Transactions::Id))
                    .col(string(Transactions::Description))
                    .col(big_integer(Transactions::AmountCents))
                    .col(date(Transactions::Date))
                    .col(string(Transactions::Kind).string_len(10))
                    .col(string(Transactions::Status).string_len(10))
                    .col(integer(Transactions::AccountId))
                    .col(integer_null(Transactions::CategoryId))
                    .col(integer_null(Transactions::ParentTransactionId))
                    .col(integer_null(Transactions::InstallmentNumber))
                    .col(integer_null(Transactions::InstallmentCount))
                    .col(boolean(Transactions::IsFixed).default(false))
                    .col(integer_null(Transactions::ToAccountId))
                    .col(integer_null(Transactions::LinkedTransactionId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transaction_account")
                            .from(Transactions::Table, Transactions::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transaction_category")
                            .from(Transactions::Table, Transactions::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transaction_to_account")
                            .from(Transactions::Table, Transactions::ToAccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;

        Ok(())
    }
}

// Define identifiers for all tables

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Id,
    Name,
    Kind,
    BalanceCents,
    LimitCents,
    ClosingDay,
    DueDay,
    Color,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    Name,
    Color,
    ParentId,
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    Id,
    Description,
    AmountCents,
    Date,
    Kind,
    Status,
    AccountId,
    CategoryId,
    ParentTransactionId,
    InstallmentNumber,
    InstallmentCount,
    IsFixed,
    ToAccountId,
    LinkedTransactionId,
}
