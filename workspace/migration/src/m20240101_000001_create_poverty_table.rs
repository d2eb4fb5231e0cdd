use model::entities::{poverty_count, prelude::PovertyCount};
use sea_orm_migration::prelude::*;

use crate::entity_iden::EntityIden;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create the wide poverty table: region id plus one column per year
        let mut table = Table::create();
        table
            .table(PovertyCount::table())
            .if_not_exists()
            .col(
                ColumnDef::new(PovertyCount::column(poverty_count::Column::Id))
                    .string()
                    .not_null()
                    .primary_key(),
            );

        for year_column in poverty_count::Column::years() {
            table.col(ColumnDef::new(PovertyCount::column(year_column)).double().null());
        }

        manager.create_table(table.to_owned()).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PovertyCount::table()).to_owned())
            .await
    }
}
