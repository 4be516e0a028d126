use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // A table can be held by at most one reservation per slot
        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_slot_table")
                    .table(Reservations::Table)
                    .col(Reservations::TimeSlot)
                    .col(Reservations::TableNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index on reservations.customer_id for faster joins
        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_customer_id")
                    .table(Reservations::Table)
                    .col(Reservations::CustomerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_waitlist_time_slot")
                    .table(Waitlist::Table)
                    .col(Waitlist::TimeSlot)
                    .col(Waitlist::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_waitlist_time_slot")
                    .table(Waitlist::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_reservations_customer_id")
                    .table(Reservations::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_reservations_slot_table")
                    .table(Reservations::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Reservations {
    Table,
    CustomerId,
    TimeSlot,
    TableNumber,
}

#[derive(Iden)]
enum Waitlist {
    Table,
    TimeSlot,
    CreatedAt,
}
