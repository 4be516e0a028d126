use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create customers table
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Customers::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Customers::Name).string().not_null())
                    .col(
                        ColumnDef::new(Customers::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Customers::Phone).string())
                    .col(
                        ColumnDef::new(Customers::Newsletter)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        // Create reservations table
        manager
            .create_table(
                Table::create()
                    .table(Reservations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reservations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reservations::CustomerId).uuid().not_null())
                    .col(
                        ColumnDef::new(Reservations::TimeSlot)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::TableNumber)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Reservations::PartySize).integer().not_null())
                    .col(
                        ColumnDef::new(Reservations::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-reservations-customer_id")
                            .from(Reservations::Table, Reservations::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create waitlist table
        manager
            .create_table(
                Table::create()
                    .table(Waitlist::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Waitlist::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Waitlist::CustomerId).uuid().not_null())
                    .col(ColumnDef::new(Waitlist::TimeSlot).date_time().not_null())
                    .col(ColumnDef::new(Waitlist::CreatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-waitlist-customer_id")
                            .from(Waitlist::Table, Waitlist::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order due to foreign key constraints
        manager
            .drop_table(Table::drop().table(Waitlist::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Reservations::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Customers {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Newsletter,
}

#[derive(Iden)]
enum Reservations {
    Table,
    Id,
    CustomerId,
    TimeSlot,
    TableNumber,
    PartySize,
    CreatedAt,
}

#[derive(Iden)]
enum Waitlist {
    Table,
    Id,
    CustomerId,
    TimeSlot,
    CreatedAt,
}
