use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_catalog_tables::Migration),
            Box::new(m20240301_000002_create_event_tables::Migration),
            Box::new(m20240301_000003_create_sales_tables::Migration),
        ]
    }
}

// Migration implementations

mod m20240301_000001_create_catalog_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000001_create_catalog_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Categories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Categories::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Categories::Name).string().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Products::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Products::Name).string().not_null())
                        .col(ColumnDef::new(Products::CategoryId).integer().not_null())
                        .col(
                            ColumnDef::new(Products::Price)
                                .decimal_len(10, 2)
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_category_id")
                                .from(Products::Table, Products::CategoryId)
                                .to(Categories::Table, Categories::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_products_category_id")
                        .table(Products::Table)
                        .col(Products::CategoryId)
                        .to_owned(),
                )
                .await?;

            // The bakery's category list is fixed; the original database
            // ships pre-seeded and exposes no category CRUD.
            let seed = Query::insert()
                .into_table(Categories::Table)
                .columns([Categories::Name])
                .values_panic(["Cookies".into()])
                .values_panic(["Bars".into()])
                .values_panic(["Breads".into()])
                .to_owned();
            manager.exec_stmt(seed).await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Categories::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Categories {
        Table,
        Id,
        Name,
    }

    #[derive(DeriveIden)]
    enum Products {
        Table,
        Id,
        Name,
        CategoryId,
        Price,
    }
}

mod m20240301_000002_create_event_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000002_create_event_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(EventTypes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(EventTypes::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(EventTypes::Name).string().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Events::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Events::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Events::Title).string().not_null())
                        .col(ColumnDef::new(Events::EventTypeId).integer().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_events_event_type_id")
                                .from(Events::Table, Events::EventTypeId)
                                .to(EventTypes::Table, EventTypes::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Schedules::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Schedules::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Schedules::EventId).integer().not_null())
                        .col(ColumnDef::new(Schedules::StartDate).date().not_null())
                        .col(ColumnDef::new(Schedules::EndDate).date().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_schedules_event_id")
                                .from(Schedules::Table, Schedules::EventId)
                                .to(Events::Table, Events::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_schedules_event_id")
                        .table(Schedules::Table)
                        .col(Schedules::EventId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Schedules::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Events::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(EventTypes::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum EventTypes {
        Table,
        Id,
        Name,
    }

    #[derive(DeriveIden)]
    enum Events {
        Table,
        Id,
        Title,
        EventTypeId,
    }

    #[derive(DeriveIden)]
    enum Schedules {
        Table,
        Id,
        EventId,
        StartDate,
        EndDate,
    }
}

mod m20240301_000003_create_sales_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000003_create_sales_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Transactions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Transactions::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Transactions::CustomerId).integer().not_null())
                        .col(ColumnDef::new(Transactions::EmployeeId).integer().not_null())
                        .col(ColumnDef::new(Transactions::ScheduleId).integer().not_null())
                        .col(
                            ColumnDef::new(Transactions::TotalCost)
                                .decimal_len(10, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Transactions::TransactionDate)
                                .date()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Transactions::CashAmount)
                                .decimal_len(10, 2)
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_transactions_transaction_date")
                        .table(Transactions::Table)
                        .col(Transactions::TransactionDate)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(OrderDetails::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OrderDetails::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(OrderDetails::TransactionId)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(OrderDetails::ProductId).integer().not_null())
                        .col(
                            ColumnDef::new(OrderDetails::Subtotal)
                                .decimal_len(10, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(OrderDetails::DiscountedPrice)
                                .decimal_len(10, 2)
                                .not_null(),
                        )
                        .col(ColumnDef::new(OrderDetails::Quantity).integer().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_order_details_transaction_id")
                                .from(OrderDetails::Table, OrderDetails::TransactionId)
                                .to(Transactions::Table, Transactions::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_order_details_transaction_id")
                        .table(OrderDetails::Table)
                        .col(OrderDetails::TransactionId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PaymentRecords::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PaymentRecords::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(PaymentRecords::TransactionId)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PaymentRecords::Method).integer().not_null())
                        .col(
                            ColumnDef::new(PaymentRecords::ReferenceNumber)
                                .string()
                                .null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_payment_records_transaction_id")
                                .from(PaymentRecords::Table, PaymentRecords::TransactionId)
                                .to(Transactions::Table, Transactions::Id),
                        )
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PaymentRecords::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(OrderDetails::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Transactions::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Transactions {
        Table,
        Id,
        CustomerId,
        EmployeeId,
        ScheduleId,
        TotalCost,
        TransactionDate,
        CashAmount,
    }

    #[derive(DeriveIden)]
    enum OrderDetails {
        Table,
        Id,
        TransactionId,
        ProductId,
        Subtotal,
        DiscountedPrice,
        Quantity,
    }

    #[derive(DeriveIden)]
    enum PaymentRecords {
        Table,
        Id,
        TransactionId,
        Method,
        ReferenceNumber,
    }
}
