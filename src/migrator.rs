use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_products::Migration),
            Box::new(m20250101_000002_create_orders::Migration),
            Box::new(m20250101_000003_create_order_items::Migration),
            Box::new(m20250101_000004_create_admin_users::Migration),
            Box::new(m20250101_000005_create_settings::Migration),
            Box::new(m20250101_000006_seed_defaults::Migration),
        ]
    }
}

mod m20250101_000001_create_products {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000001_create_products"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
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
                        .col(ColumnDef::new(Products::Price).decimal_len(10, 2).not_null())
                        .col(ColumnDef::new(Products::Weight).double().not_null())
                        .col(ColumnDef::new(Products::ImageUrl).string())
                        .col(
                            ColumnDef::new(Products::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Products {
        Table,
        Id,
        Name,
        Price,
        Weight,
        ImageUrl,
        CreatedAt,
    }
}

mod m20250101_000002_create_orders {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000002_create_orders"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Orders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Orders::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Orders::Code).string().not_null().unique_key())
                        .col(ColumnDef::new(Orders::CustomerName).string().not_null())
                        .col(ColumnDef::new(Orders::ContactNumber).string().not_null())
                        .col(ColumnDef::new(Orders::Address).string().not_null())
                        .col(ColumnDef::new(Orders::Postcode).string().not_null())
                        .col(ColumnDef::new(Orders::State).string().not_null())
                        .col(ColumnDef::new(Orders::Region).string().not_null())
                        .col(
                            ColumnDef::new(Orders::ShippingFee)
                                .decimal_len(10, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Orders::TotalPrice)
                                .decimal_len(10, 2)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Orders::Status).string().not_null())
                        .col(ColumnDef::new(Orders::PaymentMethod).string())
                        .col(ColumnDef::new(Orders::PaymentStatus).string().not_null())
                        .col(ColumnDef::new(Orders::PaymentReceipt).string())
                        .col(
                            ColumnDef::new(Orders::PaymentVerified)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Orders::PaymentVerifiedAt).timestamp_with_time_zone())
                        .col(ColumnDef::new(Orders::PaymentVerifiedBy).string())
                        .col(ColumnDef::new(Orders::TrackingNumber).string())
                        .col(
                            ColumnDef::new(Orders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(Orders::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_orders_code")
                        .table(Orders::Table)
                        .col(Orders::Code)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Orders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Orders {
        Table,
        Id,
        Code,
        CustomerName,
        ContactNumber,
        Address,
        Postcode,
        State,
        Region,
        ShippingFee,
        TotalPrice,
        Status,
        PaymentMethod,
        PaymentStatus,
        PaymentReceipt,
        PaymentVerified,
        PaymentVerifiedAt,
        PaymentVerifiedBy,
        TrackingNumber,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250101_000003_create_order_items {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000003_create_order_items"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(OrderItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OrderItems::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(OrderItems::OrderCode).string().not_null())
                        .col(ColumnDef::new(OrderItems::ProductId).integer().not_null())
                        .col(ColumnDef::new(OrderItems::ProductName).string().not_null())
                        .col(ColumnDef::new(OrderItems::Quantity).integer().not_null())
                        .col(
                            ColumnDef::new(OrderItems::Price)
                                .decimal_len(10, 2)
                                .not_null(),
                        )
                        .col(ColumnDef::new(OrderItems::Weight).double().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_order_items_order_code")
                        .table(OrderItems::Table)
                        .col(OrderItems::OrderCode)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(OrderItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum OrderItems {
        Table,
        Id,
        OrderCode,
        ProductId,
        ProductName,
        Quantity,
        Price,
        Weight,
    }
}

mod m20250101_000004_create_admin_users {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000004_create_admin_users"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(AdminUsers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(AdminUsers::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(AdminUsers::Username)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(AdminUsers::PasswordHash).string().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(AdminUsers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum AdminUsers {
        Table,
        Id,
        Username,
        PasswordHash,
    }
}

mod m20250101_000005_create_settings {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000005_create_settings"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Settings::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Settings::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Settings::Key).string().not_null().unique_key())
                        .col(ColumnDef::new(Settings::Value).string().not_null())
                        .col(ColumnDef::new(Settings::Description).string())
                        .col(
                            ColumnDef::new(Settings::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Settings::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Settings {
        Table,
        Id,
        Key,
        Value,
        Description,
        UpdatedAt,
    }
}

mod m20250101_000006_seed_defaults {
    use super::m20250101_000001_create_products::Products;
    use super::m20250101_000005_create_settings::Settings;
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000006_seed_defaults"
        }
    }

    const DEFAULT_SETTINGS: &[(&str, &str, &str)] = &[
        (
            "bank_account_name",
            "YOUR BANK ACCOUNT NAME",
            "Bank Account Holder Name",
        ),
        ("bank_account_number", "1234567890", "Bank Account Number"),
        ("bank_name", "MAYBANK", "Bank Name"),
        ("tng_phone_number", "+60123456789", "Touch 'n Go Phone Number"),
        (
            "whatsapp_message",
            "Hi {customer_name}, your order {order_id} is ready for payment of RM{total_price}. Please make payment via {payment_method} and upload receipt. Thank you!",
            "WhatsApp Message Template",
        ),
        ("admin_whatsapp_number", "+60123456789", "Admin WhatsApp Number"),
        (
            "shipping_message",
            "Hi {customer_name}, your order {order_id} has been shipped! Tracking number: {tracking_number}",
            "Shipping Notification Template",
        ),
        (
            "payment_instructions",
            "Please make payment and upload receipt. Once verified, we will ship your order.",
            "Payment Instructions",
        ),
    ];

    const DEFAULT_PRODUCTS: &[(&str, f64, f64)] = &[
        ("Chicken floss roll", 25.00, 0.33),
        ("Crispy crab stick", 16.00, 0.21),
        ("Crispy seaweed + chicken floss cracker", 16.00, 0.16),
        ("Crispy seaweed cracker", 10.00, 0.16),
        ("Crispy vegie snack", 12.00, 0.19),
        ("Homemade salted egg muruku", 28.00, 0.44),
        ("Low sugar twisted roll", 15.00, 0.28),
        ("Mild spicy crispy cracker", 20.00, 0.36),
        ("Peanut Cookies", 22.00, 0.32),
        ("Premium Choco Cookies", 22.00, 0.32),
        ("Scs pineapple roll", 22.00, 0.41),
        ("Soy chips original", 15.00, 0.23),
    ];

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            for (key, value, description) in DEFAULT_SETTINGS {
                let insert = Query::insert()
                    .into_table(Settings::Table)
                    .columns([Settings::Key, Settings::Value, Settings::Description])
                    .values_panic([(*key).into(), (*value).into(), (*description).into()])
                    .to_owned();
                manager.exec_stmt(insert).await?;
            }

            for (name, price, weight) in DEFAULT_PRODUCTS {
                let insert = Query::insert()
                    .into_table(Products::Table)
                    .columns([Products::Name, Products::Price, Products::Weight])
                    .values_panic([(*name).into(), (*price).into(), (*weight).into()])
                    .to_owned();
                manager.exec_stmt(insert).await?;
            }

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .exec_stmt(Query::delete().from_table(Settings::Table).to_owned())
                .await?;
            manager
                .exec_stmt(Query::delete().from_table(Products::Table).to_owned())
                .await?;
            Ok(())
        }
    }
}
