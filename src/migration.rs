//! Database schema.
//!
//! One migration creates every table in the admin surface. Cascade behavior
//! is declared here rather than left to convention: records owned by an
//! organization go away with it, while `organizations.owner_id` and
//! `subscriptions.plan_id` restrict deletion of a user/plan still in use,
//! and nullable customer references are cleared when the customer goes.

use sea_orm_migration::{prelude::*, schema::*};

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20260701_000001_create_admin_tables::Migration)]
    }
}

mod m20260701_000001_create_admin_tables {
    use super::*;

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
                        .col(string(Users::Id).primary_key())
                        .col(string_uniq(Users::Email))
                        .col(string(Users::PasswordHash))
                        .col(string_null(Users::Name))
                        .col(string(Users::Role))
                        .col(timestamp_with_time_zone(Users::CreatedAt))
                        .col(timestamp_with_time_zone(Users::UpdatedAt))
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Organizations::Table)
                        .if_not_exists()
                        .col(string(Organizations::Id).primary_key())
                        .col(string(Organizations::Name))
                        .col(string_uniq(Organizations::Slug))
                        .col(string(Organizations::OwnerId))
                        .col(timestamp_with_time_zone(Organizations::CreatedAt))
                        .col(timestamp_with_time_zone(Organizations::UpdatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_organizations_owner")
                                .from(Organizations::Table, Organizations::OwnerId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_organizations_owner")
                        .table(Organizations::Table)
                        .col(Organizations::OwnerId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Plans::Table)
                        .if_not_exists()
                        .col(string(Plans::Id).primary_key())
                        .col(string(Plans::Name))
                        .col(string(Plans::PlanType))
                        .col(double(Plans::Price))
                        .col(string(Plans::Currency))
                        .col(string(Plans::Interval))
                        .col(json_null(Plans::Features))
                        .col(timestamp_with_time_zone(Plans::CreatedAt))
                        .col(timestamp_with_time_zone(Plans::UpdatedAt))
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Subscriptions::Table)
                        .if_not_exists()
                        .col(string(Subscriptions::Id).primary_key())
                        .col(string(Subscriptions::OrganizationId))
                        .col(string(Subscriptions::PlanId))
                        .col(string(Subscriptions::Status))
                        .col(timestamp_with_time_zone(Subscriptions::CurrentPeriodStart))
                        .col(timestamp_with_time_zone(Subscriptions::CurrentPeriodEnd))
                        .col(string_null(Subscriptions::ExternalId))
                        .col(timestamp_with_time_zone(Subscriptions::CreatedAt))
                        .col(timestamp_with_time_zone(Subscriptions::UpdatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_subscriptions_organization")
                                .from(Subscriptions::Table, Subscriptions::OrganizationId)
                                .to(Organizations::Table, Organizations::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_subscriptions_plan")
                                .from(Subscriptions::Table, Subscriptions::PlanId)
                                .to(Plans::Table, Plans::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Customers::Table)
                        .if_not_exists()
                        .col(string(Customers::Id).primary_key())
                        .col(string(Customers::OrganizationId))
                        .col(string(Customers::Email))
                        .col(string_null(Customers::Name))
                        .col(string_null(Customers::ExternalId))
                        .col(json_null(Customers::Metadata))
                        .col(timestamp_with_time_zone(Customers::CreatedAt))
                        .col(timestamp_with_time_zone(Customers::UpdatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_customers_organization")
                                .from(Customers::Table, Customers::OrganizationId)
                                .to(Organizations::Table, Organizations::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_customers_organization")
                        .table(Customers::Table)
                        .col(Customers::OrganizationId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(RevenueEvents::Table)
                        .if_not_exists()
                        .col(string(RevenueEvents::Id).primary_key())
                        .col(string(RevenueEvents::OrganizationId))
                        .col(string_null(RevenueEvents::CustomerId))
                        .col(double(RevenueEvents::Amount))
                        .col(string(RevenueEvents::Currency))
                        .col(string(RevenueEvents::EventType))
                        .col(string_null(RevenueEvents::Description))
                        .col(json_null(RevenueEvents::Metadata))
                        .col(timestamp_with_time_zone(RevenueEvents::EffectiveDate))
                        .col(timestamp_with_time_zone(RevenueEvents::CreatedAt))
                        .col(timestamp_with_time_zone(RevenueEvents::UpdatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_revenue_events_organization")
                                .from(RevenueEvents::Table, RevenueEvents::OrganizationId)
                                .to(Organizations::Table, Organizations::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_revenue_events_customer")
                                .from(RevenueEvents::Table, RevenueEvents::CustomerId)
                                .to(Customers::Table, Customers::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Invoices::Table)
                        .if_not_exists()
                        .col(string(Invoices::Id).primary_key())
                        .col(string(Invoices::OrganizationId))
                        .col(string_null(Invoices::CustomerId))
                        .col(string_uniq(Invoices::Number))
                        .col(double(Invoices::Amount))
                        .col(string(Invoices::Currency))
                        .col(string(Invoices::Status))
                        .col(timestamp_with_time_zone_null(Invoices::DueDate))
                        .col(timestamp_with_time_zone_null(Invoices::PaidAt))
                        .col(string_null(Invoices::ExternalId))
                        .col(json_null(Invoices::Metadata))
                        .col(timestamp_with_time_zone(Invoices::CreatedAt))
                        .col(timestamp_with_time_zone(Invoices::UpdatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_invoices_organization")
                                .from(Invoices::Table, Invoices::OrganizationId)
                                .to(Organizations::Table, Organizations::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_invoices_customer")
                                .from(Invoices::Table, Invoices::CustomerId)
                                .to(Customers::Table, Customers::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Integrations::Table)
                        .if_not_exists()
                        .col(string(Integrations::Id).primary_key())
                        .col(string(Integrations::OrganizationId))
                        .col(string(Integrations::IntegrationType))
                        .col(string(Integrations::Name))
                        .col(json_null(Integrations::Config))
                        .col(boolean(Integrations::IsActive).default(true))
                        .col(timestamp_with_time_zone(Integrations::CreatedAt))
                        .col(timestamp_with_time_zone(Integrations::UpdatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_integrations_organization")
                                .from(Integrations::Table, Integrations::OrganizationId)
                                .to(Organizations::Table, Organizations::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ApiKeys::Table)
                        .if_not_exists()
                        .col(string(ApiKeys::Id).primary_key())
                        .col(string(ApiKeys::OrganizationId))
                        .col(string(ApiKeys::Name))
                        .col(string(ApiKeys::KeyHash))
                        .col(string(ApiKeys::KeyPrefix))
                        .col(timestamp_with_time_zone_null(ApiKeys::LastUsedAt))
                        .col(timestamp_with_time_zone_null(ApiKeys::ExpiresAt))
                        .col(timestamp_with_time_zone(ApiKeys::CreatedAt))
                        .col(timestamp_with_time_zone(ApiKeys::UpdatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_api_keys_organization")
                                .from(ApiKeys::Table, ApiKeys::OrganizationId)
                                .to(Organizations::Table, Organizations::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(TeamMembers::Table)
                        .if_not_exists()
                        .col(string(TeamMembers::Id).primary_key())
                        .col(string(TeamMembers::UserId))
                        .col(string(TeamMembers::OrganizationId))
                        .col(string(TeamMembers::Role))
                        .col(timestamp_with_time_zone(TeamMembers::CreatedAt))
                        .col(timestamp_with_time_zone(TeamMembers::UpdatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_team_members_user")
                                .from(TeamMembers::Table, TeamMembers::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_team_members_organization")
                                .from(TeamMembers::Table, TeamMembers::OrganizationId)
                                .to(Organizations::Table, Organizations::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(UsageMetrics::Table)
                        .if_not_exists()
                        .col(string(UsageMetrics::Id).primary_key())
                        .col(string(UsageMetrics::OrganizationId))
                        .col(string(UsageMetrics::MetricType))
                        .col(double(UsageMetrics::Value))
                        .col(string(UsageMetrics::Period))
                        .col(json_null(UsageMetrics::Metadata))
                        .col(timestamp_with_time_zone(UsageMetrics::CreatedAt))
                        .col(timestamp_with_time_zone(UsageMetrics::UpdatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_usage_metrics_organization")
                                .from(UsageMetrics::Table, UsageMetrics::OrganizationId)
                                .to(Organizations::Table, Organizations::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_usage_metrics_organization")
                        .table(UsageMetrics::Table)
                        .col(UsageMetrics::OrganizationId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(UsageMetrics::Table).if_exists().to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(TeamMembers::Table).if_exists().to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ApiKeys::Table).if_exists().to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Integrations::Table).if_exists().to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Invoices::Table).if_exists().to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(RevenueEvents::Table).if_exists().to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Customers::Table).if_exists().to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Subscriptions::Table).if_exists().to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Plans::Table).if_exists().to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Organizations::Table).if_exists().to_owned())
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
        PasswordHash,
        Name,
        Role,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Organizations {
        Table,
        Id,
        Name,
        Slug,
        OwnerId,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Plans {
        Table,
        Id,
        Name,
        PlanType,
        Price,
        Currency,
        Interval,
        Features,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Subscriptions {
        Table,
        Id,
        OrganizationId,
        PlanId,
        Status,
        CurrentPeriodStart,
        CurrentPeriodEnd,
        ExternalId,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Customers {
        Table,
        Id,
        OrganizationId,
        Email,
        Name,
        ExternalId,
        Metadata,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum RevenueEvents {
        Table,
        Id,
        OrganizationId,
        CustomerId,
        Amount,
        Currency,
        EventType,
        Description,
        Metadata,
        EffectiveDate,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Invoices {
        Table,
        Id,
        OrganizationId,
        CustomerId,
        Number,
        Amount,
        Currency,
        Status,
        DueDate,
        PaidAt,
        ExternalId,
        Metadata,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Integrations {
        Table,
        Id,
        OrganizationId,
        IntegrationType,
        Name,
        Config,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum ApiKeys {
        Table,
        Id,
        OrganizationId,
        Name,
        KeyHash,
        KeyPrefix,
        LastUsedAt,
        ExpiresAt,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum TeamMembers {
        Table,
        Id,
        UserId,
        OrganizationId,
        Role,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum UsageMetrics {
        Table,
        Id,
        OrganizationId,
        MetricType,
        Value,
        Period,
        Metadata,
        CreatedAt,
        UpdatedAt,
    }
}
