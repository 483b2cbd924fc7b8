use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Invoice issued by an organization.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub organization_id: String,
    pub customer_id: Option<String>,

    /// Invoice number, globally unique.
    #[sea_orm(unique)]
    pub number: String,

    pub amount: f64,
    pub currency: String,

    /// "draft", "sent", "paid", "cancelled", or "overdue".
    pub status: String,

    pub due_date: Option<DateTimeUtc>,
    pub paid_at: Option<DateTimeUtc>,

    pub external_id: Option<String>,
    pub metadata: Option<Json>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::organization::Entity",
        from = "Column::OrganizationId",
        to = "super::organization::Column::Id"
    )]
    Organization,
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,
}

impl Related<super::organization::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organization.def()
    }
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
