//! Reproduction state per cow: last heat sign and pregnancy tracking.
//!
//! Written by the heat-sign and pregnancy endpoints, read by the scheduled
//! alert checks.

use sea_orm::entity::prelude::*;
use serde::Serialize;
use time::{Date, OffsetDateTime};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "reproduction")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub farm_id: String,
    /// Primary key of the cow row, not the farm-local tag.
    pub cow_id: i32,
    pub heat_sign_start: Option<OffsetDateTime>,
    #[sea_orm(column_type = "Text", nullable)]
    pub heat_signs_seen: Option<String>,
    pub heat_sign_recorded_at: Option<OffsetDateTime>,
    pub is_cow_pregnant: bool,
    pub pregnancy_date: Option<Date>,
    /// Expected calving date while `is_cow_pregnant` is set.
    pub calving_date: Option<Date>,
    pub is_deleted: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::farm::Entity",
        from = "Column::FarmId",
        to = "super::farm::Column::FarmId"
    )]
    Farm,
    #[sea_orm(
        belongs_to = "super::cow::Entity",
        from = "Column::CowId",
        to = "super::cow::Column::Id"
    )]
    Cow,
}

impl Related<super::farm::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Farm.def()
    }
}

impl Related<super::cow::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cow.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
