use sea_orm::entity::prelude::*;
use serde::Serialize;
use time::OffsetDateTime;

/// A sickness the farmer observed and reported for the farm's doctor.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "medical_report")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub farm_id: String,
    pub cow_id: i32,
    #[sea_orm(column_type = "Text")]
    pub sickness_description: String,
    pub reported_date: OffsetDateTime,
    pub is_deleted: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cow::Entity",
        from = "Column::CowId",
        to = "super::cow::Column::Id"
    )]
    Cow,
}

impl Related<super::cow::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cow.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
