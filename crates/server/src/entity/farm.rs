use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "farm")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub farm_id: String,
    pub owner_name: String,
    #[sea_orm(column_type = "Text")]
    pub address: String,
    /// Destination for every farmer-facing notification.
    pub telephone_number: String,
    pub inseminator_id: Option<i32>,
    pub is_deleted: bool,
    pub doctor_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::inseminator::Entity",
        from = "Column::InseminatorId",
        to = "super::inseminator::Column::Id"
    )]
    Inseminator,
    #[sea_orm(
        belongs_to = "super::doctor::Entity",
        from = "Column::DoctorId",
        to = "super::doctor::Column::Id"
    )]
    Doctor,
}

impl Related<super::inseminator::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inseminator.def()
    }
}

impl Related<super::doctor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Doctor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
