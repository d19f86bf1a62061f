use sea_orm::entity::prelude::*;
use serde::Serialize;
use time::Date;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "cow")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub farm_id: String,
    /// Farm-local tag; unique only together with `farm_id`.
    pub cow_id: String,
    pub lactation_number: i32,
    pub number_of_inseminations: i32,
    pub is_deleted: bool,
    pub last_calving_date: Option<Date>,
}

impl Model {
    /// Lactation number as printed in SMS bodies; a cow with no recorded
    /// lactation is reported as being in her first.
    pub fn reported_lactation(&self) -> i32 {
        if self.lactation_number > 0 {
            self.lactation_number
        } else {
            1
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::farm::Entity",
        from = "Column::FarmId",
        to = "super::farm::Column::FarmId"
    )]
    Farm,
}

impl Related<super::farm::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Farm.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
