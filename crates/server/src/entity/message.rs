//! Audit log of every SMS the system attempted.
//!
//! Scheduled alerts additionally use this table as their dedup fence: a row
//! with `is_sent = true` of a given kind for a cow suppresses that alert for
//! the cooldown window, and `dedup_key` lets a run claim a same-day alert
//! atomically before dispatching it.

use sea_orm::entity::prelude::*;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "message")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub farm_id: String,
    pub cow_id: Option<i32>,
    #[sea_orm(column_type = "Text")]
    pub message_text: String,
    pub message_type: String, // see `MessageType::as_str`
    pub sent_date: OffsetDateTime,
    pub is_sent: bool,
    pub is_deleted: bool,
    #[sea_orm(unique)]
    pub dedup_key: Option<String>,
}

impl Model {
    /// Parsed `message_type`; rows with an unrecognised type read as `Other`.
    pub fn kind(&self) -> MessageType {
        self.message_type.parse().unwrap_or(MessageType::Other)
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

/// Kind of SMS stored in `message.message_type`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    HeatMonitoringAlert,
    #[serde(rename = "calving_2_months_alert")]
    Calving2MonthsAlert,
    #[serde(rename = "calving_1_month_alert")]
    Calving1MonthAlert,
    CalvingDueAlert,
    InseminationAlert,
    PregnancyUpdate,
    HealthAlert,
    FarmerAlert,
    DoctorConfirmation,
    BirthAlert,
    InseminatorAssignment,
    DoctorAssignment,
    Other,
}

impl MessageType {
    pub const fn as_str(self) -> &'static str {
        match self {
            MessageType::HeatMonitoringAlert => "heat_monitoring_alert",
            MessageType::Calving2MonthsAlert => "calving_2_months_alert",
            MessageType::Calving1MonthAlert => "calving_1_month_alert",
            MessageType::CalvingDueAlert => "calving_due_alert",
            MessageType::InseminationAlert => "insemination_alert",
            MessageType::PregnancyUpdate => "pregnancy_update",
            MessageType::HealthAlert => "health_alert",
            MessageType::FarmerAlert => "farmer_alert",
            MessageType::DoctorConfirmation => "doctor_confirmation",
            MessageType::BirthAlert => "birth_alert",
            MessageType::InseminatorAssignment => "inseminator_assignment",
            MessageType::DoctorAssignment => "doctor_assignment",
            MessageType::Other => "other",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "heat_monitoring_alert" => Ok(MessageType::HeatMonitoringAlert),
            "calving_2_months_alert" => Ok(MessageType::Calving2MonthsAlert),
            "calving_1_month_alert" => Ok(MessageType::Calving1MonthAlert),
            "calving_due_alert" => Ok(MessageType::CalvingDueAlert),
            "insemination_alert" => Ok(MessageType::InseminationAlert),
            "pregnancy_update" => Ok(MessageType::PregnancyUpdate),
            "health_alert" => Ok(MessageType::HealthAlert),
            "farmer_alert" => Ok(MessageType::FarmerAlert),
            "doctor_confirmation" => Ok(MessageType::DoctorConfirmation),
            "birth_alert" => Ok(MessageType::BirthAlert),
            "inseminator_assignment" => Ok(MessageType::InseminatorAssignment),
            "doctor_assignment" => Ok(MessageType::DoctorAssignment),
            "other" => Ok(MessageType::Other),
            other => Err(format!("unknown message type '{other}'")),
        }
    }
}
