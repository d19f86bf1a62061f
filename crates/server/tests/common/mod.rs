//! Shared fixtures for integration tests: an in-memory schema, seed helpers
//! and a gateway that records what it was asked to send.
#![allow(dead_code)]

use farm_manager::AppResources;
use farm_manager::config::{AlertRulesConfig, AppConfig, SchedulerConfig, SmsConfig};
use farm_manager::entity::{cow, doctor, farm, inseminator, message, reproduction};
use farm_manager::sms::{DispatchOutcome, SmsGateway};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ConnectionTrait, Database, DatabaseConnection, DbBackend,
    EntityTrait, IntoActiveModel, QueryOrder, Statement,
};
use std::sync::{Arc, Mutex};
use time::{Date, OffsetDateTime};

const SCHEMA: [&str; 8] = [
    r#"CREATE TABLE inseminator (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        phone_number TEXT NOT NULL,
        address TEXT NOT NULL,
        is_active BOOLEAN NOT NULL DEFAULT 1,
        is_deleted BOOLEAN NOT NULL DEFAULT 0
    );"#,
    r#"CREATE TABLE farm (
        farm_id TEXT PRIMARY KEY,
        owner_name TEXT NOT NULL,
        address TEXT NOT NULL,
        telephone_number TEXT NOT NULL,
        inseminator_id INTEGER NULL,
        is_deleted BOOLEAN NOT NULL DEFAULT 0,
        doctor_id INTEGER NULL
    );"#,
    r#"CREATE TABLE cow (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        farm_id TEXT NOT NULL,
        cow_id TEXT NOT NULL,
        lactation_number INTEGER NOT NULL DEFAULT 0,
        number_of_inseminations INTEGER NOT NULL DEFAULT 0,
        is_deleted BOOLEAN NOT NULL DEFAULT 0,
        last_calving_date TEXT NULL,
        UNIQUE (farm_id, cow_id)
    );"#,
    r#"CREATE TABLE reproduction (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        farm_id TEXT NOT NULL,
        cow_id INTEGER NOT NULL,
        heat_sign_start TEXT NULL,
        heat_signs_seen TEXT NULL,
        heat_sign_recorded_at TEXT NULL,
        is_cow_pregnant BOOLEAN NOT NULL DEFAULT 0,
        pregnancy_date TEXT NULL,
        calving_date TEXT NULL,
        is_deleted BOOLEAN NOT NULL DEFAULT 0
    );"#,
    r#"CREATE TABLE message (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        farm_id TEXT NOT NULL,
        cow_id INTEGER NULL,
        message_text TEXT NOT NULL,
        message_type TEXT NOT NULL,
        sent_date TEXT NOT NULL,
        is_sent BOOLEAN NOT NULL DEFAULT 0,
        is_deleted BOOLEAN NOT NULL DEFAULT 0,
        dedup_key TEXT NULL UNIQUE
    );"#,
    r#"CREATE TABLE doctor (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        phone_number TEXT NOT NULL,
        address TEXT NOT NULL,
        is_active BOOLEAN NOT NULL DEFAULT 1,
        is_deleted BOOLEAN NOT NULL DEFAULT 0
    );"#,
    r#"CREATE TABLE medical_report (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        farm_id TEXT NOT NULL,
        cow_id INTEGER NOT NULL,
        sickness_description TEXT NOT NULL,
        reported_date TEXT NOT NULL,
        is_deleted BOOLEAN NOT NULL DEFAULT 0
    );"#,
    r#"CREATE TABLE medical_assessment (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        farm_id TEXT NOT NULL,
        cow_id INTEGER NOT NULL,
        doctor_id INTEGER NOT NULL,
        assessment_date TEXT NOT NULL,
        is_cow_sick BOOLEAN NOT NULL,
        has_lameness BOOLEAN NOT NULL DEFAULT 0,
        diagnosis TEXT NULL,
        treatment TEXT NULL,
        notes TEXT NULL,
        is_deleted BOOLEAN NOT NULL DEFAULT 0
    );"#,
];

pub async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");
    for ddl in SCHEMA {
        db.execute(Statement::from_string(DbBackend::Sqlite, ddl))
            .await
            .expect("create table");
    }
    db
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".into(),
        bind_address: "127.0.0.1:0".into(),
        sms: SmsConfig::default(),
        scheduler: SchedulerConfig::default(),
        alerts: AlertRulesConfig::default(),
    }
}

pub fn resources_with(db: DatabaseConnection, gateway: Arc<RecordingGateway>) -> AppResources {
    AppResources {
        db: Arc::new(db),
        gateway,
        config: Arc::new(test_config()),
    }
}

pub async fn create_test_resources() -> (AppResources, Arc<RecordingGateway>) {
    let gateway = Arc::new(RecordingGateway::succeeding());
    let resources = resources_with(create_test_db().await, gateway.clone());
    (resources, gateway)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentSms {
    pub phone_number: String,
    pub body: String,
}

/// Gateway double: remembers every send and answers with a configurable outcome.
#[derive(Debug)]
pub struct RecordingGateway {
    sent: Mutex<Vec<SentSms>>,
    outcome: Mutex<DispatchOutcome>,
}

impl RecordingGateway {
    pub fn succeeding() -> Self {
        Self::with_outcome(DispatchOutcome::Success {
            response: r#"{"acknowledge":"success"}"#.into(),
        })
    }

    pub fn with_outcome(outcome: DispatchOutcome) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            outcome: Mutex::new(outcome),
        }
    }

    pub fn set_outcome(&self, outcome: DispatchOutcome) {
        *self.outcome.lock().unwrap() = outcome;
    }

    pub fn sent(&self) -> Vec<SentSms> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SmsGateway for RecordingGateway {
    async fn send(&self, phone_number: &str, message: &str) -> DispatchOutcome {
        self.sent.lock().unwrap().push(SentSms {
            phone_number: phone_number.to_string(),
            body: message.to_string(),
        });
        self.outcome.lock().unwrap().clone()
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

pub fn network_error() -> DispatchOutcome {
    DispatchOutcome::NetworkError {
        message: "connection refused".into(),
    }
}

// -----------------------------------------------------------------------------
// Seed helpers
// -----------------------------------------------------------------------------

pub async fn insert_inseminator(
    db: &DatabaseConnection,
    name: &str,
    phone_number: &str,
    is_active: bool,
) -> inseminator::Model {
    inseminator::ActiveModel {
        id: ActiveValue::NotSet,
        name: ActiveValue::Set(name.into()),
        phone_number: ActiveValue::Set(phone_number.into()),
        address: ActiveValue::Set("Bishoftu".into()),
        is_active: ActiveValue::Set(is_active),
        is_deleted: ActiveValue::Set(false),
    }
    .insert(db)
    .await
    .expect("insert inseminator")
}

pub async fn insert_farm(
    db: &DatabaseConnection,
    farm_id: &str,
    telephone_number: &str,
    inseminator_id: Option<i32>,
) -> farm::Model {
    farm::ActiveModel {
        farm_id: ActiveValue::Set(farm_id.into()),
        owner_name: ActiveValue::Set("Abebe Kebede".into()),
        address: ActiveValue::Set("Debre Zeit".into()),
        telephone_number: ActiveValue::Set(telephone_number.into()),
        inseminator_id: ActiveValue::Set(inseminator_id),
        is_deleted: ActiveValue::Set(false),
        doctor_id: ActiveValue::Set(None),
    }
    .insert(db)
    .await
    .expect("insert farm")
}

pub async fn insert_doctor(
    db: &DatabaseConnection,
    name: &str,
    phone_number: &str,
    is_active: bool,
) -> doctor::Model {
    doctor::ActiveModel {
        id: ActiveValue::NotSet,
        name: ActiveValue::Set(name.into()),
        phone_number: ActiveValue::Set(phone_number.into()),
        address: ActiveValue::Set("Bishoftu".into()),
        is_active: ActiveValue::Set(is_active),
        is_deleted: ActiveValue::Set(false),
    }
    .insert(db)
    .await
    .expect("insert doctor")
}

pub async fn assign_doctor(
    db: &DatabaseConnection,
    farm: farm::Model,
    doctor_id: i32,
) -> farm::Model {
    let mut active = farm.into_active_model();
    active.doctor_id = ActiveValue::Set(Some(doctor_id));
    active.update(db).await.expect("assign doctor")
}

pub async fn insert_cow(
    db: &DatabaseConnection,
    farm_id: &str,
    tag: &str,
    lactation_number: i32,
) -> cow::Model {
    cow::ActiveModel {
        id: ActiveValue::NotSet,
        farm_id: ActiveValue::Set(farm_id.into()),
        cow_id: ActiveValue::Set(tag.into()),
        lactation_number: ActiveValue::Set(lactation_number),
        number_of_inseminations: ActiveValue::Set(0),
        is_deleted: ActiveValue::Set(false),
        last_calving_date: ActiveValue::Set(None),
    }
    .insert(db)
    .await
    .expect("insert cow")
}

pub async fn insert_heat_record(
    db: &DatabaseConnection,
    cow: &cow::Model,
    heat_sign_start: OffsetDateTime,
) -> reproduction::Model {
    reproduction::ActiveModel {
        id: ActiveValue::NotSet,
        farm_id: ActiveValue::Set(cow.farm_id.clone()),
        cow_id: ActiveValue::Set(cow.id),
        heat_sign_start: ActiveValue::Set(Some(heat_sign_start)),
        heat_signs_seen: ActiveValue::Set(Some("restless, mounting".into())),
        heat_sign_recorded_at: ActiveValue::Set(Some(heat_sign_start)),
        is_cow_pregnant: ActiveValue::Set(false),
        pregnancy_date: ActiveValue::Set(None),
        calving_date: ActiveValue::Set(None),
        is_deleted: ActiveValue::Set(false),
    }
    .insert(db)
    .await
    .expect("insert heat record")
}

pub async fn insert_pregnancy_record(
    db: &DatabaseConnection,
    cow: &cow::Model,
    calving_date: Date,
) -> reproduction::Model {
    reproduction::ActiveModel {
        id: ActiveValue::NotSet,
        farm_id: ActiveValue::Set(cow.farm_id.clone()),
        cow_id: ActiveValue::Set(cow.id),
        heat_sign_start: ActiveValue::Set(None),
        heat_signs_seen: ActiveValue::Set(None),
        heat_sign_recorded_at: ActiveValue::Set(None),
        is_cow_pregnant: ActiveValue::Set(true),
        pregnancy_date: ActiveValue::Set(Some(calving_date - time::Duration::days(283))),
        calving_date: ActiveValue::Set(Some(calving_date)),
        is_deleted: ActiveValue::Set(false),
    }
    .insert(db)
    .await
    .expect("insert pregnancy record")
}

/// Makes every later `UPDATE` of `message.is_sent` fail, as a lost connection
/// between send and confirm would.
pub async fn refuse_message_confirms(db: &DatabaseConnection) {
    db.execute(Statement::from_string(
        DbBackend::Sqlite,
        r#"CREATE TRIGGER refuse_confirm BEFORE UPDATE OF is_sent ON message
           BEGIN SELECT RAISE(ABORT, 'confirm refused'); END;"#,
    ))
    .await
    .expect("create trigger");
}

pub async fn all_messages(db: &DatabaseConnection) -> Vec<message::Model> {
    message::Entity::find()
        .order_by_asc(message::Column::Id)
        .all(db)
        .await
        .expect("list messages")
}
