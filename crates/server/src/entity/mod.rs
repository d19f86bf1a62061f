//! SeaORM entities for the farm schema created by the `migration` crate.

pub mod cow;
pub mod doctor;
pub mod farm;
pub mod inseminator;
pub mod medical_assessment;
pub mod medical_report;
pub mod message;
pub mod reproduction;
