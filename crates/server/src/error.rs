use axum::http::StatusCode;
use sea_orm::DbErr;
use thiserror::Error;

/// Failure while evaluating a single reproduction record.
///
/// These never escape a scheduling pass; they are logged and counted.
#[derive(Debug, Error)]
pub enum AlertError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    #[error("Farm {0} referenced by reproduction record does not exist")]
    MissingFarm(String),
    #[error("Cow {0} referenced by reproduction record does not exist")]
    MissingCow(i32),
}

/// Which kind of farm staff an operation refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StaffRole {
    Inseminator,
    Doctor,
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            StaffRole::Inseminator => "inseminator",
            StaffRole::Doctor => "doctor",
        })
    }
}

/// Failure while recording a field event reported through the API.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    #[error("Farm {0} not found")]
    FarmNotFound(String),
    #[error("Cow {cow_id} not found on farm {farm_id}")]
    CowNotFound { farm_id: String, cow_id: String },
    #[error("{role} with ID {id} not found")]
    StaffNotFound { role: StaffRole, id: i32 },
    #[error("{role} with ID {id} is not active")]
    StaffInactive { role: StaffRole, id: i32 },
    #[error("No doctor assigned to farm {0}")]
    NoDoctorAssigned(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl EventError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EventError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            EventError::FarmNotFound(_)
            | EventError::CowNotFound { .. }
            | EventError::StaffNotFound { .. } => StatusCode::NOT_FOUND,
            EventError::StaffInactive { .. }
            | EventError::NoDoctorAssigned(_)
            | EventError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        }
    }
}
