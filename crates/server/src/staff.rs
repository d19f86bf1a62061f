//! Reassigning a farm's inseminator or doctor.
//!
//! The farm row is updated first; the outgoing and incoming staff (and, for
//! a doctor, the farmer) are texted after the change is committed.

use crate::AppResources;
use crate::entity::{doctor, farm, inseminator};
use crate::error::{EventError, StaffRole};
use crate::notifications::{StaffChangeNotifications, send_staff_change_notifications};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The parts of an inseminator or doctor a staff notice needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaffContact {
    pub id: i32,
    pub name: String,
    pub phone_number: String,
    pub is_active: bool,
}

impl From<inseminator::Model> for StaffContact {
    fn from(m: inseminator::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            phone_number: m.phone_number,
            is_active: m.is_active,
        }
    }
}

impl From<doctor::Model> for StaffContact {
    fn from(m: doctor::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            phone_number: m.phone_number,
            is_active: m.is_active,
        }
    }
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct StaffAssignmentInput {
    pub staff_id: i32,
}

#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct StaffChanged {
    pub farm_id: String,
    pub new_staff_id: i32,
    pub old_staff_id: Option<i32>,
    pub notifications_sent: StaffChangeNotifications,
}

/// Looks up a staff member that has not been deleted.
pub async fn find_staff<C: ConnectionTrait>(
    db: &C,
    role: StaffRole,
    id: i32,
) -> Result<Option<StaffContact>, DbErr> {
    Ok(match role {
        StaffRole::Inseminator => inseminator::Entity::find_by_id(id)
            .filter(inseminator::Column::IsDeleted.eq(false))
            .one(db)
            .await?
            .map(StaffContact::from),
        StaffRole::Doctor => doctor::Entity::find_by_id(id)
            .filter(doctor::Column::IsDeleted.eq(false))
            .one(db)
            .await?
            .map(StaffContact::from),
    })
}

fn assigned_id(farm: &farm::Model, role: StaffRole) -> Option<i32> {
    match role {
        StaffRole::Inseminator => farm.inseminator_id,
        StaffRole::Doctor => farm.doctor_id,
    }
}

/// Points the farm at a new inseminator or doctor and notifies everyone
/// involved. The outgoing staff member stays active; they may serve other
/// farms.
#[tracing::instrument(skip(resources))]
pub async fn change_staff(
    resources: &AppResources,
    farm_id: &str,
    role: StaffRole,
    staff_id: i32,
) -> Result<StaffChanged, EventError> {
    let txn = resources.db.begin().await?;
    let farm = farm::Entity::find_by_id(farm_id.to_string())
        .filter(farm::Column::IsDeleted.eq(false))
        .one(&txn)
        .await?
        .ok_or_else(|| EventError::FarmNotFound(farm_id.to_string()))?;

    let new_staff = find_staff(&txn, role, staff_id)
        .await?
        .ok_or(EventError::StaffNotFound { role, id: staff_id })?;
    if !new_staff.is_active {
        return Err(EventError::StaffInactive { role, id: staff_id });
    }

    let old_id = assigned_id(&farm, role);
    if old_id == Some(staff_id) {
        return Err(EventError::InvalidInput(format!(
            "{role} {staff_id} is already assigned to farm {farm_id}"
        )));
    }
    let old_staff = match old_id {
        Some(id) => find_staff(&txn, role, id).await?,
        None => None,
    };

    let mut active = farm.into_active_model();
    match role {
        StaffRole::Inseminator => active.inseminator_id = ActiveValue::Set(Some(staff_id)),
        StaffRole::Doctor => active.doctor_id = ActiveValue::Set(Some(staff_id)),
    }
    let farm = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(
        name = "staff.changed",
        target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
        farm_id = %farm.farm_id,
        role = %role,
        old_staff_id = ?old_id,
        new_staff_id = staff_id,
        message = "Farm staff changed"
    );

    let notifications_sent = send_staff_change_notifications(
        resources,
        &farm,
        role,
        old_staff.as_ref(),
        &new_staff,
    )
    .await?;

    Ok(StaffChanged {
        farm_id: farm.farm_id,
        new_staff_id: staff_id,
        old_staff_id: old_id,
        notifications_sent,
    })
}
