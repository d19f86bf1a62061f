//! Inseminator and doctor reassignment.

mod common;

use common::*;
use farm_manager::entity::farm;
use farm_manager::entity::message::MessageType;
use farm_manager::error::{EventError, StaffRole};
use farm_manager::staff::change_staff;
use sea_orm::EntityTrait;

const FARM_PHONE: &str = "0911000000";

#[tokio::test]
async fn inseminator_change_notifies_old_and_new() {
    let (resources, gateway) = create_test_resources().await;
    let db = resources.db.as_ref();
    let old = insert_inseminator(db, "Tesfaye", "0922000000", true).await;
    let new = insert_inseminator(db, "Meron", "0933000000", true).await;
    insert_farm(db, "F1", FARM_PHONE, Some(old.id)).await;

    let changed = change_staff(&resources, "F1", StaffRole::Inseminator, new.id)
        .await
        .unwrap();

    assert_eq!(changed.old_staff_id, Some(old.id));
    assert_eq!(changed.new_staff_id, new.id);
    assert_eq!(changed.notifications_sent.old_staff_sent, Some(true));
    assert!(changed.notifications_sent.new_staff_sent);
    assert_eq!(changed.notifications_sent.farmer_sent, None);

    let farm = farm::Entity::find_by_id("F1".to_string())
        .one(db)
        .await
        .unwrap()
        .expect("farm");
    assert_eq!(farm.inseminator_id, Some(new.id));

    let sent = gateway.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].phone_number, "0922000000");
    assert!(sent[0].body.contains("unassigned from farm: F1"));
    assert_eq!(sent[1].phone_number, "0933000000");
    assert!(sent[1].body.contains("Farm ID: F1"));

    let messages = all_messages(db).await;
    assert!(
        messages
            .iter()
            .all(|m| m.kind() == MessageType::InseminatorAssignment && m.cow_id.is_none())
    );
}

#[tokio::test]
async fn first_doctor_assignment_tells_doctor_and_farmer() {
    let (resources, gateway) = create_test_resources().await;
    let db = resources.db.as_ref();
    let doctor = insert_doctor(db, "Hana", "0944000000", true).await;
    insert_farm(db, "F1", FARM_PHONE, None).await;

    let changed = change_staff(&resources, "F1", StaffRole::Doctor, doctor.id)
        .await
        .unwrap();

    assert_eq!(changed.old_staff_id, None);
    assert_eq!(changed.notifications_sent.old_staff_sent, None);
    assert_eq!(changed.notifications_sent.farmer_sent, Some(true));

    let sent = gateway.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].phone_number, "0944000000");
    assert_eq!(sent[1].phone_number, FARM_PHONE);
    assert!(sent[1].body.contains("Dr.Hana"));
    assert!(sent[1].body.contains("0944000000"));

    let kinds: Vec<_> = all_messages(db).await.iter().map(|m| m.kind()).collect();
    assert_eq!(kinds, [MessageType::DoctorAssignment; 2]);
}

#[tokio::test]
async fn inactive_staff_cannot_be_assigned() {
    let (resources, gateway) = create_test_resources().await;
    let db = resources.db.as_ref();
    let retired = insert_doctor(db, "Hana", "0944000000", false).await;
    insert_farm(db, "F1", FARM_PHONE, None).await;

    let err = change_staff(&resources, "F1", StaffRole::Doctor, retired.id)
        .await
        .unwrap_err();

    assert!(matches!(err, EventError::StaffInactive { role: StaffRole::Doctor, .. }));
    assert!(gateway.sent().is_empty());
    let farm = farm::Entity::find_by_id("F1".to_string())
        .one(db)
        .await
        .unwrap()
        .expect("farm");
    assert_eq!(farm.doctor_id, None);
}

#[tokio::test]
async fn reassigning_the_current_staff_is_rejected() {
    let (resources, gateway) = create_test_resources().await;
    let db = resources.db.as_ref();
    let inseminator = insert_inseminator(db, "Tesfaye", "0922000000", true).await;
    insert_farm(db, "F1", FARM_PHONE, Some(inseminator.id)).await;

    let err = change_staff(&resources, "F1", StaffRole::Inseminator, inseminator.id)
        .await
        .unwrap_err();

    assert!(matches!(err, EventError::InvalidInput(_)));
    assert!(gateway.sent().is_empty());
}

#[tokio::test]
async fn unknown_staff_or_farm_is_not_found() {
    let (resources, _gateway) = create_test_resources().await;
    let db = resources.db.as_ref();
    insert_farm(db, "F1", FARM_PHONE, None).await;
    let doctor = insert_doctor(db, "Hana", "0944000000", true).await;

    let err = change_staff(&resources, "F1", StaffRole::Inseminator, 99)
        .await
        .unwrap_err();
    assert!(matches!(err, EventError::StaffNotFound { id: 99, .. }));

    let err = change_staff(&resources, "NOPE", StaffRole::Doctor, doctor.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EventError::FarmNotFound(_)));
}
