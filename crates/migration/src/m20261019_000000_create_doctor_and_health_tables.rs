use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260901_000000_create_farm_tables::{Cow, Farm};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Veterinary doctors, the sickness reports farmers file for them and the
/// assessments they record, plus the farm's assigned doctor and each cow's
/// latest calving.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Doctor::Table)
                    .if_not_exists()
                    .col(pk_auto(Doctor::Id))
                    .col(string(Doctor::Name))
                    .col(string_len(Doctor::PhoneNumber, 15))
                    .col(text(Doctor::Address))
                    .col(boolean(Doctor::IsActive).default(true))
                    .col(boolean(Doctor::IsDeleted).default(false))
                    .to_owned(),
            )
            .await?;

        // SQLite cannot add a foreign key to an existing table; the column is
        // a plain reference there.
        manager
            .alter_table(
                Table::alter()
                    .table(Farm::Table)
                    .add_column(integer_null(FarmDoctor::DoctorId))
                    .to_owned(),
            )
            .await?;
        manager
            .alter_table(
                Table::alter()
                    .table(Cow::Table)
                    .add_column(date_null(CowCalving::LastCalvingDate))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MedicalReport::Table)
                    .if_not_exists()
                    .col(pk_auto(MedicalReport::Id))
                    .col(string_len(MedicalReport::FarmId, 50))
                    .col(integer(MedicalReport::CowId))
                    .col(text(MedicalReport::SicknessDescription))
                    .col(timestamp_with_time_zone(MedicalReport::ReportedDate))
                    .col(boolean(MedicalReport::IsDeleted).default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_medical_report_farm")
                            .from(MedicalReport::Table, MedicalReport::FarmId)
                            .to(Farm::Table, Farm::FarmId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_medical_report_cow")
                            .from(MedicalReport::Table, MedicalReport::CowId)
                            .to(Cow::Table, Cow::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MedicalAssessment::Table)
                    .if_not_exists()
                    .col(pk_auto(MedicalAssessment::Id))
                    .col(string_len(MedicalAssessment::FarmId, 50))
                    .col(integer(MedicalAssessment::CowId))
                    .col(integer(MedicalAssessment::DoctorId))
                    .col(timestamp_with_time_zone(MedicalAssessment::AssessmentDate))
                    .col(boolean(MedicalAssessment::IsCowSick))
                    .col(boolean(MedicalAssessment::HasLameness).default(false))
                    .col(text_null(MedicalAssessment::Diagnosis))
                    .col(text_null(MedicalAssessment::Treatment))
                    .col(text_null(MedicalAssessment::Notes))
                    .col(boolean(MedicalAssessment::IsDeleted).default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_medical_assessment_cow")
                            .from(MedicalAssessment::Table, MedicalAssessment::CowId)
                            .to(Cow::Table, Cow::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_medical_assessment_doctor")
                            .from(MedicalAssessment::Table, MedicalAssessment::DoctorId)
                            .to(Doctor::Table, Doctor::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MedicalAssessment::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MedicalReport::Table).to_owned())
            .await?;
        manager
            .alter_table(
                Table::alter()
                    .table(Cow::Table)
                    .drop_column(CowCalving::LastCalvingDate)
                    .to_owned(),
            )
            .await?;
        manager
            .alter_table(
                Table::alter()
                    .table(Farm::Table)
                    .drop_column(FarmDoctor::DoctorId)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Doctor::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Doctor {
    Table,
    Id,
    Name,
    PhoneNumber,
    Address,
    IsActive,
    IsDeleted,
}

#[derive(Iden)]
enum FarmDoctor {
    DoctorId,
}

#[derive(Iden)]
enum CowCalving {
    LastCalvingDate,
}

#[derive(Iden)]
enum MedicalReport {
    Table,
    Id,
    FarmId,
    CowId,
    SicknessDescription,
    ReportedDate,
    IsDeleted,
}

#[derive(Iden)]
enum MedicalAssessment {
    Table,
    Id,
    FarmId,
    CowId,
    DoctorId,
    AssessmentDate,
    IsCowSick,
    HasLameness,
    Diagnosis,
    Treatment,
    Notes,
    IsDeleted,
}
