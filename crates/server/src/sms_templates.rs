//! SMS bodies sent to farmers, inseminators and doctors.
//!
//! Farm-facing texts are in Amharic, matching what farms have been receiving.
//! Staff assignment notices are in English. Dates are rendered as
//! `YYYY-MM-DD`.

use crate::reproduction::CalfSex;
use time::Date;

/// Something that renders to a single SMS body.
pub trait SmsTemplate {
    fn render(&self) -> String;
}

/// Reminder to watch a non-pregnant cow whose last heat sign is getting old.
#[derive(Debug, Clone)]
pub struct HeatMonitoringReminder<'a> {
    pub cow_id: &'a str,
    pub days_since_heat: i64,
    pub last_heat_date: Date,
}

impl SmsTemplate for HeatMonitoringReminder<'_> {
    fn render(&self) -> String {
        format!(
            "🔄 የኮርማ ፍላጎት ማስታወሻ\n\
             ላም፦ {}\n\
             ከመጨረሻው የኮርማ ምልክት ጀምሮ፡ {} ቀናት\n\
             የመጨረሻው የኮርማ ቀን፡ {}\n\
             እባክዎን ላሙን የኮርማ ምልክቶች ይከታተሉ",
            self.cow_id, self.days_since_heat, self.last_heat_date
        )
    }
}

/// Which calving milestone a [`CalvingReminder`] announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalvingMilestone {
    TwoMonths,
    OneMonth,
    Due,
}

#[derive(Debug, Clone)]
pub struct CalvingReminder<'a> {
    pub milestone: CalvingMilestone,
    pub cow_id: &'a str,
    pub expected_calving_date: Date,
    pub lactation_number: i32,
}

impl SmsTemplate for CalvingReminder<'_> {
    fn render(&self) -> String {
        let (heading, advice) = match self.milestone {
            CalvingMilestone::TwoMonths => (
                "🐄 የመውለጃ ማስታወሻ - 2 ወር ቀርቷል",
                "እባክዎን ላሙን ለመውለጃ ማዘጋጀት ይጀምሩ",
            ),
            CalvingMilestone::OneMonth => (
                "🚨 የመውለጃ ማስታወሻ - 1 ወር ቀርቷል",
                "እባክዎን ላሙን በቅርብ ይከታተሉ እና ለመውለጃ ዝግጅት ያድርጉ",
            ),
            CalvingMilestone::Due => (
                "⚠️ የመውለጃ ቀን ደርሷል!",
                "እባክዎን ላሙን በትኩረት ይከታተሉ እና አስፈላጊውን እርዳታ ይስጡ",
            ),
        };
        format!(
            "{heading}\n\
             ላም፦ {}\n\
             የሚጠበቀው የመውለጃ ቀን፡ {}\n\
             የመወለድ ቁጥር፡ {}\n\
             {advice}",
            self.cow_id, self.expected_calving_date, self.lactation_number
        )
    }
}

/// Sent to the farm's inseminator when a heat sign is recorded.
#[derive(Debug, Clone)]
pub struct InseminationAlert<'a> {
    pub farm_id: &'a str,
    pub owner_name: &'a str,
    pub address: &'a str,
    pub phone: &'a str,
    pub cow_id: &'a str,
    pub heat_signs: &'a str,
}

impl SmsTemplate for InseminationAlert<'_> {
    fn render(&self) -> String {
        format!(
            "የማዳቀያ ማንቂያ\n\
             እርባታ ጣቢያ ({}) - {}\n\
             አድራሻ: {}\n\
             ስልክ ቁ: {}\n\
             የላም መለያ ቁጥር: {}\n\
             የኮርማ ፍላጎት ምልክቶች: {}\n\
             እባክዎን ከቀኑ (4 ሰዓት) እሰከ (7 ሰዓት) ባለው ጊዜ ያዳቅሉ::",
            self.farm_id, self.owner_name, self.address, self.phone, self.cow_id, self.heat_signs
        )
    }
}

/// Tells the farmer their inseminator has been alerted.
#[derive(Debug, Clone)]
pub struct FarmerHeatNotification<'a> {
    pub cow_id: &'a str,
    pub inseminator_name: &'a str,
}

impl SmsTemplate for FarmerHeatNotification<'_> {
    fn render(&self) -> String {
        format!(
            "ማንቂያ፡- የላምዎ መለያ ቁጥር ({}) የፍላጎት ምልክቶችን ስለሚያሳይ የእርስዎ ማዳቀያ ({}) ማሳወቂያ ደርሶታል። በቅርቡ እርሻዎን ይጎበኛሉ።",
            self.cow_id, self.inseminator_name
        )
    }
}

#[derive(Debug, Clone)]
pub struct PregnancyConfirmation<'a> {
    pub cow_id: &'a str,
    pub pregnancy_date: Date,
    pub expected_calving_date: Date,
    pub lactation_number: i32,
}

impl SmsTemplate for PregnancyConfirmation<'_> {
    fn render(&self) -> String {
        format!(
            "🐄 እርግዝና ተመዝግቧል!\n\
             ላም፦ {}\n\
             የእርግዝና ቀን፡ {}\n\
             የሚጠበቀው የመውለጃ ቀን፡ {}\n\
             የመወለድ ቁጥር፡ {}",
            self.cow_id, self.pregnancy_date, self.expected_calving_date, self.lactation_number
        )
    }
}

fn health_status(is_sick: bool) -> &'static str {
    if is_sick { "ታማሚ" } else { "ጤናማ" }
}

/// Alerts the farm's doctor to a sickness the farmer reported.
#[derive(Debug, Clone)]
pub struct DoctorMedicalReportAlert<'a> {
    pub cow_id: &'a str,
    pub farm_id: &'a str,
    pub owner_name: &'a str,
    pub sickness_description: &'a str,
}

impl SmsTemplate for DoctorMedicalReportAlert<'_> {
    fn render(&self) -> String {
        format!(
            "አዲስ የወተት አርቢ የእንስሳት ጤና ሪፖርት\n\
             ላም: {}\n\
             የእርባታ ጣቢያ: {}\n\
             የሐኪሙ ስም: {}\n\
             ሪፖርት የሚደረገው ጉዳይ: {}\n\
             አባክዎን በሪፖርቱ የተጠቀሰውን ይከታተሉ",
            self.cow_id, self.farm_id, self.owner_name, self.sickness_description
        )
    }
}

/// Tells the farmer which doctor received their report.
#[derive(Debug, Clone)]
pub struct FarmerMedicalReportConfirmation<'a> {
    pub cow_id: &'a str,
    pub sickness_description: &'a str,
    pub doctor_name: &'a str,
}

impl SmsTemplate for FarmerMedicalReportConfirmation<'_> {
    fn render(&self) -> String {
        format!(
            "✅ የህክምና ሪፖርት ደርሷል\n\
             ላም፦ {}\n\
             ጉዳይ ሪፖርት ተደርጓል፡ {}\n\
             ሪፖርትህ ለዶክተር {} ተልኳል።\n\
             ከግምገማው በኋላ ማሳወቂያ ይደርስዎታል።",
            self.cow_id, self.sickness_description, self.doctor_name
        )
    }
}

/// Assessment result for the farmer.
#[derive(Debug, Clone)]
pub struct MedicalAssessmentComplete<'a> {
    pub cow_id: &'a str,
    pub doctor_name: &'a str,
    pub is_sick: bool,
    pub has_lameness: bool,
    pub notes: Option<&'a str>,
}

impl SmsTemplate for MedicalAssessmentComplete<'_> {
    fn render(&self) -> String {
        let lameness = if self.has_lameness { "አዎ" } else { "አይደለም" };
        format!(
            "የሕክምና ግምገማ ተጠናቋል\n\
             ላም፦ {}\n\
             ዶክተር፡ ዶክተር {}\n\
             የጤና ሁኔታ፡ {}\n\
             አንካሳ፡ {lameness}\n\
             ማስታወሻዎች፡ {}",
            self.cow_id,
            self.doctor_name,
            health_status(self.is_sick),
            self.notes.filter(|n| !n.trim().is_empty()).unwrap_or("N/A")
        )
    }
}

/// Receipt sent back to the doctor who recorded an assessment.
#[derive(Debug, Clone)]
pub struct DoctorAssessmentConfirmation<'a> {
    pub farm_id: &'a str,
    pub owner_name: &'a str,
    pub cow_id: &'a str,
    pub is_sick: bool,
}

impl SmsTemplate for DoctorAssessmentConfirmation<'_> {
    fn render(&self) -> String {
        format!(
            "✅ ግምገማ ተመዝግቧል\n\
             እርሻ፡ {} - {}\n\
             ላም፦ {}\n\
             ሁኔታ፡ {}\n\
             የግምገማ ውጤቱን አርሶ አደሩ እንዲያውቅ ተደርጓል።",
            self.farm_id,
            self.owner_name,
            self.cow_id,
            health_status(self.is_sick)
        )
    }
}

#[derive(Debug, Clone)]
pub struct BirthEvent<'a> {
    pub cow_id: &'a str,
    pub calving_date: Date,
    pub last_calving_date: Date,
    pub calf_sex: CalfSex,
}

impl SmsTemplate for BirthEvent<'_> {
    fn render(&self) -> String {
        let sex = match self.calf_sex {
            CalfSex::Male => "ወንድ",
            CalfSex::Female => "ሴት",
        };
        format!(
            "🎉 የልደት ክስተት ተመዝግቧል!\n\
             ላም፦ {}\n\
             የትውልድ ቀን፡ {}\n\
             የመጨረሻው የመውለጃ ቀን፡ {}\n\
             የጥጃ ጾታ፡ {sex}",
            self.cow_id, self.calving_date, self.last_calving_date
        )
    }
}

/// Sent to an inseminator or doctor newly assigned to a farm.
#[derive(Debug, Clone)]
pub struct StaffAssignmentNotice<'a> {
    pub farm_id: &'a str,
    pub owner_name: &'a str,
    pub address: &'a str,
    pub phone: &'a str,
}

impl SmsTemplate for StaffAssignmentNotice<'_> {
    fn render(&self) -> String {
        format!(
            "Notice: You have been assigned to a new farm:\n\
             Farm ID: {}\n\
             Owner: {}\n\
             Address: {}\n\
             Phone: {}",
            self.farm_id, self.owner_name, self.address, self.phone
        )
    }
}

#[derive(Debug, Clone)]
pub struct StaffUnassignmentNotice<'a> {
    pub farm_id: &'a str,
    pub owner_name: &'a str,
}

impl SmsTemplate for StaffUnassignmentNotice<'_> {
    fn render(&self) -> String {
        format!(
            "Notice: You have been unassigned from farm: {} ({})",
            self.farm_id, self.owner_name
        )
    }
}

/// Tells the farmer who their new doctor is.
#[derive(Debug, Clone)]
pub struct DoctorChangeFarmerNotice<'a> {
    pub doctor_name: &'a str,
    pub doctor_phone: &'a str,
}

impl SmsTemplate for DoctorChangeFarmerNotice<'_> {
    fn render(&self) -> String {
        format!(
            "Notice: Your farm's doctor has been changed to Dr.{}. Contact number: {}",
            self.doctor_name, self.doctor_phone
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn heat_reminder_carries_cow_days_and_date() {
        let body = HeatMonitoringReminder {
            cow_id: "C1",
            days_since_heat: 20,
            last_heat_date: date!(2026 - 09 - 29),
        }
        .render();
        assert!(body.contains("C1"));
        assert!(body.contains("20 ቀናት"));
        assert!(body.contains("2026-09-29"));
    }

    #[test]
    fn calving_reminders_differ_per_milestone() {
        let render = |milestone| {
            CalvingReminder {
                milestone,
                cow_id: "C2",
                expected_calving_date: date!(2026 - 12 - 18),
                lactation_number: 3,
            }
            .render()
        };
        let two = render(CalvingMilestone::TwoMonths);
        let one = render(CalvingMilestone::OneMonth);
        let due = render(CalvingMilestone::Due);

        assert!(two.contains("2 ወር"));
        assert!(one.contains("1 ወር"));
        assert!(due.starts_with("⚠️"));
        for body in [&two, &one, &due] {
            assert!(body.contains("C2"));
            assert!(body.contains("2026-12-18"));
            assert!(body.contains("የመወለድ ቁጥር፡ 3"));
        }
    }

    #[test]
    fn farmer_heat_notification_names_inseminator() {
        let body = FarmerHeatNotification {
            cow_id: "C7",
            inseminator_name: "Abebe",
        }
        .render();
        assert!(body.contains("(C7)"));
        assert!(body.contains("(Abebe)"));
    }

    #[test]
    fn assessment_without_notes_prints_placeholder() {
        let body = MedicalAssessmentComplete {
            cow_id: "C3",
            doctor_name: "Hana",
            is_sick: true,
            has_lameness: false,
            notes: Some("  "),
        }
        .render();
        assert!(body.contains("ዶክተር Hana"));
        assert!(body.contains("ታማሚ"));
        assert!(body.contains("አንካሳ፡ አይደለም"));
        assert!(body.ends_with("N/A"));
    }

    #[test]
    fn birth_event_translates_calf_sex() {
        let render = |calf_sex| {
            BirthEvent {
                cow_id: "C4",
                calving_date: date!(2026 - 10 - 18),
                last_calving_date: date!(2025 - 09 - 02),
                calf_sex,
            }
            .render()
        };
        assert!(render(CalfSex::Male).ends_with("ወንድ"));
        assert!(render(CalfSex::Female).ends_with("ሴት"));
        assert!(render(CalfSex::Female).contains("2025-09-02"));
    }

    #[test]
    fn staff_notices_name_the_farm() {
        let assigned = StaffAssignmentNotice {
            farm_id: "F1",
            owner_name: "Abebe",
            address: "Debre Zeit",
            phone: "0911000000",
        }
        .render();
        assert!(assigned.contains("Farm ID: F1"));
        assert!(assigned.ends_with("Phone: 0911000000"));

        let unassigned = StaffUnassignmentNotice {
            farm_id: "F1",
            owner_name: "Abebe",
        }
        .render();
        assert_eq!(
            unassigned,
            "Notice: You have been unassigned from farm: F1 (Abebe)"
        );
    }
}
