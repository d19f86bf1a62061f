//! Pure time-window rules behind the scheduled alerts.
//!
//! Nothing here touches the database; `checks` feeds records through these
//! functions and acts on the answer.

use crate::entity::message::MessageType;
use crate::sms_templates::CalvingMilestone;
use std::ops::RangeInclusive;
use time::{Date, OffsetDateTime, UtcOffset};

/// Default number of days after a heat sign before a monitoring reminder.
pub const HEAT_MONITORING_THRESHOLD_DAYS: i64 = 18;

/// Default trailing window in which an alert kind is not repeated for a cow.
pub const ALERT_COOLDOWN_DAYS: i64 = 7;

/// Whole days from the (UTC) calendar date of the heat sign to `today`.
pub fn days_since_heat(heat_sign_start: OffsetDateTime, today: Date) -> i64 {
    let heat_date = heat_sign_start.to_offset(UtcOffset::UTC).date();
    (today - heat_date).whole_days()
}

/// Signed whole days until the expected calving date; negative once overdue.
pub fn days_until_calving(expected_calving_date: Date, today: Date) -> i64 {
    (expected_calving_date - today).whole_days()
}

pub fn heat_reminder_due(days_since_heat: i64, threshold_days: i64) -> bool {
    days_since_heat >= threshold_days
}

/// Calving countdown bands, in evaluation priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CalvingBand {
    TwoMonths,
    OneMonth,
    Due,
}

impl CalvingBand {
    pub const ALL: [CalvingBand; 3] = [
        CalvingBand::TwoMonths,
        CalvingBand::OneMonth,
        CalvingBand::Due,
    ];

    pub fn days(self) -> RangeInclusive<i64> {
        match self {
            CalvingBand::TwoMonths => 58..=62,
            CalvingBand::OneMonth => 28..=32,
            CalvingBand::Due => -2..=2,
        }
    }

    /// First band containing `days_until_calving`, if any.
    pub fn classify(days_until_calving: i64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|band| band.days().contains(&days_until_calving))
    }

    pub fn message_type(self) -> MessageType {
        match self {
            CalvingBand::TwoMonths => MessageType::Calving2MonthsAlert,
            CalvingBand::OneMonth => MessageType::Calving1MonthAlert,
            CalvingBand::Due => MessageType::CalvingDueAlert,
        }
    }

    pub fn milestone(self) -> CalvingMilestone {
        match self {
            CalvingBand::TwoMonths => CalvingMilestone::TwoMonths,
            CalvingBand::OneMonth => CalvingMilestone::OneMonth,
            CalvingBand::Due => CalvingMilestone::Due,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            CalvingBand::TwoMonths => "2-month calving reminder",
            CalvingBand::OneMonth => "1-month calving reminder",
            CalvingBand::Due => "calving due date alert",
        }
    }
}
