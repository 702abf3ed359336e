//! Consultation slot picker
//!
//! Cross-filters a date selector against a time selector using the
//! date -> open times map the scheduler returns.

use chrono::NaiveDate;
use shared::{AvailableSlots, ScheduleRequest};

use crate::error::SlotError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateOption {
    pub value: String,
    pub label: String,
    pub open_slots: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeOption {
    pub value: String,
    pub enabled: bool,
}

/// Contact details entered alongside the slot
#[derive(Debug, Clone, Default)]
pub struct ContactDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct SlotPicker {
    slots: AvailableSlots,
    selected_date: Option<String>,
    selected_time: Option<String>,
}

impl SlotPicker {
    pub fn new(slots: AvailableSlots) -> Self {
        Self {
            slots,
            selected_date: None,
            selected_time: None,
        }
    }

    pub fn timezone(&self) -> Option<&str> {
        self.slots.timezone.as_deref()
    }

    pub fn has_dates(&self) -> bool {
        !self.slots.available_days.is_empty()
    }

    /// One option per open day, in server order
    pub fn date_options(&self) -> Vec<DateOption> {
        self.slots
            .available_days
            .iter()
            .map(|day| {
                let open_slots = self.times_for(day).len();
                DateOption {
                    value: day.clone(),
                    label: format!("{} ({} slots available)", date_label(day), open_slots),
                    open_slots,
                }
            })
            .collect()
    }

    /// Before a date is chosen every scheduled time is listed but disabled.
    /// Afterwards only that date's open times are listed.
    pub fn time_options(&self) -> Vec<TimeOption> {
        match &self.selected_date {
            None => self
                .slots
                .available_times
                .iter()
                .map(|t| TimeOption {
                    value: t.clone(),
                    enabled: false,
                })
                .collect(),
            Some(day) => self
                .times_for(day)
                .iter()
                .map(|t| TimeOption {
                    value: t.clone(),
                    enabled: true,
                })
                .collect(),
        }
    }

    /// Choose a date. A chosen time that is not open on the new date is cleared.
    pub fn select_date(&mut self, day: &str) -> Result<&[String], SlotError> {
        self.selected_date = Some(day.to_string());
        if let Some(time) = &self.selected_time {
            if !self.times_for(day).contains(time) {
                self.selected_time = None;
            }
        }

        let times = self.times_for(day);
        if times.is_empty() {
            Err(SlotError::DateUnavailable(day.to_string()))
        } else {
            Ok(times)
        }
    }

    pub fn select_time(&mut self, time: &str) -> Result<(), SlotError> {
        let day = self.selected_date.as_deref().ok_or(SlotError::NoDateSelected)?;
        if !self.times_for(day).iter().any(|t| t == time) {
            return Err(SlotError::TimeUnavailable {
                date: day.to_string(),
                time: time.to_string(),
            });
        }
        self.selected_time = Some(time.to_string());
        Ok(())
    }

    pub fn selected_date(&self) -> Option<&str> {
        self.selected_date.as_deref()
    }

    pub fn selected_time(&self) -> Option<&str> {
        self.selected_time.as_deref()
    }

    pub fn schedule_request(&self, contact: ContactDetails) -> Result<ScheduleRequest, SlotError> {
        match (&self.selected_date, &self.selected_time) {
            (Some(date), Some(time)) => Ok(ScheduleRequest {
                name: contact.name,
                email: contact.email,
                phone: contact.phone,
                company: contact.company,
                preferred_date: date.clone(),
                preferred_time: time.clone(),
                message: contact.message,
            }),
            _ => Err(SlotError::Incomplete),
        }
    }

    fn times_for(&self, day: &str) -> &[String] {
        self.slots
            .available_slots_by_day
            .get(day)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// "Wednesday, January 15, 2025"; the raw value if it is not a date
fn date_label(day: &str) -> String {
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map(|d| d.format("%A, %B %-d, %Y").to_string())
        .unwrap_or_else(|_| day.to_string())
}
