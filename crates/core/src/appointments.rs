//! Appointment rules applied by the handlers around store calls.
//!
//! - [`AppointmentFilter`] narrows a listing by `userId` and `role`.
//! - [`Appointment::apply_update`] merges a partial update onto a stored appointment.
//! - [`Appointment::ensure_id`] allocates an id for new appointments.

use crate::models::{
    Appointment, AppointmentUpdate, LocationRef, LocationRefUpdate, PersonRef, PersonRefUpdate,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Seconds from the Unix epoch to `0001-01-01T00:00:00Z`, the zero time clients send for
/// "no date".
const ZERO_TIME_UNIX_SECONDS: i64 = -62_135_596_800;

/// Role value selecting appointments where the user is the patient.
pub const PATIENT_ROLE: &str = "patient";

/// Role value selecting appointments the user created.
pub const CREATOR_ROLE: &str = "creator";

/// Listing filter built from the `userId` and `role` query parameters.
///
/// The two parameters do not combine as a conjunction:
///
/// | `userId` | `role` | kept appointments |
/// |---|---|---|
/// | empty | empty | all |
/// | set | empty | user is patient, doctor or creator |
/// | any | `patient` | `patient.id == userId` |
/// | any | `creator` | `createdBy.id == userId` |
/// | any | other | none |
///
/// A non-empty role replaces the general participant match with its narrower one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppointmentFilter {
    user_id: String,
    role: String,
}

impl AppointmentFilter {
    /// Build a filter; `None` and empty strings both mean "not given".
    pub fn new(user_id: Option<String>, role: Option<String>) -> Self {
        Self {
            user_id: user_id.unwrap_or_default(),
            role: role.unwrap_or_default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.user_id.is_empty() && self.role.is_empty()
    }

    pub fn matches(&self, appointment: &Appointment) -> bool {
        if self.is_empty() {
            return true;
        }

        if !self.role.is_empty() {
            return match self.role.as_str() {
                PATIENT_ROLE => appointment.patient.id == self.user_id,
                CREATOR_ROLE => appointment.created_by.id == self.user_id,
                _ => false,
            };
        }

        appointment.patient.id == self.user_id
            || appointment.doctor.id == self.user_id
            || appointment.created_by.id == self.user_id
    }

    /// Keep the matching appointments, preserving their order.
    pub fn apply(&self, appointments: Vec<Appointment>) -> Vec<Appointment> {
        if self.is_empty() {
            return appointments;
        }
        appointments
            .into_iter()
            .filter(|appointment| self.matches(appointment))
            .collect()
    }
}

fn is_zero_time(value: &DateTime<Utc>) -> bool {
    value.timestamp() == ZERO_TIME_UNIX_SECONDS && value.timestamp_subsec_nanos() == 0
}

/// Overwrite `target` with `value` when it carries a non-empty string.
fn merge_text(target: &mut String, value: Option<String>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        *target = value;
    }
}

fn merge_person(target: &mut PersonRef, update: Option<PersonRefUpdate>) {
    let Some(update) = update else {
        return;
    };
    merge_text(&mut target.id, update.id);
    merge_text(&mut target.name, update.name);
    merge_text(&mut target.role, update.role);
}

fn merge_location(target: &mut LocationRef, update: Option<LocationRefUpdate>) {
    let Some(update) = update else {
        return;
    };
    merge_text(&mut target.id, update.id);
    merge_text(&mut target.name, update.name);
    merge_text(&mut target.address, update.address);
}

impl Appointment {
    /// Merge `update` onto this appointment field by field.
    ///
    /// Only non-empty strings overwrite, so an update can replace a sub-field but never clear
    /// it. `dateTime` is replaced when supplied and not the zero time `0001-01-01T00:00:00Z`.
    /// A supplied non-empty `id` replaces the id too, while the caller still persists under the
    /// id it looked the appointment up by.
    pub fn apply_update(&mut self, update: AppointmentUpdate) {
        merge_text(&mut self.id, update.id);
        if let Some(date_time) = update.date_time.filter(|dt| !is_zero_time(dt)) {
            self.date_time = date_time;
        }
        merge_person(&mut self.patient, update.patient);
        merge_person(&mut self.doctor, update.doctor);
        merge_location(&mut self.location, update.location);
        merge_person(&mut self.created_by, update.created_by);
    }

    /// Assign a fresh random UUID if the appointment has no id, then return the id.
    pub fn ensure_id(&mut self) -> &str {
        if self.id.is_empty() {
            self.id = Uuid::new_v4().to_string();
        }
        &self.id
    }
}
