//! Entities stored by the ambulance service.
//!
//! Appointments embed denormalized snapshots of the users and location they refer to
//! ([`PersonRef`], [`LocationRef`]). These are copies taken when the appointment was written,
//! not foreign keys: removing a user or a location never touches existing appointments.

use crate::store::Document;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role a user plays in the ambulance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Patient,
    Doctor,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Patient => "patient",
            UserRole::Doctor => "doctor",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: UserRole,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub address: String,
}

/// Snapshot of a user embedded in an appointment.
///
/// `role` is kept as free text because it records whatever the caller sent at the time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct PersonRef {
    pub id: String,
    pub name: String,
    pub role: String,
}

/// Snapshot of a location embedded in an appointment.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct LocationRef {
    pub id: String,
    pub name: String,
    pub address: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    /// Generated on create when left empty.
    #[serde(default)]
    pub id: String,
    pub date_time: DateTime<Utc>,
    #[serde(default)]
    pub patient: PersonRef,
    #[serde(default)]
    pub doctor: PersonRef,
    #[serde(default)]
    pub location: LocationRef,
    #[serde(default)]
    pub created_by: PersonRef,
}

/// Partial update payload for an [`Appointment`].
///
/// Every field is optional so an omitted field is distinguishable from a present one. An empty
/// string is still treated like an omitted field when merging, so a sub-field can never be
/// cleared through an update.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AppointmentUpdate {
    pub id: Option<String>,
    pub date_time: Option<DateTime<Utc>>,
    pub patient: Option<PersonRefUpdate>,
    pub doctor: Option<PersonRefUpdate>,
    pub location: Option<LocationRefUpdate>,
    pub created_by: Option<PersonRefUpdate>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct PersonRefUpdate {
    pub id: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct LocationRefUpdate {
    pub id: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
}

impl Document for Appointment {
    const KIND: &'static str = "appointment";
    const DATE_FIELDS: &'static [&'static str] = &["dateTime"];

    fn id(&self) -> &str {
        &self.id
    }
}

impl Document for User {
    const KIND: &'static str = "user";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Document for Location {
    const KIND: &'static str = "location";

    fn id(&self) -> &str {
        &self.id
    }
}
