//! Startup fixtures.
//!
//! A fresh database gets a fixed set of patients, doctors and rooms so the front end has
//! something to book against. Seeding is idempotent: if the sentinel user
//! ([`SEED_SENTINEL_USER_ID`]) already exists nothing is written.

use crate::constants::SEED_SENTINEL_USER_ID;
use crate::models::{Location, User, UserRole};
use crate::store::{Document, DocumentStore};
use crate::StoreError;

/// Outcome of [`seed_fixtures`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// The sentinel was found and nothing was attempted.
    pub skipped: bool,
    pub users_created: usize,
    pub locations_created: usize,
    /// Records that already existed.
    pub conflicts: usize,
    /// Records that failed for any other reason.
    pub failures: usize,
}

fn user(id: &str, name: &str, role: UserRole) -> User {
    User {
        id: id.into(),
        name: name.into(),
        role,
    }
}

fn location(id: &str, name: &str, address: &str) -> Location {
    Location {
        id: id.into(),
        name: name.into(),
        address: address.into(),
    }
}

pub fn fixture_users() -> Vec<User> {
    vec![
        user("user1", "John Doe", UserRole::Patient),
        user("user2", "Jane Smith", UserRole::Patient),
        user("user3", "Robert Johnson", UserRole::Patient),
        user("user4", "Emily Davis", UserRole::Patient),
        user("user5", "Dr. Michael Brown", UserRole::Doctor),
        user("user6", "Dr. Sarah Wilson", UserRole::Doctor),
        user("user7", "Dr. James Miller", UserRole::Doctor),
        user("user8", "Dr. Lisa Taylor", UserRole::Doctor),
    ]
}

pub fn fixture_locations() -> Vec<Location> {
    vec![
        location("loc1", "Room 101", "Main Building, Floor 1"),
        location("loc2", "Room 202", "Main Building, Floor 2"),
        location("loc3", "Room 303", "Main Building, Floor 3"),
    ]
}

/// Insert each document, counting successes into `created` and problems into `report`.
async fn insert_all<T, S>(store: &S, documents: &[T], created: &mut usize, report: &mut SeedReport)
where
    T: Document,
    S: DocumentStore<T> + ?Sized,
{
    for document in documents {
        match store.create_document(document.id(), document).await {
            Ok(()) => *created += 1,
            Err(StoreError::Conflict) => report.conflicts += 1,
            Err(e) => {
                tracing::warn!(kind = T::KIND, id = document.id(), "failed to seed: {e}");
                report.failures += 1;
            }
        }
    }
}

/// Seed fixture users and locations unless the sentinel user already exists.
///
/// Individual failures are logged and do not stop the remaining inserts.
pub async fn seed_fixtures<U, L>(users: &U, locations: &L) -> SeedReport
where
    U: DocumentStore<User> + ?Sized,
    L: DocumentStore<Location> + ?Sized,
{
    let mut report = SeedReport::default();

    if users.find_document(SEED_SENTINEL_USER_ID).await.is_ok() {
        tracing::info!("database already initialised, skipping test data creation");
        report.skipped = true;
        return report;
    }

    tracing::info!("initialising database with test data");

    let mut users_created = 0;
    insert_all(users, &fixture_users(), &mut users_created, &mut report).await;
    let mut locations_created = 0;
    insert_all(
        locations,
        &fixture_locations(),
        &mut locations_created,
        &mut report,
    )
    .await;
    report.users_created = users_created;
    report.locations_created = locations_created;

    tracing::info!(
        users = report.users_created,
        locations = report.locations_created,
        conflicts = report.conflicts,
        failures = report.failures,
        "database initialisation completed"
    );
    report
}
