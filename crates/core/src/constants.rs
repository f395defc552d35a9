//! Constants used throughout the ambulance core crate.
//!
//! Collection names, environment variable names and their defaults live here so the binary,
//! the config parser and the tests agree on them.

/// Collection holding appointment documents.
pub const APPOINTMENTS_COLLECTION: &str = "appointments";

/// Collection holding user documents.
pub const USERS_COLLECTION: &str = "users";

/// Collection holding location documents.
pub const LOCATIONS_COLLECTION: &str = "locations";

/// Field every stored document is keyed on.
pub const ID_FIELD: &str = "id";

/// Port the HTTP server listens on.
pub const PORT_ENV: &str = "AMBULANCE_API_PORT";
pub const DEFAULT_PORT: u16 = 8080;

/// Selects production mode when equal to [`PRODUCTION_ENVIRONMENT`], ignoring case.
pub const ENVIRONMENT_ENV: &str = "AMBULANCE_API_ENVIRONMENT";
pub const PRODUCTION_ENVIRONMENT: &str = "production";

pub const MONGODB_HOST_ENV: &str = "AMBULANCE_API_MONGODB_HOST";
pub const MONGODB_PORT_ENV: &str = "AMBULANCE_API_MONGODB_PORT";
pub const MONGODB_USERNAME_ENV: &str = "AMBULANCE_API_MONGODB_USERNAME";
pub const MONGODB_PASSWORD_ENV: &str = "AMBULANCE_API_MONGODB_PASSWORD";
pub const MONGODB_DATABASE_ENV: &str = "AMBULANCE_API_MONGODB_DATABASE";
pub const MONGODB_TIMEOUT_ENV: &str = "AMBULANCE_API_MONGODB_TIMEOUT_SECONDS";

pub const DEFAULT_MONGODB_HOST: &str = "localhost";
pub const DEFAULT_MONGODB_PORT: u16 = 27017;
pub const DEFAULT_MONGODB_DATABASE: &str = "ambulance-wl";
pub const DEFAULT_MONGODB_TIMEOUT_SECONDS: u64 = 10;

/// Application name reported to MongoDB.
pub const MONGODB_APP_NAME: &str = "ambulance-api";

/// Id of the user whose presence means fixtures are already seeded.
pub const SEED_SENTINEL_USER_ID: &str = "user1";
