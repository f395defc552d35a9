//! # Ambulance Core
//!
//! Core data operations for the ambulance appointments service.
//!
//! This crate contains:
//! - The entities (`Appointment`, `User`, `Location`) and their JSON shapes
//! - A generic document store contract with MongoDB and in-memory implementations
//! - Appointment filter and partial-update rules, user role filtering
//! - Startup configuration and fixture seeding
//!
//! **No API concerns**: HTTP routing, status codes and response envelopes belong in `api-rest`.

pub mod appointments;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod seed;
pub mod store;
pub mod users;

pub use appointments::AppointmentFilter;
pub use config::{MongoConfig, ServiceConfig};
pub use error::{ConfigError, ConfigResult, StoreError, StoreResult};
pub use models::{
    Appointment, AppointmentUpdate, Location, LocationRef, LocationRefUpdate, PersonRef,
    PersonRefUpdate, User, UserRole,
};
pub use seed::{seed_fixtures, SeedReport};
pub use store::{
    collect_documents, find_all, Document, DocumentStore, DocumentStream, InMemoryStore,
    MongoConnection, MongoStore,
};
