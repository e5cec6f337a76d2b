//! Weft Session
//!
//! The object runtime: an explicit unit of work that maps query results onto
//! typed, mutation-tracked entities and replays local changes to the store.
//!
//! Responsibilities:
//! - Compile entity classes from defining queries
//! - Load entities, grouping rows by anchor and reporting violations
//! - Track mutations in a journal and a pinned dirty set
//! - Commit in one round trip, or roll back

mod cache;
mod class;
mod config;
mod entity;
mod error;
mod fresh;
mod session;
mod violation;

pub use cache::EntityCache;
pub use class::{EntityClass, Multiplicity, PropertyDescriptor, PropertyKind, DEFAULT_NAMESPACE};
pub use config::{SessionConfig, DEFAULT_CACHE_CAPACITY};
pub use entity::{Entity, EntityHandle, EntityInit, PropertyValue, Slot};
pub use error::{SessionError, SessionResult};
pub use fresh::{FreshIdGenerator, SequentialSuffixes, UuidSuffixes};
pub use session::Session;
pub use violation::{ListenerId, Violation, ViolationKind, ViolationListener, ViolationRegistry};
pub use weft_journal::CommitOutcome;
