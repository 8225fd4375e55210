//! Operation layer for Spielleiter.
//!
//! Wraps the `sl-mechanics` engine in the external contract: the
//! director-only mutation rule, version-marker idempotency for turn
//! movement, and the load → mutate → commit → publish discipline that
//! keeps every operation atomic. Persistence, identity, and broadcast are
//! consumed as traits; the hosted backend implements them out of tree.

/// Caller identity and the director rule.
pub mod auth;
/// The broadcast contract and reference sinks.
pub mod broadcast;
/// Error types for session operations.
pub mod error;
/// The director's command surface.
pub mod session;
/// The persistence contract and the in-memory reference store.
pub mod store;

/// Re-export identity types.
pub use auth::{AccessPolicy, ActorId, SingleDirector};
/// Re-export broadcast types.
pub use broadcast::{CollectingSink, EventSink, NullSink};
/// Re-export error types.
pub use error::{SessionError, SessionResult};
/// Re-export the session and its result shapes.
pub use session::{DamageReport, Session, TurnSummary};
/// Re-export store types.
pub use store::{EncounterStore, MemoryStore, StoreError};
