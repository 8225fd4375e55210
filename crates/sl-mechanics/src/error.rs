//! Error types for the encounter engine.

use sl_core::CoreError;

/// Errors that can occur during engine operations.
#[derive(Debug, thiserror::Error)]
pub enum MechError {
    /// The encounter has no combatants to schedule.
    #[error("no combatants in encounter")]
    NoCombatants,

    /// A duration must be at least one round.
    #[error("invalid duration: {0} rounds")]
    InvalidDuration(u32),

    /// The requested slot or class resource is exhausted or absent.
    #[error("insufficient resource: {0}")]
    InsufficientResource(String),

    /// Caster levels run 1-20.
    #[error("invalid caster level: {0}")]
    InvalidCasterLevel(u8),

    /// Exhaustion levels run 0-6.
    #[error("invalid exhaustion level: {0}")]
    InvalidExhaustionLevel(u8),

    /// A lookup in the underlying encounter state failed.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Convenience result type for engine operations.
pub type MechResult<T> = Result<T, MechError>;
