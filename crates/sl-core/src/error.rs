use crate::id::{CombatantId, ConditionId, EffectId};

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when manipulating encounter state.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The requested combatant is not in the encounter.
    #[error("combatant not found: {0}")]
    CombatantNotFound(CombatantId),

    /// The requested effect row does not exist.
    #[error("effect not found: {0}")]
    EffectNotFound(EffectId),

    /// The requested condition row does not exist.
    #[error("condition not found: {0}")]
    ConditionNotFound(ConditionId),
}
