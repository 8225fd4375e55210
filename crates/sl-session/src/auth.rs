//! Caller identity and the director rule.
//!
//! The identity provider itself (tokens, accounts) is the hosted
//! backend's concern; this crate only consumes an [`ActorId`] and asks a
//! policy whether that actor directs a given encounter.

use std::fmt;

use serde::{Deserialize, Serialize};

use sl_core::EncounterId;

/// An opaque caller identity, as handed over by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub String);

impl ActorId {
    /// Create an actor ID from any string-ish value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Decides who may mutate an encounter. Observers need no policy —
/// reads are open.
pub trait AccessPolicy {
    /// Whether the actor is the director of the given encounter.
    fn is_director(&self, actor: &ActorId, encounter: EncounterId) -> bool;
}

/// The common case: one director for every encounter of the session.
#[derive(Debug, Clone)]
pub struct SingleDirector {
    director: ActorId,
}

impl SingleDirector {
    /// Create a policy with the given director.
    pub fn new(director: ActorId) -> Self {
        Self { director }
    }
}

impl AccessPolicy for SingleDirector {
    fn is_director(&self, actor: &ActorId, _encounter: EncounterId) -> bool {
        *actor == self.director
    }
}
