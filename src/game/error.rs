//! Error types for playing the game.

use thiserror::Error;

use crate::model::Bean;
use crate::tin::TinError;

/// Top-level error returned by [`reduce`](super::reduce) and friends.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The supply has no bean of the color a reduction step needs.
    /// The tin is left one bean short and the game cannot go on.
    #[error("supply exhausted: no {0} bean left to put back")]
    SupplyExhausted(Bean),

    #[error("{0}")]
    Tin(#[from] TinError),
}
