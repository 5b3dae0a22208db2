pub mod csv;
pub mod game;
pub mod model;
pub mod tin;

pub use game::{Game, GameError, Outcome, Report, Supply, reduce};
pub use model::Bean;
pub use tin::Tin;
