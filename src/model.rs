//! Core domain types for the coffee tin game.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A coffee bean. Every bean in play is either blue or green.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bean {
    Blue,
    Green,
}

impl Bean {
    /// Replacement for two beans of the same color, whichever color they were.
    pub const MERGE: Bean = Bean::Blue;

    /// Replacement for two beans of different colors.
    pub const MIXED: Bean = Bean::Green;

    /// Single character used in the text form of a tin.
    pub fn symbol(self) -> char {
        match self {
            Bean::Blue => 'B',
            Bean::Green => 'G',
        }
    }
}

impl fmt::Display for Bean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Error for a character that does not name a bean.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a bean, expected 'B' or 'G'")]
pub struct ParseBeanError(pub char);

impl TryFrom<char> for Bean {
    type Error = ParseBeanError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c.to_ascii_uppercase() {
            'B' => Ok(Bean::Blue),
            'G' => Ok(Bean::Green),
            _ => Err(ParseBeanError(c)),
        }
    }
}

impl FromStr for Bean {
    type Err = ParseBeanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Bean::try_from(c),
            (Some(c), Some(_)) => Err(ParseBeanError(c)),
            (None, _) => Err(ParseBeanError(' ')),
        }
    }
}

/// Text form of an optional bean, `none` when there is no bean.
pub fn describe(bean: Option<Bean>) -> String {
    match bean {
        Some(bean) => bean.to_string(),
        None => "none".to_string(),
    }
}
