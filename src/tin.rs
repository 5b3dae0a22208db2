//! The tin: a fixed row of slots holding the beans still in play.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::model::Bean;

/// Errors raised by tin mutations whose preconditions do not hold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TinError {
    #[error("no vacant slot in a tin of {len} slots")]
    NoVacantSlot { len: usize },

    #[error("need at least two beans to draw a pair, tin holds {occupied}")]
    NotEnoughBeans { occupied: usize },
}

/// Error for text that does not describe a tin.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseTinError {
    #[error("slot {position}: '{found}' is not a bean, expected 'B', 'G' or '-'")]
    InvalidBean { position: usize, found: char },
}

/// Marker for a removed bean in the text form.
const REMOVED: char = '-';

/// A tin of beans.
///
/// The number of slots is fixed at creation. Drawing a bean leaves its slot
/// empty, and new beans only ever go into empty slots.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tin {
    slots: Vec<Option<Bean>>,
}

impl Tin {
    /// Create a tin with one occupied slot per bean, in order.
    pub fn new(beans: impl IntoIterator<Item = Bean>) -> Self {
        Self {
            slots: beans.into_iter().map(Some).collect(),
        }
    }

    /// Create a tin from raw slots, some of which may already be empty.
    pub fn from_slots(slots: impl IntoIterator<Item = Option<Bean>>) -> Self {
        Self {
            slots: slots.into_iter().collect(),
        }
    }

    pub fn slots(&self) -> &[Option<Bean>] {
        &self.slots
    }

    /// Number of slots, occupied or not.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of beans currently in the tin.
    pub fn occupied(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Number of beans of the given color.
    pub fn count(&self, bean: Bean) -> usize {
        self.slots.iter().flatten().filter(|b| **b == bean).count()
    }

    /// True iff at least two slots hold a bean. Stops scanning at the second one.
    pub fn has_at_least_two(&self) -> bool {
        self.slots.iter().flatten().nth(1).is_some()
    }

    /// Remove the first bean found and return it.
    pub fn take_one(&mut self) -> Option<Bean> {
        self.slots.iter_mut().find_map(Option::take)
    }

    /// Remove two beans. Returns `None` and leaves the tin untouched when it
    /// holds fewer than two.
    pub fn take_two(&mut self) -> Option<(Bean, Bean)> {
        if !self.has_at_least_two() {
            return None;
        }
        let first = self.take_one()?;
        let second = self.take_one()?;
        Some((first, second))
    }

    /// Place a bean into the first vacant slot and return that slot's index.
    pub fn put_in(&mut self, bean: Bean) -> Result<usize, TinError> {
        let len = self.slots.len();
        let (index, slot) = self
            .slots
            .iter_mut()
            .enumerate()
            .find(|(_, slot)| slot.is_none())
            .ok_or(TinError::NoVacantSlot { len })?;
        *slot = Some(bean);
        Ok(index)
    }

    /// Any bean still in the tin, without removing it.
    pub fn any_bean(&self) -> Option<Bean> {
        self.slots.iter().flatten().next().copied()
    }
}

impl FromIterator<Bean> for Tin {
    fn from_iter<I: IntoIterator<Item = Bean>>(iter: I) -> Self {
        Tin::new(iter)
    }
}

impl FromStr for Tin {
    type Err = ParseTinError;

    /// Parse one char per slot: `B`, `G` or `-` for an empty slot.
    /// Whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .filter(|c| !c.is_whitespace())
            .enumerate()
            .map(|(position, c)| match c {
                REMOVED => Ok(None),
                c => Bean::try_from(c)
                    .map(Some)
                    .map_err(|_| ParseTinError::InvalidBean { position, found: c }),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Tin::from_slots)
    }
}

impl fmt::Display for Tin {
    /// Compact form, e.g. `BG-`. Round-trips through `FromStr`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for slot in &self.slots {
            match slot {
                Some(bean) => write!(f, "{bean}")?,
                None => write!(f, "{REMOVED}")?,
            }
        }
        Ok(())
    }
}
