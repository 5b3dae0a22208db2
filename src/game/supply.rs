use std::iter;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;

use crate::model::Bean;

/// The bag of spare beans that replacements are drawn from.
///
/// Created once and depleted by every game played against it; it is never
/// refilled.
#[derive(Debug, Clone)]
pub struct Supply {
    slots: Vec<Option<Bean>>,
    rng: SmallRng,
}

impl Supply {
    /// Bag size used when none is given.
    pub const DEFAULT_CAPACITY: usize = 30;

    /// Fill a bag of `capacity` slots: `capacity / 3` blue beans, then as many
    /// green ones, the rest left empty. Without a seed, draws are seeded from
    /// the OS.
    pub fn initialize(capacity: usize, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        let per_color = capacity / 3;
        let slots = iter::repeat_n(Some(Bean::Blue), per_color)
            .chain(iter::repeat_n(Some(Bean::Green), per_color))
            .chain(iter::repeat_n(None, capacity - 2 * per_color))
            .collect();
        Self { slots, rng }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[Option<Bean>] {
        &self.slots
    }

    /// Beans of the given color still in the bag.
    pub fn remaining(&self, bean: Bean) -> usize {
        self.slots.iter().flatten().filter(|b| **b == bean).count()
    }

    /// Take out a bean of the given color, picked uniformly at random among
    /// the matching slots. `None` once that color has run out.
    pub fn draw(&mut self, bean: Bean) -> Option<Bean> {
        let matching: Vec<usize> = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| **slot == Some(bean))
            .map(|(i, _)| i)
            .collect();
        let &index = matching.choose(&mut self.rng)?;
        self.slots[index].take()
    }
}

impl Default for Supply {
    fn default() -> Self {
        Self::initialize(Self::DEFAULT_CAPACITY, None)
    }
}
