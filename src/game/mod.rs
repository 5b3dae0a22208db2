//! The coffee tin game.
//!
//! Two beans are taken out of the tin. If they have the same color they are
//! thrown away and a blue bean from the supply goes back in; otherwise a green
//! bean goes back in. This repeats until fewer than two beans remain.
//!
//! Each step removes either zero or two green beans, so the parity of the
//! green count never changes: the last bean is green iff the tin started with
//! an odd number of greens.

use tokio_stream::{Stream, StreamExt};
use tracing::{debug, error, info, warn};

use crate::model::{Bean, describe};
use crate::tin::{Tin, TinError};

mod supply;
pub use supply::Supply;

mod error;
pub use error::GameError;

/// Whether a tin can still be reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// At least two beans left.
    Running,
    /// Zero or one bean left.
    Terminated,
}

pub fn phase(tin: &Tin) -> Phase {
    if tin.has_at_least_two() {
        Phase::Running
    } else {
        Phase::Terminated
    }
}

/// Color of the bean that replaces a drawn pair.
pub fn replacement(first: Bean, second: Bean) -> Bean {
    if first == second {
        Bean::MERGE
    } else {
        Bean::MIXED
    }
}

/// Perform one reduction step: draw two beans, take their replacement from
/// the supply and put it into the tin. Returns the replacement.
pub fn step(tin: &mut Tin, supply: &mut Supply) -> Result<Bean, GameError> {
    let (first, second) = tin.take_two().ok_or(TinError::NotEnoughBeans {
        occupied: tin.occupied(),
    })?;
    let wanted = replacement(first, second);
    let drawn = supply
        .draw(wanted)
        .ok_or(GameError::SupplyExhausted(wanted))?;
    let slot = tin.put_in(drawn)?;
    debug!(%first, %second, replacement = %drawn, slot, "step");
    Ok(drawn)
}

/// Result of reducing a tin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// The bean left over, `None` for an empty tin.
    pub last: Option<Bean>,
    /// Number of reduction steps performed.
    pub steps: usize,
}

/// Reduce the tin until fewer than two beans remain.
pub fn play(tin: &mut Tin, supply: &mut Supply) -> Result<Outcome, GameError> {
    let mut steps = 0;
    while phase(tin) == Phase::Running {
        step(tin, supply)?;
        steps += 1;
    }
    Ok(Outcome {
        last: tin.any_bean(),
        steps,
    })
}

/// Reduce the tin and return the last bean, if any.
pub fn reduce(tin: &mut Tin, supply: &mut Supply) -> Result<Option<Bean>, GameError> {
    play(tin, supply).map(|outcome| outcome.last)
}

/// The last bean a tin must end with, predicted from its green count alone.
pub fn expected_last(tin: &Tin) -> Option<Bean> {
    if tin.occupied() == 0 {
        None
    } else if tin.count(Bean::Green) % 2 == 1 {
        Some(Bean::Green)
    } else {
        Some(Bean::Blue)
    }
}

/// A handful of demonstration tins.
pub fn sample_tins() -> Vec<Tin> {
    use Bean::{Blue, Green};

    vec![
        Tin::new([Blue, Blue, Blue, Green, Green]),
        Tin::new([Blue, Blue, Blue, Green, Green, Green]),
        Tin::new([Green]),
        Tin::new([Blue]),
        Tin::new([Blue, Green]),
    ]
}

/// Summary of one game played by a [`Game`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub before: Tin,
    pub after: Tin,
    /// Green beans in the tin before the game.
    pub greens: usize,
    pub expected: Option<Bean>,
    pub outcome: Outcome,
}

impl Report {
    /// Whether the last bean matches the parity prediction.
    pub fn is_expected(&self) -> bool {
        self.outcome.last == self.expected
    }
}

/// Plays tins one after another against a single shared supply.
pub struct Game {
    supply: Supply,
}

/// Public API
impl Game {
    pub fn new(supply: Supply) -> Self {
        Self { supply }
    }

    pub fn supply(&self) -> &Supply {
        &self.supply
    }

    /// Play every tin of the stream in turn.
    /// A failed game is logged and skipped; the supply stays depleted.
    pub async fn run(&mut self, mut stream: impl Stream<Item = Tin> + Unpin) -> Vec<Report> {
        let mut reports = Vec::new();
        while let Some(tin) = stream.next().await {
            if let Ok(report) = self.play(tin) {
                reports.push(report);
            }
        }
        reports
    }

    /// Play a single tin to the end.
    pub fn play(&mut self, tin: Tin) -> Result<Report, GameError> {
        let before = tin.clone();
        let mut after = tin;
        let result = play(&mut after, &mut self.supply).map(|outcome| Report {
            greens: before.count(Bean::Green),
            expected: expected_last(&before),
            before: before.clone(),
            after,
            outcome,
        });
        Self::log_result(&before, &result);
        result
    }
}

/// Private API
impl Game {
    /// Small helper to log `play` results
    fn log_result(tin: &Tin, result: &Result<Report, GameError>) {
        match result {
            Ok(report) if report.is_expected() => {
                info!(
                    tin = %tin,
                    greens = report.greens,
                    steps = report.outcome.steps,
                    last = %describe(report.outcome.last),
                    "game finished"
                );
            }
            Ok(report) => {
                error!(
                    tin = %tin,
                    greens = report.greens,
                    last = %describe(report.outcome.last),
                    expected = %describe(report.expected),
                    "wrong last bean"
                );
            }
            Err(e) => {
                warn!(tin = %tin, reason = %e, "game aborted");
            }
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(Supply::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Bean::{Blue, Green};
    use test_case::test_case;

    fn tin(s: &str) -> Tin {
        s.parse().unwrap()
    }

    fn supply(seed: u64) -> Supply {
        Supply::initialize(Supply::DEFAULT_CAPACITY, Some(seed))
    }

    // Replacement rule

    #[test]
    fn same_colors_merge_into_blue() {
        assert_eq!(replacement(Blue, Blue), Blue);
        assert_eq!(replacement(Green, Green), Blue);
    }

    #[test]
    fn different_colors_yield_green() {
        assert_eq!(replacement(Blue, Green), Green);
        assert_eq!(replacement(Green, Blue), Green);
    }

    // Phase

    #[test]
    fn phase_follows_bean_count() {
        assert_eq!(phase(&tin("")), Phase::Terminated);
        assert_eq!(phase(&tin("--G")), Phase::Terminated);
        assert_eq!(phase(&tin("B-G")), Phase::Running);
    }

    // Step

    #[test]
    fn step_shrinks_tin_by_one() {
        let mut tin = tin("GGB");
        let mut supply = supply(0);
        assert_eq!(step(&mut tin, &mut supply).unwrap(), Blue);
        assert_eq!(tin.to_string(), "B-B");
        assert_eq!(supply.remaining(Blue), 9);
        assert_eq!(supply.remaining(Green), 10);
    }

    #[test]
    fn step_on_single_bean_fails() {
        let mut tin = tin("-B");
        let result = step(&mut tin, &mut supply(0));
        assert_eq!(
            result,
            Err(GameError::Tin(TinError::NotEnoughBeans { occupied: 1 }))
        );
        assert_eq!(tin.to_string(), "-B");
    }

    // Reduce

    #[test]
    fn reduce_empty_tin_returns_none() {
        let mut tin = Tin::default();
        let outcome = play(&mut tin, &mut supply(0)).unwrap();
        assert_eq!(outcome, Outcome { last: None, steps: 0 });
    }

    #[test]
    fn reduce_single_bean_returns_it_unchanged() {
        let mut supply = supply(0);
        for bean in [Blue, Green] {
            let mut tin = Tin::new([bean]);
            let outcome = play(&mut tin, &mut supply).unwrap();
            assert_eq!(outcome, Outcome { last: Some(bean), steps: 0 });
        }
        assert_eq!(supply.remaining(Blue), 10);
        assert_eq!(supply.remaining(Green), 10);
    }

    #[test_case("BBBGG", Blue; "two greens")]
    #[test_case("BBBGGG", Green; "three greens")]
    #[test_case("G", Green; "single green")]
    #[test_case("B", Blue; "single blue")]
    #[test_case("BG", Green; "one of each")]
    #[test_case("GG", Blue; "green pair")]
    #[test_case("GBGBGBG", Blue; "four greens interleaved")]
    fn reduce_sample(tin_str: &str, expected: Bean) {
        let mut tin = tin(tin_str);
        assert_eq!(reduce(&mut tin, &mut supply(7)).unwrap(), Some(expected));
        assert_eq!(tin.occupied(), 1);
        assert_eq!(tin.len(), tin_str.len());
    }

    #[test]
    fn reduce_takes_one_step_per_removed_bean() {
        let mut tin = tin("BBBGGG");
        let outcome = play(&mut tin, &mut supply(3)).unwrap();
        assert_eq!(outcome.steps, 5);
    }

    #[test]
    fn parity_law_holds_for_all_small_tins() {
        // every blue/green arrangement up to 8 beans, each with several seeds
        for len in 0..=8usize {
            for mask in 0..(1u32 << len) {
                let beans = (0..len).map(|i| if mask & (1 << i) != 0 { Green } else { Blue });
                let start = Tin::new(beans);
                for seed in 0..4 {
                    let mut tin = start.clone();
                    let outcome = play(&mut tin, &mut supply(seed)).unwrap();
                    assert_eq!(outcome.last, expected_last(&start), "tin {start}");
                    assert!(tin.occupied() <= 1);
                    assert_eq!(outcome.steps, len.saturating_sub(1));
                }
            }
        }
    }

    #[test]
    fn parity_law_holds_whatever_the_draw_order() {
        // shuffle slot order to change which beans are paired
        use rand::SeedableRng;
        use rand::rngs::SmallRng;
        use rand::seq::SliceRandom;

        let mut rng = SmallRng::seed_from_u64(99);
        for greens in 0..6 {
            let mut beans: Vec<Bean> = std::iter::repeat_n(Green, greens)
                .chain(std::iter::repeat_n(Blue, 4))
                .collect();
            for seed in 0..16 {
                beans.shuffle(&mut rng);
                let mut tin = Tin::new(beans.iter().copied());
                let last = reduce(&mut tin, &mut supply(seed)).unwrap();
                let want = if greens % 2 == 1 { Green } else { Blue };
                assert_eq!(last, Some(want));
            }
        }
    }

    #[test]
    fn same_seed_same_result() {
        let run = || {
            let mut tin = tin("GBGGBBG");
            let mut supply = supply(11);
            let last = reduce(&mut tin, &mut supply).unwrap();
            (last, tin, supply.slots().to_vec())
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn exhausted_supply_is_an_error() {
        let mut supply = supply(0);
        while supply.draw(Blue).is_some() {}

        // a same-colored pair needs a blue replacement
        let mut tin = tin("GG");
        let result = reduce(&mut tin, &mut supply);
        assert_eq!(result, Err(GameError::SupplyExhausted(Blue)));
        // no bean was put back in place of the missing one
        assert_eq!(tin.occupied(), 0);
    }

    #[test]
    fn exhausted_green_supply_fails_mixed_pair() {
        let mut supply = Supply::initialize(3, Some(0));
        assert_eq!(supply.draw(Green), Some(Green));

        let result = reduce(&mut tin("BG"), &mut supply);
        assert_eq!(result, Err(GameError::SupplyExhausted(Green)));
    }

    // Expected last

    #[test]
    fn expected_last_follows_green_parity() {
        assert_eq!(expected_last(&tin("")), None);
        assert_eq!(expected_last(&tin("---")), None);
        assert_eq!(expected_last(&tin("BBB")), Some(Blue));
        assert_eq!(expected_last(&tin("BGG")), Some(Blue));
        assert_eq!(expected_last(&tin("G-GG")), Some(Green));
    }

    // Game

    #[test]
    fn game_plays_samples_against_shared_supply() {
        let mut game = Game::new(supply(5));
        let reports: Vec<_> = sample_tins()
            .into_iter()
            .map(|tin| game.play(tin).unwrap())
            .collect();

        assert!(reports.iter().all(Report::is_expected));
        let lasts: Vec<_> = reports.iter().map(|r| r.outcome.last).collect();
        assert_eq!(
            lasts,
            vec![Some(Blue), Some(Green), Some(Green), Some(Blue), Some(Green)]
        );

        // 4 + 5 + 0 + 0 + 1 steps, each drawing one bean from the shared supply
        let steps: usize = reports.iter().map(|r| r.outcome.steps).sum();
        assert_eq!(steps, 10);
        let left = game.supply().remaining(Blue) + game.supply().remaining(Green);
        assert_eq!(left, 20 - steps);
    }

    #[test]
    fn game_report_keeps_before_and_after() {
        let mut game = Game::new(supply(0));
        let report = game.play(tin("BBBGG")).unwrap();
        assert_eq!(report.before.to_string(), "BBBGG");
        assert_eq!(report.after.occupied(), 1);
        assert_eq!(report.greens, 2);
        assert_eq!(report.expected, Some(Blue));
    }

    #[tokio::test]
    async fn run_plays_all_tins() {
        let mut game = Game::new(supply(0));
        let reports = game.run(tokio_stream::iter(sample_tins())).await;
        assert_eq!(reports.len(), 5);
        assert!(reports.iter().all(Report::is_expected));
    }

    #[tokio::test]
    async fn run_skips_failed_games_and_continues() {
        // 3 blue and 3 green spares
        let mut game = Game::new(Supply::initialize(9, Some(0)));
        let tins = vec![
            tin("GGGGG"), // alternates merge and mixed pairs: 2 blue, 2 green
            tin("BBBBB"), // four merges, runs out of blue on the second
            tin("G"),     // no draw needed
        ];
        let reports = game.run(tokio_stream::iter(tins)).await;

        let befores: Vec<_> = reports.iter().map(|r| r.before.to_string()).collect();
        assert_eq!(befores, vec!["GGGGG", "G"]);
        assert_eq!(reports[0].outcome.last, Some(Green));
        assert_eq!(game.supply().remaining(Blue), 0);
        assert_eq!(game.supply().remaining(Green), 1);
    }
}
