//! Stochastic hill climbing over neighbor snapshots.

use rand::{Rng, SeedableRng};
use rand_pcg::Mcg128Xsl64;

use super::{score, DayWindow, InitialPlacer, NeighborOperator, SchedulerConfig, Snapshot};
use crate::task::TaskRecord;

/// Result of an optimization run.
#[derive(Debug, Clone)]
pub struct Optimization {
    /// Best snapshot found
    pub snapshot: Snapshot,
    /// Score of `snapshot`
    pub score: f64,
    /// Score of the greedy starting point
    pub initial_score: f64,
    /// Iterations performed
    pub iterations: usize,
    /// Iterations whose best neighbor was accepted
    pub accepted_moves: usize,
    /// Current score after each iteration; never increases
    pub trace: Vec<f64>,
}

/// Greedy descent driver.
///
/// Each iteration samples `neighbors_per_iteration` independent neighbors of
/// the current snapshot and moves to the best one only if it is strictly
/// better. There is no temperature and no restart, so the search can settle
/// in a local minimum.
pub struct HillClimber {
    config: SchedulerConfig,
}

impl HillClimber {
    /// Create a new climber with default config
    pub fn new() -> Self {
        Self {
            config: SchedulerConfig::default(),
        }
    }

    /// Create with custom config
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// Optimize using the configured seed, or entropy when none is set.
    pub fn optimize(&self, tasks: &[TaskRecord], window: DayWindow) -> Optimization {
        let mut rng = match self.config.seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        self.run(tasks, window, &mut rng)
    }

    /// Optimize drawing all randomness from `rng`.
    pub fn run<R: Rng>(
        &self,
        tasks: &[TaskRecord],
        window: DayWindow,
        rng: &mut R,
    ) -> Optimization {
        let mut current = InitialPlacer::new(&self.config).place(tasks, window);
        let mut current_score = score(&current, tasks);
        let initial_score = current_score;
        let operator = NeighborOperator::new(tasks, window, &self.config);

        let mut accepted_moves = 0;
        let mut trace = Vec::with_capacity(self.config.max_iterations);

        for iteration in 0..self.config.max_iterations {
            if let Some((candidate, candidate_score)) =
                self.best_neighbor(&operator, &current, tasks, rng)
            {
                if candidate_score < current_score {
                    tracing::debug!(
                        iteration,
                        from = current_score,
                        to = candidate_score,
                        "accepted neighbor"
                    );
                    current = candidate;
                    current_score = candidate_score;
                    accepted_moves += 1;
                }
            }
            trace.push(current_score);
        }

        tracing::debug!(
            iterations = self.config.max_iterations,
            accepted_moves,
            initial_score,
            final_score = current_score,
            "hill climbing finished"
        );

        Optimization {
            snapshot: current,
            score: current_score,
            initial_score,
            iterations: self.config.max_iterations,
            accepted_moves,
            trace,
        }
    }

    /// Lowest-scoring neighbor of `current`; the first one wins ties.
    ///
    /// Every candidate gets its own generator seeded from `rng`, so the
    /// candidates are independent of the order they are built in.
    fn best_neighbor<R: Rng>(
        &self,
        operator: &NeighborOperator<'_>,
        current: &Snapshot,
        tasks: &[TaskRecord],
        rng: &mut R,
    ) -> Option<(Snapshot, f64)> {
        let mut best: Option<(Snapshot, f64)> = None;
        for _ in 0..self.config.neighbors_per_iteration {
            let mut local = Mcg128Xsl64::seed_from_u64(rng.gen());
            let candidate = operator.neighbor(current, &mut local);
            let candidate_score = score(&candidate, tasks);
            if best.as_ref().map_or(true, |(_, s)| candidate_score < *s) {
                best = Some((candidate, candidate_score));
            }
        }
        best
    }
}

impl Default for HillClimber {
    fn default() -> Self {
        Self::new()
    }
}
