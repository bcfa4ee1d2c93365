use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Resource the search loop is bounded by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetKind {
    /// Wall-clock milliseconds.
    Time,
    /// Completed iterations.
    Iterations,
    /// State advances, counting expansions and rollout steps.
    ForwardModelCalls,
}

/// Immutable per-search limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub kind: BudgetKind,
    pub limit: u64,
}

impl Budget {
    pub fn iterations(limit: u64) -> Self {
        Budget {
            kind: BudgetKind::Iterations,
            limit,
        }
    }

    pub fn time_ms(limit: u64) -> Self {
        Budget {
            kind: BudgetKind::Time,
            limit,
        }
    }

    pub fn forward_model_calls(limit: u64) -> Self {
        Budget {
            kind: BudgetKind::ForwardModelCalls,
            limit,
        }
    }
}

impl Default for Budget {
    fn default() -> Self {
        Budget::iterations(1000)
    }
}

/// Tracks spending against a `Budget` and decides when to stop.
/// Checked only between iterations, so an iteration in flight always completes.
#[derive(Debug, Clone)]
pub struct BudgetController {
    budget: Budget,
    break_margin: Duration,
    started: Instant,
    iteration_started: Instant,
    iterations: u64,
    forward_model_calls: u64,
    calls_at_iteration_start: u64,
    idle_iterations: u64,
    iteration_time: Duration,
}

impl BudgetController {
    pub fn new(budget: Budget, break_ms: u64) -> Self {
        let now = Instant::now();
        BudgetController {
            budget,
            break_margin: Duration::from_millis(break_ms),
            started: now,
            iteration_started: now,
            iterations: 0,
            forward_model_calls: 0,
            calls_at_iteration_start: 0,
            idle_iterations: 0,
            iteration_time: Duration::ZERO,
        }
    }

    pub fn begin_iteration(&mut self) {
        self.iteration_started = Instant::now();
        self.calls_at_iteration_start = self.forward_model_calls;
    }

    /// Close the current iteration and fold its duration into the rolling mean.
    ///
    /// An iteration that advanced no state (every reachable leaf terminal or at
    /// the depth cap) still spends one unit of a forward-model-call budget, so a
    /// saturated tree cannot keep the loop alive.
    pub fn end_iteration(&mut self) {
        self.iterations += 1;
        self.iteration_time += self.iteration_started.elapsed();
        if self.forward_model_calls == self.calls_at_iteration_start {
            self.idle_iterations += 1;
        }
    }

    pub fn charge_forward_model_calls(&mut self, calls: u64) {
        self.forward_model_calls += calls;
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn forward_model_calls(&self) -> u64 {
        self.forward_model_calls
    }

    /// Completed iterations that charged no forward-model calls.
    pub fn idle_iterations(&self) -> u64 {
        self.idle_iterations
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Mean wall-clock duration of the completed iterations.
    pub fn average_iteration(&self) -> Duration {
        if self.iterations == 0 {
            Duration::ZERO
        } else {
            self.iteration_time.div_f64(self.iterations as f64)
        }
    }

    /// Whether another iteration should be started.
    pub fn is_exhausted(&self) -> bool {
        match self.budget.kind {
            BudgetKind::Iterations => self.iterations >= self.budget.limit,
            BudgetKind::ForwardModelCalls => {
                self.forward_model_calls + self.idle_iterations >= self.budget.limit
            }
            BudgetKind::Time => {
                let limit = Duration::from_millis(self.budget.limit);
                let remaining = limit.saturating_sub(self.elapsed());
                remaining <= self.break_margin.max(self.average_iteration() * 2)
            }
        }
    }
}
