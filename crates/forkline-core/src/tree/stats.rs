use rand::Rng;
use rand_distr::{Distribution, Gamma, Normal};

/// Running mean over backed up results, as used by UCB1.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeanStats {
    visits: u64,
    value_sum: f64,
}

impl MeanStats {
    pub fn new() -> Self {
        MeanStats {
            visits: 0,
            value_sum: 0.0,
        }
    }

    /// Retrieve the amount of results folded into this statistic
    pub fn visits(&self) -> u64 {
        self.visits
    }

    /// Retrieve the sum of all recorded results.
    pub fn value_sum(&self) -> f64 {
        self.value_sum
    }

    /// Immediately records the result and increments the visits.
    pub fn record(&mut self, result: f64) {
        self.visits += 1;
        self.value_sum += result;
    }

    /// Helper function just to check if anything has been recorded yet
    pub fn is_unvisited(&self) -> bool {
        self.visits == 0
    }

    /// Mean of the recorded results, 0 when nothing was recorded.
    pub fn mean(&self) -> f64 {
        if self.is_unvisited() {
            0.0
        } else {
            self.value_sum / self.visits as f64
        }
    }
}

/// Prior for a fresh Normal-Gamma posterior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalGammaPrior {
    pub alpha: f64,
    pub beta: f64,
    /// Precision used whenever the posterior cannot give a usable one.
    pub fallback_precision: f64,
}

/// Normal-Gamma conjugate posterior over a node value with unknown mean and precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalGamma {
    alpha: f64,
    beta: f64,
    running_mean: f64,
    visits: u64,
    fallback_precision: f64,
}

impl NormalGamma {
    pub fn new(prior: NormalGammaPrior) -> Self {
        NormalGamma {
            alpha: prior.alpha,
            beta: prior.beta,
            running_mean: 0.0,
            visits: 0,
            fallback_precision: prior.fallback_precision,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn visits(&self) -> u64 {
        self.visits
    }

    pub fn mean(&self) -> f64 {
        self.running_mean
    }

    /// Fold one observed result into the posterior.
    ///
    /// With `v` prior observations and `n = 1` new one:
    /// `alpha += n/2`, `beta += (n*v/(v+n)) * (x - mean)^2 / 2`, then the mean moves towards `x`.
    pub fn record(&mut self, result: f64) {
        let n = 1.0;
        let v = self.visits as f64;
        let delta = result - self.running_mean;

        self.alpha += n / 2.0;
        self.beta += (n * v / (v + n)) * delta * delta / 2.0;
        self.running_mean = (v * self.running_mean + n * result) / (v + n);
        self.visits += 1;
    }

    /// Draw a precision from the Gamma posterior, scaled by the number of observations.
    /// Unvisited posteriors and degenerate draws use the fallback precision.
    pub fn sample_precision<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.visits == 0 {
            return self.fallback_precision;
        }

        let tau = match Gamma::new(self.alpha, 1.0 / self.beta) {
            Ok(gamma) => gamma.sample(rng),
            Err(_) => return self.fallback_precision,
        };

        let precision = tau * self.visits as f64;
        if precision.is_finite() && precision > 0.0 {
            precision
        } else {
            self.fallback_precision
        }
    }

    /// Draw a plausible value for this node from the posterior.
    /// Always finite for finite recorded results.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let precision = self.sample_precision(rng);
        let std_dev = 1.0 / precision.sqrt();

        match Normal::new(self.running_mean, std_dev) {
            Ok(normal) => {
                let draw = normal.sample(rng);
                if draw.is_finite() {
                    draw
                } else {
                    self.running_mean
                }
            }
            Err(_) => self.running_mean,
        }
    }
}

/// Per-node statistics, one variant per selection strategy.
/// RAVE variants carry an AMAF companion updated only from rollout occurrences.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Statistics {
    Ucb1(MeanStats),
    Thompson(NormalGamma),
    RaveUcb1 {
        primary: MeanStats,
        amaf: MeanStats,
    },
    RaveThompson {
        primary: NormalGamma,
        amaf: NormalGamma,
    },
}

impl Statistics {
    /// Fold a backed up result into the primary statistic.
    pub fn record(&mut self, result: f64) {
        match self {
            Statistics::Ucb1(stats) | Statistics::RaveUcb1 { primary: stats, .. } => {
                stats.record(result)
            }
            Statistics::Thompson(posterior)
            | Statistics::RaveThompson {
                primary: posterior, ..
            } => posterior.record(result),
        }
    }

    /// Fold a result into the AMAF companion.
    /// Returns `false` when this variant keeps no AMAF statistic.
    pub fn record_amaf(&mut self, result: f64) -> bool {
        match self {
            Statistics::RaveUcb1 { amaf, .. } => {
                amaf.record(result);
                true
            }
            Statistics::RaveThompson { amaf, .. } => {
                amaf.record(result);
                true
            }
            Statistics::Ucb1(_) | Statistics::Thompson(_) => false,
        }
    }

    /// Mean of the primary statistic.
    pub fn mean(&self) -> f64 {
        match self {
            Statistics::Ucb1(stats) | Statistics::RaveUcb1 { primary: stats, .. } => stats.mean(),
            Statistics::Thompson(posterior)
            | Statistics::RaveThompson {
                primary: posterior, ..
            } => posterior.mean(),
        }
    }

    /// Visits folded into the AMAF companion, 0 for variants without one.
    pub fn amaf_visits(&self) -> u64 {
        match self {
            Statistics::RaveUcb1 { amaf, .. } => amaf.visits(),
            Statistics::RaveThompson { amaf, .. } => amaf.visits(),
            Statistics::Ucb1(_) | Statistics::Thompson(_) => 0,
        }
    }

    /// Mean of the AMAF companion, if this variant keeps one.
    pub fn amaf_mean(&self) -> Option<f64> {
        match self {
            Statistics::RaveUcb1 { amaf, .. } => Some(amaf.mean()),
            Statistics::RaveThompson { amaf, .. } => Some(amaf.mean()),
            Statistics::Ucb1(_) | Statistics::Thompson(_) => None,
        }
    }
}
