use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    game::GameState,
    tree::{
        ids::PlayerIndex,
        node::Node,
        stats::{MeanStats, NormalGamma, NormalGammaPrior, Statistics},
    },
};

/// Which statistic each node keeps and how children are compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Running mean plus a confidence bonus.
    #[default]
    Ucb1,
    /// Samples from a Normal-Gamma posterior per child.
    ThompsonSampling,
    /// UCB1 blended with an AMAF estimate.
    RaveUcb1,
    /// Thompson sampling blended with an AMAF estimate.
    RaveThompson,
}

impl Strategy {
    /// Fresh statistics for a node created under this strategy.
    pub fn new_statistics(&self, prior: NormalGammaPrior) -> Statistics {
        match self {
            Strategy::Ucb1 => Statistics::Ucb1(MeanStats::new()),
            Strategy::ThompsonSampling => Statistics::Thompson(NormalGamma::new(prior)),
            Strategy::RaveUcb1 => Statistics::RaveUcb1 {
                primary: MeanStats::new(),
                amaf: MeanStats::new(),
            },
            Strategy::RaveThompson => Statistics::RaveThompson {
                primary: NormalGamma::new(prior),
                amaf: NormalGamma::new(prior),
            },
        }
    }
}

/// Explore adds uncertainty (bonus term or posterior draw), Exploit never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Explore,
    Exploit,
}

/// How the final root action is picked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    /// Most visited child wins; robust against reward noise.
    #[default]
    MostVisited,
    /// Highest exploitation value wins.
    BestValue,
}

/// Share of the AMAF estimate in a RAVE blend: `max(0, (V - n) / V)`.
pub fn rave_alpha(equivalence: f64, visits: u64) -> f64 {
    ((equivalence - visits as f64) / equivalence).max(0.0)
}

/// UCB1 exploration bonus `K * sqrt(ln(parent + 1) / (child + eps))`.
pub fn ucb_bonus(exploration_constant: f64, parent_visits: u64, child_visits: u64, epsilon: f64) -> f64 {
    exploration_constant * ((parent_visits as f64 + 1.0).ln() / (child_visits as f64 + epsilon)).sqrt()
}

/// Computes comparable child values for one search.
/// Values are always oriented for the player moving at the parent.
#[derive(Debug, Clone, Copy)]
pub struct Selector {
    pub exploration_constant: f64,
    pub epsilon: f64,
    pub amaf_equivalence: f64,
    pub searcher: PlayerIndex,
}

impl Selector {
    /// +1 when the searching player moves at `parent`, -1 for an opponent.
    fn orientation<S: GameState>(&self, parent: &Node<S>) -> f64 {
        if parent.player_to_move() == self.searcher {
            1.0
        } else {
            -1.0
        }
    }

    /// Value of `child` as seen from `parent`.
    /// Thompson variants consume randomness in Explore mode; everything else is deterministic.
    pub fn child_value<S: GameState, R: Rng + ?Sized>(
        &self,
        parent: &Node<S>,
        child: &Node<S>,
        mode: SelectionMode,
        rng: &mut R,
    ) -> f64 {
        let sign = self.orientation(parent);
        let parent_visits = parent.visits();
        let child_visits = child.visits();

        match (child.stats(), mode) {
            (Statistics::Ucb1(stats), SelectionMode::Explore) => {
                sign * stats.mean()
                    + ucb_bonus(self.exploration_constant, parent_visits, child_visits, self.epsilon)
            }
            (Statistics::Thompson(posterior), SelectionMode::Explore) => sign * posterior.sample(rng),
            (Statistics::RaveUcb1 { primary, amaf }, SelectionMode::Explore) => {
                let primary_value = sign * primary.mean()
                    + ucb_bonus(self.exploration_constant, parent_visits, child_visits, self.epsilon);
                if amaf.is_unvisited() {
                    return primary_value;
                }
                let amaf_value = sign * amaf.mean()
                    + ucb_bonus(self.exploration_constant, parent_visits, amaf.visits(), self.epsilon);
                self.blend(child_visits, amaf_value, primary_value)
            }
            (Statistics::RaveThompson { primary, amaf }, SelectionMode::Explore) => {
                let primary_value = sign * primary.sample(rng);
                if amaf.visits() == 0 {
                    return primary_value;
                }
                let amaf_value = sign * amaf.sample(rng);
                self.blend(child_visits, amaf_value, primary_value)
            }
            (_, SelectionMode::Exploit) => self.exploit_value(parent, child),
        }
    }

    /// Value of `child` without any exploration term: the (blended) mean, oriented for `parent`.
    /// An AMAF statistic with no data never takes part in a blend.
    pub fn exploit_value<S: GameState>(&self, parent: &Node<S>, child: &Node<S>) -> f64 {
        let sign = self.orientation(parent);
        let stats = child.stats();
        match stats.amaf_mean().filter(|_| stats.amaf_visits() > 0) {
            Some(amaf_mean) => self.blend(child.visits(), sign * amaf_mean, sign * stats.mean()),
            None => sign * stats.mean(),
        }
    }

    fn blend(&self, child_visits: u64, amaf_value: f64, primary_value: f64) -> f64 {
        let alpha = rave_alpha(self.amaf_equivalence, child_visits);
        alpha * amaf_value + (1.0 - alpha) * primary_value
    }

    /// Seeded tie-break noise, bounded by epsilon.
    pub fn noise<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.gen_range(0.0..1.0) * self.epsilon
    }
}
