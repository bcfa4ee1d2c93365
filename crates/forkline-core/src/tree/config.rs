use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tree::{
    budget::Budget,
    ids::PlayerIndex,
    prune::PruneParams,
    selection::{Recommendation, Selector, Strategy},
    stats::NormalGammaPrior,
};

const DEFAULT_SEARCH_CONFIG_YAML: &str = include_str!("../../config/search.default.yaml");

/// Search configuration for one decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// UCB1 exploration constant `K`.
    pub exploration_constant: f64,
    /// Random steps after the expanded node; 0 scores the expanded node directly.
    pub rollout_length: usize,
    pub max_tree_depth: u64,
    /// Guards divisions by zero visits and bounds the tie-break noise.
    pub epsilon: f64,
    pub budget: Budget,
    /// Safety margin for time budgets, in milliseconds.
    pub break_ms: u64,
    pub strategy: Strategy,
    pub amaf_enabled: bool,
    /// RAVE equivalence parameter `V`.
    pub amaf_equivalence: f64,
    pub pruning_enabled: bool,
    pub prune_alpha: f64,
    pub min_retained: usize,
    pub prune_visit_threshold: u64,
    pub recommendation: Recommendation,
    pub random_seed: u64,
    pub prior_alpha: f64,
    pub prior_beta: f64,
    pub fallback_precision: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            exploration_constant: std::f64::consts::SQRT_2,
            rollout_length: 10,
            max_tree_depth: 1000,
            epsilon: 1e-6,
            budget: Budget::default(),
            break_ms: 10,
            strategy: Strategy::Ucb1,
            amaf_enabled: false,
            amaf_equivalence: 100.0,
            pruning_enabled: false,
            prune_alpha: 2.0,
            min_retained: 2,
            prune_visit_threshold: 50,
            recommendation: Recommendation::MostVisited,
            random_seed: 42,
            prior_alpha: 1.0,
            prior_beta: 1.0,
            fallback_precision: 0.001,
        }
    }
}

impl SearchConfig {
    /// Parse a search config from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SearchConfigError> {
        let config: SearchConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a search config from a YAML file path.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self, SearchConfigError> {
        let yaml = fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Return the default YAML config included with this crate.
    pub fn default_yaml() -> &'static str {
        DEFAULT_SEARCH_CONFIG_YAML
    }

    /// Parse the default YAML config included with this crate.
    pub fn from_default_yaml() -> Result<Self, SearchConfigError> {
        Self::from_yaml_str(Self::default_yaml())
    }

    /// Serialize this config back to YAML.
    pub fn to_yaml(&self) -> Result<String, SearchConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), SearchConfigError> {
        if self.budget.limit == 0 {
            return invalid("budget limit must be greater than 0");
        }
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return invalid("exploration_constant must be finite and >= 0");
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return invalid("epsilon must be finite and > 0");
        }
        if self.max_tree_depth == 0 {
            return invalid("max_tree_depth must be greater than 0");
        }
        if !self.amaf_equivalence.is_finite() || self.amaf_equivalence <= 0.0 {
            return invalid("amaf_equivalence must be finite and > 0");
        }
        if !self.prune_alpha.is_finite() || self.prune_alpha < 0.0 {
            return invalid("prune_alpha must be finite and >= 0");
        }
        if self.min_retained == 0 {
            return invalid("min_retained must be greater than 0");
        }
        for (name, value) in [
            ("prior_alpha", self.prior_alpha),
            ("prior_beta", self.prior_beta),
            ("fallback_precision", self.fallback_precision),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SearchConfigError::Invalid(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn prior(&self) -> NormalGammaPrior {
        NormalGammaPrior {
            alpha: self.prior_alpha,
            beta: self.prior_beta,
            fallback_precision: self.fallback_precision,
        }
    }

    pub(crate) fn selector(&self, searcher: PlayerIndex) -> Selector {
        Selector {
            exploration_constant: self.exploration_constant,
            epsilon: self.epsilon,
            amaf_equivalence: self.amaf_equivalence,
            searcher,
        }
    }

    pub(crate) fn prune_params(&self) -> PruneParams {
        PruneParams {
            alpha: self.prune_alpha,
            min_retained: self.min_retained,
            visit_threshold: self.prune_visit_threshold,
        }
    }
}

fn invalid(message: &str) -> Result<(), SearchConfigError> {
    Err(SearchConfigError::Invalid(message.to_string()))
}

/// Error type for loading and validating `SearchConfig`.
#[derive(Debug, Error)]
pub enum SearchConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid search config: {0}")]
    Invalid(String),
}
