use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::{MeanStats, NormalGamma, NormalGammaPrior, PruneParams, rave_alpha};

fn prior() -> NormalGammaPrior {
    NormalGammaPrior {
        alpha: 1.0,
        beta: 1.0,
        fallback_precision: 0.001,
    }
}

fn results() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-100.0f64..100.0, 1..64)
}

proptest! {
    #[test]
    fn mean_stats_match_arithmetic_mean(values in results()) {
        let mut stats = MeanStats::new();
        for value in &values {
            stats.record(*value);
        }
        let expected = values.iter().sum::<f64>() / values.len() as f64;

        prop_assert_eq!(stats.visits(), values.len() as u64);
        prop_assert!((stats.mean() - expected).abs() < 1e-9);
    }

    #[test]
    fn normal_gamma_tracks_mean_and_shape(values in results()) {
        let mut posterior = NormalGamma::new(prior());
        let mut previous_beta = posterior.beta();
        for value in &values {
            posterior.record(*value);
            prop_assert!(posterior.beta() >= previous_beta);
            previous_beta = posterior.beta();
        }
        let expected = values.iter().sum::<f64>() / values.len() as f64;

        prop_assert!((posterior.mean() - expected).abs() < 1e-9);
        prop_assert!((posterior.alpha() - (1.0 + values.len() as f64 / 2.0)).abs() < 1e-12);
    }

    #[test]
    fn thompson_draws_stay_finite(values in results(), seed in any::<u64>()) {
        let mut posterior = NormalGamma::new(prior());
        for value in &values {
            posterior.record(*value);
        }
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let precision = posterior.sample_precision(&mut rng);
        prop_assert!(precision.is_finite() && precision > 0.0);
        prop_assert!(posterior.sample(&mut rng).is_finite());
    }

    #[test]
    fn rave_weight_stays_in_unit_interval(equivalence in 1.0f64..1e4, visits in 0u64..20_000) {
        let alpha = rave_alpha(equivalence, visits);
        prop_assert!((0.0..=1.0).contains(&alpha));
    }

    #[test]
    fn retained_never_drops_below_minimum(
        alpha in 0.0f64..5.0,
        min_retained in 1usize..8,
        children in 1usize..200,
    ) {
        let params = PruneParams { alpha, min_retained, visit_threshold: 0 };
        prop_assert!(params.retained(children) >= min_retained);
    }
}
