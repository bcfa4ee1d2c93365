use std::collections::HashSet;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::{
    game::GameState,
    tree::{
        error::TreeError,
        ids::{ActionId, PlayerIndex},
    },
};

/// Picks actions during the simulated continuation from a freshly expanded node.
pub trait RolloutPolicy<S: GameState> {
    /// Return an index into `actions`. `actions` is never empty.
    fn choose_action(&mut self, state: &S, actions: &[S::Action], rng: &mut ChaCha8Rng) -> ActionId;
}

/// Default rollout policy: uniform over the legal actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformRollout;

impl<S: GameState> RolloutPolicy<S> for UniformRollout {
    fn choose_action(&mut self, _state: &S, actions: &[S::Action], rng: &mut ChaCha8Rng) -> ActionId {
        ActionId::from(rng.gen_range(0..actions.len()))
    }
}

/// Closures work as rollout policies too.
impl<S, F> RolloutPolicy<S> for F
where
    S: GameState,
    F: FnMut(&S, &[S::Action], &mut ChaCha8Rng) -> ActionId,
{
    fn choose_action(&mut self, state: &S, actions: &[S::Action], rng: &mut ChaCha8Rng) -> ActionId {
        self(state, actions, rng)
    }
}

/// Rollout parameters controlling stopping criteria and AMAF bookkeeping.
#[derive(Debug, Clone, Copy)]
pub struct RolloutParams {
    /// Maximum simulated steps; 0 evaluates the start state directly.
    pub rollout_length: usize,
    /// Record the searching player's own actions for AMAF.
    pub track_amaf: bool,
    pub searcher: PlayerIndex,
}

/// What one rollout leaves behind for the backup.
#[derive(Debug, Clone)]
pub struct RolloutRecord<A> {
    /// Simulated steps taken, each one a forward-model call.
    pub steps: usize,
    /// Actions taken by the searching player, only filled when AMAF is on.
    pub amaf_actions: HashSet<A>,
}

impl<A> RolloutRecord<A> {
    fn new() -> Self {
        RolloutRecord {
            steps: 0,
            amaf_actions: HashSet::new(),
        }
    }
}

/// Run a default-policy rollout from a disposable copy of `start`.
///
/// Each step counts as one forward-model call. Returns the final state with the record.
pub fn rollout<S, P>(
    start: &S,
    policy: &mut P,
    params: RolloutParams,
    rng: &mut ChaCha8Rng,
) -> Result<(S, RolloutRecord<S::Action>), TreeError>
where
    S: GameState,
    P: RolloutPolicy<S> + ?Sized,
{
    let mut state = start.clone();
    let mut record = RolloutRecord::new();

    while record.steps < params.rollout_length && !state.is_terminal() {
        let actions = state.legal_actions();
        if actions.is_empty() {
            break;
        }

        let action_id = policy.choose_action(&state, &actions, rng);
        let action = actions
            .get(action_id.index())
            .ok_or(TreeError::InvalidRolloutAction {
                action_id,
                num_actions: actions.len(),
            })?;

        if params.track_amaf && state.current_player() == params.searcher {
            record.amaf_actions.insert(action.clone());
        }

        state = state.apply_action(action);
        record.steps += 1;
    }

    Ok((state, record))
}
