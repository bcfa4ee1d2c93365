use forkline_core::{GameState, Heuristic, PlayerIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Take `take` tokens from heap `heap`.
pub struct NimMove {
    pub heap: usize,
    pub take: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Two-player Nim with a per-move cap. Whoever takes the last token wins.
pub struct Nim {
    heaps: Vec<u32>,
    max_take: u32,
    player: PlayerIndex,
}

impl Nim {
    /// Fresh game with player 0 to move. A `max_take` of 0 is treated as 1.
    pub fn new(heaps: Vec<u32>, max_take: u32) -> Self {
        Self {
            heaps,
            max_take: max_take.max(1),
            player: PlayerIndex::from(0),
        }
    }

    pub fn heaps(&self) -> &[u32] {
        &self.heaps
    }

    pub fn max_take(&self) -> u32 {
        self.max_take
    }

    /// Sprague-Grundy value of the position; 0 means the player to move loses with best play.
    pub fn grundy(&self) -> u32 {
        self.heaps
            .iter()
            .fold(0, |acc, heap| acc ^ (heap % (self.max_take + 1)))
    }

    /// Player who took the last token, once the game is over.
    pub fn winner(&self) -> Option<PlayerIndex> {
        self.is_terminal().then(|| other(self.player))
    }
}

fn other(player: PlayerIndex) -> PlayerIndex {
    PlayerIndex::from(1 - player.index().min(1))
}

impl GameState for Nim {
    type Action = NimMove;

    fn is_terminal(&self) -> bool {
        self.heaps.iter().all(|heap| *heap == 0)
    }

    fn current_player(&self) -> PlayerIndex {
        self.player
    }

    fn legal_actions(&self) -> Vec<NimMove> {
        self.heaps
            .iter()
            .enumerate()
            .flat_map(|(heap, size)| {
                (1..=(*size).min(self.max_take)).map(move |take| NimMove { heap, take })
            })
            .collect()
    }

    fn apply_action(&self, action: &NimMove) -> Self {
        let mut next = self.clone();
        if let Some(heap) = next.heaps.get_mut(action.heap) {
            *heap = heap.saturating_sub(action.take);
        }
        next.player = other(self.player);
        next
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Scores finished games as +1/-1 and unfinished ones by who is winning under perfect play.
pub struct NimHeuristic {
    /// Magnitude given to unfinished positions; 0 scores them as a draw.
    pub position_weight: f64,
}

impl Heuristic<Nim> for NimHeuristic {
    fn evaluate(&self, state: &Nim, player: PlayerIndex) -> f64 {
        if let Some(winner) = state.winner() {
            return if winner == player { 1.0 } else { -1.0 };
        }

        let mover_wins = state.grundy() != 0;
        if mover_wins == (state.current_player() == player) {
            self.position_weight
        } else {
            -self.position_weight
        }
    }
}
