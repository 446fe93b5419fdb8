//! Serializable match state. Mutated only by [`crate::LegStateMachine`].

use serde::{Deserialize, Serialize};

use crate::ring::Dart;
use crate::rules::X01Rules;

/// Up to three darts thrown by one player in one turn.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    pub darts: Vec<Dart>,
    /// Points scored; 0 for a bust.
    pub total: u32,
    /// Darts that landed before the player opened (double-in).
    pub pre_open_darts: u32,
    /// Darts thrown while able to check out from 50 or less.
    pub double_window_darts: u32,
    pub finished_by_double: bool,
    pub bust: bool,
}

impl Visit {
    #[inline]
    pub fn dart_count(&self) -> usize {
        self.darts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.darts.is_empty()
    }
}

/// One player's progress through one leg.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub visits: Vec<Visit>,
    pub starting_score: u32,
    /// Score left after the committed visits.
    pub remaining: u32,
    pub darts_thrown: u32,
    pub finished: bool,
    /// Total of the finishing visit.
    pub checkout: Option<u32>,
    /// Whether the player has opened (always true without double-in).
    pub opened: bool,
}

impl Leg {
    pub fn new(rules: &X01Rules) -> Self {
        Self {
            visits: Vec::new(),
            starting_score: rules.starting_score,
            remaining: rules.starting_score,
            darts_thrown: 0,
            finished: false,
            checkout: None,
            opened: !rules.double_in,
        }
    }

    /// Points scored so far in committed visits.
    pub fn scored(&self) -> u32 {
        self.starting_score - self.remaining
    }

    pub fn pre_open_darts(&self) -> u32 {
        self.visits.iter().map(|v| v.pre_open_darts).sum()
    }

    pub fn double_window_darts(&self) -> u32 {
        self.visits.iter().map(|v| v.double_window_darts).sum()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub legs_won: u32,
    /// Every leg played, the current one last.
    pub legs: Vec<Leg>,
    /// Filled in when the match ends.
    pub best_leg_average: Option<f64>,
    pub worst_leg_average: Option<f64>,
}

impl Player {
    pub fn new(name: impl Into<String>, rules: &X01Rules) -> Self {
        Self {
            name: name.into(),
            legs_won: 0,
            legs: vec![Leg::new(rules)],
            best_leg_average: None,
            worst_leg_average: None,
        }
    }

    /// Current (last) leg. Every player always has at least one.
    pub fn leg(&self) -> &Leg {
        &self.legs[self.legs.len() - 1]
    }

    pub(crate) fn leg_mut(&mut self) -> &mut Leg {
        let last = self.legs.len() - 1;
        &mut self.legs[last]
    }
}

/// Fewest-darts leg of the match so far.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestLeg {
    pub player: usize,
    pub leg_index: u32,
    pub darts: u32,
}

/// A committed visit with its context, in throw order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisitRecord {
    pub player: usize,
    pub leg_index: u32,
    pub visit: Visit,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub players: Vec<Player>,
    pub current_player: usize,
    pub rules: X01Rules,
    pub in_progress: bool,
    /// Zero-based index of the leg being played.
    pub leg_index: u32,
    /// Player who threw first in the current leg.
    pub leg_starter: usize,
    pub best_leg: Option<BestLeg>,
    pub winner: Option<usize>,
}

impl Match {
    pub(crate) fn new(rules: X01Rules, names: Vec<String>) -> Self {
        let players = names.into_iter().map(|n| Player::new(n, &rules)).collect();
        Self {
            players,
            current_player: 0,
            rules,
            in_progress: true,
            leg_index: 0,
            leg_starter: 0,
            best_leg: None,
            winner: None,
        }
    }
}
