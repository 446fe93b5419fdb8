use serde::{Deserialize, Serialize};

/// X01 game settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct X01Rules {
    /// Score every leg starts from (301, 501, ...).
    pub starting_score: u32,
    /// A double (or inner bull) is required before darts count.
    pub double_in: bool,
    /// The finishing dart must be a double (or inner bull).
    pub double_out: bool,
    /// Legs a player must win to take the match.
    pub legs_to_win: u32,
    /// Commit a visit as soon as its third dart lands.
    pub auto_commit_full_visit: bool,
    /// Start the next leg right after a checkout. When off, the caller
    /// starts it with `LegStateMachine::start_next_leg`.
    pub auto_next_leg: bool,
}

impl Default for X01Rules {
    fn default() -> Self {
        Self {
            starting_score: 501,
            double_in: false,
            double_out: true,
            legs_to_win: 1,
            auto_commit_full_visit: true,
            auto_next_leg: true,
        }
    }
}

impl X01Rules {
    pub fn new(starting_score: u32) -> Self {
        Self {
            starting_score,
            ..Self::default()
        }
    }

    pub fn with_double_in(mut self, on: bool) -> Self {
        self.double_in = on;
        self
    }

    pub fn with_double_out(mut self, on: bool) -> Self {
        self.double_out = on;
        self
    }

    pub fn with_legs_to_win(mut self, legs: u32) -> Self {
        self.legs_to_win = legs;
        self
    }

    pub fn with_auto_commit(mut self, on: bool) -> Self {
        self.auto_commit_full_visit = on;
        self
    }

    /// Legs needed to win, never less than one.
    pub fn legs_needed(&self) -> u32 {
        self.legs_to_win.max(1)
    }
}
