//! Averages and checkout statistics.
//!
//! Darts thrown before a double-in opens are excluded from the denominator;
//! darts of a busted visit stay in it.

use serde::{Deserialize, Serialize};

use crate::state::{Leg, Match, Player};

/// `3 * scored / (darts - pre_open)`, or `None` when no counting dart was thrown.
pub fn three_dart_average(scored: u32, darts: u32, pre_open: u32) -> Option<f64> {
    let counted = darts.saturating_sub(pre_open);
    (counted > 0).then(|| 3.0 * scored as f64 / counted as f64)
}

pub fn leg_average(leg: &Leg) -> Option<f64> {
    three_dart_average(leg.scored(), leg.darts_thrown, leg.pre_open_darts())
}

/// Average over every leg the player has thrown in.
pub fn match_average(player: &Player) -> Option<f64> {
    let (scored, darts, pre_open) = player.legs.iter().fold((0, 0, 0), |acc, leg| {
        (
            acc.0 + leg.scored(),
            acc.1 + leg.darts_thrown,
            acc.2 + leg.pre_open_darts(),
        )
    });
    three_dart_average(scored, darts, pre_open)
}

/// Legs won per dart thrown in the double window.
pub fn checkout_rate(player: &Player) -> Option<f64> {
    let attempts: u32 = player.legs.iter().map(Leg::double_window_darts).sum();
    (attempts > 0).then(|| player.legs_won as f64 / attempts as f64)
}

/// Fewest darts in a leg the player won.
pub fn best_leg_darts(player: &Player) -> Option<u32> {
    player
        .legs
        .iter()
        .filter(|l| l.finished)
        .map(|l| l.darts_thrown)
        .min()
}

/// `(best, worst)` per-leg averages over legs with at least one counting dart.
pub fn leg_average_range(player: &Player) -> (Option<f64>, Option<f64>) {
    player
        .legs
        .iter()
        .filter_map(leg_average)
        .fold((None, None), |(best, worst), avg| {
            (
                Some(best.map_or(avg, |b: f64| b.max(avg))),
                Some(worst.map_or(avg, |w: f64| w.min(avg))),
            )
        })
}

/// Summary of one player, suitable for reports.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub name: String,
    pub legs_won: u32,
    pub darts_thrown: u32,
    pub average: Option<f64>,
    pub checkout_rate: Option<f64>,
    pub best_leg_darts: Option<u32>,
    pub best_leg_average: Option<f64>,
    pub worst_leg_average: Option<f64>,
}

pub fn player_stats(player: &Player) -> PlayerStats {
    let (best, worst) = leg_average_range(player);
    PlayerStats {
        name: player.name.clone(),
        legs_won: player.legs_won,
        darts_thrown: player.legs.iter().map(|l| l.darts_thrown).sum(),
        average: match_average(player),
        checkout_rate: checkout_rate(player),
        best_leg_darts: best_leg_darts(player),
        best_leg_average: best,
        worst_leg_average: worst,
    }
}

pub fn match_stats(state: &Match) -> Vec<PlayerStats> {
    state.players.iter().map(player_stats).collect()
}

/// Store best/worst leg averages on every player.
pub(crate) fn fill_leg_averages(players: &mut [Player]) {
    for p in players {
        let (best, worst) = leg_average_range(p);
        p.best_leg_average = best;
        p.worst_leg_average = worst;
    }
}
