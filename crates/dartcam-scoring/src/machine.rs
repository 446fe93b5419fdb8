//! X01 leg/match state machine.

use std::collections::VecDeque;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::error::ScoringError;
use crate::ring::Dart;
use crate::rules::X01Rules;
use crate::state::{BestLeg, Leg, Match, Visit, VisitRecord};
use crate::stats;

/// Undo depth. Older snapshots are dropped.
const HISTORY_DEPTH: usize = 32;

/// Where the current player's leg stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegPhase {
    /// No dart thrown in this leg yet.
    NotStarted,
    Open,
    /// The last committed visit was a bust; play continues.
    Busted,
    Finished,
}

/// Result of one applied dart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DartOutcome {
    /// Dart added to the pending visit.
    Scored {
        points: u32,
        remaining: u32,
        darts_in_visit: usize,
    },
    /// The dart completed a visit, which was committed.
    VisitComplete { total: u32, remaining: u32 },
    /// The visit busted; the score reverted to `remaining`.
    Bust { remaining: u32 },
    LegFinished { player: usize, checkout: u32 },
    MatchFinished { winner: usize },
}

impl DartOutcome {
    /// Whether the thrower's turn is over.
    pub fn ends_turn(&self) -> bool {
        !matches!(self, DartOutcome::Scored { .. })
    }
}

/// Notifications for observers, drained with [`LegStateMachine::take_events`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MatchEvent {
    VisitCommitted {
        player: usize,
        leg_index: u32,
        visit: Visit,
        remaining: u32,
    },
    LegFinished {
        player: usize,
        leg_index: u32,
        darts: u32,
        checkout: u32,
    },
    MatchFinished {
        winner: usize,
    },
}

/// A whole visit entered manually or relayed from another source.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VisitSubmission {
    pub darts: Vec<Dart>,
    /// Sender sequence id. Submissions with different ids are never duplicates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,
}

impl VisitSubmission {
    pub fn new(darts: Vec<Dart>) -> Self {
        Self { darts, seq: None }
    }

    pub fn with_seq(mut self, seq: u64) -> Self {
        self.seq = Some(seq);
        self
    }

    fn key(&self) -> SubmissionKey {
        SubmissionKey {
            total: self.darts.iter().map(Dart::value).sum(),
            darts: self.darts.len(),
            seq: self.seq,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SubmissionKey {
    total: u32,
    darts: usize,
    seq: Option<u64>,
}

impl SubmissionKey {
    fn duplicates(&self, prev: &SubmissionKey) -> bool {
        if let (Some(a), Some(b)) = (self.seq, prev.seq) {
            if a != b {
                return false;
            }
        }
        self.total == prev.total && self.darts == prev.darts
    }
}

#[derive(Clone, Debug)]
struct Pending {
    visit: Visit,
    /// Opened flag as it will be after this visit, unless it busts.
    opened: bool,
}

#[derive(Clone, Debug)]
struct Snapshot {
    state: Match,
    pending: Option<Pending>,
    log_len: usize,
    last_submission: Option<SubmissionKey>,
}

/// Applies darts to an X01 match.
///
/// All mutation happens through `&mut self` and every operation either
/// succeeds or leaves the state untouched.
#[derive(Clone, Debug)]
pub struct LegStateMachine {
    state: Match,
    pending: Option<Pending>,
    log: Vec<VisitRecord>,
    history: VecDeque<Snapshot>,
    events: Vec<MatchEvent>,
    last_submission: Option<SubmissionKey>,
}

impl LegStateMachine {
    pub fn new<S: Into<String>>(
        rules: X01Rules,
        players: impl IntoIterator<Item = S>,
    ) -> Result<Self, ScoringError> {
        let names: Vec<String> = players.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(ScoringError::NoPlayers);
        }
        info!(
            "match started: {} players, first to {} legs from {}",
            names.len(),
            rules.legs_needed(),
            rules.starting_score
        );
        Ok(Self {
            state: Match::new(rules, names),
            pending: None,
            log: Vec::new(),
            history: VecDeque::new(),
            events: Vec::new(),
            last_submission: None,
        })
    }

    pub fn rules(&self) -> &X01Rules {
        &self.state.rules
    }

    /// Snapshot of the whole match.
    pub fn match_state(&self) -> &Match {
        &self.state
    }

    pub fn current_player(&self) -> usize {
        self.state.current_player
    }

    pub fn current_player_name(&self) -> &str {
        &self.state.players[self.state.current_player].name
    }

    /// Pending (uncommitted) visit of the current player.
    pub fn current_visit(&self) -> Option<&Visit> {
        self.pending.as_ref().map(|p| &p.visit)
    }

    pub fn pending_darts(&self) -> usize {
        self.pending.as_ref().map_or(0, |p| p.visit.dart_count())
    }

    /// Current player's score including pending darts.
    pub fn remaining(&self) -> u32 {
        let leg = self.current_leg();
        let pending = self.pending.as_ref().map_or(0, |p| p.visit.total);
        leg.remaining - pending
    }

    pub fn remaining_of(&self, player: usize) -> Option<u32> {
        let p = self.state.players.get(player)?;
        if player == self.state.current_player {
            return Some(self.remaining());
        }
        Some(p.leg().remaining)
    }

    pub fn leg_phase(&self) -> LegPhase {
        let leg = self.current_leg();
        if leg.finished || self.state.winner.is_some() {
            return LegPhase::Finished;
        }
        if self.pending.is_some() {
            return LegPhase::Open;
        }
        match leg.visits.last() {
            None => LegPhase::NotStarted,
            Some(v) if v.bust => LegPhase::Busted,
            Some(_) => LegPhase::Open,
        }
    }

    /// Every committed visit in throw order.
    pub fn visits(&self) -> &[VisitRecord] {
        &self.log
    }

    pub fn is_finished(&self) -> bool {
        self.state.winner.is_some()
    }

    /// True while the current visit has a dart that [`Self::undo`] can take back.
    pub fn can_undo(&self) -> bool {
        self.pending_darts() > 0 && !self.history.is_empty()
    }

    pub fn take_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.events)
    }

    fn current_leg(&self) -> &Leg {
        self.state.players[self.state.current_player].leg()
    }

    /// Apply one dart thrown by the current player.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self), fields(dart = %dart)))]
    pub fn apply_dart(&mut self, dart: Dart) -> Result<DartOutcome, ScoringError> {
        self.ensure_playable()?;
        self.push_snapshot();
        self.last_submission = None;
        Ok(self.apply_inner(dart))
    }

    /// Turn timer expired: the current player's next dart counts as a miss.
    pub fn apply_timeout(&mut self) -> Result<DartOutcome, ScoringError> {
        self.ensure_playable()?;
        info!("turn timeout for player {}", self.state.current_player);
        self.push_snapshot();
        self.last_submission = None;
        Ok(self.apply_inner(Dart::miss()))
    }

    /// Take back the last dart of the current, uncommitted visit.
    ///
    /// Committed visits (including busts and checkouts) are final.
    pub fn undo(&mut self) -> Result<(), ScoringError> {
        if self.pending_darts() == 0 {
            return Err(ScoringError::NothingToUndo);
        }
        let snap = self.history.pop_back().ok_or(ScoringError::NothingToUndo)?;
        self.restore(snap);
        debug!("undo: player {} at {}", self.state.current_player, self.remaining());
        Ok(())
    }

    /// Replace the last dart with `dart`, re-running bust and finish checks.
    pub fn replace_last(&mut self, dart: Dart) -> Result<DartOutcome, ScoringError> {
        let current = self.snapshot();
        let prev = self.history.pop_back().ok_or(ScoringError::NothingToUndo)?;
        self.restore(prev.clone());
        match self.apply_dart(dart) {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                self.restore(current);
                self.history.push_back(prev);
                Err(e)
            }
        }
    }

    /// End the current turn early with the pending darts.
    pub fn commit_visit(&mut self) -> Result<Visit, ScoringError> {
        self.ensure_playable()?;
        if self.pending_darts() == 0 {
            return Err(ScoringError::NoPendingDarts);
        }
        self.push_snapshot();
        let pending = self.pending.take().ok_or(ScoringError::NoPendingDarts)?;
        let visit = pending.visit.clone();
        self.commit(pending);
        self.advance_turn();
        Ok(visit)
    }

    /// Apply a whole visit for the current player.
    ///
    /// A visit that neither busts nor finishes is committed even with fewer
    /// than three darts. Darts after a bust or checkout are ignored.
    pub fn submit_visit(
        &mut self,
        submission: &VisitSubmission,
    ) -> Result<DartOutcome, ScoringError> {
        self.ensure_playable()?;
        if submission.darts.is_empty() {
            return Err(ScoringError::EmptyVisit);
        }
        if submission.darts.len() > 3 {
            return Err(ScoringError::TooManyDarts(submission.darts.len()));
        }
        if self.pending_darts() > 0 {
            return Err(ScoringError::VisitInProgress);
        }
        let key = submission.key();
        if self.last_submission.is_some_and(|prev| key.duplicates(&prev)) {
            warn!("duplicate visit submission rejected (total {})", key.total);
            return Err(ScoringError::Duplicate);
        }

        let mut outcome = None;
        for (i, &dart) in submission.darts.iter().enumerate() {
            self.push_snapshot();
            let o = self.apply_inner(dart);
            if o.ends_turn() {
                let ignored = submission.darts.len() - i - 1;
                if ignored > 0 {
                    warn!("{ignored} dart(s) after end of turn ignored");
                }
                outcome = Some(o);
                break;
            }
        }

        let outcome = match (outcome, self.pending.take()) {
            (Some(o), pending) => {
                self.pending = pending;
                o
            }
            (None, Some(pending)) => {
                let total = pending.visit.total;
                self.commit(pending);
                let remaining = self.current_leg().remaining;
                self.advance_turn();
                DartOutcome::VisitComplete { total, remaining }
            }
            (None, None) => return Err(ScoringError::EmptyVisit),
        };
        self.last_submission = Some(key);
        Ok(outcome)
    }

    /// Start the next leg after a checkout when `auto_next_leg` is off.
    /// Does nothing while the current leg is still being played.
    pub fn start_next_leg(&mut self) -> Result<(), ScoringError> {
        if self.state.winner.is_some() {
            return Err(ScoringError::MatchFinished);
        }
        if self.current_leg().finished {
            self.push_snapshot();
            self.begin_next_leg();
        }
        Ok(())
    }

    fn ensure_playable(&self) -> Result<(), ScoringError> {
        if self.state.winner.is_some() {
            return Err(ScoringError::MatchFinished);
        }
        if self.current_leg().finished {
            return Err(ScoringError::LegFinished);
        }
        Ok(())
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state.clone(),
            pending: self.pending.clone(),
            log_len: self.log.len(),
            last_submission: self.last_submission,
        }
    }

    fn push_snapshot(&mut self) {
        if self.history.len() == HISTORY_DEPTH {
            self.history.pop_front();
        }
        let snap = self.snapshot();
        self.history.push_back(snap);
    }

    fn restore(&mut self, snap: Snapshot) {
        self.state = snap.state;
        self.pending = snap.pending;
        self.log.truncate(snap.log_len);
        self.last_submission = snap.last_submission;
    }

    /// Core dart evaluation. The caller has checked playability and taken
    /// a snapshot.
    fn apply_inner(&mut self, dart: Dart) -> DartOutcome {
        if self.pending_darts() >= 3 {
            warn!(
                "fourth dart for player {}: committing the pending visit",
                self.state.current_player
            );
            if let Some(full) = self.pending.take() {
                self.commit(full);
            }
            self.advance_turn();
        }

        let needs_double = self.state.rules.double_out;
        let auto_commit = self.state.rules.auto_commit_full_visit;
        let (leg_remaining, leg_opened) = {
            let leg = self.current_leg();
            (leg.remaining, leg.opened)
        };
        let mut pending = self.pending.take().unwrap_or(Pending {
            visit: Visit::default(),
            opened: leg_opened,
        });
        let before = leg_remaining - pending.visit.total;

        let opens_now = !pending.opened && dart.is_double_like();
        if before <= 50 && (pending.opened || opens_now) {
            pending.visit.double_window_darts += 1;
        }

        let points = if pending.opened || opens_now {
            pending.opened = true;
            dart.value()
        } else {
            pending.visit.pre_open_darts += 1;
            0
        };
        pending.visit.darts.push(dart);

        let after = before as i64 - points as i64;
        let bust = after < 0
            || after == 1
            || (after == 0 && needs_double && !dart.is_double_like());

        if bust {
            pending.visit.bust = true;
            pending.visit.total = 0;
            let remaining = self.current_leg().remaining;
            info!(
                "bust: player {} stays on {remaining}",
                self.state.current_player
            );
            self.commit(pending);
            self.advance_turn();
            return DartOutcome::Bust { remaining };
        }

        pending.visit.total += points;

        if after == 0 {
            pending.visit.finished_by_double = dart.is_double_like();
            return self.finish_leg(pending);
        }

        let remaining = after as u32;
        if pending.visit.dart_count() == 3 && auto_commit {
            let total = pending.visit.total;
            self.commit(pending);
            self.advance_turn();
            return DartOutcome::VisitComplete { total, remaining };
        }

        let darts_in_visit = pending.visit.dart_count();
        self.pending = Some(pending);
        DartOutcome::Scored {
            points,
            remaining,
            darts_in_visit,
        }
    }

    /// Write a visit into the current player's leg.
    fn commit(&mut self, pending: Pending) {
        let player = self.state.current_player;
        let leg_index = self.state.leg_index;
        self.last_submission = None;
        let leg = self.state.players[player].leg_mut();
        if !pending.visit.bust {
            leg.remaining -= pending.visit.total;
            leg.opened = pending.opened;
        }
        leg.darts_thrown += pending.visit.dart_count() as u32;
        leg.visits.push(pending.visit.clone());
        let remaining = leg.remaining;
        debug!(
            "visit committed: player {player} scored {} ({} darts), {remaining} left",
            pending.visit.total,
            pending.visit.dart_count()
        );
        self.log.push(VisitRecord {
            player,
            leg_index,
            visit: pending.visit.clone(),
        });
        self.events.push(MatchEvent::VisitCommitted {
            player,
            leg_index,
            visit: pending.visit,
            remaining,
        });
    }

    fn finish_leg(&mut self, pending: Pending) -> DartOutcome {
        let checkout = pending.visit.total;
        self.commit(pending);

        let player = self.state.current_player;
        let leg_index = self.state.leg_index;
        let p = &mut self.state.players[player];
        let leg = p.leg_mut();
        leg.finished = true;
        leg.checkout = Some(checkout);
        let darts = leg.darts_thrown;
        p.legs_won += 1;
        let legs_won = p.legs_won;
        info!(
            "leg {} won by {} in {darts} darts (checkout {checkout})",
            leg_index + 1,
            p.name
        );

        if self.state.best_leg.is_none_or(|b| darts < b.darts) {
            self.state.best_leg = Some(BestLeg {
                player,
                leg_index,
                darts,
            });
        }
        self.events.push(MatchEvent::LegFinished {
            player,
            leg_index,
            darts,
            checkout,
        });

        if legs_won >= self.state.rules.legs_needed() {
            self.state.winner = Some(player);
            self.state.in_progress = false;
            stats::fill_leg_averages(&mut self.state.players);
            info!("match won by {}", self.state.players[player].name);
            self.events.push(MatchEvent::MatchFinished { winner: player });
            return DartOutcome::MatchFinished { winner: player };
        }

        if self.state.rules.auto_next_leg {
            self.begin_next_leg();
        }
        DartOutcome::LegFinished { player, checkout }
    }

    fn begin_next_leg(&mut self) {
        let rules = self.state.rules.clone();
        for p in &mut self.state.players {
            p.legs.push(Leg::new(&rules));
        }
        let n = self.state.players.len();
        self.state.leg_index += 1;
        self.state.leg_starter = (self.state.leg_starter + 1) % n;
        self.state.current_player = self.state.leg_starter;
        self.pending = None;
        info!(
            "leg {} started, {} throws first",
            self.state.leg_index + 1,
            self.state.players[self.state.leg_starter].name
        );
    }

    fn advance_turn(&mut self) {
        self.state.current_player = (self.state.current_player + 1) % self.state.players.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: u8) -> Dart {
        Dart::triple(s).unwrap()
    }
    fn d(s: u8) -> Dart {
        Dart::double(s).unwrap()
    }
    fn s(n: u8) -> Dart {
        Dart::single(n).unwrap()
    }

    fn solo(rules: X01Rules) -> LegStateMachine {
        LegStateMachine::new(rules, ["alice"]).unwrap()
    }

    #[test]
    fn new_requires_players() {
        let err = LegStateMachine::new(X01Rules::default(), Vec::<String>::new()).unwrap_err();
        assert_eq!(err, ScoringError::NoPlayers);
    }

    #[test]
    fn dart_reduces_remaining_and_accumulates_visit() {
        let mut m = solo(X01Rules::default());
        assert_eq!(m.leg_phase(), LegPhase::NotStarted);
        let o = m.apply_dart(t(20)).unwrap();
        assert_eq!(
            o,
            DartOutcome::Scored {
                points: 60,
                remaining: 441,
                darts_in_visit: 1
            }
        );
        assert_eq!(m.remaining(), 441);
        assert_eq!(m.current_visit().unwrap().total, 60);
        assert_eq!(m.leg_phase(), LegPhase::Open);
    }

    #[test]
    fn third_dart_commits_and_rotates() {
        let mut m = LegStateMachine::new(X01Rules::default(), ["a", "b"]).unwrap();
        m.apply_dart(t(20)).unwrap();
        m.apply_dart(t(20)).unwrap();
        let o = m.apply_dart(t(20)).unwrap();
        assert_eq!(
            o,
            DartOutcome::VisitComplete {
                total: 180,
                remaining: 321
            }
        );
        assert_eq!(m.current_player(), 1);
        assert!(m.current_visit().is_none());
        assert_eq!(m.remaining_of(0), Some(321));
        let events = m.take_events();
        assert!(matches!(events[..], [MatchEvent::VisitCommitted { player: 0, .. }]));
        assert!(m.take_events().is_empty());
    }

    #[test]
    fn bust_below_zero_and_on_one() {
        let mut m = solo(X01Rules::new(40));
        m.apply_dart(t(13)).unwrap(); // 1 left
        assert_eq!(m.remaining(), 40);
        let v = &m.visits()[0].visit;
        assert!(v.bust);
        assert_eq!(v.total, 0);
        assert_eq!(v.darts.len(), 1);
        assert_eq!(m.leg_phase(), LegPhase::Busted);
    }

    #[test]
    fn single_out_still_busts_on_one() {
        let mut m = solo(X01Rules::new(40).with_double_out(false));
        assert_eq!(m.apply_dart(t(13)).unwrap(), DartOutcome::Bust { remaining: 40 });
        assert!(m.visits()[0].visit.bust);
        m.apply_dart(s(20)).unwrap();
        let o = m.apply_dart(s(20)).unwrap();
        assert_eq!(o, DartOutcome::MatchFinished { winner: 0 });
    }

    #[test]
    fn zero_without_double_busts() {
        let mut m = solo(X01Rules::new(40));
        assert_eq!(
            m.apply_dart(s(20)).unwrap(),
            DartOutcome::Scored {
                points: 20,
                remaining: 20,
                darts_in_visit: 1
            }
        );
        assert_eq!(
            m.apply_dart(s(20)).unwrap(),
            DartOutcome::Bust { remaining: 40 }
        );
        let v = &m.visits()[0].visit;
        assert_eq!(v.darts.len(), 2);
    }

    #[test]
    fn bull_finish_counts_as_double() {
        let mut m = solo(X01Rules::new(50));
        let o = m.apply_dart(Dart::inner_bull()).unwrap();
        assert_eq!(o, DartOutcome::MatchFinished { winner: 0 });
        assert!(m.visits()[0].visit.finished_by_double);
    }

    #[test]
    fn legs_rotate_starter_until_match_won() {
        let rules = X01Rules::new(40).with_legs_to_win(2);
        let mut m = LegStateMachine::new(rules, ["a", "b"]).unwrap();
        assert_eq!(
            m.apply_dart(d(20)).unwrap(),
            DartOutcome::LegFinished {
                player: 0,
                checkout: 40
            }
        );
        assert_eq!(m.match_state().leg_index, 1);
        assert_eq!(m.current_player(), 1);
        assert_eq!(m.remaining(), 40);
        assert_eq!(m.leg_phase(), LegPhase::NotStarted);

        m.apply_dart(s(1)).unwrap();
        m.commit_visit().unwrap();
        assert_eq!(m.current_player(), 0);
        assert_eq!(
            m.apply_dart(d(20)).unwrap(),
            DartOutcome::MatchFinished { winner: 0 }
        );
        assert!(m.is_finished());
        assert_eq!(m.leg_phase(), LegPhase::Finished);
        assert_eq!(m.apply_dart(s(1)), Err(ScoringError::MatchFinished));
        let best = m.match_state().best_leg.unwrap();
        assert_eq!(best.darts, 1);
        assert!(m.match_state().players[0].best_leg_average.is_some());
    }

    #[test]
    fn manual_next_leg() {
        let mut rules = X01Rules::new(40).with_legs_to_win(2);
        rules.auto_next_leg = false;
        let mut m = solo(rules);
        m.apply_dart(d(20)).unwrap();
        assert_eq!(m.leg_phase(), LegPhase::Finished);
        assert_eq!(m.apply_dart(s(1)), Err(ScoringError::LegFinished));
        m.start_next_leg().unwrap();
        assert_eq!(m.remaining(), 40);
        assert!(m.apply_dart(s(1)).is_ok());
    }

    #[test]
    fn commit_without_darts_is_rejected() {
        let mut m = solo(X01Rules::default());
        assert_eq!(m.commit_visit(), Err(ScoringError::NoPendingDarts));
        assert_eq!(m.undo(), Err(ScoringError::NothingToUndo));
    }

    #[test]
    fn undo_takes_back_pending_dart() {
        let mut m = LegStateMachine::new(X01Rules::default(), ["a", "b"]).unwrap();
        m.apply_dart(t(20)).unwrap();
        m.apply_dart(t(20)).unwrap();
        assert!(m.can_undo());
        m.undo().unwrap();
        assert_eq!(m.pending_darts(), 1);
        assert_eq!(m.remaining(), 441);
    }

    #[test]
    fn undo_never_reopens_committed_visit() {
        let mut m = LegStateMachine::new(X01Rules::default(), ["a", "b"]).unwrap();
        m.apply_dart(t(20)).unwrap();
        m.apply_dart(t(20)).unwrap();
        m.apply_dart(t(20)).unwrap();
        assert_eq!(m.current_player(), 1);
        assert!(!m.can_undo());
        assert_eq!(m.undo(), Err(ScoringError::NothingToUndo));
        assert_eq!(m.current_player(), 1);
        assert_eq!(m.remaining_of(0), Some(321));
        assert_eq!(m.visits().len(), 1);
        assert_eq!(m.pending_darts(), 0);
    }

    #[test]
    fn timeout_scores_a_miss() {
        let mut m = solo(X01Rules::default());
        let o = m.apply_timeout().unwrap();
        assert_eq!(
            o,
            DartOutcome::Scored {
                points: 0,
                remaining: 501,
                darts_in_visit: 1
            }
        );
        assert_eq!(m.current_visit().unwrap().darts[0], Dart::miss());
    }

    #[test]
    fn submission_limits() {
        let mut m = solo(X01Rules::default());
        assert_eq!(
            m.submit_visit(&VisitSubmission::new(vec![])),
            Err(ScoringError::EmptyVisit)
        );
        assert_eq!(
            m.submit_visit(&VisitSubmission::new(vec![s(1); 4])),
            Err(ScoringError::TooManyDarts(4))
        );
        m.apply_dart(s(1)).unwrap();
        assert_eq!(
            m.submit_visit(&VisitSubmission::new(vec![s(1)])),
            Err(ScoringError::VisitInProgress)
        );
    }
}
