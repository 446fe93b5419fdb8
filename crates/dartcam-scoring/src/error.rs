use crate::ring::DartInputError;

/// Rejected scoring operation. A rejected operation never mutates state.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoringError {
    #[error("visit was already submitted")]
    Duplicate,

    #[error("the current leg is finished")]
    LegFinished,

    #[error("the match is finished")]
    MatchFinished,

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("no pending darts")]
    NoPendingDarts,

    #[error("a visit is already in progress")]
    VisitInProgress,

    #[error("visit has no darts")]
    EmptyVisit,

    #[error("visit has {0} darts (at most 3)")]
    TooManyDarts(usize),

    #[error("a match needs at least one player")]
    NoPlayers,

    #[error(transparent)]
    InvalidDart(#[from] DartInputError),
}

impl ScoringError {
    /// Stable machine-readable reason.
    pub fn reason(&self) -> &'static str {
        match self {
            ScoringError::Duplicate => "duplicate",
            ScoringError::LegFinished => "leg_finished",
            ScoringError::MatchFinished => "match_finished",
            ScoringError::NothingToUndo => "nothing_to_undo",
            ScoringError::NoPendingDarts => "no_pending_darts",
            ScoringError::VisitInProgress => "visit_in_progress",
            ScoringError::EmptyVisit => "empty_visit",
            ScoringError::TooManyDarts(_) => "too_many_darts",
            ScoringError::NoPlayers => "no_players",
            ScoringError::InvalidDart(_) => "invalid_dart",
        }
    }
}
