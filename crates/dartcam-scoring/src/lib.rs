//! X01 darts scoring.
//!
//! - [`ring`]: the [`Dart`] model and [`normalize_dart`], the single point
//!   where heterogeneous payloads become validated darts.
//! - [`projector`]: image point to dart ([`ScoringProjector`], [`BoardProjector`]).
//! - [`machine`]: the [`LegStateMachine`] applying darts under [`X01Rules`].
//! - [`stats`]: averages and checkout rates.
//! - [`queue`] and [`watchdog`]: the single-writer event funnel and the turn timer.
//!
//! ```
//! use dartcam_scoring::{Dart, DartOutcome, LegStateMachine, X01Rules};
//!
//! let mut m = LegStateMachine::new(X01Rules::new(40), ["ann"]).unwrap();
//! let outcome = m.apply_dart(Dart::double(20).unwrap()).unwrap();
//! assert_eq!(outcome, DartOutcome::MatchFinished { winner: 0 });
//! ```

mod error;
pub mod machine;
pub mod projector;
pub mod queue;
pub mod ring;
mod rules;
mod state;
pub mod stats;
pub mod watchdog;

pub use error::ScoringError;
pub use machine::{DartOutcome, LegPhase, LegStateMachine, MatchEvent, VisitSubmission};
pub use projector::{BoardGeometry, BoardProjector, ScoringProjector};
pub use queue::{
    apply_event, AppliedEvent, EventOutcome, QueueClosed, ScoringEvent, ScoringQueue, ScoringSender,
};
pub use ring::{normalize_dart, Dart, DartInputError, RawDart, Ring};
pub use rules::X01Rules;
pub use state::{BestLeg, Leg, Match, Player, Visit, VisitRecord};
pub use stats::PlayerStats;
pub use watchdog::TurnWatchdog;
