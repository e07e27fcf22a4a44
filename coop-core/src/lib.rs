//! Coop Score Engine
//!
//! Reconstructs per-player performance scores for cooperative contract play
//! from partial, point-in-time coop status snapshots.
//!
//! # Pipeline
//!
//! ```text
//! ContractSpec ──┐
//! GradeAssignment┼─> GradeResolver ──> DurationEstimator ──┐
//! CoopSnapshot ──┘                                         │
//!                        per player: BuffValuator ─────────┤
//!                                    ContributionScorer ───┼─> CompositeScoreCalculator
//!                                                          │
//!                                          CoopReport <────┘
//! ```
//!
//! # Components
//!
//! | Module           | Responsibility                                           |
//! |------------------|----------------------------------------------------------|
//! | [`grade`]        | Grade multiplier, main goal and allowed time             |
//! | [`duration`]     | Elapsed seconds for completed and in-progress coops      |
//! | [`buffs`]        | Cumulative value of temporary boosts                     |
//! | [`contribution`] | Two-regime contribution factor curve                     |
//! | [`score`]        | Base points, time bonus, teamwork, composite scores      |
//! | [`engine`]       | Coop-level orchestration and failure isolation           |
//!
//! # Failure Isolation
//!
//! Coop setup errors (grade, spec, contributor list, duration) produce a
//! [`FailedCoop`] with an empty `userData`. Errors for a single player
//! produce a degraded [`ScoredPlayerRecord`] carrying the error message.
//!
//! Everything here is synchronous and free of shared state.

pub mod buffs;
pub mod contribution;
pub mod duration;
pub mod engine;
pub mod error;
pub mod grade;
pub mod params;
pub mod score;
pub mod types;

pub use error::{CoopError, CoopResult};

pub use types::*;

pub use buffs::BuffValuator;
pub use contribution::ContributionScorer;
pub use duration::{CoopPhase, DurationEstimator};
pub use engine::CoopScorer;
pub use grade::{GradeParams, GradeResolver};
pub use params::ScoringParams;
pub use score::{CompositeScore, CompositeScoreCalculator, ScoreContext, Teamwork};

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
