//! Signal composition: conditions, lookback relaxation, scoring, position replay.
//!
//! Conditions are evaluated against one precomputed `IndicatorSet`; nothing in
//! this module looks at a bar after the one it is deciding for.

pub mod composer;
pub mod condition;
pub mod decision;
pub mod lookback;
pub mod snapshot;
pub mod state;

pub use composer::{CompositionMode, Evaluation, SignalComposer, SignalTrigger};
pub use condition::ConditionKind;
pub use decision::{Decision, Signal};
pub use lookback::lookback_or;
pub use snapshot::IndicatorSet;
pub use state::{replay, step, PositionState, Replay, Transition};
