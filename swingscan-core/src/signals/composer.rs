//! Signal composer: indicators → conditions → entries → decision.
//!
//! One evaluation replays the whole series from the first bar:
//! 1. compute the `IndicatorSet`
//! 2. evaluate each configured entry condition per bar, relaxed by lookback-OR
//! 3. score each bar and gate entries by the composition mode
//! 4. with an exit condition: replay FLAT/LONG and report the final transition;
//!    without one: report the final bar's entry (level or rising edge)

use crate::config::{ConfigError, EngineConfig};
use crate::domain::PriceSeries;
use crate::indicator::IndicatorValues;
use crate::signals::condition::ConditionKind;
use crate::signals::decision::{Decision, Signal};
use crate::signals::lookback::lookback_or;
use crate::signals::snapshot::IndicatorSet;
use crate::signals::state::{replay, PositionState, Transition};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositionMode {
    /// Entry when at least `min_conditions` conditions hold.
    Score { min_conditions: usize },
    /// Entry when every condition holds.
    AllOf,
}

impl CompositionMode {
    pub fn admits(self, score: usize, total: usize) -> bool {
        match self {
            CompositionMode::Score { min_conditions } => score >= min_conditions,
            CompositionMode::AllOf => score == total,
        }
    }
}

/// How a BUY is reported when no exit condition is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalTrigger {
    /// BUY whenever entry holds at the final bar.
    #[default]
    Level,
    /// BUY only when entry holds at the final bar and did not the bar before.
    RisingEdge,
}

/// Full output of one evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub decision: Decision,
    pub indicators: IndicatorValues,
    /// Satisfied entry conditions per bar.
    pub scores: Vec<usize>,
    pub entries: Vec<bool>,
    /// Position per bar; all FLAT when no exit condition is configured.
    pub states: Vec<PositionState>,
}

#[derive(Debug, Clone)]
pub struct SignalComposer {
    config: EngineConfig,
}

impl SignalComposer {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The decision alone.
    pub fn decide(&self, series: &PriceSeries) -> Decision {
        self.evaluate(series).decision
    }

    pub fn evaluate(&self, series: &PriceSeries) -> Evaluation {
        let bars = series.bars();
        let config = &self.config;
        let set = IndicatorSet::compute_validated(bars, config);

        let flags: Vec<(ConditionKind, Vec<bool>)> = config
            .conditions
            .iter()
            .map(|&c| {
                let raw = c.series(&set, bars, &config.thresholds);
                (c, lookback_or(&raw, config.lookback_bars))
            })
            .collect();

        let scores = score_bars(flags.iter().map(|(_, f)| f.as_slice()), bars.len());
        let mode = config.composition_mode();
        let entries: Vec<bool> = scores
            .iter()
            .map(|&s| mode.admits(s, flags.len()))
            .collect();

        let exits = config
            .exit
            .map(|c| (c, c.series(&set, bars, &config.thresholds)));

        let (states, signal, position_open) = match &exits {
            Some((_, exit_flags)) => {
                let r = replay(&entries, exit_flags);
                let signal = match r.last_transition() {
                    Transition::Opened => Signal::Buy,
                    Transition::Closed => Signal::Sell,
                    Transition::Unchanged => Signal::None,
                };
                let open = r.last_state().is_open();
                (r.states, signal, open)
            }
            None => (
                vec![PositionState::Flat; bars.len()],
                trigger_signal(&entries, config.trigger),
                false,
            ),
        };

        let decision = match bars.last() {
            None => Decision::empty(series.symbol()),
            Some(last) => {
                let i = bars.len() - 1;
                let mut conditions: BTreeMap<String, bool> = flags
                    .iter()
                    .map(|(c, f)| (c.name().to_string(), f[i]))
                    .collect();
                if let Some((c, f)) = &exits {
                    conditions.insert(format!("exit_{}", c.name()), f[i]);
                }
                Decision {
                    symbol: series.symbol().to_string(),
                    date: Some(last.date),
                    signal,
                    score: scores[i],
                    conditions,
                    position_open,
                }
            }
        };

        Evaluation {
            decision,
            indicators: set.to_values(),
            scores,
            entries,
            states,
        }
    }
}

/// Count of true flags per bar across all condition series.
pub fn score_bars<'a>(flags: impl IntoIterator<Item = &'a [bool]>, len: usize) -> Vec<usize> {
    let mut scores = vec![0usize; len];
    for series in flags {
        for (score, &held) in scores.iter_mut().zip(series) {
            *score += usize::from(held);
        }
    }
    scores
}

/// Final-bar signal when no exit condition drives a position.
pub fn trigger_signal(entries: &[bool], trigger: SignalTrigger) -> Signal {
    let n = entries.len();
    let today = n > 0 && entries[n - 1];
    let yesterday = n > 1 && entries[n - 2];
    let fire = match trigger {
        SignalTrigger::Level => today,
        SignalTrigger::RisingEdge => today && !yesterday,
    };
    if fire {
        Signal::Buy
    } else {
        Signal::None
    }
}
