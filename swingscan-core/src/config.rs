//! Engine configuration: indicator windows, thresholds, composition rules.
//!
//! Every numeric threshold and every boolean combination is configuration.
//! Defaults reproduce the reference swing scanner: UT Bot buy, MACD,
//! Stochastic, ADX and OBV scored together, signal at 4 of 5.
//!
//! Keys are snake_case; the camelCase spellings used by older scanner
//! configs are accepted as aliases.

use crate::indicators::{EmaSeed, MeanDeviation, Smoothing};
use crate::signals::{CompositionMode, ConditionKind, SignalTrigger};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be >= 1")]
    ZeroWindow { field: &'static str },

    #[error("macd_fast ({fast}) must be smaller than macd_slow ({slow})")]
    MacdOrder { fast: usize, slow: usize },

    #[error("ut_bot_multiplier must be a positive number, got {0}")]
    InvalidMultiplier(f64),

    #[error("min_conditions ({min}) exceeds the {available} configured conditions")]
    MinConditionsTooLarge { min: usize, available: usize },

    #[error("min_conditions must be >= 1 in score mode")]
    MinConditionsZero,

    #[error("no entry conditions configured")]
    NoConditions,

    #[error("condition {0} is listed more than once")]
    DuplicateCondition(ConditionKind),

    #[error("read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config: {0}")]
    Parse(String),
}

/// How satisfied conditions turn into an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// Count satisfied conditions; entry at `min_conditions` or more.
    #[default]
    Score,
    /// Entry only when every configured condition holds.
    AllOf,
}

/// Levels used by threshold conditions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// `RsiOversold`: rsi < rsi_max.
    #[serde(alias = "rsiMax")]
    pub rsi_max: f64,
    /// `CciOversold`: cci < cci_max.
    #[serde(alias = "cciMax")]
    pub cci_max: f64,
    /// `AdxTrending`: adx > adx_min.
    #[serde(alias = "adxMin")]
    pub adx_min: f64,
    /// `StochasticBullish` also requires %K below this level when set.
    /// Zero or a negative level turns the cap off, since TOML has no null.
    #[serde(alias = "stochMaxK")]
    pub stoch_max_k: Option<f64>,
    /// `MacdBullish` also requires the MACD line below zero.
    #[serde(alias = "macdRequiresNegative")]
    pub macd_requires_negative: bool,
}

impl Thresholds {
    /// The %K cap in effect, if any.
    pub fn stoch_cap(&self) -> Option<f64> {
        self.stoch_max_k.filter(|&k| k > 0.0)
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            rsi_max: 30.0,
            cci_max: -100.0,
            adx_min: 20.0,
            stoch_max_k: Some(50.0),
            macd_requires_negative: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    #[serde(alias = "atrWindow")]
    pub atr_window: usize,
    #[serde(alias = "atrSmoothing")]
    pub atr_smoothing: Smoothing,
    #[serde(alias = "utBotMultiplier")]
    pub ut_bot_multiplier: f64,

    #[serde(alias = "macdFast")]
    pub macd_fast: usize,
    #[serde(alias = "macdSlow")]
    pub macd_slow: usize,
    #[serde(alias = "macdSignal")]
    pub macd_signal: usize,
    #[serde(alias = "emaSeed")]
    pub ema_seed: EmaSeed,

    #[serde(alias = "rsiWindow")]
    pub rsi_window: usize,
    #[serde(alias = "rsiSmoothing")]
    pub rsi_smoothing: Smoothing,

    #[serde(alias = "stochWindow")]
    pub stoch_window: usize,
    /// %K smoothing window; 1 gives the fast stochastic.
    #[serde(alias = "stochSmoothing")]
    pub stoch_smoothing: usize,
    #[serde(alias = "dWindow", alias = "stochDWindow")]
    pub stoch_d_window: usize,

    #[serde(alias = "cciWindow")]
    pub cci_window: usize,
    #[serde(alias = "cciDeviation")]
    pub cci_deviation: MeanDeviation,

    #[serde(alias = "adxWindow")]
    pub adx_window: usize,
    #[serde(alias = "adxSmoothing")]
    pub adx_smoothing: Smoothing,

    #[serde(alias = "obvSmaWindow")]
    pub obv_sma_window: usize,

    /// Entry conditions count if true at any of the last `lookback_bars` bars.
    #[serde(alias = "lookbackBars")]
    pub lookback_bars: usize,
    #[serde(alias = "minConditions")]
    pub min_conditions: usize,

    pub mode: ScoringMode,
    pub conditions: Vec<ConditionKind>,
    /// Closes an open position; enables the FLAT/LONG replay when set.
    pub exit: Option<ConditionKind>,
    pub trigger: SignalTrigger,
    pub thresholds: Thresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            atr_window: 10,
            atr_smoothing: Smoothing::Simple,
            ut_bot_multiplier: 3.0,
            macd_fast: 5,
            macd_slow: 13,
            macd_signal: 4,
            ema_seed: EmaSeed::First,
            rsi_window: 14,
            rsi_smoothing: Smoothing::Simple,
            stoch_window: 8,
            stoch_smoothing: 5,
            stoch_d_window: 3,
            cci_window: 20,
            cci_deviation: MeanDeviation::Classic,
            adx_window: 14,
            adx_smoothing: Smoothing::Simple,
            obv_sma_window: 20,
            lookback_bars: 1,
            min_conditions: 4,
            mode: ScoringMode::Score,
            conditions: vec![
                ConditionKind::UtBotBuy,
                ConditionKind::MacdBullish,
                ConditionKind::StochasticBullish,
                ConditionKind::AdxTrending,
                ConditionKind::ObvAccumulation,
            ],
            exit: None,
            trigger: SignalTrigger::Level,
            thresholds: Thresholds::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let windows = [
            ("atr_window", self.atr_window),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("rsi_window", self.rsi_window),
            ("stoch_window", self.stoch_window),
            ("stoch_smoothing", self.stoch_smoothing),
            ("stoch_d_window", self.stoch_d_window),
            ("cci_window", self.cci_window),
            ("adx_window", self.adx_window),
            ("obv_sma_window", self.obv_sma_window),
        ];
        if let Some((field, _)) = windows.iter().find(|(_, w)| *w == 0) {
            return Err(ConfigError::ZeroWindow { field });
        }

        if self.macd_fast >= self.macd_slow {
            return Err(ConfigError::MacdOrder {
                fast: self.macd_fast,
                slow: self.macd_slow,
            });
        }

        if !(self.ut_bot_multiplier.is_finite() && self.ut_bot_multiplier > 0.0) {
            return Err(ConfigError::InvalidMultiplier(self.ut_bot_multiplier));
        }

        if self.conditions.is_empty() {
            return Err(ConfigError::NoConditions);
        }
        let mut seen = std::collections::BTreeSet::new();
        if let Some(&dup) = self.conditions.iter().find(|&&c| !seen.insert(c)) {
            return Err(ConfigError::DuplicateCondition(dup));
        }

        if self.mode == ScoringMode::Score {
            if self.min_conditions == 0 {
                return Err(ConfigError::MinConditionsZero);
            }
            if self.min_conditions > self.conditions.len() {
                return Err(ConfigError::MinConditionsTooLarge {
                    min: self.min_conditions,
                    available: self.conditions.len(),
                });
            }
        }

        Ok(())
    }

    pub fn composition_mode(&self) -> CompositionMode {
        match self.mode {
            ScoringMode::Score => CompositionMode::Score {
                min_conditions: self.min_conditions,
            },
            ScoringMode::AllOf => CompositionMode::AllOf,
        }
    }
}
