//! Every indicator the composer reads, computed once per series.

use crate::config::{ConfigError, EngineConfig};
use crate::domain::Bar;
use crate::indicator::{Indicator, IndicatorValues};
use crate::indicators::atr::atr_series;
use crate::indicators::{
    Adx, AdxSeries, Cci, Macd, MacdSeries, Obv, ObvSeries, Rsi, Stochastic, StochasticSeries,
    UtBot, UtBotSeries,
};

/// Aligned derived series for one price series.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSet {
    pub atr: Vec<f64>,
    pub ut_bot: UtBotSeries,
    pub macd: MacdSeries,
    pub rsi: Vec<f64>,
    pub stochastic: StochasticSeries,
    pub cci: Vec<f64>,
    pub adx: AdxSeries,
    pub obv: ObvSeries,
}

impl IndicatorSet {
    /// Validates `config`, then computes every indicator.
    pub fn compute(bars: &[Bar], config: &EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::compute_validated(bars, config))
    }

    /// Window sizes of zero panic in the indicator constructors, so callers
    /// must hold a config that already passed `validate`.
    pub(crate) fn compute_validated(bars: &[Bar], config: &EngineConfig) -> Self {
        let atr = atr_series(bars, config.atr_window, config.atr_smoothing);
        let ut_bot = UtBot::new(config.atr_window, config.ut_bot_multiplier, config.atr_smoothing)
            .compute_with_atr(bars, &atr);

        let macd = Macd::new(
            config.macd_fast,
            config.macd_slow,
            config.macd_signal,
            config.ema_seed,
        )
        .compute_all(bars);

        let rsi = Rsi::new(config.rsi_window, config.rsi_smoothing).compute(bars);
        let stochastic = Stochastic::new(
            config.stoch_window,
            config.stoch_smoothing,
            config.stoch_d_window,
        )
        .compute_all(bars);
        let cci = Cci::new(config.cci_window, config.cci_deviation).compute(bars);
        let adx = Adx::new(config.adx_window, config.adx_smoothing).compute_all(bars);
        let obv = Obv::new(config.obv_sma_window).compute_all(bars);

        Self {
            atr,
            ut_bot,
            macd,
            rsi,
            stochastic,
            cci,
            adx,
            obv,
        }
    }

    pub fn len(&self) -> usize {
        self.atr.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atr.is_empty()
    }

    /// Named copies of every numeric series, for reports and dumps.
    pub fn to_values(&self) -> IndicatorValues {
        let mut values = IndicatorValues::new();
        values.insert("atr", self.atr.clone());
        values.insert("ut_trail", self.ut_bot.trail.clone());
        values.insert("macd", self.macd.macd.clone());
        values.insert("macd_signal", self.macd.signal.clone());
        values.insert("macd_hist", self.macd.histogram.clone());
        values.insert("rsi", self.rsi.clone());
        values.insert("stoch_k", self.stochastic.k.clone());
        values.insert("stoch_d", self.stochastic.d.clone());
        values.insert("cci", self.cci.clone());
        values.insert("plus_di", self.adx.plus_di.clone());
        values.insert("minus_di", self.adx.minus_di.clone());
        values.insert("adx", self.adx.adx.clone());
        values.insert("obv", self.obv.obv.clone());
        values.insert("obv_sma", self.obv.obv_sma.clone());
        values
    }
}
