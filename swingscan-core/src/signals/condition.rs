//! Boolean entry/exit conditions over an `IndicatorSet`.

use crate::config::Thresholds;
use crate::domain::Bar;
use crate::signals::snapshot::IndicatorSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named per-bar condition. Undefined indicator values make it false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    /// Close crossed above the UT Bot trail on this bar.
    UtBotBuy,
    /// Close crossed below the UT Bot trail on this bar.
    UtBotSell,
    MacdBullish,
    StochasticBullish,
    RsiOversold,
    CciOversold,
    AdxTrending,
    ObvAccumulation,
    /// Close below open.
    BearishBar,
    /// Close above open.
    BullishBar,
}

impl ConditionKind {
    pub const ALL: [ConditionKind; 10] = [
        ConditionKind::UtBotBuy,
        ConditionKind::UtBotSell,
        ConditionKind::MacdBullish,
        ConditionKind::StochasticBullish,
        ConditionKind::RsiOversold,
        ConditionKind::CciOversold,
        ConditionKind::AdxTrending,
        ConditionKind::ObvAccumulation,
        ConditionKind::BearishBar,
        ConditionKind::BullishBar,
    ];

    /// Stable key used in decisions and exports.
    pub fn name(self) -> &'static str {
        match self {
            ConditionKind::UtBotBuy => "ut_bot_buy",
            ConditionKind::UtBotSell => "ut_bot_sell",
            ConditionKind::MacdBullish => "macd_bullish",
            ConditionKind::StochasticBullish => "stochastic_bullish",
            ConditionKind::RsiOversold => "rsi_oversold",
            ConditionKind::CciOversold => "cci_oversold",
            ConditionKind::AdxTrending => "adx_trending",
            ConditionKind::ObvAccumulation => "obv_accumulation",
            ConditionKind::BearishBar => "bearish_bar",
            ConditionKind::BullishBar => "bullish_bar",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Whether the condition holds at bar `i`.
    pub fn holds(self, set: &IndicatorSet, bars: &[Bar], i: usize, thresholds: &Thresholds) -> bool {
        // Comparisons against NaN are false, which covers warmup.
        let at = |series: &[f64]| series.get(i).copied().unwrap_or(f64::NAN);
        match self {
            ConditionKind::UtBotBuy => set.ut_bot.buy.get(i).copied().unwrap_or(false),
            ConditionKind::UtBotSell => set.ut_bot.sell.get(i).copied().unwrap_or(false),
            ConditionKind::MacdBullish => set.macd.is_bullish(i, thresholds.macd_requires_negative),
            ConditionKind::StochasticBullish => set.stochastic.is_bullish(i, thresholds.stoch_cap()),
            ConditionKind::RsiOversold => at(&set.rsi) < thresholds.rsi_max,
            ConditionKind::CciOversold => at(&set.cci) < thresholds.cci_max,
            ConditionKind::AdxTrending => at(&set.adx.adx) > thresholds.adx_min,
            ConditionKind::ObvAccumulation => set.obv.is_accumulating(i),
            ConditionKind::BearishBar => bars.get(i).map_or(false, Bar::is_bearish),
            ConditionKind::BullishBar => bars.get(i).map_or(false, Bar::is_bullish),
        }
    }

    /// The condition at every bar.
    pub fn series(self, set: &IndicatorSet, bars: &[Bar], thresholds: &Thresholds) -> Vec<bool> {
        (0..bars.len())
            .map(|i| self.holds(set, bars, i, thresholds))
            .collect()
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::indicators::{make_flat_bars, make_ohlc_bars};

    #[test]
    fn names_round_trip_through_serde() {
        for c in ConditionKind::ALL {
            let json = serde_json::to_string(&c).unwrap();
            assert_eq!(json, format!("\"{}\"", c.name()));
            assert_eq!(ConditionKind::from_name(c.name()), Some(c));
        }
        assert_eq!(ConditionKind::from_name("nope"), None);
    }

    #[test]
    fn bar_shape_conditions() {
        let bars = make_ohlc_bars(&[(10.0, 11.0, 8.0, 9.0), (9.0, 12.0, 9.0, 11.0), (11.0, 11.0, 11.0, 11.0)]);
        let config = EngineConfig::default();
        let set = IndicatorSet::compute(&bars, &config).unwrap();
        let t = &config.thresholds;
        assert_eq!(ConditionKind::BearishBar.series(&set, &bars, t), vec![true, false, false]);
        assert_eq!(ConditionKind::BullishBar.series(&set, &bars, t), vec![false, true, false]);
    }

    #[test]
    fn undefined_values_are_false() {
        let bars = make_flat_bars(&[10.0; 5]);
        let config = EngineConfig::default();
        let set = IndicatorSet::compute(&bars, &config).unwrap();
        for c in ConditionKind::ALL {
            assert!(
                c.series(&set, &bars, &config.thresholds).iter().all(|v| !v),
                "{c} should be false on a short flat series"
            );
        }
    }

    #[test]
    fn rsi_threshold_is_configurable() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        let bars = crate::indicators::make_bars(&closes);
        let config = EngineConfig::default();
        let set = IndicatorSet::compute(&bars, &config).unwrap();

        let mut t = config.thresholds;
        assert!(ConditionKind::RsiOversold.holds(&set, &bars, 19, &t));
        t.rsi_max = 0.0;
        assert!(!ConditionKind::RsiOversold.holds(&set, &bars, 19, &t));
    }

    #[test]
    fn disabled_stoch_cap_admits_high_k_crosses() {
        let closes: Vec<f64> = (0..40)
            .map(|i| if i < 30 { 100.0 - i as f64 * 0.5 } else { 85.0 + (i - 29) as f64 * 3.0 })
            .collect();
        let bars = crate::indicators::make_bars(&closes);
        let config = EngineConfig::default();
        let set = IndicatorSet::compute(&bars, &config).unwrap();

        let capped = ConditionKind::StochasticBullish.series(&set, &bars, &config.thresholds);
        let mut t = config.thresholds;
        t.stoch_max_k = Some(0.0);
        let uncapped = ConditionKind::StochasticBullish.series(&set, &bars, &t);

        for i in 0..bars.len() {
            assert_eq!(uncapped[i], set.stochastic.is_bullish(i, None), "bar {i}");
            assert!(!capped[i] || uncapped[i], "cap only removes signals, bar {i}");
        }
    }

    #[test]
    fn out_of_range_index_is_false() {
        let bars = make_flat_bars(&[10.0; 3]);
        let config = EngineConfig::default();
        let set = IndicatorSet::compute(&bars, &config).unwrap();
        for c in ConditionKind::ALL {
            assert!(!c.holds(&set, &bars, 99, &config.thresholds));
        }
    }
}
