use serde::{Deserialize, Serialize};

use crate::record::NutritionRecord;

/// Signals the quantile table is fitted over: the eight raw nutrients, net
/// carbs and four derived density/ratio signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Kcal,
    Protein,
    Fat,
    Carbs,
    Sugar,
    Fiber,
    Sodium,
    SatFat,
    NetCarb,
    ProtDensity,
    FatDensity,
    CarbDensity,
    SatRatio,
}

pub const SIGNAL_COUNT: usize = 13;

impl Signal {
    pub const ALL: [Signal; SIGNAL_COUNT] = [
        Signal::Kcal,
        Signal::Protein,
        Signal::Fat,
        Signal::Carbs,
        Signal::Sugar,
        Signal::Fiber,
        Signal::Sodium,
        Signal::SatFat,
        Signal::NetCarb,
        Signal::ProtDensity,
        Signal::FatDensity,
        Signal::CarbDensity,
        Signal::SatRatio,
    ];

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Signal::Kcal => "kcal",
            Signal::Protein => "protein",
            Signal::Fat => "fat",
            Signal::Carbs => "carbs",
            Signal::Sugar => "sugar",
            Signal::Fiber => "fiber",
            Signal::Sodium => "sodium",
            Signal::SatFat => "sat_fat",
            Signal::NetCarb => "netcarb",
            Signal::ProtDensity => "prot_density",
            Signal::FatDensity => "fat_density",
            Signal::CarbDensity => "carb_density",
            Signal::SatRatio => "sat_ratio",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Signal> {
        Signal::ALL.into_iter().find(|s| s.key() == key)
    }
}

/// Percentile breakpoints for one signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantiles {
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
}

impl Quantiles {
    /// Breakpoints used when a signal has zero finite observations, keeping
    /// downstream normalization well-defined.
    pub const EMPTY: Quantiles = Quantiles {
        p10: 0.0,
        p25: 0.0,
        p50: 0.0,
        p75: 1.0,
        p90: 1.0,
    };
}

/// Per-signal breakpoints computed once over the whole catalog. Never
/// mutated after fit.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileTable {
    q: [Quantiles; SIGNAL_COUNT],
}

/// `n / d`, or zero when the denominator is not positive.
#[inline]
pub(crate) fn ratio(n: f64, d: f64) -> f64 {
    if d <= 0.0 {
        0.0
    } else {
        n / d
    }
}

/// Percentile of an ascending-sorted slice with linear interpolation between
/// order statistics.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let low = rank.floor() as usize;
    let high = rank.ceil() as usize;
    let weight = rank - low as f64;
    sorted[low] + (sorted[high] - sorted[low]) * weight
}

impl QuantileTable {
    #[must_use]
    pub fn from_quantiles(q: [Quantiles; SIGNAL_COUNT]) -> Self {
        Self { q }
    }

    #[inline]
    #[must_use]
    pub fn get(&self, signal: Signal) -> &Quantiles {
        &self.q[signal as usize]
    }

    /// Collect every finite observation per signal across the catalog and
    /// compute the p10/p25/p50/p75/p90 breakpoints.
    #[must_use]
    pub fn fit(records: &[NutritionRecord]) -> Self {
        let mut observed: [Vec<f64>; SIGNAL_COUNT] = Default::default();
        for r in records {
            let fat = r.fat();
            let sat = r.sat_fat();
            let values = [
                r.kcal(),
                r.protein(),
                fat,
                r.carbs(),
                r.sugar(),
                r.fiber(),
                r.sodium(),
                sat,
                r.net_carb(),
                ratio(r.protein(), r.kcal()),
                ratio(fat, r.kcal()),
                ratio(r.carbs(), r.kcal()),
                ratio(sat, fat.max(1e-9)),
            ];
            for (bucket, value) in observed.iter_mut().zip(values) {
                if value.is_finite() {
                    bucket.push(value);
                }
            }
        }

        let mut q = [Quantiles::EMPTY; SIGNAL_COUNT];
        for (slot, mut values) in q.iter_mut().zip(observed) {
            if values.is_empty() {
                continue;
            }
            values.sort_unstable_by(f64::total_cmp);
            *slot = Quantiles {
                p10: percentile(&values, 10.0),
                p25: percentile(&values, 25.0),
                p50: percentile(&values, 50.0),
                p75: percentile(&values, 75.0),
                p90: percentile(&values, 90.0),
            };
        }
        Self { q }
    }
}

/// Clip `value` to `[low, high]` and rescale linearly to `[0, 1]`; flipped
/// when `invert` marks the signal as better-when-low. Degenerate bands
/// (`high <= low`) collapse to the neutral midpoint.
#[must_use]
pub fn to_unit(value: f64, low: f64, high: f64, invert: bool) -> f64 {
    if high <= low {
        return 0.5;
    }
    let u = (value.clamp(low, high) - low) / (high - low);
    if invert {
        1.0 - u
    } else {
        u
    }
}
