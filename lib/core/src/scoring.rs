use crate::calibration::{ratio, to_unit, QuantileTable, Signal};
use crate::concept::{Bound, Concept, RuleInput, ScoreSignal, GLOBAL_STEPS};
use crate::record::NutritionRecord;

/// Built-in `(low, high)` normalization ranges, used when no calibration
/// table is supplied. Plausible per-100g spans for each nutrient.
fn fallback_range(signal: Signal) -> (f64, f64) {
    match signal {
        Signal::Kcal => (50.0, 600.0),
        Signal::Protein => (2.0, 25.0),
        Signal::Fat => (0.5, 30.0),
        Signal::Carbs => (1.0, 70.0),
        Signal::Sugar => (0.5, 20.0),
        Signal::Fiber => (0.5, 10.0),
        Signal::Sodium => (50.0, 1200.0),
        Signal::SatFat => (0.1, 10.0),
        Signal::NetCarb => (1.0, 60.0),
        _ => (0.0, 1.0),
    }
}

#[inline]
fn band(calibration: Option<&QuantileTable>, signal: Signal) -> (f64, f64) {
    match calibration {
        Some(table) => {
            let q = table.get(signal);
            (q.p10, q.p90)
        }
        None => fallback_range(signal),
    }
}

/// Raw inputs for one record, extracted once per score call.
struct Inputs {
    kcal: f64,
    protein: f64,
    fat: f64,
    carbs: f64,
    sugar: f64,
    fiber: f64,
    sodium: f64,
    sat: f64,
    netcarb: f64,
    prot_density: f64,
}

impl Inputs {
    fn from_record(record: &NutritionRecord) -> Self {
        let kcal = record.kcal();
        let protein = record.protein();
        Self {
            kcal,
            protein,
            fat: record.fat(),
            carbs: record.carbs(),
            sugar: record.sugar(),
            fiber: record.fiber(),
            sodium: record.sodium(),
            sat: record.sat_fat(),
            netcarb: record.net_carb(),
            prot_density: ratio(protein, kcal.max(1e-9)),
        }
    }

    #[inline]
    fn get(&self, input: RuleInput) -> f64 {
        match input {
            RuleInput::Kcal => self.kcal,
            RuleInput::Protein => self.protein,
            RuleInput::Fat => self.fat,
            RuleInput::Carbs => self.carbs,
            RuleInput::Sugar => self.sugar,
            RuleInput::Fiber => self.fiber,
            RuleInput::Sodium => self.sodium,
            RuleInput::SatFat => self.sat,
            RuleInput::NetCarb => self.netcarb,
            RuleInput::ProtDensity => self.prot_density,
        }
    }
}

/// Normalized value of one scoring signal, on the calibrated band when a
/// table is supplied and the built-in fallback range otherwise. Protein
/// density always uses a fixed band; it is never calibrated.
fn signal_value(signal: ScoreSignal, x: &Inputs, calibration: Option<&QuantileTable>) -> f64 {
    let z = |value: f64, signal: Signal, invert: bool| {
        let (low, high) = band(calibration, signal);
        to_unit(value, low, high, invert)
    };
    match signal {
        ScoreSignal::KcalLow => z(x.kcal, Signal::Kcal, true),
        ScoreSignal::KcalHigh => z(x.kcal, Signal::Kcal, false),
        ScoreSignal::Protein => z(x.protein, Signal::Protein, false),
        ScoreSignal::FatLow => z(x.fat, Signal::Fat, true),
        ScoreSignal::FatHigh => z(x.fat, Signal::Fat, false),
        ScoreSignal::CarbLow => z(x.carbs, Signal::Carbs, true),
        ScoreSignal::SugarLow => z(x.sugar, Signal::Sugar, true),
        ScoreSignal::Fiber => z(x.fiber, Signal::Fiber, false),
        ScoreSignal::SodiumLow => z(x.sodium, Signal::Sodium, true),
        ScoreSignal::SatLow => z(x.sat, Signal::SatFat, true),
        ScoreSignal::NetCarbLow => z(x.netcarb, Signal::NetCarb, true),
        ScoreSignal::ProtDensity => to_unit(x.prot_density, 0.02, 0.25, false),
    }
}

/// Rule-based suitability of one record for a concept, in `[0, 100]`.
///
/// The weighted sum of normalized signals is combined with the concept's
/// hard threshold adjustments; `bulking` applies the adjustment
/// multiplicatively, every other concept additively. The calibrated and
/// fallback paths share this formula and differ only in the `(low, high)`
/// bands.
#[must_use]
pub fn compute_score(
    concept: Concept,
    record: &NutritionRecord,
    calibration: Option<&QuantileTable>,
) -> f64 {
    let profile = concept.profile();
    let x = Inputs::from_record(record);

    if let Some((input, ceiling)) = profile.hard_zero {
        if x.get(input) > ceiling {
            return 0.0;
        }
    }

    let mut adjustment = 0.0;
    for step in GLOBAL_STEPS.iter().chain(profile.steps) {
        let value = x.get(step.input);
        let crossed = match step.bound {
            Bound::Above => value > step.threshold,
            Bound::Below => value < step.threshold,
        };
        if crossed {
            adjustment += step.delta;
        }
    }
    for ladder in profile.ladders {
        let value = x.get(ladder.input);
        for &(threshold, delta) in ladder.rungs {
            let crossed = match ladder.bound {
                Bound::Above => value > threshold,
                Bound::Below => value < threshold,
            };
            if crossed {
                adjustment += delta;
                break;
            }
        }
    }
    for sliding in profile.sliding {
        let value = x.get(sliding.input);
        if value > sliding.start {
            adjustment -= (sliding.rate * (value - sliding.start)).min(sliding.cap);
        }
    }
    if let Some((markers, delta)) = profile.name_markers {
        if markers.iter().any(|m| record.name.contains(m)) {
            adjustment += delta;
        }
    }

    let base: f64 = profile
        .weights
        .iter()
        .map(|&(signal, weight)| weight * signal_value(signal, &x, calibration))
        .sum();

    let raw = if profile.multiplicative {
        base * (1.0 + adjustment)
    } else {
        base + adjustment
    };
    raw.clamp(0.0, 1.0) * 100.0
}
