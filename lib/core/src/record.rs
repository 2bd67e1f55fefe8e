use serde::{Deserialize, Serialize};

/// Number of entries in a [`FeatureVector`].
pub const FEATURE_DIM: usize = 9;

/// Fixed-order numeric features derived from a record:
/// `[kcal, protein, fat, carbs, sugar, fiber, sodium, sat_fat, netcarb]`.
pub type FeatureVector = [f64; FEATURE_DIM];

/// One catalog dish with per-100g nutrition values.
///
/// `None` is the single representation of a missing value; the ingestion
/// boundary maps empty cells and non-finite numbers to `None` once, so read
/// sites never re-default. Immutable after load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionRecord {
    pub name: String,
    #[serde(default)]
    pub kcal: Option<f64>,
    #[serde(default)]
    pub protein: Option<f64>,
    #[serde(default)]
    pub fat: Option<f64>,
    #[serde(default)]
    pub carbs: Option<f64>,
    #[serde(default)]
    pub sugar: Option<f64>,
    #[serde(default)]
    pub fiber: Option<f64>,
    #[serde(default)]
    pub sodium: Option<f64>,
    #[serde(default)]
    pub sat_fat: Option<f64>,
}

#[inline]
fn safe(v: Option<f64>) -> f64 {
    match v {
        Some(x) if x.is_finite() => x,
        _ => 0.0,
    }
}

impl NutritionRecord {
    /// Record with the given name and no nutrient values.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kcal: None,
            protein: None,
            fat: None,
            carbs: None,
            sugar: None,
            fiber: None,
            sodium: None,
            sat_fat: None,
        }
    }

    #[inline]
    pub fn kcal(&self) -> f64 {
        safe(self.kcal)
    }

    #[inline]
    pub fn protein(&self) -> f64 {
        safe(self.protein)
    }

    #[inline]
    pub fn fat(&self) -> f64 {
        safe(self.fat)
    }

    #[inline]
    pub fn carbs(&self) -> f64 {
        safe(self.carbs)
    }

    #[inline]
    pub fn sugar(&self) -> f64 {
        safe(self.sugar)
    }

    #[inline]
    pub fn fiber(&self) -> f64 {
        safe(self.fiber)
    }

    #[inline]
    pub fn sodium(&self) -> f64 {
        safe(self.sodium)
    }

    /// Saturated fat, falling back to total fat when the field is absent.
    #[inline]
    pub fn sat_fat(&self) -> f64 {
        match self.sat_fat {
            Some(x) if x.is_finite() => x,
            _ => self.fat(),
        }
    }

    /// Carbohydrates minus fiber, floored at zero.
    #[inline]
    pub fn net_carb(&self) -> f64 {
        (self.carbs() - self.fiber()).max(0.0)
    }

    /// The eight raw nutrient fields in feature order.
    #[inline]
    pub fn nutrients(&self) -> [Option<f64>; 8] {
        [
            self.kcal,
            self.protein,
            self.fat,
            self.carbs,
            self.sugar,
            self.fiber,
            self.sodium,
            self.sat_fat,
        ]
    }

    /// Whether at least one raw nutrient carries a finite value.
    #[inline]
    pub fn has_nutrient(&self) -> bool {
        self.nutrients()
            .iter()
            .any(|v| matches!(v, Some(x) if x.is_finite()))
    }

    /// Pure, total feature extraction: missing fields coerce to `0.0`,
    /// `sat_fat` falls back to `fat`, and the net-carb entry floors at zero.
    #[must_use]
    pub fn features(&self) -> FeatureVector {
        [
            self.kcal(),
            self.protein(),
            self.fat(),
            self.carbs(),
            self.sugar(),
            self.fiber(),
            self.sodium(),
            self.sat_fat(),
            self.net_carb(),
        ]
    }
}
