use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A dietary goal. Selects which weight table and threshold rules apply
/// during rule scoring and which regression model runs during prediction.
///
/// The set is closed: unknown identifiers fail to parse and are rejected
/// before any evaluation starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Concept {
    Diet,
    Keto,
    LowSodium,
    Glycemic,
    Bulking,
}

pub const CONCEPT_COUNT: usize = 5;

impl Concept {
    pub const ALL: [Concept; CONCEPT_COUNT] = [
        Concept::Diet,
        Concept::Keto,
        Concept::LowSodium,
        Concept::Glycemic,
        Concept::Bulking,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Concept::Diet => "diet",
            Concept::Keto => "keto",
            Concept::LowSodium => "low_sodium",
            Concept::Glycemic => "glycemic",
            Concept::Bulking => "bulking",
        }
    }

    #[inline]
    #[must_use]
    pub fn profile(self) -> &'static ConceptProfile {
        &PROFILES[self as usize]
    }
}

impl FromStr for Concept {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Concept::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::UnknownConcept(s.to_string()))
    }
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized `[0, 1]` signals a scoring weight can attach to. The `Low`
/// variants invert their nutrient (lower raw value scores higher).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreSignal {
    KcalLow,
    KcalHigh,
    Protein,
    FatLow,
    FatHigh,
    CarbLow,
    SugarLow,
    Fiber,
    SodiumLow,
    SatLow,
    NetCarbLow,
    ProtDensity,
}

/// Raw inputs threshold rules compare against, in original units
/// (kcal, grams, milligrams, or a ratio for `ProtDensity`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleInput {
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
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Above,
    Below,
}

/// Cumulative hard adjustment: its delta applies whenever the input strictly
/// crosses the threshold, independently of the other steps.
#[derive(Debug, Clone, Copy)]
pub struct Step {
    pub input: RuleInput,
    pub bound: Bound,
    pub threshold: f64,
    pub delta: f64,
}

const fn above(input: RuleInput, threshold: f64, delta: f64) -> Step {
    Step {
        input,
        bound: Bound::Above,
        threshold,
        delta,
    }
}

const fn below(input: RuleInput, threshold: f64, delta: f64) -> Step {
    Step {
        input,
        bound: Bound::Below,
        threshold,
        delta,
    }
}

/// First-match threshold ladder: rungs are ordered most specific first and
/// only the first rung the input crosses applies.
#[derive(Debug, Clone, Copy)]
pub struct Ladder {
    pub input: RuleInput,
    pub bound: Bound,
    pub rungs: &'static [(f64, f64)],
}

/// Linear penalty that grows past `start` at `rate` per unit, capped at `cap`.
#[derive(Debug, Clone, Copy)]
pub struct SlidingPenalty {
    pub input: RuleInput,
    pub start: f64,
    pub rate: f64,
    pub cap: f64,
}

/// Complete rule table for one concept. Kept as data rather than inline
/// conditionals so each threshold is independently testable.
pub struct ConceptProfile {
    pub weights: &'static [(ScoreSignal, f64)],
    pub steps: &'static [Step],
    pub ladders: &'static [Ladder],
    pub sliding: &'static [SlidingPenalty],
    /// Input and ceiling that short-circuit the whole score to zero.
    pub hard_zero: Option<(RuleInput, f64)>,
    /// Substrings of the dish name that trigger a flat adjustment once.
    pub name_markers: Option<(&'static [&'static str], f64)>,
    /// Whether the accumulated adjustment scales the weighted base
    /// (`base * (1 + adj)`) instead of adding to it (`base + adj`).
    pub multiplicative: bool,
}

/// Adjustments applied to every concept before its own rules.
pub const GLOBAL_STEPS: &[Step] = &[
    above(RuleInput::Sodium, 2000.0, -0.15),
    above(RuleInput::Sugar, 30.0, -0.10),
    above(RuleInput::Kcal, 800.0, -0.10),
    above(RuleInput::SatFat, 15.0, -0.08),
];

/// Dish-name markers for soups, stews and broths.
const SOUP_MARKERS: &[&str] = &["국", "탕", "찌개", "전골", "해장국", "국밥"];

static PROFILES: [ConceptProfile; CONCEPT_COUNT] = [
    // diet: low calories first, protein to spare muscle.
    ConceptProfile {
        weights: &[
            (ScoreSignal::KcalLow, 0.28),
            (ScoreSignal::Protein, 0.25),
            (ScoreSignal::SugarLow, 0.12),
            (ScoreSignal::SodiumLow, 0.10),
            (ScoreSignal::FatLow, 0.12),
            (ScoreSignal::Fiber, 0.08),
            (ScoreSignal::NetCarbLow, 0.05),
        ],
        steps: &[
            above(RuleInput::Kcal, 150.0, -0.15),
            above(RuleInput::Sugar, 4.0, -0.15),
            above(RuleInput::Carbs, 15.0, -0.10),
        ],
        ladders: &[Ladder {
            input: RuleInput::Kcal,
            bound: Bound::Below,
            rungs: &[(80.0, 0.25), (120.0, 0.20), (150.0, 0.15)],
        }],
        sliding: &[],
        hard_zero: None,
        name_markers: None,
        multiplicative: false,
    },
    // keto: net carbs dominate everything else.
    ConceptProfile {
        weights: &[
            (ScoreSignal::NetCarbLow, 0.40),
            (ScoreSignal::FatHigh, 0.15),
            (ScoreSignal::Protein, 0.20),
            (ScoreSignal::SugarLow, 0.10),
            (ScoreSignal::SodiumLow, 0.10),
            (ScoreSignal::SatLow, 0.05),
        ],
        steps: &[
            above(RuleInput::NetCarb, 15.0, -0.20),
            above(RuleInput::Sodium, 800.0, -0.08),
        ],
        ladders: &[],
        sliding: &[],
        hard_zero: None,
        name_markers: None,
        multiplicative: false,
    },
    // low_sodium: a hard ceiling plus a penalty staircase below it; soups
    // and broths carry a marker penalty on top.
    ConceptProfile {
        weights: &[
            (ScoreSignal::SodiumLow, 0.60),
            (ScoreSignal::KcalLow, 0.12),
            (ScoreSignal::SugarLow, 0.12),
            (ScoreSignal::Protein, 0.08),
            (ScoreSignal::Fiber, 0.06),
            (ScoreSignal::FatLow, 0.02),
        ],
        steps: &[
            above(RuleInput::Sodium, 80.0, -0.06),
            above(RuleInput::Sodium, 120.0, -0.18),
            above(RuleInput::Sodium, 160.0, -0.22),
            above(RuleInput::Sodium, 200.0, -0.30),
        ],
        ladders: &[],
        sliding: &[SlidingPenalty {
            input: RuleInput::Sodium,
            start: 60.0,
            rate: 0.0014,
            cap: 0.35,
        }],
        hard_zero: Some((RuleInput::Sodium, 240.0)),
        name_markers: Some((SOUP_MARKERS, -0.08)),
        multiplicative: false,
    },
    // glycemic: sugar and net carbs, with a sodium first-match ladder.
    ConceptProfile {
        weights: &[
            (ScoreSignal::NetCarbLow, 0.35),
            (ScoreSignal::SugarLow, 0.20),
            (ScoreSignal::Fiber, 0.15),
            (ScoreSignal::Protein, 0.15),
            (ScoreSignal::SatLow, 0.10),
            (ScoreSignal::SodiumLow, 0.10),
        ],
        steps: &[
            above(RuleInput::Sugar, 2.0, -0.20),
            above(RuleInput::NetCarb, 7.0, -0.25),
        ],
        ladders: &[Ladder {
            input: RuleInput::Sodium,
            bound: Bound::Above,
            rungs: &[(230.0, -0.15), (180.0, -0.08)],
        }],
        sliding: &[],
        hard_zero: None,
        name_markers: None,
        multiplicative: false,
    },
    // bulking: protein amount and density stack multiplicative bonuses; the
    // one concept whose adjustment scales the base instead of adding to it.
    ConceptProfile {
        weights: &[
            (ScoreSignal::Protein, 0.50),
            (ScoreSignal::ProtDensity, 0.15),
            (ScoreSignal::KcalHigh, 0.15),
            (ScoreSignal::FatHigh, 0.05),
            (ScoreSignal::SugarLow, 0.05),
            (ScoreSignal::SodiumLow, 0.03),
            (ScoreSignal::SatLow, 0.02),
        ],
        steps: &[
            below(RuleInput::Protein, 6.0, -0.15),
            below(RuleInput::ProtDensity, 0.04, -0.15),
            above(RuleInput::Protein, 15.0, 0.65),
            above(RuleInput::Protein, 17.0, 0.75),
            above(RuleInput::Protein, 20.0, 0.85),
            above(RuleInput::ProtDensity, 0.10, 0.65),
            above(RuleInput::ProtDensity, 0.15, 0.75),
            above(RuleInput::ProtDensity, 0.20, 0.85),
        ],
        ladders: &[],
        sliding: &[],
        hard_zero: None,
        name_markers: None,
        multiplicative: true,
    },
];
