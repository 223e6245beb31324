use crate::foundation::core::AXIS_COUNT;

/// One fixed metric axis of a mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisDef {
    /// Stable key, unique within the mode.
    pub id: &'static str,
    /// Default display name. Hosts may substitute localized strings at render time.
    pub name: &'static str,
    /// Short description shown next to the score.
    pub description: &'static str,
}

const fn axis(id: &'static str, name: &'static str, description: &'static str) -> AxisDef {
    AxisDef {
        id,
        name,
        description,
    }
}

const HIGHER_IS_BETTER: &str = "Higher values indicate a better state";

static HEALTH_AXES: [AxisDef; AXIS_COUNT] = [
    axis("cardio", "Cardiopulmonary", HIGHER_IS_BETTER),
    axis("metabolism", "Metabolic efficiency", HIGHER_IS_BETTER),
    axis("body_fat", "Body-fat control", HIGHER_IS_BETTER),
    axis("muscle", "Muscle quality", HIGHER_IS_BETTER),
    axis("posture", "Postural stability", HIGHER_IS_BETTER),
    axis("fatigue", "Fatigue resistance", HIGHER_IS_BETTER),
    axis("recovery", "Recovery capacity", HIGHER_IS_BETTER),
    axis("stress_load", "Stress load", HIGHER_IS_BETTER),
    axis("circulation", "Circulation", HIGHER_IS_BETTER),
    axis("aging_pace", "Aging pace", HIGHER_IS_BETTER),
];

static SKIN_AXES: [AxisDef; AXIS_COUNT] = [
    axis("hydration", "Hydration", HIGHER_IS_BETTER),
    axis("oil_balance", "Oil balance", HIGHER_IS_BETTER),
    axis("pores", "Pore condition", HIGHER_IS_BETTER),
    axis("tone", "Tone evenness", HIGHER_IS_BETTER),
    axis("pigmentation", "Pigmentation", HIGHER_IS_BETTER),
    axis("elasticity", "Elasticity", HIGHER_IS_BETTER),
    axis("fine_lines", "Fine-line risk", HIGHER_IS_BETTER),
    axis("barrier", "Barrier strength", HIGHER_IS_BETTER),
    axis("radiance", "Radiance", HIGHER_IS_BETTER),
    axis("aging_signs", "Aging signs", HIGHER_IS_BETTER),
];

static FORTUNE_AXES: [AxisDef; AXIS_COUNT] = [
    axis("wealth", "Wealth energy", HIGHER_IS_BETTER),
    axis("career", "Career strength", HIGHER_IS_BETTER),
    axis("decisions", "Decision making", HIGHER_IS_BETTER),
    axis("opportunity", "Opportunity sense", HIGHER_IS_BETTER),
    axis("mentors", "Helpful people", HIGHER_IS_BETTER),
    axis("stability", "Stability", HIGHER_IS_BETTER),
    axis("resilience", "Pressure tolerance", HIGHER_IS_BETTER),
    axis("drive", "Drive", HIGHER_IS_BETTER),
    axis("leadership", "Leadership", HIGHER_IS_BETTER),
    axis("life_curve", "Life curve", HIGHER_IS_BETTER),
];

static PSYCHOLOGY_AXES: [AxisDef; AXIS_COUNT] = [
    axis("focus", "Focus", HIGHER_IS_BETTER),
    axis("emotional_stability", "Emotional stability", HIGHER_IS_BETTER),
    axis("stress_tolerance", "Stress tolerance", HIGHER_IS_BETTER),
    axis("communication", "Communication", HIGHER_IS_BETTER),
    axis("social_energy", "Social energy", HIGHER_IS_BETTER),
    axis("trust", "Trust tendency", HIGHER_IS_BETTER),
    axis("rationality", "Rationality", HIGHER_IS_BETTER),
    axis("decision_stability", "Decision stability", HIGHER_IS_BETTER),
    axis("grit", "Psychological resilience", HIGHER_IS_BETTER),
    axis("relationships", "Relationship quality", HIGHER_IS_BETTER),
];

/// Analysis mode. Each mode owns a fixed table of ten axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Body and fitness metrics. Also the fallback for unknown modes.
    Health,
    /// Skin condition metrics.
    Skin,
    /// Fortune-telling style metrics.
    Fortune,
    /// Psychological metrics.
    #[serde(alias = "psy")]
    Psychology,
}

impl Mode {
    /// All modes in overall-index order.
    pub const ALL: [Mode; 4] = [Mode::Health, Mode::Skin, Mode::Fortune, Mode::Psychology];

    /// Canonical lowercase key.
    pub fn key(self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Skin => "skin",
            Self::Fortune => "fortune",
            Self::Psychology => "psychology",
        }
    }

    /// Parse a mode key. Case and surrounding whitespace are ignored; `psy` is accepted.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "health" => Some(Self::Health),
            "skin" => Some(Self::Skin),
            "fortune" => Some(Self::Fortune),
            "psychology" | "psy" => Some(Self::Psychology),
            _ => None,
        }
    }

    /// Parse a mode key, falling back to [`Mode::Health`].
    pub fn resolve(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| {
            tracing::debug!(mode = s, "unknown mode, using health table");
            Self::Health
        })
    }

    /// The fixed axis table for this mode.
    pub fn axes(self) -> &'static [AxisDef; AXIS_COUNT] {
        match self {
            Self::Health => &HEALTH_AXES,
            Self::Skin => &SKIN_AXES,
            Self::Fortune => &FORTUNE_AXES,
            Self::Psychology => &PSYCHOLOGY_AXES,
        }
    }

    /// Weight of this mode's aggregate in the overall index. Weights sum to 1.
    pub fn index_weight(self) -> f64 {
        match self {
            Self::Health => 0.35,
            Self::Skin => 0.20,
            Self::Fortune => 0.20,
            Self::Psychology => 0.25,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
