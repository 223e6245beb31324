use std::collections::BTreeMap;

use crate::foundation::core::AXIS_COUNT;
use crate::foundation::math::{Fnv1a32, XorShift32};
use crate::synth::index::flat_index;
use crate::synth::modes::Mode;

/// Lowest score the engine ever emits.
pub const MIN_SYNTH_SCORE: u8 = 40;
/// Highest score the engine ever emits.
pub const MAX_SYNTH_SCORE: u8 = 95;

/// One scored axis.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MetricScore {
    /// Stable axis key from the mode table.
    pub axis_id: String,
    /// Display name.
    pub display_name: String,
    /// Score in `[0, 100]`.
    pub value: u8,
    /// Short description.
    pub description: String,
}

/// Exactly [`AXIS_COUNT`] scores for one mode, in axis-table order.
///
/// Produced once per analysis and immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct MetricSet {
    mode: Mode,
    seed: Seed,
    scores: Vec<MetricScore>,
}

impl MetricSet {
    fn from_scores(mode: Mode, seed: Seed, scores: Vec<MetricScore>) -> Self {
        debug_assert_eq!(scores.len(), AXIS_COUNT);
        Self { mode, seed, scores }
    }

    /// Mode whose axis table produced this set.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Seed the scores were drawn from.
    pub fn seed(&self) -> Seed {
        self.seed
    }

    /// Scores in axis order.
    pub fn scores(&self) -> &[MetricScore] {
        &self.scores
    }

    /// Raw values in axis order.
    pub fn values(&self) -> [u8; AXIS_COUNT] {
        let mut out = [0u8; AXIS_COUNT];
        for (slot, s) in out.iter_mut().zip(&self.scores) {
            *slot = s.value;
        }
        out
    }

    /// Display names in axis order.
    pub fn labels(&self) -> Vec<String> {
        self.scores.iter().map(|s| s.display_name.clone()).collect()
    }

    /// Rounded mean of the ten values; this mode's input to the overall index.
    pub fn aggregate(&self) -> u8 {
        flat_index(self)
    }
}

/// Form snapshot the engine hashes.
///
/// The four standard fields are always present (empty when unknown) so a missing field and an
/// empty field hash identically.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct Snapshot {
    fields: BTreeMap<String, String>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl Snapshot {
    /// Fields every snapshot carries.
    pub const STANDARD_FIELDS: [&'static str; 4] = ["age", "height", "weight", "waist"];

    /// Snapshot with all standard fields empty.
    pub fn new() -> Self {
        let fields = Self::STANDARD_FIELDS
            .iter()
            .map(|k| ((*k).to_owned(), String::new()))
            .collect();
        Self { fields }
    }

    /// Builder-style setter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Set one field.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Field value, or `""` when absent.
    pub fn get(&self, key: &str) -> &str {
        self.fields.get(key).map(String::as_str).unwrap_or("")
    }

    /// Lenient conversion from arbitrary JSON.
    ///
    /// Strings are kept, numbers are stringified, every other value becomes `""`. A non-object
    /// value yields an all-empty snapshot.
    pub fn from_json_value(value: &serde_json::Value) -> Self {
        let mut out = Self::new();
        let Some(obj) = value.as_object() else {
            return out;
        };
        for (k, v) in obj {
            let s = match v {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                _ => String::new(),
            };
            out.fields.insert(k.clone(), s);
        }
        out
    }

    /// Serialized form with sorted keys. This is the exact text the seed hashes.
    pub fn canonical_json(&self) -> String {
        // A string-to-string map always serializes.
        serde_json::to_string(&self.fields).unwrap_or_default()
    }
}

impl<'de> serde::Deserialize<'de> for Snapshot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Self::from_json_value(&value))
    }
}

/// 32-bit synthesis seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Seed(pub u32);

impl Seed {
    /// FNV-1a over `canonical_json(snapshot) ++ mode`.
    ///
    /// `mode` is hashed verbatim, before any alias or fallback resolution.
    pub fn derive(mode: &str, snapshot: &Snapshot) -> Self {
        let mut h = Fnv1a32::new_default();
        h.write_str(&snapshot.canonical_json());
        h.write_str(mode);
        Self(h.finish())
    }

    pub(crate) fn stream(self) -> XorShift32 {
        XorShift32::new(self.0)
    }
}

fn score_from_unit(r: f64) -> u8 {
    (55.0 + r * 35.0)
        .round()
        .clamp(f64::from(MIN_SYNTH_SCORE), f64::from(MAX_SYNTH_SCORE)) as u8
}

/// Pure, reproducible score synthesis.
///
/// Identical `(mode, snapshot)` pairs always produce identical sets. Unknown modes use the
/// health table; nothing here can fail.
#[tracing::instrument(skip(snapshot))]
pub fn synthesize(mode: &str, snapshot: &Snapshot) -> MetricSet {
    let resolved = Mode::resolve(mode);
    let seed = Seed::derive(mode, snapshot);
    let mut rng = seed.stream();

    let scores = resolved
        .axes()
        .iter()
        .map(|def| MetricScore {
            axis_id: def.id.to_owned(),
            display_name: def.name.to_owned(),
            value: score_from_unit(rng.next_unit()),
            description: def.description.to_owned(),
        })
        .collect();

    tracing::trace!(seed = seed.0, "synthesized metric set");
    MetricSet::from_scores(resolved, seed, scores)
}

/// Stream for `seed` positioned after the axis draws, so derived values never disturb scores.
pub(crate) fn post_axis_stream(seed: Seed) -> XorShift32 {
    let mut rng = seed.stream();
    for _ in 0..AXIS_COUNT {
        rng.next_u32();
    }
    rng
}

#[cfg(test)]
#[path = "../../tests/unit/synth/engine.rs"]
mod tests;
