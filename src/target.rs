use std::hash::Hash;

const WEIGHT_SATURATION: f64 = 0.24;
const WEIGHT_LIGHTNESS: f64 = 0.52;
const WEIGHT_POPULATION: f64 = 0.24;

const MIN_VIBRANT_SATURATION: f64 = 0.35;
const TARGET_VIBRANT_SATURATION: f64 = 1.0;

const TARGET_MUTED_SATURATION: f64 = 0.3;
const MAX_MUTED_SATURATION: f64 = 0.4;

const MIN_LIGHT_LIGHTNESS: f64 = 0.55;
const TARGET_LIGHT_LIGHTNESS: f64 = 0.74;

const TARGET_DARK_LIGHTNESS: f64 = 0.26;
const MAX_DARK_LIGHTNESS: f64 = 0.45;

const MIN_NORMAL_LIGHTNESS: f64 = 0.3;
const TARGET_NORMAL_LIGHTNESS: f64 = 0.5;
const MAX_NORMAL_LIGHTNESS: f64 = 0.7;

/// A profile of saturation and lightness a palette picks its best matching swatch for. The six default targets make up
/// a palette's dominant colors.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Target {
    id: u64,
    name: &'static str,
    // min, target, max
    saturation_targets: (f64, f64, f64),
    // min, target, max
    lightness_targets: (f64, f64, f64),
    // saturation, lightness, population
    weights: (f64, f64, f64),
    is_exclusive: bool,
}

impl Target {
    pub fn default_targets() -> [Target; 6] {
        [
            Target::light_vibrant(),
            Target::vibrant(),
            Target::dark_vibrant(),
            Target::light_muted(),
            Target::muted(),
            Target::dark_muted(),
        ]
    }

    pub fn light_vibrant() -> Target {
        Target {
            id: 0,
            name: "vibrant_light",
            saturation_targets: (MIN_VIBRANT_SATURATION, TARGET_VIBRANT_SATURATION, 1.0),
            lightness_targets: (MIN_LIGHT_LIGHTNESS, TARGET_LIGHT_LIGHTNESS, 1.0),
            ..Target::new()
        }
    }

    pub fn vibrant() -> Target {
        Target {
            id: 1,
            name: "vibrant",
            saturation_targets: (MIN_VIBRANT_SATURATION, TARGET_VIBRANT_SATURATION, 1.0),
            lightness_targets: (MIN_NORMAL_LIGHTNESS, TARGET_NORMAL_LIGHTNESS, MAX_NORMAL_LIGHTNESS),
            ..Target::new()
        }
    }

    pub fn dark_vibrant() -> Target {
        Target {
            id: 2,
            name: "vibrant_dark",
            saturation_targets: (MIN_VIBRANT_SATURATION, TARGET_VIBRANT_SATURATION, 1.0),
            lightness_targets: (0.0, TARGET_DARK_LIGHTNESS, MAX_DARK_LIGHTNESS),
            ..Target::new()
        }
    }

    pub fn light_muted() -> Target {
        Target {
            id: 3,
            name: "muted_light",
            saturation_targets: (0.0, TARGET_MUTED_SATURATION, MAX_MUTED_SATURATION),
            lightness_targets: (MIN_LIGHT_LIGHTNESS, TARGET_LIGHT_LIGHTNESS, 1.0),
            ..Target::new()
        }
    }

    pub fn muted() -> Target {
        Target {
            id: 4,
            name: "muted",
            saturation_targets: (0.0, TARGET_MUTED_SATURATION, MAX_MUTED_SATURATION),
            lightness_targets: (MIN_NORMAL_LIGHTNESS, TARGET_NORMAL_LIGHTNESS, MAX_NORMAL_LIGHTNESS),
            ..Target::new()
        }
    }

    pub fn dark_muted() -> Target {
        Target {
            id: 5,
            name: "muted_dark",
            saturation_targets: (0.0, TARGET_MUTED_SATURATION, MAX_MUTED_SATURATION),
            lightness_targets: (0.0, TARGET_DARK_LIGHTNESS, MAX_DARK_LIGHTNESS),
            ..Target::new()
        }
    }

    /// A new custom target with a random identity, matching any saturation and lightness.
    pub fn new() -> Self {
        Self {
            id: rand::random(),
            name: "custom",
            saturation_targets: (0.0, 0.5, 1.0),
            lightness_targets: (0.0, 0.5, 1.0),
            weights: (WEIGHT_SATURATION, WEIGHT_LIGHTNESS, WEIGHT_POPULATION),
            is_exclusive: true,
        }
    }

    /// A new custom target under the given name.
    pub fn named(name: &'static str) -> Self {
        Self { name, ..Self::new() }
    }

    pub fn saturation(self, minimum: f64, target: f64, maximum: f64) -> Self {
        Self {
            saturation_targets: (minimum, target, maximum),
            ..self
        }
    }

    pub fn lightness(self, minimum: f64, target: f64, maximum: f64) -> Self {
        Self {
            lightness_targets: (minimum, target, maximum),
            ..self
        }
    }

    pub fn weights(self, saturation: f64, lightness: f64, population: f64) -> Self {
        Self {
            weights: (saturation, lightness, population),
            ..self
        }
    }

    /// Whether a swatch picked for this target can't be picked for any later target.
    pub fn exclusive(self, is_exclusive: bool) -> Self {
        Self { is_exclusive, ..self }
    }

    pub(crate) fn id(self) -> u64 {
        self.id
    }

    pub fn name(self) -> &'static str {
        self.name
    }

    pub(crate) fn normalize_weights(&mut self) {
        let weights_sum = self.weights.0 + self.weights.1 + self.weights.2;

        if weights_sum != 0.0 {
            for weight in [&mut self.weights.0, &mut self.weights.1, &mut self.weights.2] {
                if *weight > 0.0 {
                    *weight /= weights_sum;
                }
            }
        }
    }

    pub fn minimum_saturation(self) -> f64 {
        self.saturation_targets.0
    }

    pub fn target_saturation(self) -> f64 {
        self.saturation_targets.1
    }

    pub fn maximum_saturation(self) -> f64 {
        self.saturation_targets.2
    }

    pub fn minimum_lightness(self) -> f64 {
        self.lightness_targets.0
    }

    pub fn target_lightness(self) -> f64 {
        self.lightness_targets.1
    }

    pub fn maximum_lightness(self) -> f64 {
        self.lightness_targets.2
    }

    pub fn saturation_weight(self) -> f64 {
        self.weights.0
    }

    pub fn lightness_weight(self) -> f64 {
        self.weights.1
    }

    pub fn population_weight(self) -> f64 {
        self.weights.2
    }

    pub fn is_exclusive(self) -> bool {
        self.is_exclusive
    }
}

impl Default for Target {
    fn default() -> Self {
        Self::new()
    }
}

impl Eq for Target {}
impl PartialEq for Target {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Hash for Target {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
