use serde::{Deserialize, Serialize};

use crate::constants::WEIGHT_SUM_EPSILON;

/// The five fingerprint features the engine compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Timezone,
    Screen,
    Language,
    Device,
    UserAgent,
}

impl Feature {
    /// All features, in scoring order.
    pub const ALL: [Feature; 5] = [
        Feature::Timezone,
        Feature::Screen,
        Feature::Language,
        Feature::Device,
        Feature::UserAgent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Feature::Timezone => "timezone",
            Feature::Screen => "screen",
            Feature::Language => "language",
            Feature::Device => "device",
            Feature::UserAgent => "user_agent",
        }
    }
}

/// Weights for the five comparator scores.
///
/// Non-negative, summing to 1.0. Owned by the scoring path and replaced
/// wholesale by the adaptation cycle — never mutated field by field while
/// readers hold a reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightVector {
    pub timezone: f64,
    pub screen: f64,
    pub language: f64,
    pub device: f64,
    pub user_agent: f64,
}

impl Default for WeightVector {
    fn default() -> Self {
        // Priors: timezone and screen geometry are the most stable
        // attributes; user-agent strings differ wildly between a browser
        // and an embedded webview, so they carry little weight.
        Self {
            timezone: 0.35,
            screen: 0.25,
            language: 0.20,
            device: 0.15,
            user_agent: 0.05,
        }
    }
}

impl WeightVector {
    /// Weight assigned to a feature.
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Timezone => self.timezone,
            Feature::Screen => self.screen,
            Feature::Language => self.language,
            Feature::Device => self.device,
            Feature::UserAgent => self.user_agent,
        }
    }

    /// Set the weight for a feature.
    pub fn set(&mut self, feature: Feature, value: f64) {
        match feature {
            Feature::Timezone => self.timezone = value,
            Feature::Screen => self.screen = value,
            Feature::Language => self.language = value,
            Feature::Device => self.device = value,
            Feature::UserAgent => self.user_agent = value,
        }
    }

    /// Sum of all weights.
    pub fn sum(&self) -> f64 {
        Feature::ALL.iter().map(|f| self.get(*f)).sum()
    }

    /// Whether the vector sums to 1.0 within tolerance.
    pub fn is_normalized(&self) -> bool {
        (self.sum() - 1.0).abs() <= WEIGHT_SUM_EPSILON
    }

    /// Return a copy scaled so the weights sum to 1.0. A zero-sum vector
    /// falls back to the default priors.
    pub fn normalized(&self) -> Self {
        let sum = self.sum();
        if sum <= 0.0 {
            return Self::default();
        }
        let mut out = self.clone();
        for feature in Feature::ALL {
            out.set(feature, self.get(feature) / sum);
        }
        out
    }
}
