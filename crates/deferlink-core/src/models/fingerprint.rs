use serde::{Deserialize, Serialize};

/// Device attributes reported by the app at resolution time.
///
/// Ephemeral — lives only for the duration of one resolution attempt.
/// Every field is optional; comparators degrade missing attributes to a
/// neutral score instead of failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryFingerprint {
    pub timezone: Option<String>,
    pub language: Option<String>,
    /// "WxH" screen geometry, orientation-insensitive.
    pub screen_size: Option<String>,
    /// Device model string (codename or marketing name).
    pub model: Option<String>,
    pub user_agent: Option<String>,
}

impl QueryFingerprint {
    /// Fold separate width/height readings into `screen_size`, keeping an
    /// already-present string untouched.
    pub fn with_screen_dimensions(mut self, width: u32, height: u32) -> Self {
        if self.screen_size.is_none() {
            self.screen_size = Some(format!("{width}x{height}"));
        }
        self
    }

    /// Number of the five attributes that are present and non-empty.
    pub fn present_attribute_count(&self) -> usize {
        [
            &self.timezone,
            &self.language,
            &self.screen_size,
            &self.model,
            &self.user_agent,
        ]
        .into_iter()
        .filter(|v| v.as_deref().is_some_and(|s| !s.is_empty()))
        .count()
    }
}
