use serde::{Deserialize, Serialize};

/// Free-text notes on a child's sensory sensitivities and preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensoryProfile {
    pub tactile_sensitivities: String,
    pub tactile_preferences: String,
    pub auditory_sensitivities: String,
    pub auditory_preferences: String,
    pub visual_sensitivities: String,
    pub visual_preferences: String,
}

impl SensoryProfile {
    pub fn is_empty(&self) -> bool {
        [
            &self.tactile_sensitivities,
            &self.tactile_preferences,
            &self.auditory_sensitivities,
            &self.auditory_preferences,
            &self.visual_sensitivities,
            &self.visual_preferences,
        ]
        .iter()
        .all(|field| field.trim().is_empty())
    }
}
