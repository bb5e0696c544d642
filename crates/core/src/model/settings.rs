use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::layout::StepLayout;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("expected {expected} step messages, got {actual}")]
    MessageCount { expected: usize, actual: usize },

    #[error("step message {index} is empty")]
    EmptyMessage { index: usize },

    #[error("reveal offsets must increase: multiplier < equals < product")]
    RevealOrder,

    #[error("invalid settings json: {0}")]
    Json(#[from] serde_json::Error),
}

//
// ─── TIMINGS ───────────────────────────────────────────────────────────────────
//

/// Offsets of the multiplier → equals → product reveal chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealTimings {
    pub multiplier_ms: u64,
    pub equals_ms: u64,
    pub product_ms: u64,
    /// Extra pause before the chain starts on the simplify step.
    pub simplify_pause_ms: u64,
}

impl Default for RevealTimings {
    fn default() -> Self {
        Self {
            multiplier_ms: 1000,
            equals_ms: 1400,
            product_ms: 1800,
            simplify_pause_ms: 1000,
        }
    }
}

impl RevealTimings {
    #[must_use]
    pub fn multiplier(&self) -> Duration {
        Duration::from_millis(self.multiplier_ms)
    }

    #[must_use]
    pub fn equals(&self) -> Duration {
        Duration::from_millis(self.equals_ms)
    }

    #[must_use]
    pub fn product(&self) -> Duration {
        Duration::from_millis(self.product_ms)
    }

    #[must_use]
    pub fn simplify_pause(&self) -> Duration {
        Duration::from_millis(self.simplify_pause_ms)
    }
}

/// Phase offsets of the intro choreography, each relative to the previous phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroTimings {
    pub shift_ms: u64,
    pub area_reveal_ms: u64,
    pub area_message_ms: u64,
    pub prompt_ms: u64,
}

impl Default for IntroTimings {
    fn default() -> Self {
        Self {
            shift_ms: 1500,
            area_reveal_ms: 450,
            area_message_ms: 0,
            prompt_ms: 1500,
        }
    }
}

impl IntroTimings {
    /// Time from intro start until the fraction starts shifting.
    #[must_use]
    pub fn shift_at(&self) -> Duration {
        Duration::from_millis(self.shift_ms)
    }

    #[must_use]
    pub fn area_reveal_at(&self) -> Duration {
        self.shift_at() + Duration::from_millis(self.area_reveal_ms)
    }

    #[must_use]
    pub fn area_message_at(&self) -> Duration {
        self.area_reveal_at() + Duration::from_millis(self.area_message_ms)
    }

    #[must_use]
    pub fn prompt_at(&self) -> Duration {
        self.area_message_at() + Duration::from_millis(self.prompt_ms)
    }
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

const DEFAULT_INTRO_MESSAGE: &str = "Here's a fraction!";
const DEFAULT_AREA_MESSAGE: &str = "This area model shows the same fraction.";

/// Validated configuration for one tutorial session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TutorialSettings {
    layout: StepLayout,
    reveal: RevealTimings,
    intro: IntroTimings,
    step_messages: Vec<String>,
    intro_message: String,
    area_message: String,
}

/// Unvalidated settings as read from configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TutorialSettingsDraft {
    pub layout: StepLayout,
    pub reveal: RevealTimings,
    pub intro: IntroTimings,
    pub step_messages: Option<Vec<String>>,
    pub intro_message: Option<String>,
    pub area_message: Option<String>,
}

impl TutorialSettingsDraft {
    #[must_use]
    pub fn new(layout: StepLayout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    /// Parse a draft from JSON; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Json` for malformed input or unknown fields.
    pub fn from_json(raw: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Validate and normalize the draft.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the message list does not match the layout,
    /// a message is blank, or reveal offsets are not strictly increasing.
    pub fn validate(self) -> Result<TutorialSettings, SettingsError> {
        let reveal = self.reveal;
        if !(reveal.multiplier_ms < reveal.equals_ms && reveal.equals_ms < reveal.product_ms) {
            return Err(SettingsError::RevealOrder);
        }

        let step_messages = self
            .step_messages
            .unwrap_or_else(|| self.layout.default_messages());
        let expected = self.layout.step_count();
        if step_messages.len() != expected {
            return Err(SettingsError::MessageCount {
                expected,
                actual: step_messages.len(),
            });
        }
        let step_messages = step_messages
            .into_iter()
            .enumerate()
            .map(|(index, message)| {
                let message = message.trim().to_string();
                if message.is_empty() {
                    Err(SettingsError::EmptyMessage { index })
                } else {
                    Ok(message)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TutorialSettings {
            layout: self.layout,
            reveal,
            intro: self.intro,
            step_messages,
            intro_message: normalize_or(self.intro_message, DEFAULT_INTRO_MESSAGE),
            area_message: normalize_or(self.area_message, DEFAULT_AREA_MESSAGE),
        })
    }
}

impl TutorialSettings {
    /// Default settings for the given layout.
    ///
    /// # Panics
    ///
    /// Panics if the built-in defaults fail validation.
    #[must_use]
    pub fn for_layout(layout: StepLayout) -> Self {
        TutorialSettingsDraft::new(layout)
            .validate()
            .expect("default settings should be valid")
    }

    #[must_use]
    pub fn layout(&self) -> StepLayout {
        self.layout
    }

    #[must_use]
    pub fn reveal(&self) -> &RevealTimings {
        &self.reveal
    }

    #[must_use]
    pub fn intro(&self) -> &IntroTimings {
        &self.intro
    }

    /// Coach message for `step`, clamped to the last step.
    #[must_use]
    pub fn step_message(&self, step: usize) -> &str {
        &self.step_messages[self.layout.clamp(step)]
    }

    #[must_use]
    pub fn step_messages(&self) -> &[String] {
        &self.step_messages
    }

    #[must_use]
    pub fn intro_message(&self) -> &str {
        &self.intro_message
    }

    #[must_use]
    pub fn area_message(&self) -> &str {
        &self.area_message
    }
}

impl Default for TutorialSettings {
    fn default() -> Self {
        Self::for_layout(StepLayout::default())
    }
}

fn normalize_or(value: Option<String>, fallback: &str) -> String {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}
