//! The GM's data-entry surface, expressed as an async capability.
//!
//! Resolution is two-phase: the resolver first awaits a threshold from
//! the prompt (which may never answer, or may be cancelled) and only then
//! resolves with it.

use async_trait::async_trait;

/// Target numbers a GM may pick for a generic skill roll.
pub const SKILL_TARGET_OPTIONS: [i32; 6] = [4, 6, 8, 10, 12, 14];

/// Pre-filled threshold for every prompt.
pub const DEFAULT_TARGET_NUMBER: i32 = 8;

/// What the resolver is being asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThresholdRequest {
    /// Pick one of a fixed set of target numbers.
    Choice {
        /// Dialog title, e.g. `Perception Roll`.
        title: String,
        /// Allowed values.
        options: Vec<i32>,
        /// Pre-selected value.
        default: i32,
    },
    /// Enter any integer.
    Number {
        /// Dialog title, e.g. `Ranged Attack`.
        title: String,
        /// Field label, e.g. `Defender Total`.
        label: String,
        /// Pre-filled value.
        default: i32,
    },
}

impl ThresholdRequest {
    /// Choice prompt over [`SKILL_TARGET_OPTIONS`].
    pub fn skill_target(title: impl Into<String>) -> Self {
        Self::Choice {
            title: title.into(),
            options: SKILL_TARGET_OPTIONS.to_vec(),
            default: DEFAULT_TARGET_NUMBER,
        }
    }

    /// Free-form numeric prompt.
    pub fn number(title: impl Into<String>, label: impl Into<String>) -> Self {
        Self::Number {
            title: title.into(),
            label: label.into(),
            default: DEFAULT_TARGET_NUMBER,
        }
    }

    /// Dialog title.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Choice { title, .. } | Self::Number { title, .. } => title,
        }
    }

    /// Field label shown next to the input.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Choice { .. } => "GM Target Number",
            Self::Number { label, .. } => label,
        }
    }

    /// Pre-filled value.
    #[must_use]
    pub fn default_value(&self) -> i32 {
        match self {
            Self::Choice { default, .. } | Self::Number { default, .. } => *default,
        }
    }

    /// Normalizes an answer: choices outside the option set fall back to
    /// the default, free-form numbers are taken as given.
    #[must_use]
    pub fn accept(&self, answer: i32) -> i32 {
        match self {
            Self::Choice {
                options, default, ..
            } => {
                if options.contains(&answer) {
                    answer
                } else {
                    *default
                }
            }
            Self::Number { .. } => answer,
        }
    }
}

/// Asks the resolving GM for a threshold.
#[async_trait]
pub trait ThresholdPrompt: Send + Sync {
    /// Suspends until the GM answers. `None` means the GM cancelled.
    async fn request_threshold(&self, request: &ThresholdRequest) -> Option<i32>;
}
