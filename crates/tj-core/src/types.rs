//! Mood and activity tag vocabularies with validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// The mood name or emoji is not recognized.
    #[error("unknown mood: {value}")]
    UnknownMood { value: String },

    /// The activity tag label is not recognized.
    #[error("unknown activity tag: {value}")]
    UnknownTag { value: String },
}

/// How the user felt during a slot.
///
/// Variants are declared in presentation order: high-energy first, low-energy last.
/// Stored by lowercase name, so names must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Energetic,
    Happy,
    Focused,
    Calm,
    Neutral,
    Tired,
    Stressed,
}

impl Mood {
    /// Every mood in presentation order.
    pub const ALL: [Self; 7] = [
        Self::Energetic,
        Self::Happy,
        Self::Focused,
        Self::Calm,
        Self::Neutral,
        Self::Tired,
        Self::Stressed,
    ];

    /// Lowercase name used for storage.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Energetic => "energetic",
            Self::Happy => "happy",
            Self::Focused => "focused",
            Self::Calm => "calm",
            Self::Neutral => "neutral",
            Self::Tired => "tired",
            Self::Stressed => "stressed",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Energetic => "Energetic",
            Self::Happy => "Happy",
            Self::Focused => "Focused",
            Self::Calm => "Calm",
            Self::Neutral => "Neutral",
            Self::Tired => "Tired",
            Self::Stressed => "Stressed",
        }
    }

    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Energetic => "🔥",
            Self::Happy => "😊",
            Self::Focused => "🎯",
            Self::Calm => "😌",
            Self::Neutral => "😐",
            Self::Tired => "😴",
            Self::Stressed => "😰",
        }
    }

    /// Looks up a mood by its emoji.
    pub fn from_emoji(emoji: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mood| mood.emoji() == emoji)
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Mood {
    type Err = ValidationError;

    /// Accepts a name in any case, or the mood's emoji.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|mood| mood.as_str().eq_ignore_ascii_case(trimmed))
            .or_else(|| Self::from_emoji(trimmed))
            .ok_or_else(|| ValidationError::UnknownMood {
                value: s.to_string(),
            })
    }
}

/// Activity category attached to an entry. Stored by label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActivityTag {
    Work,
    Exercise,
    Social,
    Creative,
    Rest,
    Learning,
    Commute,
    Meals,
    Entertainment,
    SelfCare,
}

impl ActivityTag {
    pub const ALL: [Self; 10] = [
        Self::Work,
        Self::Exercise,
        Self::Social,
        Self::Creative,
        Self::Rest,
        Self::Learning,
        Self::Commute,
        Self::Meals,
        Self::Entertainment,
        Self::SelfCare,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Exercise => "Exercise",
            Self::Social => "Social",
            Self::Creative => "Creative",
            Self::Rest => "Rest",
            Self::Learning => "Learning",
            Self::Commute => "Commute",
            Self::Meals => "Meals",
            Self::Entertainment => "Entertainment",
            Self::SelfCare => "Self-care",
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::Work => "💼",
            Self::Exercise => "🏃",
            Self::Social => "👥",
            Self::Creative => "🎨",
            Self::Rest => "🛋️",
            Self::Learning => "📚",
            Self::Commute => "🚗",
            Self::Meals => "🍽️",
            Self::Entertainment => "🎮",
            Self::SelfCare => "🧘",
        }
    }
}

impl fmt::Display for ActivityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for ActivityTag {
    type Err = ValidationError;

    /// Accepts the label in any case; `selfcare` and `self_care` also map to `Self-care`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect();
        Self::ALL
            .into_iter()
            .find(|tag| {
                let label: String = tag.label().chars().filter(|c| *c != '-').collect();
                label.eq_ignore_ascii_case(&normalized)
            })
            .ok_or_else(|| ValidationError::UnknownTag {
                value: s.to_string(),
            })
    }
}

impl Serialize for ActivityTag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ActivityTag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
