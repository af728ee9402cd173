//! Clip record as consumed by the content pipeline
//!
//! The storage layer owns persistence; this is only the row shape the
//! pipeline reads. Field names match the storage columns so a row fetched as
//! JSON deserializes directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::DEFAULT_CATEGORY;

/// Card themes offered by the clipper UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeName {
    #[default]
    Default,
    Classic,
    Dark,
    Ocean,
    Forest,
    Sunset,
    Lavender,
}

impl ThemeName {
    /// Look up a theme by its stored name; unknown names map to the default theme
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "classic" => Self::Classic,
            "dark" => Self::Dark,
            "ocean" => Self::Ocean,
            "forest" => Self::Forest,
            "sunset" => Self::Sunset,
            "lavender" => Self::Lavender,
            _ => Self::Default,
        }
    }
}

// Themes are added and retired in the UI; old rows must still load.
impl<'de> Deserialize<'de> for ThemeName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = Option::<String>::deserialize(deserializer)?;
        Ok(name.as_deref().map(Self::from_name).unwrap_or_default())
    }
}

/// A captured web snippet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub id: Uuid,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default)]
    pub html_raw: Option<String>,
    #[serde(default)]
    pub text_plain: Option<String>,
    #[serde(default)]
    pub theme_name: ThemeName,
    #[serde(default = "default_category", deserialize_with = "null_as_default_category")]
    pub category: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

// Storage returns NULL for unset text columns.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_default_category<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_category))
}

/// Present and not whitespace-only
fn usable(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.trim().is_empty())
}

impl Clip {
    /// Create an empty clip with a fresh id
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            title: String::new(),
            html_raw: None,
            text_plain: None,
            theme_name: ThemeName::Default,
            category: default_category(),
            created_at: None,
            updated_at: None,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html_raw = Some(html.into());
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_plain = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: ThemeName) -> Self {
        self.theme_name = theme;
        self
    }

    /// Captured HTML, if there is any
    #[must_use]
    pub fn usable_html(&self) -> Option<&str> {
        usable(self.html_raw.as_ref())
    }

    /// Captured plain text, if there is any
    #[must_use]
    pub fn usable_text(&self) -> Option<&str> {
        usable(self.text_plain.as_ref())
    }

    /// Title, if it is not blank
    #[must_use]
    pub fn usable_title(&self) -> Option<&str> {
        Some(self.title.as_str()).filter(|t| !t.trim().is_empty())
    }

    /// Whether the clip sits in the reserved "uncategorized" bucket
    #[must_use]
    pub fn is_uncategorized(&self) -> bool {
        let category = self.category.trim();
        category.is_empty() || category == DEFAULT_CATEGORY
    }
}

impl Default for Clip {
    fn default() -> Self {
        Self::new()
    }
}
