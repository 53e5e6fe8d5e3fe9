//! Core preference record for the embeddable Hebrew accessibility toolbar.
//!
//! The crate is split along three seams: [`store`] owns the persisted
//! settings record, [`applier`] projects a settings snapshot onto the live
//! document, and [`tts`] drives the text-to-speech side channel. The binary
//! wires UI events into those three; none of them knows about the widget UI.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod applier;
pub mod config;
pub mod embed;
pub mod store;
pub mod tts;

/// Font size bounds, in percent of the page base size.
pub mod defaults {
    pub const FONT_SIZE: u32 = 100;
    pub const FONT_MIN: u32 = 80;
    pub const FONT_MAX: u32 = 200;
    pub const FONT_STEP: u32 = 10;
}

/// Corner of the viewport the widget is anchored to.
///
/// Chosen once at initialization via the `data-position` attribute on the
/// embedding script tag; rides along in the persisted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    #[default]
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

impl Position {
    pub fn as_css_class(&self) -> &'static str {
        match self {
            Position::BottomRight => "bottom-right",
            Position::BottomLeft => "bottom-left",
            Position::TopRight => "top-right",
            Position::TopLeft => "top-left",
        }
    }

    /// Parses the `data-position` attribute value; anything else is rejected
    /// so the caller falls back to the default corner.
    pub fn from_attr(value: &str) -> Option<Position> {
        match value {
            "bottom-right" => Some(Position::BottomRight),
            "bottom-left" => Some(Position::BottomLeft),
            "top-right" => Some(Position::TopRight),
            "top-left" => Some(Position::TopLeft),
            _ => None,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_css_class())
    }
}

/// The boolean feature switches of the settings record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    HighContrast,
    Grayscale,
    LinkHighlight,
    KeyboardNav,
    BigCursor,
    NoAnimations,
    Tts,
}

/// Flat accessibility preference record, one instance per page load.
///
/// Serialized field names match the JSON object persisted under the fixed
/// storage key, so records written by earlier deployments read back cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub font_size: u32,
    pub high_contrast: bool,
    pub grayscale: bool,
    pub link_highlight: bool,
    pub keyboard_nav: bool,
    pub big_cursor: bool,
    pub no_animations: bool,
    pub tts: bool,
    pub position: Position,
}

impl Default for Settings {
    fn default() -> Self {
        Settings::with_position(Position::default())
    }
}

impl Settings {
    /// The default record anchored to the given corner.
    pub fn with_position(position: Position) -> Self {
        Settings {
            font_size: defaults::FONT_SIZE,
            high_contrast: false,
            grayscale: false,
            link_highlight: false,
            keyboard_nav: false,
            big_cursor: false,
            no_animations: false,
            tts: false,
            position,
        }
    }

    pub fn flag(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::HighContrast => self.high_contrast,
            Toggle::Grayscale => self.grayscale,
            Toggle::LinkHighlight => self.link_highlight,
            Toggle::KeyboardNav => self.keyboard_nav,
            Toggle::BigCursor => self.big_cursor,
            Toggle::NoAnimations => self.no_animations,
            Toggle::Tts => self.tts,
        }
    }

    pub fn set_flag(&mut self, toggle: Toggle, value: bool) {
        match toggle {
            Toggle::HighContrast => self.high_contrast = value,
            Toggle::Grayscale => self.grayscale = value,
            Toggle::LinkHighlight => self.link_highlight = value,
            Toggle::KeyboardNav => self.keyboard_nav = value,
            Toggle::BigCursor => self.big_cursor = value,
            Toggle::NoAnimations => self.no_animations = value,
            Toggle::Tts => self.tts = value,
        }
    }

    /// Shallow-merge a stored record over this one: stored keys overwrite,
    /// missing keys keep their current value. Stored values are taken as-is,
    /// without re-validating numeric bounds.
    pub fn merge_stored(&mut self, stored: StoredPrefs) {
        if let Some(v) = stored.font_size {
            self.font_size = v;
        }
        if let Some(v) = stored.high_contrast {
            self.high_contrast = v;
        }
        if let Some(v) = stored.grayscale {
            self.grayscale = v;
        }
        if let Some(v) = stored.link_highlight {
            self.link_highlight = v;
        }
        if let Some(v) = stored.keyboard_nav {
            self.keyboard_nav = v;
        }
        if let Some(v) = stored.big_cursor {
            self.big_cursor = v;
        }
        if let Some(v) = stored.no_animations {
            self.no_animations = v;
        }
        if let Some(v) = stored.tts {
            self.tts = v;
        }
        if let Some(v) = stored.position {
            self.position = v;
        }
    }
}

/// Partial record as read back from persistent storage.
///
/// Every field is optional so a record written by an older or newer build
/// still merges; keys serde does not recognize are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoredPrefs {
    pub font_size: Option<u32>,
    pub high_contrast: Option<bool>,
    pub grayscale: Option<bool>,
    pub link_highlight: Option<bool>,
    pub keyboard_nav: Option<bool>,
    pub big_cursor: Option<bool>,
    pub no_animations: Option<bool>,
    pub tts: Option<bool>,
    pub position: Option<Position>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_has_everything_off_at_base_font() {
        let settings = Settings::default();
        assert_eq!(settings.font_size, defaults::FONT_SIZE);
        assert!(!settings.high_contrast);
        assert!(!settings.grayscale);
        assert!(!settings.link_highlight);
        assert!(!settings.keyboard_nav);
        assert!(!settings.big_cursor);
        assert!(!settings.no_animations);
        assert!(!settings.tts);
        assert_eq!(settings.position, Position::BottomRight);
    }

    #[test]
    fn position_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&Position::BottomLeft).unwrap(),
            "\"bottom-left\""
        );
        assert_eq!(
            serde_json::from_str::<Position>("\"top-right\"").unwrap(),
            Position::TopRight
        );
    }

    #[test]
    fn position_attr_parsing_rejects_garbage() {
        assert_eq!(Position::from_attr("top-left"), Some(Position::TopLeft));
        assert_eq!(Position::from_attr("center"), None);
        assert_eq!(Position::from_attr(""), None);
    }

    #[test]
    fn merge_overwrites_only_stored_keys() {
        let mut settings = Settings::default();
        let stored: StoredPrefs =
            serde_json::from_str(r#"{"fontSize":120,"grayscale":true}"#).unwrap();
        settings.merge_stored(stored);
        assert_eq!(settings.font_size, 120);
        assert!(settings.grayscale);
        assert!(!settings.high_contrast);
        assert_eq!(settings.position, Position::BottomRight);
    }

    #[test]
    fn merge_ignores_unknown_keys() {
        let stored: StoredPrefs =
            serde_json::from_str(r#"{"fontSize":110,"futureFeature":true}"#).unwrap();
        let mut settings = Settings::default();
        settings.merge_stored(stored);
        assert_eq!(settings.font_size, 110);
    }

    #[test]
    fn settings_round_trip_through_json() {
        let mut settings = Settings::with_position(Position::TopLeft);
        settings.font_size = 130;
        settings.link_highlight = true;
        let payload = serde_json::to_string(&settings).unwrap();
        assert!(payload.contains("\"fontSize\":130"));
        assert!(payload.contains("\"position\":\"top-left\""));
        let back: Settings = serde_json::from_str(&payload).unwrap();
        assert_eq!(back, settings);
    }
}
