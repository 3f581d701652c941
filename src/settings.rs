//! Snapshot settings: the value object every view and renderer reads from.
//!
//! `Settings` is plain data. Mutation goes through [`Settings::merge`], which
//! applies a sparse [`SettingsPatch`] and returns a fresh value; nothing in this
//! module validates numeric ranges (the panel sliders bound them).

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

/// Code shown when the application starts.
pub const DEFAULT_CODE: &str = "// Welcome to CodeCanvas Artist \u{2728}
// Paste your code here and create beautiful snapshots!

function fibonacci(n) {
  if (n <= 1) return n;
  return fibonacci(n - 1) + fibonacci(n - 2);
}

const result = fibonacci(10);
console.log(`Fibonacci(10) = ${result}`);

// Export as a stunning PNG image!";

/// Source languages that can be highlighted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    JavaScript,
    TypeScript,
    Html,
    Css,
    Python,
    Json,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Self::JavaScript,
        Self::TypeScript,
        Self::Html,
        Self::Css,
        Self::Python,
        Self::Json,
    ];

    /// Identifier used in settings files and on the command line
    pub fn id(&self) -> &'static str {
        match self {
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Html => "html",
            Self::Css => "css",
            Self::Python => "python",
            Self::Json => "json",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::JavaScript => "JavaScript",
            Self::TypeScript => "TypeScript",
            Self::Html => "HTML",
            Self::Css => "CSS",
            Self::Python => "Python",
            Self::Json => "JSON",
        }
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|l| l.id() == s)
            .ok_or_else(|| Error::ConfigError(format!("unknown language '{}'", s)))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Decorative backdrop behind the window frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Background {
    #[default]
    Mesh1,
    Mesh2,
    Mesh3,
    Mesh4,
    SolidDark,
    SolidSlate,
}

impl Background {
    pub const ALL: [Background; 6] = [
        Self::Mesh1,
        Self::Mesh2,
        Self::Mesh3,
        Self::Mesh4,
        Self::SolidDark,
        Self::SolidSlate,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Mesh1 => "mesh-1",
            Self::Mesh2 => "mesh-2",
            Self::Mesh3 => "mesh-3",
            Self::Mesh4 => "mesh-4",
            Self::SolidDark => "solid-dark",
            Self::SolidSlate => "solid-slate",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Mesh1 => "Cyber Neon",
            Self::Mesh2 => "Sunset Flame",
            Self::Mesh3 => "Deep Ocean",
            Self::Mesh4 => "Aurora",
            Self::SolidDark => "Midnight",
            Self::SolidSlate => "Slate",
        }
    }

    /// Look up a background by identifier, falling back to the first entry.
    pub fn from_id(id: &str) -> Self {
        match Self::ALL.iter().find(|b| b.id() == id) {
            Some(b) => *b,
            None => {
                warn!("Unknown background '{}', using '{}'", id, Self::ALL[0].id());
                Self::ALL[0]
            }
        }
    }
}

impl Serialize for Background {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

impl<'de> Deserialize<'de> for Background {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let id = String::deserialize(deserializer)?;
        Ok(Self::from_id(&id))
    }
}

/// Visual theme of the window frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WindowTheme {
    #[default]
    Dark,
    Light,
    Glass,
}

impl WindowTheme {
    pub const ALL: [WindowTheme; 3] = [Self::Dark, Self::Light, Self::Glass];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
            Self::Glass => "glass",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
            Self::Glass => "Glassmorphism",
        }
    }

    /// Look up a theme by identifier, falling back to `dark`.
    pub fn from_id(id: &str) -> Self {
        match Self::ALL.iter().find(|t| t.id() == id) {
            Some(t) => *t,
            None => {
                warn!("Unknown window theme '{}', using 'dark'", id);
                Self::Dark
            }
        }
    }
}

impl Serialize for WindowTheme {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

impl<'de> Deserialize<'de> for WindowTheme {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let id = String::deserialize(deserializer)?;
        Ok(Self::from_id(&id))
    }
}

/// All visual parameters of a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub language: Language,
    pub background: Background,
    pub window_theme: WindowTheme,
    /// Space between the background edge and the window, in pixels
    pub padding: u32,
    /// Window shadow strength, in percent
    pub shadow_intensity: u32,
    pub show_line_numbers: bool,
    /// Shown in the window header and used as the export file's base name
    pub file_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: Language::JavaScript,
            background: Background::Mesh1,
            window_theme: WindowTheme::Dark,
            padding: 48,
            shadow_intensity: 50,
            show_line_numbers: true,
            file_name: "untitled.js".to_string(),
        }
    }
}

impl Settings {
    /// Apply a partial update. Fields missing from `patch` keep their value.
    pub fn merge(&self, patch: &SettingsPatch) -> Settings {
        Settings {
            language: patch.language.unwrap_or(self.language),
            background: patch.background.unwrap_or(self.background),
            window_theme: patch.window_theme.unwrap_or(self.window_theme),
            padding: patch.padding.unwrap_or(self.padding),
            shadow_intensity: patch.shadow_intensity.unwrap_or(self.shadow_intensity),
            show_line_numbers: patch.show_line_numbers.unwrap_or(self.show_line_numbers),
            file_name: patch
                .file_name
                .clone()
                .unwrap_or_else(|| self.file_name.clone()),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// A sparse set of field overrides for [`Settings::merge`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    pub language: Option<Language>,
    pub background: Option<Background>,
    pub window_theme: Option<WindowTheme>,
    pub padding: Option<u32>,
    pub shadow_intensity: Option<u32>,
    pub show_line_numbers: Option<bool>,
    pub file_name: Option<String>,
}

impl SettingsPatch {
    pub fn language(language: Language) -> Self {
        Self { language: Some(language), ..Default::default() }
    }

    pub fn background(background: Background) -> Self {
        Self { background: Some(background), ..Default::default() }
    }

    pub fn window_theme(theme: WindowTheme) -> Self {
        Self { window_theme: Some(theme), ..Default::default() }
    }

    pub fn padding(padding: u32) -> Self {
        Self { padding: Some(padding), ..Default::default() }
    }

    pub fn shadow_intensity(intensity: u32) -> Self {
        Self { shadow_intensity: Some(intensity), ..Default::default() }
    }

    pub fn show_line_numbers(show: bool) -> Self {
        Self { show_line_numbers: Some(show), ..Default::default() }
    }

    pub fn file_name(name: impl Into<String>) -> Self {
        Self { file_name: Some(name.into()), ..Default::default() }
    }

    /// Combine two patches; fields set in `other` win.
    pub fn and(self, other: SettingsPatch) -> Self {
        Self {
            language: other.language.or(self.language),
            background: other.background.or(self.background),
            window_theme: other.window_theme.or(self.window_theme),
            padding: other.padding.or(self.padding),
            shadow_intensity: other.shadow_intensity.or(self.shadow_intensity),
            show_line_numbers: other.show_line_numbers.or(self.show_line_numbers),
            file_name: other.file_name.or(self.file_name),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == SettingsPatch::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_match_startup_values() {
        let s = Settings::default();
        assert_eq!(s.language, Language::JavaScript);
        assert_eq!(s.background, Background::Mesh1);
        assert_eq!(s.window_theme, WindowTheme::Dark);
        assert_eq!(s.padding, 48);
        assert_eq!(s.shadow_intensity, 50);
        assert!(s.show_line_numbers);
        assert_eq!(s.file_name, "untitled.js");
    }

    #[test]
    fn merge_replaces_only_present_fields() {
        let base = Settings::default();
        let patch = SettingsPatch {
            padding: Some(64),
            file_name: Some("main.py".into()),
            ..Default::default()
        };
        let merged = base.merge(&patch);
        assert_eq!(merged.padding, 64);
        assert_eq!(merged.file_name, "main.py");
        assert_eq!(merged.language, base.language);
        assert_eq!(merged.background, base.background);
        assert_eq!(merged.window_theme, base.window_theme);
        assert_eq!(merged.shadow_intensity, base.shadow_intensity);
        assert_eq!(merged.show_line_numbers, base.show_line_numbers);
        // the source value is untouched
        assert_eq!(base, Settings::default());
    }

    #[test]
    fn empty_patch_is_identity() {
        let mut base = Settings::default();
        base.window_theme = WindowTheme::Glass;
        base.shadow_intensity = 0;
        assert_eq!(base.merge(&SettingsPatch::default()), base);
    }

    #[test]
    fn every_field_can_be_overridden() {
        let patch = SettingsPatch::language(Language::Python)
            .and(SettingsPatch::background(Background::SolidSlate))
            .and(SettingsPatch::window_theme(WindowTheme::Light))
            .and(SettingsPatch::padding(16))
            .and(SettingsPatch::shadow_intensity(100))
            .and(SettingsPatch::show_line_numbers(false))
            .and(SettingsPatch::file_name("app.py"));
        let merged = Settings::default().merge(&patch);
        assert_eq!(
            merged,
            Settings {
                language: Language::Python,
                background: Background::SolidSlate,
                window_theme: WindowTheme::Light,
                padding: 16,
                shadow_intensity: 100,
                show_line_numbers: false,
                file_name: "app.py".into(),
            }
        );
    }

    #[test]
    fn later_patch_wins_when_combined() {
        let p = SettingsPatch::padding(16).and(SettingsPatch::padding(24));
        assert_eq!(p.padding, Some(24));
        assert!(!p.is_empty());
        assert!(SettingsPatch::default().is_empty());
    }

    #[test]
    fn language_parsing_is_strict() {
        assert_eq!("html".parse::<Language>().unwrap(), Language::Html);
        assert!("cobol".parse::<Language>().is_err());
        for lang in Language::ALL {
            assert_eq!(lang.id().parse::<Language>().unwrap(), lang);
        }
    }

    #[test]
    fn unknown_background_and_theme_fall_back() {
        assert_eq!(Background::from_id("mesh-3"), Background::Mesh3);
        assert_eq!(Background::from_id("plaid"), Background::Mesh1);
        assert_eq!(WindowTheme::from_id("glass"), WindowTheme::Glass);
        assert_eq!(WindowTheme::from_id("neon"), WindowTheme::Dark);
    }

    #[test]
    fn json_uses_camel_case_field_names() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(json["windowTheme"], "dark");
        assert_eq!(json["background"], "mesh-1");
        assert_eq!(json["shadowIntensity"], 50);
        assert_eq!(json["showLineNumbers"], true);
        assert_eq!(json["fileName"], "untitled.js");
        assert_eq!(json["language"], "javascript");
    }

    #[test]
    fn json_missing_fields_default_and_unknown_values_fall_back() {
        let s = Settings::from_json_str(
            r#"{"background": "tartan", "windowTheme": "sepia", "padding": 80}"#,
        )
        .unwrap();
        assert_eq!(s.background, Background::Mesh1);
        assert_eq!(s.window_theme, WindowTheme::Dark);
        assert_eq!(s.padding, 80);
        assert_eq!(s.file_name, "untitled.js");
    }

    #[test]
    fn json_rejects_unknown_language() {
        let err = Settings::from_json_str(r#"{"language": "cobol"}"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
