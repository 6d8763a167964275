use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::ops::RangeInclusive;

use crate::passages::{self, LanguageMode};
use crate::storage::{Storage, SETTINGS_KEY};

pub const FONT_SIZE_RANGE: RangeInclusive<u32> = 12..=24;
pub const INPUT_HEIGHT_RANGE: RangeInclusive<u32> = 100..=300;
pub const INPUT_HEIGHT_STEP: u32 = 10;

/// User preferences. Every field but the panel flag is persisted under
/// `typing-settings`; keys missing from a stored blob take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    #[serde(rename = "isEnglish", with = "passages::is_english")]
    pub language: LanguageMode,
    pub show_key_hints: bool,
    pub enable_sound: bool,
    #[serde(rename = "fontSize")]
    pub font_size_px: u32,
    #[serde(rename = "useBoldText")]
    pub bold_text: bool,
    #[serde(rename = "inputHeight")]
    pub input_height_px: u32,
    #[serde(skip)]
    pub is_settings_open: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: LanguageMode::English,
            show_key_hints: true,
            enable_sound: true,
            font_size_px: 16,
            bold_text: false,
            input_height_px: 150,
            is_settings_open: false,
        }
    }
}

impl Settings {
    pub fn is_english(&self) -> bool {
        self.language.is_english()
    }

    /// Read settings field by field over the defaults. A corrupt blob
    /// yields defaults; a bad field keeps its default and the rest load.
    /// The panel always starts closed.
    pub fn load(storage: &dyn Storage) -> Self {
        let mut settings = Settings::default();
        let Some(blob) = storage.load(SETTINGS_KEY) else {
            return settings;
        };
        let fields = match serde_json::from_str::<Map<String, Value>>(&blob) {
            Ok(fields) => fields,
            Err(err) => {
                tracing::warn!(%err, "stored settings are unreadable, using defaults");
                return settings;
            }
        };

        let mut is_english = settings.is_english();
        merge_field(&fields, "isEnglish", &mut is_english);
        settings.language = LanguageMode::from_is_english(is_english);
        merge_field(&fields, "showKeyHints", &mut settings.show_key_hints);
        merge_field(&fields, "enableSound", &mut settings.enable_sound);
        merge_field(&fields, "fontSize", &mut settings.font_size_px);
        merge_field(&fields, "useBoldText", &mut settings.bold_text);
        merge_field(&fields, "inputHeight", &mut settings.input_height_px);
        settings
    }

    pub fn save(&self, storage: &dyn Storage) {
        let blob = match serde_json::to_string(self) {
            Ok(blob) => blob,
            Err(err) => {
                tracing::warn!(%err, "failed to encode settings");
                return;
            }
        };
        if let Err(err) = storage.save(SETTINGS_KEY, &blob) {
            tracing::warn!(%err, "failed to save settings");
        }
    }
}

fn merge_field<T: DeserializeOwned>(fields: &Map<String, Value>, key: &str, slot: &mut T) {
    let Some(value) = fields.get(key) else {
        return;
    };
    match T::deserialize(value) {
        Ok(parsed) => *slot = parsed,
        Err(err) => tracing::warn!(key, %err, "ignoring unreadable setting"),
    }
}

pub fn clamp_font_size(px: u32) -> u32 {
    px.clamp(*FONT_SIZE_RANGE.start(), *FONT_SIZE_RANGE.end())
}

pub fn clamp_input_height(px: u32) -> u32 {
    px.clamp(*INPUT_HEIGHT_RANGE.start(), *INPUT_HEIGHT_RANGE.end())
}
