use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use rand::RngCore;
use serde::Deserialize;
use serde_json::from_str;
use std::error::Error;

static PASSAGE_DIR: Dir = include_dir!("src/passages");

/// Which sample-text pool a session draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum LanguageMode {
    English,
    Chinese,
}

impl LanguageMode {
    pub fn from_is_english(is_english: bool) -> Self {
        if is_english {
            LanguageMode::English
        } else {
            LanguageMode::Chinese
        }
    }

    pub fn is_english(self) -> bool {
        self == LanguageMode::English
    }

    pub fn toggled(self) -> Self {
        match self {
            LanguageMode::English => LanguageMode::Chinese,
            LanguageMode::Chinese => LanguageMode::English,
        }
    }

    /// Label shown in the settings panel
    pub fn label(self) -> &'static str {
        match self {
            LanguageMode::English => "English",
            LanguageMode::Chinese => "中文",
        }
    }

    fn file_name(self) -> &'static str {
        match self {
            LanguageMode::English => "english.json",
            LanguageMode::Chinese => "chinese.json",
        }
    }
}

/// Persists a `LanguageMode` as the `isEnglish` boolean used on disk
pub mod is_english {
    use super::LanguageMode;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(mode: &LanguageMode, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_bool(mode.is_english())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<LanguageMode, D::Error> {
        bool::deserialize(d).map(LanguageMode::from_is_english)
    }
}

/// A set of sample passages for one language
#[derive(Deserialize, Clone, Debug)]
pub struct TextPool {
    pub name: String,
    pub passages: Vec<String>,
}

impl TextPool {
    pub fn new(mode: LanguageMode) -> Self {
        read_pool_from_file(mode.file_name()).expect("embedded passage file is valid")
    }

    pub fn from_passages(name: &str, passages: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            passages,
        }
    }

    /// Pick one passage uniformly at random.
    /// An empty pool yields an empty passage, which completes on first submit.
    pub fn pick(&self, rng: &mut dyn RngCore) -> String {
        self.passages.choose(rng).cloned().unwrap_or_default()
    }
}

fn read_pool_from_file(file_name: &str) -> Result<TextPool, Box<dyn Error>> {
    let file = PASSAGE_DIR
        .get_file(file_name)
        .ok_or_else(|| format!("passage file {file_name} not found"))?;

    let contents = file
        .contents_utf8()
        .ok_or("passage file is not valid utf-8")?;

    Ok(from_str(contents)?)
}
