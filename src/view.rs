//! Read-only projection of engine state for the renderer.

use crate::engine::Engine;
use crate::milestone::Tier;

/// Correctness of one reference character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharState {
    Pending,
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharView {
    pub ch: char,
    pub state: CharState,
    pub is_cursor: bool,
}

/// Per-character correctness of `reference` against `input`
pub fn char_states(reference: &str, input: &str) -> Vec<CharView> {
    let typed: Vec<char> = input.chars().collect();
    reference
        .chars()
        .enumerate()
        .map(|(idx, ch)| CharView {
            ch,
            state: match typed.get(idx) {
                None => CharState::Pending,
                Some(&c) if c == ch => CharState::Correct,
                Some(_) => CharState::Incorrect,
            },
            is_cursor: idx == typed.len(),
        })
        .collect()
}

/// `m:ss`, minutes unpadded, seconds floored
pub fn format_time(secs: f64) -> String {
    let whole = secs.max(0.0).floor() as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}

pub const KEYBOARD_ROWS: [&[&str]; 5] = [
    &[
        "`", "1", "2", "3", "4", "5", "6", "7", "8", "9", "0", "-", "=", "Backspace",
    ],
    &[
        "Tab", "q", "w", "e", "r", "t", "y", "u", "i", "o", "p", "[", "]", "\\",
    ],
    &[
        "Caps", "a", "s", "d", "f", "g", "h", "j", "k", "l", ";", "'", "Enter",
    ],
    &[
        "Shift", "z", "x", "c", "v", "b", "n", "m", ",", ".", "/", "Shift",
    ],
    &["Ctrl", "Alt", "Space", "Alt", "Ctrl"],
];

/// Label of the key that produces `next`, as it appears in `KEYBOARD_ROWS`
pub fn key_for(next: char) -> Option<String> {
    match next {
        ' ' => Some("Space".to_string()),
        '\n' => Some("Enter".to_string()),
        '\t' => Some("Tab".to_string()),
        c => {
            let lower: String = c.to_lowercase().collect();
            KEYBOARD_ROWS
                .iter()
                .flat_map(|row| row.iter())
                .find(|key| **key == lower)
                .map(|key| key.to_string())
        }
    }
}

/// Everything the typing screen shows
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub chars: Vec<CharView>,
    pub input: String,
    pub elapsed: String,
    pub apm: u32,
    pub apm_tier: Tier,
    pub streak: u32,
    pub streak_tier: Tier,
    pub max_streak: u32,
    pub is_completed: bool,
    pub highlighted_key: Option<String>,
}

impl SessionView {
    pub fn from_engine(engine: &Engine) -> Self {
        let session = engine.session();
        let metrics = engine.metrics();
        let highlighted_key = if engine.settings().show_key_hints {
            session.next_expected().and_then(key_for)
        } else {
            None
        };

        Self {
            chars: char_states(&session.reference_text, &session.input_text),
            input: session.input_text.clone(),
            elapsed: format_time(metrics.elapsed_secs),
            apm: metrics.apm,
            apm_tier: Tier::for_apm(metrics.apm),
            streak: metrics.streak,
            streak_tier: Tier::for_streak(metrics.streak),
            max_streak: metrics.max_streak,
            is_completed: session.is_completed,
            highlighted_key,
        }
    }
}
