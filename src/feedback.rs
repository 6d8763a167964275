use crate::passages::LanguageMode;

/// How typed text is split into speakable units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackMode {
    /// Speak a word once it is typed completely and correctly
    Word,
    /// Speak each ideograph as soon as it is typed correctly
    Character,
}

impl From<LanguageMode> for FeedbackMode {
    fn from(mode: LanguageMode) -> Self {
        match mode {
            LanguageMode::English => FeedbackMode::Word,
            LanguageMode::Chinese => FeedbackMode::Character,
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '-'
}

fn is_ideograph(c: char) -> bool {
    ('\u{4e00}'..='\u{9fa5}').contains(&c)
}

/// Decides which word or character to speak as input grows.
///
/// Scanning is monotonic: `next_unspoken` is the first reference index not
/// yet covered by spoken feedback, and nothing at or before an already
/// spoken unit is ever reported again. Call [`FeedbackTracker::reset`] when a
/// new session starts.
#[derive(Debug, Clone, Default)]
pub struct FeedbackTracker {
    next_unspoken: usize,
}

impl FeedbackTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.next_unspoken = 0;
    }

    pub fn high_water_mark(&self) -> usize {
        self.next_unspoken
    }

    /// Inspect the latest input and return the unit to speak, if any
    pub fn observe(
        &mut self,
        mode: FeedbackMode,
        input: &str,
        reference: &str,
    ) -> Option<String> {
        let input: Vec<char> = input.chars().collect();
        let reference: Vec<char> = reference.chars().collect();
        match mode {
            FeedbackMode::Word => self.observe_word(&input, &reference),
            FeedbackMode::Character => self.observe_char(&input, &reference),
        }
    }

    fn observe_word(&mut self, input: &[char], reference: &[char]) -> Option<String> {
        let cursor = input.len();
        if cursor <= self.next_unspoken {
            return None;
        }

        let mut start = cursor;
        while start > 0 && is_word_char(input[start - 1]) {
            start -= 1;
        }

        let mut end = start;
        while end < reference.len() && is_word_char(reference[end]) {
            end += 1;
        }

        // still inside the word
        if cursor < end {
            return None;
        }

        let typed = &input[start..cursor];
        let expected = reference.get(start..end)?;
        if start >= self.next_unspoken
            && typed == expected
            && typed.iter().any(|c| c.is_ascii_alphabetic())
        {
            self.next_unspoken = end;
            return Some(expected.iter().collect());
        }
        None
    }

    fn observe_char(&mut self, input: &[char], reference: &[char]) -> Option<String> {
        let pos = input.len().checked_sub(1)?;
        if pos < self.next_unspoken {
            return None;
        }
        let expected = *reference.get(pos)?;
        if input[pos] == expected && is_ideograph(expected) {
            self.next_unspoken = pos + 1;
            return Some(expected.to_string());
        }
        None
    }
}
