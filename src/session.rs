use chrono::{DateTime, Local};

/// Where a session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No keystroke yet
    Idle,
    Running,
    /// Input matched the reference text; the timer is frozen
    Completed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub reference_text: String,
    pub input_text: String,
    pub started_at: Option<DateTime<Local>>,
    pub is_completed: bool,
    pub is_paused: bool,
}

impl Session {
    pub fn new(reference_text: String) -> Self {
        Self {
            reference_text,
            input_text: String::new(),
            started_at: None,
            is_completed: false,
            is_paused: false,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.is_completed {
            Phase::Completed
        } else if self.started_at.is_some() {
            Phase::Running
        } else {
            Phase::Idle
        }
    }

    /// True when every typed character matches the reference at its position
    pub fn is_on_track(&self) -> bool {
        self.reference_text.starts_with(self.input_text.as_str())
    }

    /// Reference character the user should type next
    pub fn next_expected(&self) -> Option<char> {
        self.reference_text
            .chars()
            .nth(self.input_text.chars().count())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Metrics {
    pub apm: u32,
    pub elapsed_secs: f64,
    pub streak: u32,
    pub max_streak: u32,
}

impl Metrics {
    /// Characters per minute, rounded. Counts the whole current input,
    /// so corrections are not deducted.
    pub fn apm_for(chars_typed: usize, elapsed_secs: f64) -> u32 {
        if elapsed_secs <= 0.0 {
            return 0;
        }
        (chars_typed as f64 / elapsed_secs * 60.0).round() as u32
    }

    pub fn record_tick(&mut self, on_track: bool) {
        self.streak = if on_track { self.streak + 1 } else { 0 };
        self.max_streak = self.max_streak.max(self.streak);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_follow_flags() {
        let mut session = Session::new("cat".to_string());
        assert_eq!(session.phase(), Phase::Idle);

        session.started_at = Some(Local::now());
        assert_eq!(session.phase(), Phase::Running);

        session.is_completed = true;
        assert_eq!(session.phase(), Phase::Completed);
    }

    #[test]
    fn on_track_compares_same_length_prefix() {
        let mut session = Session::new("cat".to_string());
        assert!(session.is_on_track());

        session.input_text = "ca".to_string();
        assert!(session.is_on_track());

        session.input_text = "cot".to_string();
        assert!(!session.is_on_track());

        session.input_text = "cats".to_string();
        assert!(!session.is_on_track());
    }

    #[test]
    fn next_expected_handles_multibyte_text() {
        let mut session = Session::new("春天来了".to_string());
        session.input_text = "春天".to_string();
        assert_eq!(session.next_expected(), Some('来'));

        session.input_text = "春天来了".to_string();
        assert_eq!(session.next_expected(), None);
    }

    #[test]
    fn apm_rounds_and_guards_zero_elapsed() {
        assert_eq!(Metrics::apm_for(10, 0.0), 0);
        assert_eq!(Metrics::apm_for(10, 6.0), 100);
        assert_eq!(Metrics::apm_for(7, 3.0), 140);
        assert_eq!(Metrics::apm_for(1, 7.0), 9);
    }

    #[test]
    fn streak_resets_and_max_holds() {
        let mut metrics = Metrics::default();
        metrics.record_tick(true);
        metrics.record_tick(true);
        metrics.record_tick(false);
        metrics.record_tick(true);

        assert_eq!(metrics.streak, 1);
        assert_eq!(metrics.max_streak, 2);
    }
}
