use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::engine::Engine;
use crate::feedback::{FeedbackMode, FeedbackTracker};
use crate::milestone::Milestones;
use crate::runtime::AppEvent;
use crate::session::Phase;
use crate::settings::{clamp_font_size, clamp_input_height, INPUT_HEIGHT_STEP};
use crate::speech::Speaker;

/// Dialog drawn over the typing screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Settings,
    Completion,
    History,
}

/// Translates terminal events into engine operations and owns the
/// presentation-side state around them.
pub struct App {
    pub engine: Engine,
    pub milestones: Milestones,
    feedback: FeedbackTracker,
    speaker: Box<dyn Speaker>,
    completion_open: bool,
    history_open: bool,
    seen_generation: u64,
    should_quit: bool,
}

impl App {
    pub fn new(engine: Engine, speaker: Box<dyn Speaker>) -> Self {
        let seen_generation = engine.generation();
        Self {
            engine,
            milestones: Milestones::new(),
            feedback: FeedbackTracker::new(),
            speaker,
            completion_open: false,
            history_open: false,
            seen_generation,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Topmost dialog, if any
    pub fn overlay(&self) -> Overlay {
        if self.engine.settings().is_settings_open {
            Overlay::Settings
        } else if self.history_open {
            Overlay::History
        } else if self.completion_open {
            Overlay::Completion
        } else {
            Overlay::None
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tick => self.on_tick(),
            AppEvent::Resize => {}
            AppEvent::Key(key) => self.on_key(key),
            AppEvent::Disconnected => {
                tracing::warn!("terminal input closed, quitting");
                self.should_quit = true;
            }
        }
    }

    pub fn on_tick(&mut self) {
        self.engine.tick();
        let now = self.engine.now();
        if self.engine.phase() == Phase::Running {
            self.milestones.observe(self.engine.metrics().apm, now);
        }
        self.milestones.expire(now);
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.overlay() {
            Overlay::Settings => self.on_settings_key(key),
            Overlay::History => self.on_history_key(key),
            Overlay::Completion => self.on_completion_key(key),
            Overlay::None => self.on_typing_key(key),
        }
        self.sync_generation();
    }

    fn on_typing_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.engine.reset_session(),
            KeyCode::F(2) => self.history_open = true,
            KeyCode::Char('h') if ctrl => self.history_open = true,
            KeyCode::Char('s') if ctrl => self.engine.toggle_settings_panel(),
            KeyCode::Char('w') if ctrl => self.edit_input(delete_last_word),
            KeyCode::Char(_) if ctrl => {}
            KeyCode::Char(c) => self.edit_input(|input| input.push(c)),
            KeyCode::Enter => self.edit_input(|input| input.push('\n')),
            KeyCode::Backspace => self.edit_input(|input| {
                input.pop();
            }),
            _ => {}
        }
    }

    fn on_settings_key(&mut self, key: KeyEvent) {
        let settings = self.engine.settings().clone();
        match key.code {
            KeyCode::Esc => self.engine.toggle_settings_panel(),
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.engine.toggle_settings_panel()
            }
            KeyCode::Char('l') => self.engine.toggle_language(),
            KeyCode::Char('k') => self.engine.toggle_key_hints(),
            KeyCode::Char('s') => self.engine.toggle_sound(),
            KeyCode::Char('b') => self.engine.toggle_bold_text(),
            KeyCode::Char('+') | KeyCode::Char('=') => self
                .engine
                .set_font_size(clamp_font_size(settings.font_size_px.saturating_add(1))),
            KeyCode::Char('-') => self
                .engine
                .set_font_size(clamp_font_size(settings.font_size_px.saturating_sub(1))),
            KeyCode::Up => self.engine.set_input_height(clamp_input_height(
                settings.input_height_px.saturating_add(INPUT_HEIGHT_STEP),
            )),
            KeyCode::Down => self.engine.set_input_height(clamp_input_height(
                settings.input_height_px.saturating_sub(INPUT_HEIGHT_STEP),
            )),
            _ => {}
        }
    }

    fn on_history_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::F(2) => self.history_open = false,
            KeyCode::Char('h') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.history_open = false
            }
            KeyCode::Char('c') => self.engine.clear_history(),
            _ => {}
        }
    }

    fn on_completion_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.completion_open = false,
            KeyCode::Enter | KeyCode::Char('n') => self.engine.reset_session(),
            KeyCode::Char('h') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.history_open = true
            }
            _ => {}
        }
    }

    /// Apply `edit` to the current input and hand the result to the engine.
    /// A completed session accepts no more typing until the next text.
    fn edit_input(&mut self, edit: impl FnOnce(&mut String)) {
        if self.engine.phase() == Phase::Completed {
            return;
        }
        let mut input = self.engine.session().input_text.clone();
        edit(&mut input);
        if input == self.engine.session().input_text {
            return;
        }

        if self.engine.submit_input(&input) {
            self.completion_open = true;
        }
        self.give_feedback();
    }

    fn give_feedback(&mut self) {
        if !self.engine.settings().enable_sound {
            return;
        }
        let language = self.engine.language();
        let session = self.engine.session();
        if let Some(unit) = self.feedback.observe(
            FeedbackMode::from(language),
            &session.input_text,
            &session.reference_text,
        ) {
            self.speaker.speak(&unit, language);
        }
    }

    /// Drop per-session presentation state when the engine starts a new text
    fn sync_generation(&mut self) {
        if self.engine.generation() != self.seen_generation {
            self.seen_generation = self.engine.generation();
            self.feedback.reset();
            self.milestones.dismiss();
            self.completion_open = false;
        }
    }
}

fn delete_last_word(input: &mut String) {
    let trimmed = input.trim_end_matches(char::is_whitespace).len();
    input.truncate(trimmed);
    let keep = input
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map(|(idx, c)| idx + c.len_utf8())
        .unwrap_or(0);
    input.truncate(keep);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::speech::RecordingSpeaker;
    use crate::storage::MemoryStorage;
    use assert_matches::assert_matches;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn app_with(text: &str) -> (App, RecordingSpeaker, ManualClock) {
        let clock = ManualClock::default();
        let speaker = RecordingSpeaker::new();
        let engine = Engine::new(
            Box::new(MemoryStorage::new()),
            Box::new(clock.clone()),
            Box::new(StdRng::seed_from_u64(9)),
        )
        .with_fixed_text(text);
        (App::new(engine, Box::new(speaker.clone())), speaker, clock)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn ctrl(app: &mut App, c: char) {
        app.on_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn typing_builds_input_and_completes() {
        let (mut app, _, _) = app_with("cat");
        type_str(&mut app, "cx");
        press(&mut app, KeyCode::Backspace);
        type_str(&mut app, "at");

        assert!(app.engine.session().is_completed);
        assert_matches!(app.overlay(), Overlay::Completion);
        assert_eq!(app.engine.history().len(), 1);
    }

    #[test]
    fn completed_session_ignores_typing() {
        let (mut app, _, _) = app_with("a");
        type_str(&mut app, "a");
        press(&mut app, KeyCode::Esc);
        assert_matches!(app.overlay(), Overlay::None);

        type_str(&mut app, "b");
        assert_eq!(app.engine.session().input_text, "a");
        assert!(!app.should_quit());
    }

    #[test]
    fn next_text_from_completion_dialog_resets() {
        let (mut app, _, _) = app_with("a");
        type_str(&mut app, "a");
        press(&mut app, KeyCode::Char('n'));

        assert_matches!(app.overlay(), Overlay::None);
        assert_eq!(app.engine.phase(), Phase::Idle);
        assert_eq!(app.engine.session().input_text, "");
    }

    #[test]
    fn speaks_words_once_per_session() {
        let (mut app, speaker, _) = app_with("go on");
        type_str(&mut app, "go o");
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        type_str(&mut app, " on");
        assert_eq!(speaker.spoken(), vec!["go", "on"]);

        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "go");
        assert_eq!(speaker.spoken(), vec!["go", "on", "go"]);
    }

    #[test]
    fn muted_sound_speaks_nothing() {
        let (mut app, speaker, _) = app_with("go");
        ctrl(&mut app, 's');
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Esc);
        type_str(&mut app, "go");
        assert!(speaker.spoken().is_empty());
    }

    #[test]
    fn settings_panel_keys_clamp_ranges() {
        let (mut app, _, _) = app_with("x");
        ctrl(&mut app, 's');
        assert_matches!(app.overlay(), Overlay::Settings);

        for _ in 0..20 {
            press(&mut app, KeyCode::Char('+'));
            press(&mut app, KeyCode::Down);
        }
        assert_eq!(app.engine.settings().font_size_px, 24);
        assert_eq!(app.engine.settings().input_height_px, 100);

        press(&mut app, KeyCode::Char('k'));
        press(&mut app, KeyCode::Char('b'));
        assert!(!app.engine.settings().show_key_hints);
        assert!(app.engine.settings().bold_text);

        press(&mut app, KeyCode::Esc);
        assert_matches!(app.overlay(), Overlay::None);
        assert!(!app.should_quit());
    }

    #[test]
    fn language_toggle_from_settings_resets_session() {
        let (mut app, _, _) = app_with("abc");
        type_str(&mut app, "ab");
        ctrl(&mut app, 's');
        press(&mut app, KeyCode::Char('l'));

        assert_eq!(app.engine.session().input_text, "");
        assert!(app.engine.pool_contains(&app.engine.session().reference_text));
        assert_eq!(
            app.engine.language(),
            crate::passages::LanguageMode::Chinese
        );
    }

    #[test]
    fn history_dialog_clears_history() {
        let (mut app, _, _) = app_with("a");
        type_str(&mut app, "a");
        ctrl(&mut app, 'h');
        assert_matches!(app.overlay(), Overlay::History);

        press(&mut app, KeyCode::Char('c'));
        assert!(app.engine.history().is_empty());
        press(&mut app, KeyCode::Esc);
        assert_matches!(app.overlay(), Overlay::Completion);
    }

    #[test]
    fn ticks_drive_metrics_and_milestones() {
        let (mut app, _, clock) = app_with("abcdefghij");
        type_str(&mut app, "abcdefghi");
        clock.advance_secs(5);
        app.handle_event(AppEvent::Tick);

        assert_eq!(app.engine.metrics().apm, 108);
        assert!(app.milestones.visible().is_some());

        clock.advance_secs(2);
        app.handle_event(AppEvent::Tick);
        assert!(app.milestones.visible().is_none());
    }

    #[test]
    fn closed_input_quits() {
        let (mut app, _, _) = app_with("abc");
        app.handle_event(AppEvent::Disconnected);
        assert!(app.should_quit());
    }

    #[test]
    fn new_text_dismisses_milestone_banner() {
        let (mut app, _, clock) = app_with("abcdefghij");
        type_str(&mut app, "abcdefghi");
        clock.advance_secs(5);
        app.handle_event(AppEvent::Tick);
        assert!(app.milestones.visible().is_some());

        press(&mut app, KeyCode::Tab);
        assert!(app.milestones.visible().is_none());
    }

    #[test]
    fn ctrl_w_deletes_last_word() {
        let (mut app, _, _) = app_with("one two three");
        type_str(&mut app, "one tw");
        ctrl(&mut app, 'w');
        assert_eq!(app.engine.session().input_text, "one ");
    }

    #[test]
    fn esc_and_ctrl_c_quit() {
        let (mut app, _, _) = app_with("x");
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit());

        let (mut app, _, _) = app_with("x");
        ctrl(&mut app, 's');
        ctrl(&mut app, 'c');
        assert!(app.should_quit());
    }

    #[test]
    fn delete_last_word_handles_edges() {
        let mut s = String::from("hello world  ");
        delete_last_word(&mut s);
        assert_eq!(s, "hello ");

        let mut s = String::from("春天 来了");
        delete_last_word(&mut s);
        assert_eq!(s, "春天 ");

        let mut s = String::new();
        delete_last_word(&mut s);
        assert_eq!(s, "");
    }
}
