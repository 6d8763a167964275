use chrono::{DateTime, Local};
use rand::RngCore;

use crate::clock::{secs_between, Clock};
use crate::history::{History, HistoryRecord};
use crate::passages::{LanguageMode, TextPool};
use crate::session::{Metrics, Phase, Session};
use crate::settings::Settings;
use crate::storage::Storage;

/// Owns the current typing session, its metrics, and the persisted
/// history and settings. All mutation goes through here.
pub struct Engine {
    session: Session,
    metrics: Metrics,
    settings: Settings,
    history: History,
    english: TextPool,
    chinese: TextPool,
    fixed_text: Option<String>,
    /// Language written to storage; differs from the active one only
    /// after `with_language`
    saved_language: LanguageMode,
    generation: u64,
    storage: Box<dyn Storage>,
    clock: Box<dyn Clock>,
    rng: Box<dyn RngCore>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("session", &self.session)
            .field("metrics", &self.metrics)
            .field("settings", &self.settings)
            .field("history_len", &self.history.len())
            .field("generation", &self.generation)
            .finish()
    }
}

impl Engine {
    /// Load settings and history from `storage` and start a session on a
    /// random passage from the stored language's pool.
    pub fn new(
        storage: Box<dyn Storage>,
        clock: Box<dyn Clock>,
        rng: Box<dyn RngCore>,
    ) -> Self {
        let settings = Settings::load(storage.as_ref());
        let history = History::load(storage.as_ref());
        let saved_language = settings.language;
        let mut engine = Self {
            session: Session::new(String::new()),
            metrics: Metrics::default(),
            settings,
            history,
            english: TextPool::new(LanguageMode::English),
            chinese: TextPool::new(LanguageMode::Chinese),
            fixed_text: None,
            saved_language,
            generation: 0,
            storage,
            clock,
            rng,
        };
        engine.session = Session::new(engine.pick_text());
        engine
    }

    /// Replace the embedded passage pools and restart on one of them
    pub fn with_pools(mut self, english: TextPool, chinese: TextPool) -> Self {
        self.english = english;
        self.chinese = chinese;
        self.reset_session();
        self
    }

    /// Practise one fixed text; resets repeat it until the language is toggled
    pub fn with_fixed_text(mut self, text: impl Into<String>) -> Self {
        self.fixed_text = Some(text.into());
        self.reset_session();
        self
    }

    /// Start the session for this run in `language` without persisting it
    pub fn with_language(mut self, language: LanguageMode) -> Self {
        if self.settings.language != language {
            self.settings.language = language;
            self.reset_session();
        }
        self
    }

    fn active_pool(&self) -> &TextPool {
        match self.settings.language {
            LanguageMode::English => &self.english,
            LanguageMode::Chinese => &self.chinese,
        }
    }

    fn pick_text(&mut self) -> String {
        if let Some(text) = &self.fixed_text {
            return text.clone();
        }
        let pool = match self.settings.language {
            LanguageMode::English => &self.english,
            LanguageMode::Chinese => &self.chinese,
        };
        pool.pick(self.rng.as_mut())
    }

    /// Replace the input with `text`. Returns true when this call completed
    /// the session.
    pub fn submit_input(&mut self, text: &str) -> bool {
        if self.session.started_at.is_none() && !text.is_empty() {
            self.session.started_at = Some(self.clock.now());
            tracing::debug!(generation = self.generation, "session started");
        }

        let was_completed = self.session.is_completed;
        let is_completed = text == self.session.reference_text;
        self.session.input_text = text.to_string();
        self.session.is_completed = is_completed;
        self.session.is_paused = is_completed;

        let newly_completed = is_completed && !was_completed;
        if newly_completed {
            tracing::debug!(
                apm = self.metrics.apm,
                max_streak = self.metrics.max_streak,
                "session completed"
            );
            self.add_history_record();
        }
        newly_completed
    }

    /// Recompute elapsed time, apm and streak. Call once per second.
    pub fn tick(&mut self) {
        let Some(started_at) = self.session.started_at else {
            return;
        };
        if self.session.is_paused {
            return;
        }

        let elapsed_secs = secs_between(started_at, self.clock.now());
        let chars_typed = self.session.input_text.chars().count();
        self.metrics.elapsed_secs = elapsed_secs;
        self.metrics.apm = Metrics::apm_for(chars_typed, elapsed_secs);
        self.metrics.record_tick(self.session.is_on_track());
    }

    /// New passage from the active pool; clears input, timing and metrics
    pub fn reset_session(&mut self) {
        let text = self.pick_text();
        self.session = Session::new(text);
        self.metrics = Metrics::default();
        self.generation += 1;
        tracing::debug!(
            generation = self.generation,
            language = %self.settings.language,
            "session reset"
        );
    }

    pub fn toggle_language(&mut self) {
        self.settings.language = self.settings.language.toggled();
        self.saved_language = self.settings.language;
        self.fixed_text = None;
        self.reset_session();
        self.persist_settings();
    }

    pub fn toggle_key_hints(&mut self) {
        self.settings.show_key_hints = !self.settings.show_key_hints;
        self.persist_settings();
    }

    pub fn toggle_sound(&mut self) {
        self.settings.enable_sound = !self.settings.enable_sound;
        self.persist_settings();
    }

    pub fn toggle_bold_text(&mut self) {
        self.settings.bold_text = !self.settings.bold_text;
        self.persist_settings();
    }

    /// Stored as given; range enforcement is up to the caller
    pub fn set_font_size(&mut self, px: u32) {
        self.settings.font_size_px = px;
        self.persist_settings();
    }

    /// Stored as given; range enforcement is up to the caller
    pub fn set_input_height(&mut self, px: u32) {
        self.settings.input_height_px = px;
        self.persist_settings();
    }

    /// Open or close the settings panel. Never persisted.
    pub fn toggle_settings_panel(&mut self) {
        self.settings.is_settings_open = !self.settings.is_settings_open;
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.history.save(self.storage.as_ref());
    }

    fn persist_settings(&self) {
        let saved = Settings {
            language: self.saved_language,
            ..self.settings.clone()
        };
        saved.save(self.storage.as_ref());
    }

    fn add_history_record(&mut self) {
        let now = self.clock.now();
        let mut id = now.timestamp_millis().to_string();
        let mut suffix = 1;
        while self.history.contains_id(&id) {
            id = format!("{}-{}", now.timestamp_millis(), suffix);
            suffix += 1;
        }

        let record = HistoryRecord {
            id,
            timestamp: now.format("%c").to_string(),
            text: self.session.reference_text.clone(),
            language: self.settings.language,
            elapsed_secs: self.metrics.elapsed_secs,
            apm: self.metrics.apm,
            max_streak: self.metrics.max_streak,
        };
        self.history.push_front(record);
        self.history.save(self.storage.as_ref());
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    /// Current time from the engine's clock
    pub fn now(&self) -> DateTime<Local> {
        self.clock.now()
    }

    pub fn language(&self) -> LanguageMode {
        self.settings.language
    }

    /// Bumped on every reset so observers can drop per-session state
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pool_contains(&self, text: &str) -> bool {
        self.active_pool().passages.iter().any(|p| p == text)
    }
}
