use kbplayer::app::{App, Overlay};
use ratatui::Frame;

use crate::ui::{
    dialogs::{CompletionDialog, HistoryDialog, SettingsDialog},
    TypingView,
};

/// A UI Screen boundary: draws one layer of the interface
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Typing screen, always drawn underneath any dialog
pub struct TypingScreen;

impl Screen for TypingScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(TypingView { app }, f.area());
    }
}

pub struct SettingsScreen;

impl Screen for SettingsScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(SettingsDialog::new(app.engine.settings()), f.area());
    }
}

pub struct CompletionScreen;

impl Screen for CompletionScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(CompletionDialog::new(app.engine.metrics()), f.area());
    }
}

pub struct HistoryScreen;

impl Screen for HistoryScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(HistoryDialog::new(app.engine.history()), f.area());
    }
}

/// Helper to construct the dialog screen for the current overlay
pub fn overlay_screen(overlay: Overlay) -> Option<Box<dyn Screen>> {
    match overlay {
        Overlay::None => None,
        Overlay::Settings => Some(Box::new(SettingsScreen)),
        Overlay::Completion => Some(Box::new(CompletionScreen)),
        Overlay::History => Some(Box::new(HistoryScreen)),
    }
}
