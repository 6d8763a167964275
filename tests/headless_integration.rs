use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use kbplayer::app::{App, Overlay};
use kbplayer::clock::ManualClock;
use kbplayer::engine::Engine;
use kbplayer::runtime::{AppEvent, FixedTicker, Runner, TestEventSource};
use kbplayer::session::Phase;
use kbplayer::speech::RecordingSpeaker;
use kbplayer::storage::MemoryStorage;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn key(c: char) -> AppEvent {
    AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

fn build_app(text: &str, storage: MemoryStorage, clock: ManualClock) -> (App, RecordingSpeaker) {
    let engine = Engine::new(
        Box::new(storage),
        Box::new(clock),
        Box::new(StdRng::seed_from_u64(1)),
    )
    .with_fixed_text(text);
    let speaker = RecordingSpeaker::new();
    (App::new(engine, Box::new(speaker.clone())), speaker)
}

// Headless integration using the runtime and App without a TTY.
// Verifies that a minimal typing flow completes via Runner/TestEventSource.
#[test]
fn headless_typing_flow_completes() {
    let storage = MemoryStorage::new();
    let clock = ManualClock::default();
    let (mut app, speaker) = build_app("hi there", storage.clone(), clock.clone());

    let (tx, rx) = mpsc::channel();
    let es = TestEventSource::new(rx);
    let ticker = FixedTicker::new(Duration::from_millis(5));
    let mut runner = Runner::new(es, ticker);

    for c in "hi there".chars() {
        tx.send(key(c)).unwrap();
    }

    for _ in 0..100u32 {
        let event = runner.step();
        if matches!(event, AppEvent::Tick) {
            clock.advance_secs(1);
        }
        app.handle_event(event);
        if app.engine.phase() == Phase::Completed {
            break;
        }
    }

    assert_eq!(app.engine.phase(), Phase::Completed);
    assert_eq!(app.overlay(), Overlay::Completion);
    assert_eq!(app.engine.history().len(), 1);
    assert_eq!(speaker.spoken(), vec!["hi".to_string(), "there".to_string()]);

    let stored = storage.get("typing-history").expect("history persisted");
    assert!(stored.contains("\"text\":\"hi there\""));
}

#[test]
fn ticks_drive_metrics_while_running() {
    let clock = ManualClock::default();
    let (mut app, _) = build_app("abcdef", MemoryStorage::new(), clock.clone());

    app.handle_event(key('a'));
    app.handle_event(key('b'));
    clock.advance_secs(2);
    app.handle_event(AppEvent::Tick);

    let metrics = app.engine.metrics();
    assert_eq!(metrics.elapsed_secs, 2.0);
    assert_eq!(metrics.apm, 60);
    assert_eq!(metrics.streak, 1);

    app.handle_event(key('x'));
    clock.advance_secs(1);
    app.handle_event(AppEvent::Tick);
    assert_eq!(app.engine.metrics().streak, 0);
    assert_eq!(app.engine.metrics().max_streak, 1);
}

#[test]
fn next_text_after_completion_starts_fresh() {
    let clock = ManualClock::default();
    let (mut app, speaker) = build_app("go", MemoryStorage::new(), clock);

    app.handle_event(key('g'));
    app.handle_event(key('o'));
    assert_eq!(app.overlay(), Overlay::Completion);

    app.handle_event(key('n'));
    assert_eq!(app.overlay(), Overlay::None);
    assert_eq!(app.engine.phase(), Phase::Idle);
    assert_eq!(app.engine.session().input_text, "");

    // the word is spoken again for the new session
    app.handle_event(key('g'));
    app.handle_event(key('o'));
    assert_eq!(speaker.spoken(), vec!["go".to_string(), "go".to_string()]);
    assert_eq!(app.engine.history().len(), 2);
}

#[test]
fn settings_panel_round_trip_through_keys() {
    let storage = MemoryStorage::new();
    let (mut app, _) = build_app("abc", storage.clone(), ManualClock::default());

    app.handle_event(AppEvent::Key(KeyEvent::new(
        KeyCode::Char('s'),
        KeyModifiers::CONTROL,
    )));
    assert_eq!(app.overlay(), Overlay::Settings);

    app.handle_event(key('b'));
    app.handle_event(AppEvent::Key(KeyEvent::new(KeyCode::Up, KeyModifiers::NONE)));
    app.handle_event(AppEvent::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));

    assert_eq!(app.overlay(), Overlay::None);
    assert!(!app.should_quit());
    assert!(app.engine.settings().bold_text);
    assert_eq!(app.engine.settings().input_height_px, 160);

    let stored = storage.get("typing-settings").expect("settings persisted");
    assert!(stored.contains("\"useBoldText\":true"));
    assert!(stored.contains("\"inputHeight\":160"));
    assert!(!stored.contains("isSettingsOpen"));
}
