use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use crate::passages::LanguageMode;

/// Fire-and-forget audio feedback. Implementations must never fail loudly:
/// a missing capability is simply silence.
pub trait Speaker {
    fn speak(&self, text: &str, language: LanguageMode);
}

/// Speaker that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSpeaker;

impl Speaker for NoopSpeaker {
    fn speak(&self, _text: &str, _language: LanguageMode) {}
}

/// Remembers everything it was asked to say. Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct RecordingSpeaker {
    spoken: Rc<RefCell<Vec<String>>>,
}

impl RecordingSpeaker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.borrow().clone()
    }
}

impl Speaker for RecordingSpeaker {
    fn speak(&self, text: &str, _language: LanguageMode) {
        self.spoken.borrow_mut().push(text.to_string());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TtsProgram {
    Say,
    EspeakNg,
    Espeak,
}

impl TtsProgram {
    fn binary(self) -> &'static str {
        match self {
            TtsProgram::Say => "say",
            TtsProgram::EspeakNg => "espeak-ng",
            TtsProgram::Espeak => "espeak",
        }
    }

    fn voice_args(self, language: LanguageMode) -> Vec<&'static str> {
        match (self, language) {
            (TtsProgram::Say, LanguageMode::English) => vec![],
            (TtsProgram::Say, LanguageMode::Chinese) => vec!["-v", "Tingting"],
            (_, LanguageMode::English) => vec!["-v", "en-us"],
            (_, LanguageMode::Chinese) => vec!["-v", "cmn"],
        }
    }
}

/// Queued word or character waiting for the speech worker
#[derive(Debug)]
struct Utterance {
    text: String,
    language: LanguageMode,
}

/// Speaks through whichever system text-to-speech command is installed.
/// Utterances are queued and spoken one at a time by a worker thread, so
/// fast typing never makes words overlap.
#[derive(Debug)]
pub struct CommandSpeaker {
    queue: Option<Sender<Utterance>>,
}

impl CommandSpeaker {
    pub fn detect() -> Self {
        let path = std::env::var_os("PATH").unwrap_or_default();
        let dirs: Vec<PathBuf> = std::env::split_paths(&path).collect();
        let program = [TtsProgram::Say, TtsProgram::EspeakNg, TtsProgram::Espeak]
            .into_iter()
            .find_map(|p| find_in(&dirs, p.binary()).map(|path| (p, path)));

        match &program {
            Some((p, path)) => {
                tracing::debug!(program = p.binary(), path = %path.display(), "speech enabled")
            }
            None => tracing::debug!("no text-to-speech command found, speech disabled"),
        }

        Self::with_program(program)
    }

    fn with_program(program: Option<(TtsProgram, PathBuf)>) -> Self {
        let queue = program.map(|(program, path)| {
            let (tx, rx) = mpsc::channel();
            thread::spawn(move || speak_queued(program, &path, rx));
            tx
        });
        Self { queue }
    }

    pub fn is_available(&self) -> bool {
        self.queue.is_some()
    }
}

impl Speaker for CommandSpeaker {
    fn speak(&self, text: &str, language: LanguageMode) {
        let Some(queue) = &self.queue else {
            return;
        };
        let utterance = Utterance {
            text: text.to_string(),
            language,
        };
        if queue.send(utterance).is_err() {
            tracing::debug!("speech worker has stopped");
        }
    }
}

/// Run the speech command for each utterance in turn, waiting for each
/// to finish before starting the next
fn speak_queued(program: TtsProgram, path: &Path, rx: Receiver<Utterance>) {
    for utterance in rx {
        let status = Command::new(path)
            .args(program.voice_args(utterance.language))
            .arg(&utterance.text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        match status {
            Ok(status) if !status.success() => {
                tracing::debug!(%status, "speech command failed")
            }
            Ok(_) => {}
            Err(err) => tracing::debug!(%err, "failed to start speech command"),
        }
    }
}

fn find_in(dirs: &[PathBuf], binary: &str) -> Option<PathBuf> {
    dirs.iter()
        .map(|dir| dir.join(binary))
        .find(|candidate| is_file(candidate))
}

fn is_file(path: &Path) -> bool {
    path.metadata().map(|m| m.is_file()).unwrap_or(false)
}
