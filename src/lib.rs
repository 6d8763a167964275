// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app;
pub mod app_dirs;
pub mod clock;
pub mod engine;
pub mod feedback;
pub mod history;
pub mod milestone;
pub mod passages;
pub mod runtime;
pub mod session;
pub mod settings;
pub mod speech;
pub mod storage;
pub mod view;
