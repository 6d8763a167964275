use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Directory holding the persisted `typing-*` blobs
    pub fn data_dir() -> PathBuf {
        if let Some(proj_dirs) = ProjectDirs::from("", "", "kbplayer") {
            proj_dirs.data_local_dir().to_path_buf()
        } else if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("share")
                .join("kbplayer")
        } else {
            PathBuf::from(".kbplayer")
        }
    }

    pub fn default_log_path() -> PathBuf {
        Self::data_dir().join("kbplayer.log")
    }
}
