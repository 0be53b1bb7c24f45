use std::env;
use std::path::PathBuf;

// wine prefixes default to this user name when $USER is not set
const DEFAULT_WINE_USER: &str = "user";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Linux,
    Macos,
}

impl Platform {
    pub fn current() -> Platform {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::Macos
        } else {
            Platform::Linux
        }
    }

    pub fn uses_wine(&self) -> bool {
        !matches!(self, Platform::Windows)
    }
}

/// Snapshot of the environment bits install discovery depends on, taken
/// once so discovery itself stays a pure function of its inputs.
#[derive(Debug, Clone)]
pub struct UserEnv {
    pub home: Option<PathBuf>,
    pub user_name: String,
    pub local_app_data: Option<PathBuf>,
}

impl UserEnv {
    pub fn from_env() -> UserEnv {
        UserEnv {
            home: dirs::home_dir(),
            user_name: wine_user_name(env::var("USER").ok()),
            local_app_data: env::var_os("LOCALAPPDATA").map(PathBuf::from),
        }
    }
}

fn wine_user_name(user: Option<String>) -> String {
    user.unwrap_or_else(|| DEFAULT_WINE_USER.to_string())
}
