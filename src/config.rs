//! Service configuration
//!
//! Everything comes from environment variables. API keys are optional
//! at startup; routes and jobs that need one fail fast at the point of
//! use when it is missing.

use std::env;
use std::path::PathBuf;

use tracing::info;

/// Fixed user id for favorites; the application is single-user.
pub const DEFAULT_USER_ID: &str = "default";

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP bind port
    pub port: u16,
    /// SQLite database file
    pub database_path: PathBuf,
    /// Shared admin password for POST /api/auth
    pub admin_password: Option<String>,

    // External API credentials
    pub edamam_app_id: Option<String>,
    pub edamam_app_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub google_api_key: Option<String>,
    pub google_cx: Option<String>,
    pub pexels_api_key: Option<String>,
}

impl Config {
    /// Load configuration from the environment
    pub fn from_env() -> Self {
        Self {
            port: env::var("RECIPEBOOK_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(|| {
                    info!("RECIPEBOOK_PORT not set, using default 3040");
                    3040
                }),
            database_path: database_path(),
            admin_password: non_empty_var("RECIPEBOOK_ADMIN_PASSWORD"),
            edamam_app_id: non_empty_var("EDAMAM_APP_ID"),
            edamam_app_key: non_empty_var("EDAMAM_APP_KEY"),
            openai_api_key: non_empty_var("OPENAI_API_KEY"),
            google_api_key: non_empty_var("GOOGLE_API_KEY"),
            google_cx: non_empty_var("GOOGLE_CSE_CX"),
            pexels_api_key: non_empty_var("PEXELS_API_KEY"),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get the database path from environment or use a default next to the
/// project root.
fn database_path() -> PathBuf {
    env::var("RECIPEBOOK_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            path.push("recipebook.db");
            path
        })
}
