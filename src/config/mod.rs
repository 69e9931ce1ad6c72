mod settings;

pub use settings::{Config, ExportSettings, LoggingSettings, StorageSettings};

use crate::error::{Result, VisitError};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the data directory path (platform data dir, or ~/.visit-log/)
pub fn data_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "visit-log") {
        return Ok(proj_dirs.data_dir().to_path_buf());
    }

    let home = dirs_home().ok_or_else(|| {
        VisitError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".visit-log"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Resolve a configured file name against the data directory.
/// Absolute and ~ paths are used as they are.
pub fn resolve_path(data_dir: &Path, file: &str) -> PathBuf {
    let path = expand_path(file);
    if path.is_absolute() {
        path
    } else {
        data_dir.join(path)
    }
}

pub fn config_file(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}

/// Load config.toml (all defaults if missing)
pub fn load_config(data_dir: &Path) -> Result<Config> {
    let path = config_file(data_dir);
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| VisitError::ConfigParse { path, source: e })
}

impl Config {
    pub fn clients_path(&self, data_dir: &Path) -> PathBuf {
        resolve_path(data_dir, &self.storage.clients_file)
    }

    pub fn visits_path(&self, data_dir: &Path) -> PathBuf {
        resolve_path(data_dir, &self.storage.visits_file)
    }
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[storage]
# Relative names are resolved inside the data directory
clients_file = "clientes.csv"
visits_file = "citas.csv"

[export]
# Default file written by `visits --export`
file_name = "reporte_visitas_filtrado.csv"

[logging]
# Any tracing filter directive, e.g. "info" or "visit_log=debug".
# RUST_LOG takes precedence when set.
level = "warn"
"#;
