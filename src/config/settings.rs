use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub export: ExportSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StorageSettings {
    #[serde(default = "default_clients_file")]
    pub clients_file: String,
    #[serde(default = "default_visits_file")]
    pub visits_file: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            clients_file: default_clients_file(),
            visits_file: default_visits_file(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExportSettings {
    /// File name used by `visits --export` when no path is given
    #[serde(default = "default_export_file")]
    pub file_name: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            file_name: default_export_file(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingSettings {
    /// `tracing` filter directive, overridden by RUST_LOG
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_clients_file() -> String {
    "clientes.csv".to_string()
}

fn default_visits_file() -> String {
    "citas.csv".to_string()
}

fn default_export_file() -> String {
    "reporte_visitas_filtrado.csv".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}
