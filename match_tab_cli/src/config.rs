use std::path::Path;

#[derive(Debug, serde::Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub logging_config: String,
    pub default_snapshot_path: String,
    pub pretty_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            logging_config: "info,match_tab_backend=debug".into(),
            default_snapshot_path: "tournament.json".into(),
            pretty_output: true,
        }
    }
}

pub const CONFIG_ENV_VAR: &str = "MATCH_TAB_CONFIG";

pub fn load_config_file(path: &Path) -> Result<Config, anyhow::Error> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str::<Config>(&raw)?)
}

/// Reads the file named by `MATCH_TAB_CONFIG`. Without the variable the
/// defaults apply silently; a broken file falls back to them with a warning.
pub fn read_config() -> Config {
    let Some(path) = std::env::var_os(CONFIG_ENV_VAR) else {
        return Config::default();
    };

    load_config_file(Path::new(&path)).unwrap_or_else(|e| {
        // No subscriber exists until the config is known
        eprintln!("Ignoring config at {}: {}", Path::new(&path).display(), e);
        Config::default()
    })
}
