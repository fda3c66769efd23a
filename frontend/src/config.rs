use serde::Deserialize;

/// Optional user configuration at `<config-dir>/cathode/config.toml`.
/// Command-line arguments win over config values.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Default window scale factor.
    pub scale: Option<u32>,
    /// Default directory to resolve ROM sets from.
    pub rom_dir: Option<String>,
}

pub fn load() -> Config {
    let Some(path) = dirs::config_dir().map(|d| d.join("cathode").join("config.toml")) else {
        return Config::default();
    };
    let Ok(text) = std::fs::read_to_string(&path) else {
        return Config::default();
    };
    match toml::from_str(&text) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("ignoring malformed config {}: {e}", path.display());
            Config::default()
        }
    }
}
