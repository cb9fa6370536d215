use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, info, warn};

use super::paths::AppPaths;
use super::settings::Configuration;
use crate::core::FactureError;

/// Persists the [`Configuration`] as a single JSON file plus an optional logo.
///
/// `save` always replaces the whole file; there are no partial updates.
#[derive(Debug)]
pub struct ConfigStore {
    config_file: PathBuf,
    logo_files: [PathBuf; 2],
    write_lock: Mutex<()>,
}

impl ConfigStore {
    pub fn new(paths: &AppPaths) -> Self {
        Self {
            config_file: paths.config_file(),
            logo_files: paths.logo_files(),
            write_lock: Mutex::new(()),
        }
    }

    /// Load the configuration, falling back to defaults when the file is
    /// absent or malformed.
    pub fn load(&self) -> Configuration {
        match self.try_load() {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, path = %self.config_file.display(), "using default configuration");
                Configuration::default()
            }
        }
    }

    /// Load the configuration; defaults when absent, an error when malformed.
    pub fn try_load(&self) -> Result<Configuration, FactureError> {
        let raw = match fs::read_to_string(&self.config_file) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.config_file.display(), "no configuration file, using defaults");
                return Ok(Configuration::default());
            }
            Err(e) => {
                return Err(FactureError::Config(format!(
                    "cannot read {}: {e}",
                    self.config_file.display()
                )));
            }
        };

        serde_json::from_str(&raw).map_err(|e| {
            FactureError::Config(format!("malformed {}: {e}", self.config_file.display()))
        })
    }

    /// Replace the stored configuration.
    pub fn save(&self, config: &Configuration) -> Result<(), FactureError> {
        config.check()?;
        let json = serde_json::to_string_pretty(config)
            .map_err(|e| FactureError::Config(format!("cannot serialize configuration: {e}")))?;

        let _guard = self.lock()?;
        write_replacing(&self.config_file, json.as_bytes())?;
        info!(path = %self.config_file.display(), "configuration saved");
        Ok(())
    }

    /// Delete the configuration file and any stored logo.
    pub fn reset(&self) -> Result<(), FactureError> {
        let _guard = self.lock()?;
        remove_if_exists(&self.config_file)?;
        for logo in &self.logo_files {
            remove_if_exists(logo)?;
        }
        info!(path = %self.config_file.display(), "configuration reset to defaults");
        Ok(())
    }

    /// Store a logo image (PNG or JPEG), replacing any previous one.
    pub fn save_logo(&self, bytes: &[u8]) -> Result<PathBuf, FactureError> {
        let [png, jpg] = &self.logo_files;
        let (target, other) = if bytes.starts_with(PNG_SIGNATURE) {
            (png, jpg)
        } else if bytes.starts_with(JPEG_SOI) {
            (jpg, png)
        } else {
            return Err(FactureError::Config(
                "logo must be a PNG or JPEG image".into(),
            ));
        };

        let _guard = self.lock()?;
        write_replacing(target, bytes)?;
        remove_if_exists(other)?;
        info!(path = %target.display(), size = bytes.len(), "logo saved");
        Ok(target.clone())
    }

    /// The stored logo, if any.
    pub fn load_logo(&self) -> Option<Vec<u8>> {
        self.logo_files.iter().find_map(|path| match fs::read(path) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!(error = %e, path = %path.display(), "cannot read logo");
                None
            }
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>, FactureError> {
        self.write_lock
            .lock()
            .map_err(|_| FactureError::Config("configuration lock poisoned".into()))
    }
}

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_SOI: &[u8] = &[0xFF, 0xD8];

/// Write to a sibling temp file, then rename over the target.
fn write_replacing(path: &Path, bytes: &[u8]) -> Result<(), FactureError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .map_err(|e| FactureError::Config(format!("cannot create {}: {e}", dir.display())))?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)
        .map_err(|e| FactureError::Config(format!("cannot write {}: {e}", tmp.display())))?;
    fs::rename(&tmp, path)
        .map_err(|e| FactureError::Config(format!("cannot replace {}: {e}", path.display())))
}

fn remove_if_exists(path: &Path) -> Result<(), FactureError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(FactureError::Config(format!(
            "cannot remove {}: {e}",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn store() -> (tempfile::TempDir, ConfigStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(&AppPaths::new(dir.path()));
        (dir, store)
    }

    #[test]
    fn absent_file_gives_defaults() {
        let (_dir, store) = store();
        assert_eq!(store.load(), Configuration::default());
        assert_eq!(store.try_load().unwrap(), Configuration::default());
    }

    #[test]
    fn save_then_load() {
        let (_dir, store) = store();
        let mut config = Configuration::default();
        config.company.name = "Taxi Dupont".into();
        config.billing.tva_rate = dec!(10);
        store.save(&config).unwrap();
        assert_eq!(store.load(), config);
    }

    #[test]
    fn malformed_file_falls_back() {
        let (dir, store) = store();
        fs::write(dir.path().join("config.json"), "{ not json").unwrap();
        assert!(matches!(store.try_load(), Err(FactureError::Config(_))));
        assert_eq!(store.load(), Configuration::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let (dir, store) = store();
        fs::write(
            dir.path().join("config.json"),
            r#"{"billing": {"tva_rate": 10.0}, "appearance": {"invoice_prefix": "T-"}}"#,
        )
        .unwrap();
        let config = store.load();
        assert_eq!(config.billing.tva_rate, dec!(10));
        assert_eq!(config.billing.km_rate, dec!(1.5));
        assert_eq!(config.appearance.invoice_prefix, "T-");
        assert_eq!(config.company.name, "VTC Service Pro");
    }

    #[test]
    fn invalid_configuration_not_saved() {
        let (dir, store) = store();
        let mut config = Configuration::default();
        config.appearance.primary_color = "red".into();
        assert!(store.save(&config).is_err());
        assert!(!dir.path().join("config.json").exists());
    }

    #[test]
    fn unknown_logo_format_rejected() {
        let (_dir, store) = store();
        assert!(store.save_logo(b"GIF89a").is_err());
        assert!(store.load_logo().is_none());
    }

    #[test]
    fn new_logo_replaces_other_format() {
        let (dir, store) = store();
        store.save_logo(b"\x89PNG\r\n\x1a\nrest").unwrap();
        store.save_logo(&[0xFF, 0xD8, 0xFF, 0xD9]).unwrap();
        assert!(!dir.path().join("logo.png").exists());
        assert_eq!(store.load_logo().unwrap(), vec![0xFF, 0xD8, 0xFF, 0xD9]);
    }
}
