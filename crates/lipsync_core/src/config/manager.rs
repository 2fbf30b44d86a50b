//! Loading and persisting [`Settings`] as a sectioned TOML file.
//!
//! [`ConfigManager::save`] regenerates every section under a comment header.
//! [`ConfigManager::update_section`] replaces one table in the on-disk
//! document and leaves the rest of the file, comments included, as it was.
//! Every write goes to a sibling `.toml.tmp` file that is then renamed over
//! the config.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use toml_edit::{DocumentMut, Item, Table};

use super::settings::{ConfigSection, Settings};

const FILE_HEADER: &str = "# Lip Sync configuration\n\
# Sections rewritten by `lipsync init-config` keep the rest of this file intact.\n";

/// Config file failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot access config file: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Cannot encode config: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("Cannot edit config document: {0}")]
    Document(#[from] toml_edit::TomlError),

    #[error("No config file at {}", .0.display())]
    NotFound(PathBuf),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Owns the config file path and the settings read from it.
pub struct ConfigManager {
    path: PathBuf,
    settings: Settings,
}

impl ConfigManager {
    /// Manager for `path` holding default settings until a load.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            settings: Settings::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// In-memory settings; persist edits with [`save`](Self::save) or
    /// [`update_section`](Self::update_section).
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Read settings from an existing file.
    pub fn load(&mut self) -> ConfigResult<()> {
        let content = self.read_existing()?;
        self.settings = toml::from_str(&content)?;
        tracing::debug!("Loaded config from {}", self.path.display());
        Ok(())
    }

    /// Read settings, writing a default file first if there is none.
    ///
    /// A file missing one of the known sections, or carrying an unknown one,
    /// is regenerated from the settings it parsed to.
    pub fn load_or_create(&mut self) -> ConfigResult<()> {
        match self.read_existing() {
            Ok(content) => {
                self.settings = toml::from_str(&content)?;
                let doc: DocumentMut = content.parse()?;
                if !has_known_sections_only(&doc) {
                    tracing::info!("Regenerating sections of {}", self.path.display());
                    self.save()?;
                }
            }
            Err(ConfigError::NotFound(_)) => {
                self.settings = Settings::default();
                self.save()?;
                tracing::info!("Wrote default config to {}", self.path.display());
            }
            Err(err) => return Err(err),
        }
        Ok(())
    }

    /// Write every section to disk.
    pub fn save(&self) -> ConfigResult<()> {
        let mut content = String::from(FILE_HEADER);
        for section in ConfigSection::ALL {
            content.push_str(&format!("\n# {}\n", section.description()));
            content.push_str(&self.render_section(section)?);
        }
        write_atomic(&self.path, &content)?;
        Ok(())
    }

    /// Replace one section of the on-disk file with the in-memory values.
    pub fn update_section(&self, section: ConfigSection) -> ConfigResult<()> {
        let mut doc = match self.read_existing() {
            Ok(content) => content.parse::<DocumentMut>()?,
            Err(ConfigError::NotFound(_)) => DocumentMut::new(),
            Err(err) => return Err(err),
        };

        let name = section.table_name();
        let rendered: DocumentMut = self.render_section(section)?.parse()?;
        doc[name] = rendered
            .get(name)
            .cloned()
            .unwrap_or_else(|| Item::Table(Table::new()));

        write_atomic(&self.path, &doc.to_string())?;
        tracing::debug!("Updated [{}] in {}", name, self.path.display());
        Ok(())
    }

    fn read_existing(&self) -> ConfigResult<String> {
        if !self.path.exists() {
            return Err(ConfigError::NotFound(self.path.clone()));
        }
        Ok(fs::read_to_string(&self.path)?)
    }

    /// One section as TOML, `[table]` header included.
    fn render_section(&self, section: ConfigSection) -> ConfigResult<String> {
        let name = section.table_name();
        let rendered = match section {
            ConfigSection::Paths => table_toml(name, &self.settings.paths)?,
            ConfigSection::Mapping => table_toml(name, &self.settings.mapping)?,
            ConfigSection::Rhubarb => table_toml(name, &self.settings.rhubarb)?,
            ConfigSection::Logging => table_toml(name, &self.settings.logging)?,
        };
        Ok(rendered)
    }
}

/// Nest `value` under `name` so arrays of tables get `[[name.field]]` headers.
fn table_toml<T: Serialize>(name: &str, value: &T) -> Result<String, toml::ser::Error> {
    let wrapper: BTreeMap<&str, &T> = BTreeMap::from([(name, value)]);
    toml::to_string_pretty(&wrapper)
}

fn has_known_sections_only(doc: &DocumentMut) -> bool {
    let known = |key: &str| ConfigSection::ALL.iter().any(|s| s.table_name() == key);
    doc.iter().all(|(key, _)| known(key))
        && ConfigSection::ALL
            .iter()
            .all(|s| doc.contains_key(s.table_name()))
}

fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    let staging = path.with_extension("toml.tmp");
    let mut file = fs::File::create(&staging)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;
    drop(file);

    fs::rename(&staging, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::TransitionOverride;
    use crate::Mode;
    use tempfile::tempdir;

    #[test]
    fn creates_default_file_in_missing_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("conf").join("lipsync.toml");

        let mut manager = ConfigManager::new(&path);
        manager.load_or_create().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        for section in ConfigSection::ALL {
            assert!(content.contains(&format!("[{}]", section.table_name())));
        }
        assert!(!path.with_extension("toml.tmp").exists());
    }

    #[test]
    fn partial_file_keeps_values_and_gains_sections() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lipsync.toml");
        fs::write(&path, "[paths]\nviseme_map = \"maps/custom.json\"\n").unwrap();

        let mut manager = ConfigManager::new(&path);
        manager.load_or_create().unwrap();

        assert_eq!(manager.settings().paths.viseme_map, "maps/custom.json");
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("[rhubarb]"));
        assert!(content.contains("maps/custom.json"));
    }

    #[test]
    fn complete_file_is_left_alone() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lipsync.toml");
        ConfigManager::new(&path).save().unwrap();

        let edited = fs::read_to_string(&path).unwrap() + "# local note\n";
        fs::write(&path, &edited).unwrap();

        ConfigManager::new(&path).load_or_create().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), edited);
    }

    #[test]
    fn load_requires_existing_file() {
        let dir = tempdir().unwrap();
        let mut manager = ConfigManager::new(dir.path().join("absent.toml"));
        assert!(matches!(manager.load(), Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn unknown_mode_fails_to_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lipsync.toml");
        fs::write(&path, "[mapping]\nmode = \"loud\"\n").unwrap();

        let mut manager = ConfigManager::new(&path);
        assert!(matches!(manager.load(), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn overrides_survive_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lipsync.toml");

        let mut manager = ConfigManager::new(&path);
        manager.settings_mut().mapping.mode = Mode::Predictive;
        manager
            .settings_mut()
            .mapping
            .transition_overrides
            .push(TransitionOverride::new("AA", "EE", 2.0));
        manager.save().unwrap();

        let mut reloaded = ConfigManager::new(&path);
        reloaded.load().unwrap();
        assert_eq!(reloaded.settings().mapping.mode, Mode::Predictive);
        assert_eq!(
            reloaded.settings().mapping.transition_overrides,
            [TransitionOverride::new("AA", "EE", 2.0)]
        );
    }

    #[test]
    fn section_update_keeps_other_sections_on_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lipsync.toml");

        let mut manager = ConfigManager::new(&path);
        manager.load_or_create().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        fs::write(&path, content.replace("timeout_secs = 300", "timeout_secs = 42")).unwrap();

        manager.settings_mut().mapping.mode = Mode::Predictive;
        manager.update_section(ConfigSection::Mapping).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("mode = \"predictive\""));
        assert!(content.contains("timeout_secs = 42"));
        assert!(content.contains("# Lip Sync configuration"));
    }

    #[test]
    fn section_update_without_file_writes_only_that_section() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lipsync.toml");

        let mut manager = ConfigManager::new(&path);
        manager.settings_mut().rhubarb.tool_path = "/opt/rhubarb/rhubarb".to_string();
        manager.update_section(ConfigSection::Rhubarb).unwrap();

        let mut reloaded = ConfigManager::new(&path);
        reloaded.load().unwrap();
        assert_eq!(reloaded.settings().rhubarb.tool_path, "/opt/rhubarb/rhubarb");
        assert!(!fs::read_to_string(&path).unwrap().contains("[mapping]"));
    }
}
