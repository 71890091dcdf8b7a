use crate::{
    error::{Error, Result},
    lineending::LineEnding,
    utils::{canonical_dir, get_ron_formatter, FixPath},
};
use ron::{extensions::Extensions, ser::to_string_pretty, Options};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt, fs,
    path::{Path, PathBuf},
};
use tracing::debug;

pub const LOCATION_KEY: &str = "location";
pub const LINE_ENDING_KEY: &str = "lineEnding";

/// Flat string-to-string configuration mapping.
///
/// Only two keys are recognized: `location` and `lineEnding`. Values are
/// always single-line strings.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct Configuration {
    entries: BTreeMap<String, String>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Validate and store a value for one of the recognized keys.
    ///
    /// `location` must name an existing directory; relative paths are resolved
    /// against `base` and stored canonicalized. `lineEnding` must be one of the
    /// policy tokens.
    pub fn set(&mut self, key: &str, value: &str, base: &Path) -> Result<()> {
        match key {
            LOCATION_KEY => {
                let location = value.fix_path(base)?;
                self.set_location(&location)
            }
            LINE_ENDING_KEY => {
                let ending: LineEnding = value.parse()?;
                self.set_line_ending(ending);
                Ok(())
            }
            _ => Err(Error::config(format!(
                "unknown configuration key '{key}', expected '{LOCATION_KEY}' or '{LINE_ENDING_KEY}'"
            ))),
        }
    }

    pub fn set_location(&mut self, location: &Path) -> Result<()> {
        let location = canonical_dir(location, "Provided location")?;
        let value = location.to_str().ok_or_else(|| {
            Error::config(format!(
                "provided location '{}' is not valid UTF-8",
                location.display()
            ))
        })?;

        self.entries.insert(LOCATION_KEY.into(), value.into());
        Ok(())
    }

    pub fn set_line_ending(&mut self, ending: LineEnding) {
        self.entries
            .insert(LINE_ENDING_KEY.into(), ending.as_str().into());
    }

    /// The configured local dot file directory.
    ///
    /// The directory is checked again on every call since it may have been
    /// removed after it was configured.
    pub fn location(&self) -> Result<PathBuf> {
        let location = self.get(LOCATION_KEY).ok_or_else(|| {
            Error::config("the local dot file location must be configured before synchronization")
        })?;

        canonical_dir(Path::new(location), "Configured location")
    }

    /// The configured line-ending policy, `none` when unset.
    pub fn line_ending(&self) -> Result<LineEnding> {
        self.get(LINE_ENDING_KEY)
            .map_or(Ok(LineEnding::None), |value| value.parse())
    }

    fn check_single_line(&self) -> Result<()> {
        match self
            .entries
            .iter()
            .find(|(_, value)| value.contains(|c| c == '\n' || c == '\r'))
        {
            Some((key, _)) => Err(Error::config(format!(
                "multi-line properties are not supported (key '{key}')"
            ))),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "<EMPTY CONFIG>");
        }

        let width = self.entries.keys().map(String::len).max().unwrap_or(0);
        for (key, value) in self.iter() {
            writeln!(f, "{key:<width$} = {value}")?;
        }
        Ok(())
    }
}

/// Drop `#` comment lines, keeping RON's `#![enable(..)]` attributes.
fn strip_hash_comments(raw: &str) -> String {
    raw.lines()
        .filter(|line| {
            let line = line.trim_start();
            !line.starts_with('#') || line.starts_with("#!")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reads and writes the [`Configuration`] to its RON file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the configuration, or an empty one when the file does not exist.
    pub fn load(&self) -> Result<Configuration> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no config file, starting empty");
            return Ok(Configuration::new());
        }

        let raw = fs::read_to_string(&self.path)
            .map_err(|source| Error::io("read config file", &self.path, source))?;
        if raw.trim().is_empty() {
            return Ok(Configuration::new());
        }

        let config: Configuration = Options::default()
            .with_default_extension(Extensions::IMPLICIT_SOME)
            .from_str(&strip_hash_comments(&raw))
            .map_err(|e| {
                Error::config(format!(
                    "failed to parse config file '{}': {e}",
                    self.path.display()
                ))
            })?;
        config.check_single_line()?;

        debug!(path = %self.path.display(), entries = config.entries.len(), "loaded config");
        Ok(config)
    }

    /// Persist the configuration, replacing the previous file.
    pub fn save(&self, config: &Configuration) -> Result<()> {
        config.check_single_line()?;

        let mut serialized = to_string_pretty(config, get_ron_formatter())
            .map_err(|e| Error::config(format!("failed to serialize config: {e}")))?;
        serialized.push('\n');

        fs::write(&self.path, serialized)
            .map_err(|source| Error::io("write config file", &self.path, source))?;

        debug!(path = %self.path.display(), "saved config");
        Ok(())
    }
}
