//! Workflow configuration: `$CASSIA_HOME/config.toml` plus `-c key=value`
//! overrides from the command line.

use crate::report::ReportScenario;
use anyhow::Context;
use serde::Deserialize;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;
use toml::Value as TomlValue;

pub const CONFIG_FILE: &str = "config.toml";
const CASSIA_HOME_ENV: &str = "CASSIA_HOME";

/// How long each of the four processing stages pauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageTimings {
    delays_ms: [u64; 4],
}

impl Default for StageTimings {
    fn default() -> Self {
        Self {
            delays_ms: [3500, 3000, 3000, 4000],
        }
    }
}

impl StageTimings {
    pub fn from_millis(delays_ms: [u64; 4]) -> Self {
        Self { delays_ms }
    }

    pub fn instant() -> Self {
        Self::from_millis([0; 4])
    }

    /// Delay for processing stage `stage` (1..=4); other values get zero.
    pub fn delay(&self, stage: u8) -> Duration {
        let millis = usize::from(stage)
            .checked_sub(1)
            .and_then(|idx| self.delays_ms.get(idx))
            .copied()
            .unwrap_or(0);
        Duration::from_millis(millis)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkflowConfig {
    #[serde(rename = "stage_delays_ms")]
    pub timings: StageTimings,
    pub scenario: ReportScenario,
    /// Column at which report narrative is wrapped.
    pub wrap_width: usize,
    /// `None` follows terminal detection.
    pub color: Option<bool>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            timings: StageTimings::default(),
            scenario: ReportScenario::default(),
            wrap_width: 100,
            color: None,
        }
    }
}

impl WorkflowConfig {
    /// Loads `config.toml` from `cassia_home` (missing file means defaults)
    /// and applies `overrides` on top.
    pub fn load(cassia_home: &Path, overrides: &ConfigOverrides) -> anyhow::Result<Self> {
        let path = cassia_home.join(CONFIG_FILE);
        let mut root = match fs::read_to_string(&path) {
            Ok(contents) => TomlValue::Table(
                toml::from_str::<toml::Table>(&contents)
                    .with_context(|| format!("failed to parse {}", path.display()))?,
            ),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                TomlValue::Table(toml::Table::new())
            }
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read {}", path.display()));
            }
        };
        for (key, value) in overrides.parse_overrides()? {
            apply_override(&mut root, &key, value);
        }
        let config: WorkflowConfig = root
            .try_into()
            .context("invalid workflow configuration")?;
        if config.wrap_width < 20 {
            anyhow::bail!("wrap_width must be at least 20, got {}", config.wrap_width);
        }
        Ok(config)
    }
}

/// `$CASSIA_HOME`, or `~/.cassia` when unset.
pub fn find_cassia_home() -> anyhow::Result<PathBuf> {
    if let Ok(home) = std::env::var(CASSIA_HOME_ENV)
        && !home.is_empty()
    {
        return Ok(PathBuf::from(home));
    }
    let mut home = dirs::home_dir().context("could not find home directory")?;
    home.push(".cassia");
    Ok(home)
}

/// Raw `key=value` pairs collected from repeated `-c` flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub raw_overrides: Vec<String>,
}

impl ConfigOverrides {
    pub fn new(raw_overrides: Vec<String>) -> Self {
        Self { raw_overrides }
    }

    /// Splits each override at the first `=`. The value is parsed as TOML
    /// when possible and kept as a plain string otherwise, so
    /// `scenario=esophagus-icc` and `stage_delays_ms=[0,0,0,0]` both work.
    pub fn parse_overrides(&self) -> anyhow::Result<Vec<(String, TomlValue)>> {
        self.raw_overrides
            .iter()
            .map(|raw| {
                let (key, value) = raw
                    .split_once('=')
                    .with_context(|| format!("invalid override (missing '='): {raw}"))?;
                let key = key.trim();
                if key.is_empty() {
                    anyhow::bail!("empty key in override: {raw}");
                }
                let value = value.trim();
                let parsed = parse_toml_value(value)
                    .unwrap_or_else(|| TomlValue::String(trim_quotes(value).to_string()));
                Ok((key.to_string(), parsed))
            })
            .collect()
    }
}

fn parse_toml_value(raw: &str) -> Option<TomlValue> {
    let wrapped = format!("_x_ = {raw}");
    let mut table: toml::Table = toml::from_str(&wrapped).ok()?;
    table.remove("_x_")
}

fn trim_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Writes `value` at the dotted `path`, creating intermediate tables and
/// replacing any non-table value in the way.
fn apply_override(root: &mut TomlValue, path: &str, value: TomlValue) {
    let parts: Vec<&str> = path.split('.').collect();
    let mut current = root;

    for (idx, part) in parts.iter().enumerate() {
        if idx == parts.len() - 1 {
            match current {
                TomlValue::Table(table) => {
                    table.insert((*part).to_string(), value);
                }
                _ => {
                    let mut table = toml::Table::new();
                    table.insert((*part).to_string(), value);
                    *current = TomlValue::Table(table);
                }
            }
            return;
        }

        if !current.is_table() {
            *current = TomlValue::Table(toml::Table::new());
        }
        if let TomlValue::Table(table) = current {
            current = table
                .entry((*part).to_string())
                .or_insert_with(|| TomlValue::Table(toml::Table::new()));
        }
    }
}
