use crate::form::FormInput;
use anyhow::Context;
use std::fs;
use std::path::Path;

/// Reads a [`FormInput`] from a YAML or TOML request file.
///
/// The extension picks the parser; anything else is tried as YAML first and
/// then as TOML. The loaded request goes through the same non-empty checks as
/// the interactive form.
pub fn load_request(path: &Path) -> anyhow::Result<FormInput> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read analysis request {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let input: FormInput = match ext.as_str() {
        "yml" | "yaml" => serde_yaml::from_str(&contents).context("parse analysis request")?,
        "toml" | "tml" => toml::from_str(&contents).context("parse analysis request")?,
        _ => serde_yaml::from_str(&contents)
            .or_else(|_| toml::from_str(&contents))
            .context("parse analysis request (yaml or toml)")?,
    };
    input
        .validate()
        .with_context(|| format!("invalid analysis request {}", path.display()))?;
    Ok(input)
}
