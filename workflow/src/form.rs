use crate::error::FormError;
use serde::Deserialize;
use serde::Serialize;

pub const DEFAULT_TISSUE: &str = "Atlas";
pub const DEFAULT_SPECIES: &str = "Mouse";
pub const DEFAULT_MARKERS: &str = "RP24-338A5.4, Cr2, Ms4a1, Ighd, Fcer2a, Cd79a, Fcmr, Cd22, Cd19, \
    Tnfrsf13c, Blk, Iglc2, Iglc3, Fcrl1, Spib, Pax5, Cd79b";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub value: &'static str,
    pub label: &'static str,
}

impl Preset {
    const fn new(value: &'static str, label: &'static str) -> Self {
        Self { value, label }
    }
}

pub const TISSUE_PRESETS: &[Preset] = &[
    Preset::new("Atlas", "Atlas"),
    Preset::new("brain", "Brain"),
    Preset::new("liver", "Liver"),
    Preset::new("blood", "Blood"),
    Preset::new("lung", "Lung"),
    Preset::new("heart", "Heart"),
    Preset::new("kidney", "Kidney"),
    Preset::new("spleen", "Spleen"),
    Preset::new("thymus", "Thymus"),
    Preset::new("bone_marrow", "Bone Marrow"),
];

pub const SPECIES_PRESETS: &[Preset] = &[
    Preset::new("Human", "Human"),
    Preset::new("Mouse", "Mouse"),
    Preset::new("Rat", "Rat"),
    Preset::new("Zebrafish", "Zebrafish"),
];

/// The three values an analysis run starts from. Immutable once submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormInput {
    #[serde(alias = "tissue_type")]
    pub tissue_type: String,
    /// Comma-separated marker gene symbols, as typed.
    #[serde(alias = "marker_gene", alias = "markers")]
    pub marker_gene: String,
    pub species: String,
}

impl FormInput {
    pub fn new(
        tissue_type: impl Into<String>,
        marker_gene: impl Into<String>,
        species: impl Into<String>,
    ) -> Self {
        Self {
            tissue_type: tissue_type.into(),
            marker_gene: marker_gene.into(),
            species: species.into(),
        }
    }

    /// Only checks that every field carries some text.
    pub fn validate(&self) -> Result<(), FormError> {
        require("tissue type", &self.tissue_type)?;
        require("marker gene", &self.marker_gene)?;
        require("species", &self.species)?;
        Ok(())
    }

    pub fn marker_symbols(&self) -> Vec<&str> {
        self.marker_gene
            .split(',')
            .map(str::trim)
            .filter(|symbol| !symbol.is_empty())
            .collect()
    }
}

/// Whether a field is picked from its preset list or typed freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldMode {
    #[default]
    Preset,
    Custom,
}

/// Gathers tissue type, marker genes and species before a run starts.
///
/// Tissue type and species each have a preset/custom toggle. Flipping the
/// toggle keeps whatever value is already entered; the preset list is only
/// enforced on [`FormCollector::submit`].
#[derive(Debug, Clone)]
pub struct FormCollector {
    tissue_type: String,
    tissue_mode: FieldMode,
    marker_gene: String,
    species: String,
    species_mode: FieldMode,
}

impl Default for FormCollector {
    fn default() -> Self {
        Self {
            tissue_type: DEFAULT_TISSUE.to_string(),
            tissue_mode: FieldMode::Preset,
            marker_gene: DEFAULT_MARKERS.to_string(),
            species: DEFAULT_SPECIES.to_string(),
            species_mode: FieldMode::Preset,
        }
    }
}

impl FormCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_tissue_mode(&mut self, mode: FieldMode) -> &mut Self {
        self.tissue_mode = mode;
        self
    }

    pub fn set_species_mode(&mut self, mode: FieldMode) -> &mut Self {
        self.species_mode = mode;
        self
    }

    pub fn set_tissue_type(&mut self, value: impl Into<String>) -> &mut Self {
        self.tissue_type = value.into();
        self
    }

    pub fn set_marker_gene(&mut self, value: impl Into<String>) -> &mut Self {
        self.marker_gene = value.into();
        self
    }

    pub fn set_species(&mut self, value: impl Into<String>) -> &mut Self {
        self.species = value.into();
        self
    }

    pub fn submit(&self) -> Result<FormInput, FormError> {
        let tissue_type = resolve_field(
            "tissue type",
            &self.tissue_type,
            self.tissue_mode,
            TISSUE_PRESETS,
        )?;
        let marker_gene = require("marker gene", &self.marker_gene)?.to_string();
        let species = resolve_field("species", &self.species, self.species_mode, SPECIES_PRESETS)?;
        Ok(FormInput {
            tissue_type,
            marker_gene,
            species,
        })
    }
}

/// Case-insensitive lookup in a preset list.
pub fn find_preset<'a>(presets: &'a [Preset], value: &str) -> Option<&'a Preset> {
    let value = value.trim();
    presets.iter().find(|preset| {
        preset.value.eq_ignore_ascii_case(value) || preset.label.eq_ignore_ascii_case(value)
    })
}

fn resolve_field(
    field: &'static str,
    value: &str,
    mode: FieldMode,
    presets: &[Preset],
) -> Result<String, FormError> {
    let value = require(field, value)?;
    match mode {
        FieldMode::Custom => Ok(value.to_string()),
        FieldMode::Preset => find_preset(presets, value)
            .map(|preset| preset.value.to_string())
            .ok_or_else(|| FormError::UnknownPreset {
                field,
                value: value.to_string(),
            }),
    }
}

fn require<'a>(field: &'static str, value: &'a str) -> Result<&'a str, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FormError::EmptyField { field });
    }
    Ok(trimmed)
}
