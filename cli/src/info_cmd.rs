use cassia_workflow::DEFAULT_MARKERS;
use cassia_workflow::DEFAULT_SPECIES;
use cassia_workflow::DEFAULT_TISSUE;
use cassia_workflow::FALLBACK_DESCRIPTION;
use cassia_workflow::Preset;
use cassia_workflow::ReportScenario;
use cassia_workflow::SPECIES_PRESETS;
use cassia_workflow::TISSUE_PRESETS;
use cassia_workflow::describe_marker;
use cassia_workflow::tissue_cell_type;
use clap::Args;
use strum::IntoEnumIterator;

#[derive(Debug, Args)]
pub struct MarkerArgs {
    /// Gene symbols to describe (case-insensitive).
    #[arg(value_name = "SYMBOL", required = true)]
    pub symbols: Vec<String>,
}

pub fn presets() {
    println!("Tissue types (default {DEFAULT_TISSUE}):");
    print_presets(TISSUE_PRESETS, |preset| {
        Some(tissue_cell_type(&preset.value.to_lowercase()))
    });
    println!();
    println!("Species (default {DEFAULT_SPECIES}):");
    print_presets(SPECIES_PRESETS, |_| None);
    println!();
    println!("Scenarios:");
    for scenario in ReportScenario::iter() {
        let marker = if scenario == ReportScenario::default() {
            " (default)"
        } else {
            ""
        };
        println!("  {scenario}{marker}");
    }
    println!();
    println!("Default marker genes:");
    println!("  {DEFAULT_MARKERS}");
}

fn print_presets(presets: &[Preset], note: impl Fn(&Preset) -> Option<&'static str>) {
    for preset in presets {
        match note(preset) {
            Some(note) => println!("  {:<12} {:<12} -> {note}", preset.value, preset.label),
            None => println!("  {:<12} {}", preset.value, preset.label),
        }
    }
}

pub fn marker(args: MarkerArgs) {
    for symbol in &args.symbols {
        let description = describe_marker(symbol).unwrap_or(FALLBACK_DESCRIPTION);
        println!("{symbol}: {description}");
    }
}
