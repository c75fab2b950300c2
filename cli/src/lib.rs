pub mod info_cmd;
pub mod run_cmd;
pub mod style;

use cassia_workflow::ConfigOverrides;
use clap::ArgAction;
use clap::Args;

/// `-c key=value` flags accepted by every subcommand.
#[derive(Debug, Clone, Default, Args)]
pub struct CliConfigOverrides {
    /// Override a configuration value from `$CASSIA_HOME/config.toml`.
    /// Use a dotted path for nested values. The value is parsed as TOML,
    /// falling back to a literal string:
    /// `-c stage_delays_ms=[0,0,0,0]`, `-c scenario=esophagus-icc`.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "key=value",
        action = ArgAction::Append,
        global = true
    )]
    pub raw_overrides: Vec<String>,
}

impl From<CliConfigOverrides> for ConfigOverrides {
    fn from(value: CliConfigOverrides) -> Self {
        ConfigOverrides::new(value.raw_overrides)
    }
}
