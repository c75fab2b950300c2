use cassia_cli::CliConfigOverrides;
use cassia_cli::info_cmd;
use cassia_cli::info_cmd::MarkerArgs;
use cassia_cli::run_cmd;
use cassia_cli::run_cmd::RunArgs;
use cassia_cli::run_cmd::RunStatus;
use clap::Parser;
use clap::Subcommand;
use tracing_subscriber::EnvFilter;

/// Exit code for a run that was reset with Ctrl-C.
const RESET_EXIT_CODE: i32 = 130;

/// Staged cell-type annotation workflow demo.
///
/// Collects tissue type, marker genes and species, walks through the
/// annotation, validation, scoring and report stages, and prints the
/// resulting analysis report.
#[derive(Debug, Parser)]
#[command(name = "cassia", version, subcommand_required = true)]
struct MultitoolCli {
    #[clap(flatten)]
    config_overrides: CliConfigOverrides,

    #[command(subcommand)]
    subcommand: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the workflow once and print the report.
    Run(RunArgs),
    /// List tissue and species presets, scenarios and the default markers.
    Presets,
    /// Describe marker genes from the built-in table.
    Marker(MarkerArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = MultitoolCli::parse();
    match cli.subcommand {
        Command::Run(args) => {
            let status = run_cmd::execute(args, cli.config_overrides.into()).await?;
            if status == RunStatus::Reset {
                std::process::exit(RESET_EXIT_CODE);
            }
        }
        Command::Presets => info_cmd::presets(),
        Command::Marker(args) => info_cmd::marker(args),
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
