use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use monthplgen::{cli, config, warning};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build the ranked playlist for one month
    Generate(GenerateArgs),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    /// Target month (YYYY-MM), defaults to the current month [env: PLGEN_TARGET_MONTH]
    #[clap(long)]
    month: Option<String>,

    /// ListenBrainz username [env: PLGEN_LB_USERNAME]
    #[clap(long)]
    user: Option<String>,

    /// Timezone for the month boundaries, defaults to UTC [env: PLGEN_TIMEZONE]
    #[clap(long)]
    timezone: Option<String>,

    /// ListenBrainz API base URL [env: PLGEN_LB_API_URL]
    #[clap(long)]
    api_url: Option<String>,

    /// Pause before every request in milliseconds, defaults to 1000 [env: PLGEN_REQUEST_DELAY_MS]
    #[clap(long)]
    delay_ms: Option<u64>,

    /// Write the playlist to this file instead of stdout
    #[clap(long, short)]
    output: Option<PathBuf>,

    /// Keep only the top N tracks
    #[clap(long)]
    limit: Option<usize>,

    /// Print the ranking as a table on stderr
    #[clap(long)]
    summary: bool,

    /// Include listens from the whole last day of the month
    #[clap(long)]
    full_last_day: bool,

    /// Only count listens inside the month window
    #[clap(long)]
    strict_window: bool,

    /// Print request and page diagnostics [env: PLGEN_VERBOSE]
    #[clap(long, short)]
    verbose: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => {
            cli::generate(cli::GenerateOptions {
                month: args.month,
                user: args.user,
                timezone: args.timezone,
                api_url: args.api_url,
                delay_ms: args.delay_ms,
                output: args.output,
                limit: args.limit,
                summary: args.summary,
                full_last_day: args.full_last_day,
                strict_window: args.strict_window,
                verbose: args.verbose,
            })
            .await
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
