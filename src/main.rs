//! `tsets`: inspect and change the torrent engine settings
//!
//! # Usage
//!
//! ```bash
//! tsets show
//! tsets set settings.json
//! tsets --read-only set - < settings.json
//! tsets reset
//! tsets locate /srv/torrents
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use torrent_settings::cli::{
    GlobalArgs,
    commands::{run_locate, run_reset, run_set, run_show},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "tsets")]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalOpts {
    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Settings store file, overrides the configuration
    #[arg(long, global = true, value_name = "FILE")]
    store: Option<PathBuf>,

    /// Refuse to change the stored settings
    #[arg(long, global = true)]
    read_only: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the active settings
    Show,
    /// Validate, apply and save settings from a JSON file ("-" for stdin)
    Set {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
    /// Print the built-in defaults without saving them
    Reset,
    /// Look for a cache marker directory below DIR
    Locate {
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },
}

impl From<GlobalOpts> for GlobalArgs {
    fn from(opts: GlobalOpts) -> Self {
        Self {
            config: opts.config,
            store: opts.store,
            read_only: opts.read_only,
            verbose: opts.verbose,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let global = GlobalArgs::from(cli.global);

    match cli.command {
        Commands::Show => run_show(&global).await,
        Commands::Set { input } => run_set(&global, &input).await,
        Commands::Reset => run_reset(&global).await,
        Commands::Locate { dir } => run_locate(&global, &dir).await,
    }
}
