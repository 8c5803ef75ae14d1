use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use tcslim::commands;
use tcslim::commands::policy::OutputFormat;
use tcslim::core::config::Config;
use tcslim::core::toolchain::Toolchain;

#[derive(Parser)]
#[clap(name = "tcslim")]
#[clap(about = "Fetch, prune and repackage embedded toolchains")]
#[clap(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Directory holding downloads/, tools/ and zips/ (default: current directory)
    #[clap(long, global = true)]
    base_dir: Option<PathBuf>,
    /// Show debug logging
    #[clap(short, long, global = true)]
    verbose: bool,
    #[clap(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Download, install, prune and package toolchains (default: all, in order)
    Build {
        /// Toolchains to build
        #[clap(value_enum)]
        toolchains: Vec<Toolchain>,
    },
    /// Apply a toolchain's prune policy to an existing directory
    Prune {
        /// Policy to apply
        #[clap(short, long, value_enum)]
        toolchain: Toolchain,
        /// Toolchain root directory
        dir: PathBuf,
    },
    /// Zip a directory with root-relative entry names
    Package {
        /// Directory to package
        source: PathBuf,
        /// Archive to write
        output: PathBuf,
    },
    /// Show the resolved version, source and prune policy
    Policy {
        /// Toolchain to show (default: all)
        #[clap(value_enum)]
        toolchain: Option<Toolchain>,
        /// Output format
        #[clap(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "warn,tcslim=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let base_dir = match cli.base_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let result = Config::load(&base_dir).and_then(|config| {
        match cli.command.unwrap_or(Commands::Build {
            toolchains: Vec::new(),
        }) {
            Commands::Build { toolchains } => {
                commands::build::build_toolchains(&config, &toolchains)
            }
            Commands::Prune { toolchain, dir } => {
                commands::prune::prune_directory(&config, toolchain, &dir)
            }
            Commands::Package { source, output } => {
                commands::package::package_directory(&source, &output)
            }
            Commands::Policy { toolchain, format } => {
                commands::policy::show_policies(&config, toolchain, format)
            }
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    Ok(())
}
