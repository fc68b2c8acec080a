#[cfg(not(test))]
use anyhow::Result;
use clap::{Parser, Subcommand};
#[cfg(not(test))]
use xtask::*;

#[derive(Parser)]
#[command(author, version, about = "Development tasks for specfft")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Build,
    /// Run the test suite with the detected features, then once per feature set
    Test,
    Clippy,
    Fmt,
    Analyze,
    Demo {
        /// Demo to run
        #[arg(default_value = "basic_usage")]
        name: String,
    },
}

#[cfg(not(test))]
fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = detect_config();

    match cli.command {
        Commands::Build => run_all([build_command(&cfg)]),
        Commands::Test => {
            run_all(std::iter::once(test_command(&cfg)).chain(matrix_commands()))
        }
        Commands::Clippy => run_all([clippy_command()]),
        Commands::Fmt => run_all([fmt_command()]),
        Commands::Analyze => run_all([fmt_command(), clippy_command()]),
        Commands::Demo { name } => run_all([demo_command(&cfg, &name)]),
    }
}
