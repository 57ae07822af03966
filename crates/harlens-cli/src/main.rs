use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use harlens_cli::OutputFormat;
use harlens_cli::commands;
use harlens_cli::commands::analyze::AnalyzeOptions;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "harlens")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "A CLI tool for analyzing web performance from HTTP Archive (HAR) files",
    long_about = "Harlens loads a browser network capture, computes response time and size \
                  statistics per resource type, grades overall performance, and flags common \
                  performance issues."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a HAR file and report on its performance
    Analyze {
        /// Path to the HAR file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output directory for exports and the report (default: output)
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long, value_name = "CONFIG")]
        config: Option<PathBuf>,

        /// Output format; json and csv also export the normalized rows
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Memory limit in MB (default: 1024)
        #[arg(long, value_name = "MB")]
        memory_limit: Option<u64>,

        /// Skip writing the JSON report, only perform analysis
        #[arg(long)]
        no_report: bool,
    },

    /// Validate the structure of a HAR file
    Validate {
        /// Path to the HAR file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Generate a default configuration file
    InitConfig {
        /// Where to write the configuration
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completion scripts
    #[command(long_about = "Generate shell completion scripts for harlens.

SUPPORTED SHELLS:
    bash, zsh, fish, powershell, elvish

INSTALLATION:
    Bash:
        harlens completion --shell bash > ~/.local/share/bash-completion/completions/harlens
        (or source it from ~/.bashrc)

    Zsh:
        harlens completion --shell zsh > ~/.zfunc/_harlens
        (add ~/.zfunc to fpath in ~/.zshrc)

    Fish:
        harlens completion --shell fish > ~/.config/fish/completions/harlens.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.debug);

    match cli.command {
        Commands::Analyze {
            file,
            output_dir,
            config,
            format,
            memory_limit,
            no_report,
        } => {
            let options = AnalyzeOptions {
                output_dir,
                config,
                format,
                memory_limit,
                no_report,
                debug: cli.debug,
            };
            commands::analyze::execute(&file, &options)
        }
        Commands::Validate { file } => commands::validate::execute(&file),
        Commands::InitConfig { output, force } => commands::init_config::execute(&output, force),
        Commands::Completion { shell } => commands::completion::execute(shell, &mut Cli::command()),
    }
}

fn init_logging(verbose: bool, debug: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            EnvFilter::new("harlens=debug,harlens_cli=debug,harlens_core=debug")
        } else if verbose {
            EnvFilter::new("harlens=info,harlens_cli=info,harlens_core=info")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
