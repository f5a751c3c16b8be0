use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use resxcodec::Notifier;
use resxcodec_cli::{
    Config, ConsoleNotifier, check::run_check_command, edit, message, sync, view::run_view_command,
    watch::run_watch_command,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (defaults to ./resxcodec.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// View the entries of a resx file.
    View {
        /// The input file to view
        #[arg(short, long)]
        input: PathBuf,

        /// Display full value without truncation
        #[arg(long)]
        full: bool,
    },

    /// Print the entries as an `update` message.
    Dump {
        #[arg(short, long)]
        input: PathBuf,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Replace all entries with those of an `update` message.
    Apply {
        #[arg(short, long)]
        input: PathBuf,

        /// Message file; read from stdin when omitted
        #[arg(short, long)]
        message: Option<PathBuf>,
    },

    /// Add or update an entry.
    Set {
        #[arg(short, long)]
        input: PathBuf,

        /// Entry name
        #[arg(short, long)]
        key: String,

        /// Entry value
        #[arg(short, long)]
        value: String,

        /// Comment for translators; an empty string removes it
        #[arg(short, long)]
        comment: Option<String>,
    },

    /// Remove an entry.
    Remove {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        key: String,
    },

    /// Check that files can be rewritten without changing a byte.
    Check {
        #[arg(short, long, num_args = 1.., required = true)]
        input: Vec<PathBuf>,
    },

    /// Create an empty resx file.
    New {
        #[arg(short, long)]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Add the entries of the main resource missing from a locale file.
    Sync {
        /// Locale file, e.g. Strings.de.resx (defaults to the active document)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Add the entries of a main resource to all of its locale files.
    UpdateAll {
        /// Main resource, e.g. Strings.resx (defaults to the active document)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print the per-file report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Serve a document to a table UI over stdin/stdout.
    Watch {
        /// Document to serve (defaults to the active document)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

async fn run_with_target<F, Fut>(
    explicit: Option<&Path>,
    config: &Config,
    notifier: &dyn Notifier,
    command: F,
) -> Result<(), String>
where
    F: FnOnce(PathBuf) -> Fut,
    Fut: Future<Output = Result<(), String>>,
{
    match config.focus().resolve(explicit) {
        Ok(target) => command(target).await,
        Err(e) => {
            notifier.report(&e);
            Ok(())
        }
    }
}

async fn run(args: Args) -> Result<(), String> {
    let config = Config::load(args.config.as_deref()).await?;
    let notifier = ConsoleNotifier;

    match args.commands {
        Commands::View { input, full } => {
            run_view_command(&input, full, config.view.max_width).await
        }
        Commands::Dump { input, pretty } => message::run_dump_command(&input, pretty).await,
        Commands::Apply {
            input,
            message: message_file,
        } => message::run_apply_command(&input, message_file.as_deref()).await,
        Commands::Set {
            input,
            key,
            value,
            comment,
        } => edit::run_set_command(&input, key, value, comment).await,
        Commands::Remove { input, key } => edit::run_remove_command(&input, key).await,
        Commands::Check { input } => run_check_command(&input).await,
        Commands::New { output, force } => edit::run_new_command(&output, force).await,
        Commands::Sync { input } => {
            run_with_target(input.as_deref(), &config, &notifier, |target| async move {
                sync::run_sync_command(&target, &notifier).await
            })
            .await
        }
        Commands::UpdateAll { input, json } => {
            run_with_target(input.as_deref(), &config, &notifier, |target| async move {
                sync::run_update_all_command(&target, json, &notifier).await
            })
            .await
        }
        Commands::Watch { input } => {
            let mut focus = config.focus();
            match focus.resolve(input.as_deref()) {
                Ok(target) => run_watch_command(&target, &mut focus, &notifier).await,
                Err(e) => {
                    notifier.report(&e);
                    Ok(())
                }
            }
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}
