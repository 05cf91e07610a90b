use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use jjws::exec::ExitCodeError;
use jjws::names::generate_workspace_name;
use jjws::workspace::{CleanOutcome, CopyReport, render_text};
use jjws::{WorkspaceError, WorkspaceManager, telemetry};

/// Manage jj workspaces side by side
///
/// Named workspaces live next to the repository in a sibling directory:
///
///   my-repo/                  default workspace
///   my-repo-workspaces/feat/  created by 'jjws create feat'
///
/// Per-repository setup lives in .jjws.json at the default workspace root
/// (create one with 'jjws init'): files to copy into new workspaces,
/// commands to run after creation, and the container directory suffix.
#[derive(Parser)]
#[command(name = "jjws")]
#[command(version, about)]
#[command(propagate_version = true)]
#[command(after_help = "See 'jjws <command> --help' for more information on a specific command.")]
struct Cli {
    /// Run as if started in this directory
    #[arg(short = 'C', global = true, value_name = "DIR")]
    directory: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new workspace
    ///
    /// Adds the workspace with jj, copies the configured files from the
    /// default workspace, then runs the configured post-create commands.
    Create {
        /// Workspace name ('/' becomes '-')
        #[arg(required_unless_present = "random")]
        name: Option<String>,

        /// Revision the new workspace starts from
        #[arg(short, long)]
        revision: Option<String>,

        /// Pick a random adjective-noun name
        #[arg(long, conflicts_with = "name")]
        random: bool,
    },

    /// List workspaces
    List {
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Print the path of a workspace
    ///
    /// Use with cd: cd "$(jjws go feature)"
    Go { name: String },

    /// Forget a workspace and delete its directory
    #[command(alias = "rm")]
    Remove { name: String },

    /// Rename a workspace and move its directory
    Rename { old: String, new: String },

    /// Copy the configured files into an existing workspace again
    Copy { name: String },

    /// Forget workspaces whose directories no longer exist
    Clean,

    /// Write a default .jjws.json in the default workspace
    Init,

    /// Make the default workspace edit the current workspace's change
    This,

    /// Make the default workspace edit another workspace's change
    ///
    /// Must be run from the default workspace.
    Use { name: String },

    /// Run a command inside a workspace
    ///
    /// The command's exit code becomes jjws's exit code.
    Exec {
        name: String,
        #[arg(last = true, required = true)]
        cmd: Vec<String>,
    },

    /// Print shell completions
    Completions { shell: Shell },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> ExitCode {
    telemetry::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(ExitCodeError(code)) = err.downcast_ref::<ExitCodeError>() {
                return ExitCode::from(u8::try_from(*code).unwrap_or(1));
            }
            if let Some(ws_err) = err.downcast_ref::<WorkspaceError>() {
                eprintln!("Error: {ws_err}");
            } else {
                eprintln!("Unexpected error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "jjws", &mut io::stdout());
        return Ok(());
    }

    let cwd = match cli.directory {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };
    let manager = WorkspaceManager::system(cwd);

    match cli.command {
        Commands::Create {
            name,
            revision,
            random,
        } => {
            let name = match name {
                Some(name) if !random => name,
                _ => generate_workspace_name(),
            };
            let created = manager.create(&name, revision.as_deref())?;
            print_copies(&created.copied);
            for failed in &created.failed_commands {
                match failed.exit_code {
                    Some(code) => println!("  warning: '{}' exited with {code}", failed.command),
                    None => println!("  warning: '{}' could not be started", failed.command),
                }
            }
            println!("Created workspace '{}'", created.name);
            println!("  {}", created.path.display());
        }
        Commands::List { format } => {
            let rows = manager.list()?;
            match format {
                Format::Text => print!("{}", render_text(&rows)),
                Format::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&rows).context("Failed to encode listing")?
                ),
            }
        }
        Commands::Go { name } => println!("{}", manager.go(&name)?.display()),
        Commands::Remove { name } => {
            let removed = manager.remove(&name)?;
            println!("Removed workspace '{}'", removed.name);
        }
        Commands::Rename { old, new } => {
            let path = manager.rename(&old, &new)?;
            println!("Renamed workspace '{old}' to '{new}'");
            println!("  {}", path.display());
        }
        Commands::Copy { name } => print_copies(&manager.copy_to(&name)?),
        Commands::Clean => match manager.clean()? {
            CleanOutcome::NothingToDo => println!("Nothing to clean."),
            CleanOutcome::Forgot { forgotten, failed } => {
                for name in &forgotten {
                    println!("Forgot '{name}'");
                }
                for name in &failed {
                    println!("  warning: could not forget '{name}'");
                }
            }
        },
        Commands::Init => println!("Wrote {}", manager.init()?.display()),
        Commands::This => {
            let switched = manager.this()?;
            println!(
                "Default workspace now editing {} (from '{}')",
                switched.revision, switched.workspace
            );
        }
        Commands::Use { name } => {
            let switched = manager.use_workspace(&name)?;
            println!(
                "Default workspace now editing {} (from '{}')",
                switched.revision, switched.workspace
            );
        }
        Commands::Exec { name, cmd } => manager.exec(&name, &cmd)?,
        Commands::Completions { .. } => {}
    }
    Ok(())
}

fn print_copies(reports: &[CopyReport]) {
    for report in reports {
        if report.skipped() {
            println!("  skipped {}", report.entry);
        } else {
            println!("  copied {}", report.entry);
        }
    }
}
