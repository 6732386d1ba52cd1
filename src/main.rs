//! jot CLI - JSON documents as typed trees, on a directory or a git branch

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use jot::{decode, encode, Error, FsReader, FsWriter, GitReader, GitWriter, IoResultExt};

#[derive(Parser)]
#[command(name = "jot")]
#[command(about = "JSON documents as typed trees - directory or git backed")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// encode a JSON file into a store
    Store {
        /// JSON file to encode
        json_file: PathBuf,

        /// store as a directory tree at the given path
        #[arg(long, value_name = "DIR")]
        fs: Option<PathBuf>,

        /// store as a commit in the git repository at the given path
        #[arg(long, value_name = "REPO")]
        git: Option<PathBuf>,

        /// branch to commit to (git backend)
        #[arg(short, long)]
        branch: Option<String>,

        /// commit message (git backend)
        #[arg(short, long)]
        message: Option<String>,
    },

    /// decode a store back to JSON on stdout
    Show {
        /// read from a directory tree at the given path
        #[arg(long, value_name = "DIR")]
        fs: Option<PathBuf>,

        /// read from the git repository at the given path
        #[arg(long, value_name = "REPO")]
        git: Option<PathBuf>,

        /// branch to read from (git backend)
        #[arg(short, long)]
        branch: Option<String>,

        /// typeless subtree path to extract (empty for the whole document)
        #[arg(short, long, default_value = "")]
        path: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run(cli: Cli) -> jot::Result<()> {
    match cli.command {
        Commands::Store {
            json_file,
            fs,
            git,
            branch,
            message,
        } => {
            let content = std::fs::read_to_string(&json_file).with_path(&json_file)?;
            let document: serde_json::Value = serde_json::from_str(&content)?;

            match (fs, git) {
                (Some(root), None) => {
                    encode::convert(FsWriter::new(root)?, &document)?;
                }
                (None, Some(repo)) => {
                    let branch = branch.ok_or_else(|| {
                        Error::BackendSelection("--branch is required with --git".to_string())
                    })?;
                    let message = message.ok_or_else(|| {
                        Error::BackendSelection("--message is required with --git".to_string())
                    })?;
                    encode::convert(GitWriter::new(repo, branch, message), &document)?;
                }
                _ => {
                    return Err(Error::BackendSelection(
                        "exactly one of --fs or --git must be given".to_string(),
                    ))
                }
            }
        }

        Commands::Show {
            fs,
            git,
            branch,
            path,
        } => {
            let document = match (fs, git) {
                (Some(root), None) => decode::convert(&FsReader::new(root), &path)?,
                (None, Some(repo)) => {
                    let branch = branch.ok_or_else(|| {
                        Error::BackendSelection("--branch is required with --git".to_string())
                    })?;
                    decode::convert(&GitReader::new(repo, branch), &path)?
                }
                _ => {
                    return Err(Error::BackendSelection(
                        "exactly one of --fs or --git must be given".to_string(),
                    ))
                }
            };

            println!("{}", serde_json::to_string_pretty(&document)?);
        }
    }

    Ok(())
}
