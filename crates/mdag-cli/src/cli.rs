use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "mdag",
    about = "Content-addressed Merkle DAG for files and directories",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Object directory
    #[arg(long, global = true, default_value = ".mdag/objects")]
    pub store: PathBuf,

    /// TOML file with chunk size, fan-out and hash algorithm
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Ingest a file or directory and print its root hash
    Add(AddArgs),
    /// Write the file at PATH under ROOT to stdout
    Cat(CatArgs),
    /// Decode and describe a single object
    Show(ShowArgs),
}

#[derive(Args)]
pub struct AddArgs {
    pub path: PathBuf,
}

#[derive(Args)]
pub struct CatArgs {
    pub root: String,
    pub path: String,
}

#[derive(Args)]
pub struct ShowArgs {
    pub hash: String,
}
