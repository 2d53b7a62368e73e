use std::io::Write;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use mdag_dag::Dag;
use mdag_store::FsKvStore;
use mdag_types::{DagConfig, Object, ObjectId};
use tracing::debug;

use crate::cli::*;

/// Dispatch a parsed command. Returns the process exit code.
pub fn run_command(cli: Cli) -> anyhow::Result<i32> {
    let config = load_config(cli.config.as_deref())?;
    debug!(store = %cli.store.display(), ?config, "configuration loaded");
    match cli.command {
        Command::Add(args) => cmd_add(&cli.store, config, args),
        Command::Cat(args) => cmd_cat(&cli.store, config, args),
        Command::Show(args) => cmd_show(&cli.store, config, args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<DagConfig> {
    match path {
        Some(path) => DagConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(DagConfig::default()),
    }
}

fn open_reader(store: &Path, config: DagConfig) -> anyhow::Result<Dag<FsKvStore>> {
    let store = FsKvStore::open_read_only(store)
        .with_context(|| format!("opening object store {}", store.display()))?;
    Ok(Dag::new(store, config)?)
}

fn parse_id(hex: &str) -> anyhow::Result<ObjectId> {
    ObjectId::from_hex(hex).with_context(|| format!("invalid object hash {hex:?}"))
}

fn cmd_add(store: &Path, config: DagConfig, args: AddArgs) -> anyhow::Result<i32> {
    let fs_store = FsKvStore::open(store)
        .with_context(|| format!("opening object store {}", store.display()))?;
    let mut dag = Dag::new(fs_store, config)?;
    let root = dag
        .add_path(&args.path)
        .with_context(|| format!("adding {}", args.path.display()))?;
    println!("{} {}", "✓".green().bold(), args.path.display());
    println!("  Root: {}", root.to_string().yellow());
    Ok(0)
}

fn cmd_cat(store: &Path, config: DagConfig, args: CatArgs) -> anyhow::Result<i32> {
    let root = parse_id(&args.root)?;
    let mut dag = open_reader(store, config)?;
    match dag.hash_to_file(&root, &args.path)? {
        Some(bytes) => {
            let mut out = std::io::stdout().lock();
            out.write_all(&bytes)?;
            out.flush()?;
            Ok(0)
        }
        None => {
            eprintln!(
                "{} {} not found under {}",
                "✗".red().bold(),
                args.path.bold(),
                root.short_hex().yellow()
            );
            Ok(1)
        }
    }
}

fn cmd_show(store: &Path, config: DagConfig, args: ShowArgs) -> anyhow::Result<i32> {
    let id = parse_id(&args.hash)?;
    let mut dag = open_reader(store, config)?;
    let object = dag.read_object(&id)?;
    print!("{}", describe(&id, &object)?);
    Ok(0)
}

fn describe(id: &ObjectId, object: &Object) -> anyhow::Result<String> {
    let mut text = format!("Object {}\n", id.to_string().yellow().bold());
    if object.is_blob() {
        text.push_str(&format!("  blob, {} bytes\n", object.data.len()));
        return Ok(text);
    }
    for (tag, link) in object.entries()? {
        let name = if link.name.is_empty() {
            "-".dimmed().to_string()
        } else {
            link.name.clone()
        };
        text.push_str(&format!(
            "  {} {:>12} {} {}\n",
            tag.to_string().cyan(),
            link.size,
            link.hash.short_hex().dimmed(),
            name
        ));
    }
    Ok(text)
}
