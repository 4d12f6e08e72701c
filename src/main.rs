// SPDX-License-Identifier: MIT

use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use rowstore_rs::config::{OutputFormat, StoreConfig};
use rowstore_rs::shell::Shell;
use rowstore_rs::store::Collection;
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open a collection and read commands from stdin
    Shell {
        /// Collection to open (created if missing)
        collection: String,

        /// YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory holding collections (overrides config and COLLECTIONS_DIR)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Print selected rows as JSON objects
        #[arg(long)]
        json: bool,
    },
    /// Evaluate one condition against one row
    Eval {
        /// The condition, e.g. "((id='1')&(name='bob'))"
        condition: String,

        /// Row cells as column=value, repeatable
        #[arg(short = 'r', long = "row", value_parser = parse_cell)]
        cells: Vec<(String, String)>,
    },
}

fn parse_cell(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(column, value)| (column.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected column=value, got '{}'", s))
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Commands::Shell {
            collection,
            config,
            dir,
            json,
        } => {
            let mut store_config = match &config {
                Some(path) => StoreConfig::load(path)
                    .with_context(|| format!("failed to load config {}", path.display()))?,
                None => StoreConfig::default(),
            }
            .with_env();
            if let Some(dir) = dir {
                store_config.collections_dir = dir;
            }
            if json {
                store_config.output = OutputFormat::Json;
            }
            log::info!("using collections directory {}", store_config.collections_dir.display());

            let (collection, created) = Collection::open_or_create(
                &store_config.collections_dir,
                &collection,
                store_config.delimiter_byte()?,
            )
            .with_context(|| format!("failed to open collection '{}'", collection))?;
            if created {
                println!("CREATED NEW COLLECTION: {}", collection.name());
            } else {
                println!("LOADED COLLECTION: {}", collection.name());
            }

            let mut shell = Shell::new(collection, store_config.output);
            let stdin = std::io::stdin();
            shell.run(stdin.lock(), std::io::stdout())?;
        }
        Commands::Eval { condition, cells } => {
            let row: HashMap<String, String> = cells.into_iter().collect();
            let verdict = rowstore_rs::resolve_condition(&condition, &row)
                .with_context(|| format!("rejected condition {:?}", condition))?;
            println!("{}", verdict);
        }
    }

    Ok(())
}
