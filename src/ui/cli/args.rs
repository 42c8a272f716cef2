// Wed Jan 15 2026 - Alex

use crate::gameval::Category;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gameval")]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Symbolic gameval lookups with hot reload and idle eviction", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// JSON config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Gameval document, overrides config and GAMEVAL_PATH
    #[arg(short, long, global = true)]
    pub gamevals: Option<PathBuf>,

    #[arg(short, long, global = true, default_value = "info")]
    pub log_level: String,

    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Look up the id of a gameval name
    Lookup(LookupArgs),
    /// Look up a name for an id
    Name(NameArgs),
    /// Search all categories by name and id fragments
    Search(SearchArgs),
    /// Decode a JSON array of names and ids into ids
    Decode(CodecArgs),
    /// Encode a JSON array of ids into names where possible
    Encode(CodecArgs),
    /// Replace raw ids with gameval names in JSON documents
    Rewrite(RewriteArgs),
    /// Keep the cache running, reloading on change and evicting when idle
    Watch(WatchArgs),
}

#[derive(Parser, Debug)]
pub struct LookupArgs {
    pub category: Category,
    pub name: String,
}

#[derive(Parser, Debug)]
pub struct NameArgs {
    pub category: Category,
    #[arg(allow_negative_numbers = true)]
    pub id: i32,
}

#[derive(Parser, Debug)]
pub struct SearchArgs {
    #[arg(short, long, default_value = "")]
    pub name: String,

    #[arg(short, long, default_value = "")]
    pub id: String,

    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct CodecArgs {
    pub category: Category,
    /// JSON array, e.g. '["chicken", 9999]'
    pub input: String,
}

#[derive(Parser, Debug)]
pub struct RewriteArgs {
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct WatchArgs {
    /// Stop after this many seconds instead of running until killed
    #[arg(long)]
    pub duration: Option<u64>,

    /// Override the keep-alive timeout in milliseconds
    #[arg(long)]
    pub keep_alive_ms: Option<u64>,
}

impl SearchArgs {
    pub fn validate(&self) -> Result<(), String> {
        if !self.id.chars().all(|c| c.is_ascii_digit() || c == '-') {
            return Err(format!("Id query must be numeric: {}", self.id));
        }
        Ok(())
    }
}

impl RewriteArgs {
    pub fn validate(&self) -> Result<(), String> {
        for file in &self.files {
            if !file.exists() {
                return Err(format!("File does not exist: {:?}", file));
            }
        }
        Ok(())
    }
}
