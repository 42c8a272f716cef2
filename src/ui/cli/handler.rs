// Wed Jan 15 2026 - Alex

use super::args::{Args, CodecArgs, Command, LookupArgs, NameArgs, RewriteArgs, SearchArgs, WatchArgs};
use crate::config::Config;
use crate::gameval::{self, Category, GamevalManager};
use crate::rewrite;
use crate::utils::{format_duration, LoggingUtils};
use anyhow::Context;
use colored::Colorize;
use std::collections::BTreeSet;
use std::thread;
use std::time::{Duration, Instant};

pub struct CommandHandler;

impl CommandHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&self, args: Args) -> anyhow::Result<()> {
        self.setup_logging(&args);

        if args.no_color {
            colored::control::set_override(false);
        }

        let config = self.build_config(&args)?;
        let manager = gameval::create_gameval_manager(config);

        match args.command {
            Command::Lookup(lookup_args) => self.handle_lookup(&manager, lookup_args),
            Command::Name(name_args) => self.handle_name(&manager, name_args),
            Command::Search(search_args) => self.handle_search(&manager, search_args),
            Command::Decode(codec_args) => self.handle_decode(&manager, codec_args),
            Command::Encode(codec_args) => self.handle_encode(&manager, codec_args),
            Command::Rewrite(rewrite_args) => self.handle_rewrite(&manager, rewrite_args),
            Command::Watch(watch_args) => self.handle_watch(manager, watch_args),
        }
    }

    fn setup_logging(&self, args: &Args) {
        let level = LoggingUtils::level_from_str(&args.log_level);

        let _ = env_logger::Builder::new()
            .filter_level(level)
            .format_timestamp(None)
            .try_init();
    }

    fn build_config(&self, args: &Args) -> anyhow::Result<Config> {
        let config = match &args.config {
            Some(path) => Config::load(path).with_context(|| format!("loading config {:?}", path))?,
            None => Config::default(),
        };

        let mut config = config.apply_env();
        if let Some(path) = &args.gamevals {
            config.gameval_path = path.clone();
        }
        config.validate()?;
        Ok(config)
    }

    fn ensure_data(&self, manager: &GamevalManager) -> anyhow::Result<()> {
        if !manager.is_loaded() {
            anyhow::bail!("No gamevals could be loaded from {:?}", manager.config().gameval_path);
        }
        Ok(())
    }

    fn handle_lookup(&self, manager: &GamevalManager, args: LookupArgs) -> anyhow::Result<()> {
        let _gamevals = manager.acquire();
        self.ensure_data(manager)?;

        let id = manager.id(args.category, &args.name)?;
        println!("{} {} = {}", args.category.to_string().cyan(), args.name.bold(), id);
        Ok(())
    }

    fn handle_name(&self, manager: &GamevalManager, args: NameArgs) -> anyhow::Result<()> {
        let _gamevals = manager.acquire_reverse();
        self.ensure_data(manager)?;

        match manager.name(args.category, args.id) {
            Some(name) => println!("{} {} = {}", args.category.to_string().cyan(), args.id, name.bold()),
            None => println!("{} no {} gameval for id {}", "[!]".yellow(), args.category, args.id),
        }
        Ok(())
    }

    fn handle_search(&self, manager: &GamevalManager, args: SearchArgs) -> anyhow::Result<()> {
        args.validate().map_err(|e| anyhow::anyhow!(e))?;

        let _gamevals = manager.acquire();
        self.ensure_data(manager)?;

        let results = gameval::search(&manager.snapshot(), &args.name, &args.id);

        if args.json {
            println!("{}", serde_json::to_string_pretty(&results)?);
            return Ok(());
        }

        if results.is_empty() {
            println!("{} No matches", "[!]".yellow());
        }
        for category in &results {
            println!("{} ({})", category.category.to_string().cyan().bold(), category.hits.len());
            for hit in &category.hits {
                println!("  {} ({})", hit.name, hit.id);
            }
        }
        Ok(())
    }

    fn handle_decode(&self, manager: &GamevalManager, args: CodecArgs) -> anyhow::Result<()> {
        let _gamevals = manager.acquire();
        self.ensure_data(manager)?;

        let decoded = manager.codec(args.category).read_str(&args.input)?;
        println!("{}", serde_json::to_string(&decoded.ids)?);
        self.print_diagnostic_count(decoded.diagnostics.len());
        Ok(())
    }

    fn handle_encode(&self, manager: &GamevalManager, args: CodecArgs) -> anyhow::Result<()> {
        let ids: BTreeSet<i32> =
            serde_json::from_str(&args.input).context("input must be a JSON array of integer ids")?;

        let _gamevals = manager.acquire_reverse();
        self.ensure_data(manager)?;

        let encoded = manager.codec(args.category).write(&ids);
        println!("{}", encoded.value);
        self.print_diagnostic_count(encoded.diagnostics.len());
        Ok(())
    }

    fn handle_rewrite(&self, manager: &GamevalManager, args: RewriteArgs) -> anyhow::Result<()> {
        args.validate().map_err(|e| anyhow::anyhow!(e))?;

        let _gamevals = manager.acquire_reverse();
        self.ensure_data(manager)?;

        let tables = manager.snapshot();
        let results = rewrite::rewrite_files(args.files.iter().map(|p| p.as_path()), &tables)?;

        for (path, result) in args.files.iter().zip(&results) {
            let status = if result.changed() { "[+]".green() } else { "[=]".dimmed() };
            println!(
                "{} {:?}: {} replaced, {} unresolved",
                status,
                path,
                result.replaced,
                result.unresolved.len()
            );
        }
        Ok(())
    }

    fn handle_watch(&self, manager: GamevalManager, args: WatchArgs) -> anyhow::Result<()> {
        let manager = match args.keep_alive_ms {
            Some(ms) => GamevalManager::new(
                manager.config().clone().with_keep_alive_timeout(Duration::from_millis(ms)),
            ),
            None => manager,
        };

        manager.start_up()?;
        println!(
            "{} Watching {:?} (keep-alive {})",
            "[*]".blue(),
            manager.config().gameval_path,
            format_duration(manager.config().keep_alive_timeout())
        );

        let start = Instant::now();
        let deadline = args.duration.map(Duration::from_secs);
        let mut loaded = manager.is_loaded();
        self.print_status(&manager, loaded);

        while deadline.map_or(true, |d| start.elapsed() < d) {
            thread::sleep(Duration::from_millis(250));
            let now_loaded = manager.is_loaded();
            if now_loaded != loaded {
                loaded = now_loaded;
                self.print_status(&manager, loaded);
            }
        }

        manager.shut_down();
        println!("{} Stopped after {}", "[+]".green(), format_duration(start.elapsed()));
        Ok(())
    }

    fn print_status(&self, manager: &GamevalManager, loaded: bool) {
        if loaded {
            let tables = manager.store().snapshot();
            let counts: Vec<String> = Category::ALL
                .iter()
                .map(|c| format!("{} {}", tables.get(*c).len(), c))
                .collect();
            println!("{} Loaded: {}", "[+]".green(), counts.join(", "));
        } else {
            println!("{} Evicted after {} idle", "[-]".yellow(), format_duration(manager.idle_for()));
        }
    }

    fn print_diagnostic_count(&self, count: usize) {
        if count > 0 {
            eprintln!("{} {} diagnostics, see log output", "[!]".yellow(), count);
        }
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}
