//! # dsdb - Data Structures Database Shell
//!
//! Interactive shell over a persisted collection of arrays, lists, stacks,
//! queues and binary trees. With `-c` the given commands run in order and
//! the shell exits without reading stdin.

use clap::Parser;
use dsdb::config::{Config, ShellConfig};
use dsdb::Session;
use std::io::{self, Cursor};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "dsdb")]
#[command(about = "Interactive shell over a persisted collection of classic data structures")]
#[command(version)]
struct Cli {
    /// Database file (default: database.txt, or DSDB_DATABASE_PATH)
    #[arg(long, value_name = "PATH")]
    db: Option<PathBuf>,

    /// JSON shell configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Do not load the database file at startup
    #[arg(long)]
    no_load: bool,

    /// Do not save the database file after changes or at exit
    #[arg(long)]
    no_save: bool,

    /// Use verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Run this command and exit; may be repeated
    #[arg(short, long = "command", value_name = "LINE")]
    command: Vec<String>,
}

impl Cli {
    fn shell_config(&self) -> dsdb::Result<ShellConfig> {
        let mut config = match &self.config {
            Some(path) => ShellConfig::load_from_file(path)?,
            None => ShellConfig::from_env()?,
        };
        if let Some(db) = &self.db {
            config.database_path = db.clone();
        }
        if self.no_load {
            config.auto_load = false;
        }
        if self.no_save {
            config.auto_save = false;
        }
        config.validate()?;
        Ok(config)
    }
}

fn run(cli: Cli) -> dsdb::Result<()> {
    let mut config = cli.shell_config()?;
    let batch = !cli.command.is_empty();
    if batch {
        config.show_banner = false;
    }
    log::debug!("shell config: {:?}", config);

    let (mut session, load_message) = Session::open(config);
    if let Some(message) = load_message {
        if session.config().show_banner || message.starts_with("ERROR") {
            println!("{}", message);
        }
    }

    let stdout = io::stdout();
    if batch {
        let script = cli.command.join("\n");
        session.run(Cursor::new(script), stdout.lock(), false)
    } else {
        session.run(io::stdin().lock(), stdout.lock(), true)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging
    let mut logger = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();
    dsdb::init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("dsdb: {} ({})", err, err.category());
            ExitCode::FAILURE
        }
    }
}
