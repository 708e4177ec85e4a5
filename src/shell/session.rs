//! A shell session: one store plus its persistence policy
//!
//! The session loads the database file once when it starts, saves it after
//! every successful mutating command and once more at shutdown. Commands run
//! one at a time; the reply is produced after the save it triggered, so the
//! file never lags the store by more than the command in flight.

use super::{execute, render, Command};
use crate::codec;
use crate::config::ShellConfig;
use crate::error::{DsdbError, Result};
use crate::store::Store;
use std::io::{self, BufRead, Write};

/// Interactive or batch shell over a [`Store`]
///
/// # Examples
///
/// ```rust
/// use dsdb::config::ShellConfig;
/// use dsdb::Session;
///
/// let config = ShellConfig::default().with_auto_load(false).with_auto_save(false);
/// let mut session = Session::new(config);
/// session.execute("SCREATE s");
/// session.execute("SPUSH s 1");
/// assert_eq!(session.execute("SPOP s").as_deref(), Some("POPPED: 1"));
/// assert_eq!(session.execute("SPOP s").as_deref(), Some("ERROR: Stack is empty"));
/// ```
#[derive(Debug)]
pub struct Session {
    config: ShellConfig,
    store: Store,
    finished: bool,
}

impl Session {
    /// Create a session over an empty store; nothing is read from disk
    pub fn new(config: ShellConfig) -> Self {
        let store = Store::with_config(config.containers.clone());
        Self {
            config,
            store,
            finished: false,
        }
    }

    /// Create a session and run the startup load if `auto_load` is set
    ///
    /// Returns the session together with a line describing the load.
    pub fn open(config: ShellConfig) -> (Self, Option<String>) {
        let mut session = Self::new(config);
        let message = session.config.auto_load.then(|| session.autoload());
        (session, message)
    }

    /// Load the database file, replacing the store
    ///
    /// A missing file leaves an empty store and is not an error. Any other
    /// failure is reported and also leaves an empty store.
    pub fn autoload(&mut self) -> String {
        let path = &self.config.database_path;
        match codec::load_with_config(path, self.config.containers.clone()) {
            Ok((store, report)) => {
                self.store = store;
                let mut message = format!("Database loaded from {}", path.display());
                if report.skipped > 0 {
                    message.push_str(&format!(" ({} malformed lines skipped)", report.skipped));
                }
                message
            }
            Err(DsdbError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
                log::info!("no database at {}, starting empty", path.display());
                self.store = Store::with_config(self.config.containers.clone());
                format!("No database at {}, starting empty", path.display())
            }
            Err(err) => {
                log::warn!("failed to load {}: {}", path.display(), err);
                self.store = Store::with_config(self.config.containers.clone());
                format!("ERROR: Failed to load database: {}", err)
            }
        }
    }

    /// Write the store to the configured database file
    pub fn save(&self) -> Result<()> {
        codec::save(&self.store, &self.config.database_path)
    }

    /// Run one command line and return its reply
    ///
    /// Blank lines return `None`. A failed autosave is appended to the reply;
    /// the in-memory change is kept.
    pub fn execute(&mut self, line: &str) -> Option<String> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => return Some(render(Err(err))),
        };
        if command == Command::Exit {
            self.finished = true;
        }

        let result = execute(&mut self.store, &command, &self.config.database_path);
        let succeeded = result.is_ok();
        let mut reply = render(result);

        if succeeded && command.is_mutating() && self.config.auto_save {
            if let Err(err) = self.save() {
                log::warn!("autosave to {} failed: {}", self.config.database_path.display(), err);
                reply.push_str(&format!("\nERROR: Autosave failed: {}", err));
            }
        }
        Some(reply)
    }

    /// Final save if `auto_save` is set
    pub fn shutdown(&mut self) -> Result<()> {
        self.finished = true;
        if self.config.auto_save {
            self.save()?;
        }
        Ok(())
    }

    /// Read commands from `input` until EOF or `EXIT`, writing replies to
    /// `output`, then shut down
    ///
    /// The prompt is written only when `interactive` is set.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W, interactive: bool) -> Result<()> {
        if interactive && self.config.show_banner {
            writeln!(output, "=== Data Structures Database ===")?;
            writeln!(output, "Type 'HELP' for available commands, 'EXIT' to quit")?;
            writeln!(output)?;
        }

        let mut lines = input.lines();
        while !self.finished {
            if interactive {
                write!(output, "{}", self.config.prompt)?;
                output.flush()?;
            }
            let Some(line) = lines.next() else {
                break;
            };
            if let Some(reply) = self.execute(&line?) {
                writeln!(output, "{}", reply)?;
            }
        }

        let saved = self.config.auto_save;
        match self.shutdown() {
            Ok(()) if saved && self.config.show_banner => {
                writeln!(output, "Database saved to {}", self.config.database_path.display())?;
            }
            Ok(()) => {}
            Err(err) => {
                log::warn!("final save failed: {}", err);
                writeln!(output, "ERROR: Failed to save database: {}", err)?;
            }
        }
        output.flush()?;
        Ok(())
    }

    /// The store
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Mutable access to the store, for embedders that seed or repair it
    /// outside the command language
    ///
    /// Changes made here are not autosaved; they reach the database file
    /// with the next mutating command or at shutdown.
    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    /// Configuration the session runs with
    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Whether `EXIT` has been seen or the session was shut down
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> ShellConfig {
        ShellConfig::default()
            .with_database_path(dir.path().join("database.txt"))
            .with_banner(false)
    }

    #[test]
    fn test_missing_database_starts_empty() {
        let dir = TempDir::new().unwrap();
        let (session, message) = Session::open(config_in(&dir));
        assert!(session.store().is_empty());
        assert!(message.unwrap().starts_with("No database at"));
    }

    #[test]
    fn test_autosave_after_mutation_only() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let path = config.database_path.clone();
        let (mut session, _) = Session::open(config);

        session.execute("MCREATE a");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "ARRAY a 0\n");

        session.execute("MPUSH a x");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "ARRAY a 1 x\n");

        std::fs::remove_file(&path).unwrap();
        session.execute("MGET a 0");
        session.execute("MGET a 7");
        assert!(!path.exists());
    }

    #[test]
    fn test_state_survives_sessions() {
        let dir = TempDir::new().unwrap();
        {
            let (mut session, _) = Session::open(config_in(&dir));
            session.execute("TCREATE t");
            session.execute("TINSERT t 1 one");
            session.execute("TINSERT t 2 two");
            session.shutdown().unwrap();
        }
        let (mut session, message) = Session::open(config_in(&dir));
        assert!(message.unwrap().starts_with("Database loaded from"));
        assert_eq!(session.execute("TSEARCH t 2").as_deref(), Some("FOUND: two"));
    }

    #[test]
    fn test_no_load_no_save() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        std::fs::write(&config.database_path, "QUEUE q 1 old\n").unwrap();

        let config = config.with_auto_load(false).with_auto_save(false);
        let path = config.database_path.clone();
        let (mut session, message) = Session::open(config);
        assert!(message.is_none());
        assert!(session.store().is_empty());
        session.execute("QCREATE q");
        session.shutdown().unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "QUEUE q 1 old\n");
    }

    #[test]
    fn test_store_mut_changes_saved_at_shutdown() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir).with_auto_load(false);
        let path = config.database_path.clone();
        let mut session = Session::new(config);

        session.store_mut().create_queue("q").unwrap().push("seeded");
        assert!(!path.exists());
        session.shutdown().unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "QUEUE q 1 seeded\n");
    }

    #[test]
    fn test_autosave_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be written as a file
        let config = ShellConfig::default()
            .with_database_path(dir.path())
            .with_auto_load(false)
            .with_banner(false);
        let mut session = Session::new(config);
        let reply = session.execute("SCREATE s").unwrap();
        assert!(reply.starts_with("SUCCESS: Stack created: s\nERROR: Autosave failed"), "{}", reply);
        assert_eq!(session.store().len(), 1);
    }

    #[test]
    fn test_run_batch() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let path = config.database_path.clone();
        let mut session = Session::new(config);

        let input = Cursor::new("MCREATE a\n\nMPUSH a x\nMGET a 0\nEXIT\nMPUSH a never\n");
        let mut output = Vec::new();
        session.run(input, &mut output, false).unwrap();

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "SUCCESS: Array created: a",
                "SUCCESS: Value pushed to array",
                "VALUE: x",
                "Goodbye!",
            ]
        );
        assert!(session.is_finished());
        assert_eq!(std::fs::read_to_string(path).unwrap(), "ARRAY a 1 x\n");
    }

    #[test]
    fn test_run_interactive_prompt() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir).with_auto_save(false);
        config.prompt = "$ ".to_string();
        let mut session = Session::new(config);

        let mut output = Vec::new();
        session.run(Cursor::new("HELP\n"), &mut output, true).unwrap();
        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with("$ COMMANDS:"));
        assert!(text.ends_with("$ "));
    }

    #[test]
    fn test_load_command_replaces_store() {
        let dir = TempDir::new().unwrap();
        let other = dir.path().join("other.txt");
        std::fs::write(&other, "STACK s 2 bottom top\n").unwrap();

        let mut session = Session::new(config_in(&dir).with_auto_load(false));
        session.execute("MCREATE a");
        let reply = session.execute(&format!("LOAD {}", other.display())).unwrap();
        assert!(reply.starts_with("SUCCESS: Database loaded from"));
        assert!(session.store().array("a").is_err());
        assert_eq!(session.execute("SPEEK s").as_deref(), Some("PEEK: top"));
        // LOAD counts as a mutation, so the default file now mirrors it
        let saved = std::fs::read_to_string(&session.config().database_path).unwrap();
        assert_eq!(saved, "STACK s 2 bottom top\n");
    }
}
