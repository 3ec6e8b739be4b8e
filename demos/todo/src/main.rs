//! Command-line front end for the todo collection.
//!
//! Each invocation opens the collection stored under `--data-dir`, applies one
//! command through the controllers, and prints the list. `shell` keeps the
//! application open and reads commands from stdin.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::rc::Rc;
use todomvc::{Filter, TodoApp, TodoConfig, TodoEnvironment, TodoId, Wiring};
use todomvc_core::FileStorage;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "todomvc", version, about = "Keep a todo list from the terminal")]
struct Cli {
    /// Directory holding the persisted collection
    #[arg(long, default_value = ".todomvc")]
    data_dir: PathBuf,

    /// Storage key the collection is saved under
    #[arg(long, default_value = todomvc::config::DEFAULT_STORAGE_KEY)]
    key: String,

    /// How controllers reach the store (direct or channel)
    #[arg(long, default_value_t = Wiring::Direct)]
    wiring: Wiring,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Add an item
    Add {
        /// Title; surrounding whitespace is trimmed
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },
    /// Print the list
    List {
        /// all, active, or completed
        #[arg(long, default_value = "all")]
        filter: String,
    },
    /// Flip an item's completed flag
    Toggle {
        /// Position in the list, starting at 1
        position: usize,
    },
    /// Rename an item; a blank title removes it
    Edit {
        /// Position in the list, starting at 1
        position: usize,
        /// New title
        #[arg(num_args = 0..)]
        title: Vec<String>,
    },
    /// Remove an item
    Remove {
        /// Position in the list, starting at 1
        position: usize,
    },
    /// Complete every item, or reopen all if they are all complete
    ToggleAll,
    /// Remove every completed item
    ClearCompleted,
    /// Read commands from stdin until EOF
    Shell,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();
    todomvc_core::metrics::register_metrics();

    let cli = Cli::parse();
    let storage = FileStorage::open(cli.data_dir.clone())
        .with_context(|| format!("opening data directory {}", cli.data_dir.display()))?;

    let config = TodoConfig::default()
        .with_storage_key(cli.key.as_str())
        .with_wiring(cli.wiring);
    let env = TodoEnvironment::new(Rc::new(storage));
    let app = TodoApp::new(&env, &config);

    match cli.command.unwrap_or(Command::List {
        filter: "all".to_string(),
    }) {
        Command::Shell => shell(&app),
        command => {
            let filter = run(&app, command)?;
            print_list(&app, filter);
            Ok(())
        }
    }
}

/// Apply one command and return the filter to print with
fn run(app: &TodoApp, command: Command) -> Result<Filter> {
    match command {
        Command::Add { title } => {
            app.input().set_text(title.join(" "));
            if app.input().submit()?.is_none() {
                bail!("title is blank");
            }
        }
        Command::List { filter } => return Ok(Filter::from_route(&filter)),
        Command::Toggle { position } => {
            let id = resolve(app, position)?;
            app.list().toggle_complete(id)?;
        }
        Command::Edit { position, title } => {
            let id = resolve(app, position)?;
            app.list().edit_item(id);
            app.list().set_edit_text(id, title.join(" "));
            app.list().save_edit(id)?;
        }
        Command::Remove { position } => {
            let id = resolve(app, position)?;
            app.list().remove(id)?;
        }
        Command::ToggleAll => {
            let target = !app.list().all_completed();
            app.list().set_all_completed(target)?;
        }
        Command::ClearCompleted => {
            let removed = app.filter().clear_completed()?;
            println!("Removed {} completed item(s)", removed.len());
        }
        Command::Shell => {}
    }
    Ok(app.filter().filter().get())
}

fn resolve(app: &TodoApp, position: usize) -> Result<TodoId> {
    let items = app.list().items().get();
    position
        .checked_sub(1)
        .and_then(|index| items.get(index))
        .map(|view| view.id)
        .with_context(|| format!("no item at position {position} (list has {})", items.len()))
}

fn print_list(app: &TodoApp, filter: Filter) {
    for (index, view) in app.list().items().get().iter().enumerate() {
        if filter.matches(view.completed) {
            let mark = if view.completed { "✓" } else { " " };
            println!("{:>3}. [{mark}] {}", index + 1, view.title);
        }
    }
    let counts = app.filter().counts();
    println!(
        "\n{} item(s) left, {} completed ({filter})",
        counts.remaining, counts.completed
    );
}

fn shell(app: &TodoApp) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("todomvc shell ({} wiring). Type 'help' for commands.", app.wiring());
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.first().copied() {
            None => {}
            Some("quit" | "exit") => return Ok(()),
            Some("help") => {
                println!("add <title> | list | toggle <n> | edit <n> <title> | remove <n>");
                println!("toggle-all | clear-completed | filter all|active|completed | quit");
            }
            Some("filter") => {
                let route = words.get(1).copied().unwrap_or("all");
                app.filter().select_route(route);
                print_list(app, app.filter().filter().get());
            }
            Some(_) => {
                let argv = std::iter::once("todomvc").chain(words.iter().copied());
                match ShellLine::try_parse_from(argv) {
                    Ok(ShellLine { command }) => match run(app, command) {
                        Ok(filter) => print_list(app, filter),
                        Err(e) => eprintln!("error: {e:#}"),
                    },
                    Err(e) => eprintln!("{e}"),
                }
            }
        }
    }
}

#[derive(Parser, Debug)]
#[command(disable_help_subcommand = true)]
struct ShellLine {
    #[command(subcommand)]
    command: Command,
}
