// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! CLI tool for experimenting with tree hash sets

use clap::{ArgAction, CommandFactory, Parser, Subcommand, ValueEnum};
use humansize::{format_size, BINARY};
use rustyline::DefaultEditor;
use std::fmt::Display;
use std::io::{self, BufRead, IsTerminal, Write};
use std::str::FromStr;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    prelude::*,
    registry::Registry,
};
use tree_hashset::{
    config::DEFAULT_HASH_BIT_WIDTH, Config, HashTable, InsertOutcome, IntegerKeyOps, KeyOps,
    RemoveOutcome, StrKeyOps,
};

macro_rules! die {
    ($fmt:literal, $($arg:tt)*) => {{
        eprintln!($fmt, $($arg)*);
        std::process::exit(1);
    }};

    ($msg:literal) => {{
        eprintln!($msg);
        std::process::exit(1);
    }};
}

#[allow(unused_imports)]
use tracing::{debug, error, info, trace, warn};

pub fn init_tracing(quiet: bool, verbose: u8) -> (bool, LevelFilter) {
    let is_verbose = !quiet && verbose > 0;

    let level_filter = if quiet {
        LevelFilter::ERROR
    } else {
        match verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    };

    // Bridge log crate macros to tracing (the library logs through `log`)
    tracing_log::LogTracer::init().expect("Failed to set log tracer");

    let registry = Registry::default();

    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var("HT_LOG")
        .from_env_lossy()
        .add_directive(
            "rustyline=warn"
                .parse()
                .expect("Failed to parse rustyline directive"),
        );

    let subscriber = registry.with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .compact(),
    );

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        die!("INTERNAL ERROR: setting default tracing::subscriber failed");
    }

    let prev_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing_panic::panic_hook(info);
        prev_hook(info); // daisy-chain to old panic hook
    }));

    (is_verbose, level_filter)
}

/// Built-in key types
#[derive(ValueEnum, Copy, Clone, Debug)]
enum KeyKind {
    /// 64-bit signed integers, hashed by taking them modulo the bucket count
    Int,
    /// UTF-8 strings, hashed with XXH3
    Str,
}

/// CLI tool for experimenting with tree hash sets
#[derive(Parser, Debug)]
#[command(name = "ht")]
#[command(about = "CLI tool for experimenting with tree hash sets")]
struct ToolArgs {
    /// Suppress all output except for errors. This overrides the -v flag.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Turn on verbose output. Supply -v multiple times to increase verbosity.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Number of hash bits, the table has 2^BITS buckets
    #[arg(short, long, default_value_t = DEFAULT_HASH_BIT_WIDTH, value_name = "BITS")]
    bits: u8,

    /// Type of the stored keys
    #[arg(short, long, value_enum, default_value_t = KeyKind::Int)]
    keys: KeyKind,

    /// Print the table after running a command
    #[arg(short, long, default_value_t = false)]
    print: bool,

    /// Command to run (if omitted, starts interactive shell)
    #[command(subcommand)]
    command: Option<ToolCommand>,
}

#[derive(Subcommand, Debug, Clone)]
enum ToolCommand {
    /// Insert one or more keys
    #[command(visible_alias = "add")]
    Insert {
        /// The keys to insert
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Remove one or more keys
    #[command(visible_alias = "del")]
    Remove {
        /// The keys to remove
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Print every bucket with its keys as <depth>-<key>
    #[command(visible_alias = "dump")]
    Print,
    /// Show table statistics
    Info,
}

// Internal shell commands, include all external tool commands
#[derive(Parser, Debug)]
#[command(name = "")]
#[command(no_binary_name = true)]
#[command(disable_version_flag = true)]
#[command(help_template = "
{version}

Available Commands:

{subcommands}

Use `help COMMAND` or `COMMAND --help` for more details.

")]

struct ShellArgs {
    #[command(subcommand)]
    command: ShellCommand,
}

// Shell commands (including ones not available from CLI)
#[derive(Subcommand, Debug, Clone)]
enum ShellCommand {
    #[command(flatten)]
    ToolCmd(ToolCommand),

    /// Destroy all keys and start over with an empty table
    Clear,
    /// Exit the current shell
    #[command(visible_alias = "quit")]
    Exit,
}

struct Session<'ops, O: KeyOps> {
    table: HashTable<'ops, O>,
    ops: &'ops O,
    config: Config,
}

impl<'ops, O: KeyOps> Session<'ops, O> {
    fn open(config: Config, ops: &'ops O) -> tree_hashset::Result<Self> {
        let table = config.clone().open(ops)?;

        Ok(Self { table, ops, config })
    }

    fn clear(&mut self) {
        let fresh = HashTable::new(self.config.hash_bit_width, self.ops);
        let old = std::mem::replace(&mut self.table, fresh);
        let count = old.len();
        old.destroy();
        debug!("Destroyed {count} keys");
    }
}

fn parse_key<K>(raw: &str) -> Option<K>
where
    K: FromStr,
    K::Err: Display,
{
    match raw.parse() {
        Ok(key) => Some(key),
        Err(e) => {
            eprintln!("Error: invalid key {raw:?}: {e}");
            None
        }
    }
}

fn print_info<O: KeyOps>(session: &Session<'_, O>) {
    let table = &session.table;

    println!("Hash bits: {}", table.hash_bit_width());
    println!("Buckets: {}", table.bucket_count());
    println!("Occupied buckets: {}", table.occupied_bucket_count());
    println!("Keys: {}", table.len());
    println!("Tallest bucket: {}", table.max_bucket_height());
    println!(
        "Approximate size: {}",
        format_size(table.approximate_size(), BINARY)
    );

    #[cfg(feature = "metrics")]
    {
        let metrics = table.metrics();
        println!("Inserts: {}", metrics.inserts());
        println!(
            "Duplicate inserts: {} ({:.1}%)",
            metrics.duplicate_inserts(),
            metrics.duplicate_insert_ratio() * 100.0
        );
        println!("Removes: {}", metrics.removes());
        println!("Missed removes: {}", metrics.missed_removes());
        println!("Buckets created: {}", metrics.buckets_created());
    }
}

fn handle_insert<O>(session: &mut Session<'_, O>, keys: &[String])
where
    O: KeyOps,
    O::Key: FromStr,
    <O::Key as FromStr>::Err: Display,
{
    for raw in keys {
        let Some(key) = parse_key::<O::Key>(raw) else {
            continue;
        };

        match session.table.insert(&key) {
            InsertOutcome::Success => println!("OK (inserted)"),
            InsertOutcome::AlreadyStored => println!("already stored"),
        }
    }
}

fn handle_remove<O>(session: &mut Session<'_, O>, keys: &[String])
where
    O: KeyOps,
    O::Key: FromStr,
    <O::Key as FromStr>::Err: Display,
{
    for raw in keys {
        let Some(key) = parse_key::<O::Key>(raw) else {
            continue;
        };

        match session.table.remove(&key) {
            RemoveOutcome::Success => println!("OK (removed)"),
            RemoveOutcome::NotStored => println!("not stored"),
        }
    }
}

fn handle_print<O: KeyOps>(session: &Session<'_, O>) {
    if let Err(e) = session.table.print() {
        eprintln!("Error: {e}");
    }
}

/// Result of executing a command
enum CommandResult {
    Continue,
    Exit,
}

/// Execute a parsed command
fn execute_command<O>(session: &mut Session<'_, O>, cmd: ToolCommand) -> CommandResult
where
    O: KeyOps,
    O::Key: FromStr,
    <O::Key as FromStr>::Err: Display,
{
    match cmd {
        ToolCommand::Insert { keys } => handle_insert(session, &keys),
        ToolCommand::Remove { keys } => handle_remove(session, &keys),
        ToolCommand::Print => handle_print(session),
        ToolCommand::Info => print_info(session),
    }
    CommandResult::Continue
}

/// Execute a shell-only command
fn execute_shell_command<O>(session: &mut Session<'_, O>, cmd: ShellCommand) -> CommandResult
where
    O: KeyOps,
    O::Key: FromStr,
    <O::Key as FromStr>::Err: Display,
{
    match cmd {
        ShellCommand::ToolCmd(tool_cmd) => execute_command(session, tool_cmd),
        ShellCommand::Clear => {
            session.clear();
            println!("OK (cleared)");
            CommandResult::Continue
        }
        ShellCommand::Exit => CommandResult::Exit,
    }
}

/// Parse and run a shell command line
fn run_shell_command<O>(session: &mut Session<'_, O>, line: &str) -> CommandResult
where
    O: KeyOps,
    O::Key: FromStr,
    <O::Key as FromStr>::Err: Display,
{
    let line = line.trim();
    if line.is_empty() {
        return CommandResult::Continue;
    }

    let tokens = match shlex::split(line) {
        Some(t) if !t.is_empty() => t,
        Some(_) => return CommandResult::Continue,
        None => {
            eprintln!("error: unclosed quote");
            return CommandResult::Continue;
        }
    };

    match ShellArgs::try_parse_from(&tokens) {
        Ok(args) => execute_shell_command(session, args.command),
        Err(e) => {
            // Print clap's error message
            eprintln!("{e}");
            CommandResult::Continue
        }
    }
}

fn run_shell<O>(session: &mut Session<'_, O>)
where
    O: KeyOps,
    O::Key: FromStr,
    <O::Key as FromStr>::Err: Display,
{
    if io::stdin().is_terminal() {
        run_shell_interactive(session);
    } else {
        run_shell_non_interactive(session);
    }
}

fn run_shell_interactive<O>(session: &mut Session<'_, O>)
where
    O: KeyOps,
    O::Key: FromStr,
    <O::Key as FromStr>::Err: Display,
{
    println!("Welcome to the tree hash set shell");
    println!("Type 'help' for available commands, 'exit' to quit.\n");

    let mut rl = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("Error initializing line editor: {e}");
            return;
        }
    };

    loop {
        match rl.readline("ht> ") {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                if let CommandResult::Exit = run_shell_command(session, &line) {
                    break;
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                // Ignore Ctrl+C, just show a new prompt
                continue;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!();
                break;
            }
            Err(e) => {
                eprintln!("Error reading input: {e}");
                break;
            }
        }
    }
}

fn run_shell_non_interactive<O>(session: &mut Session<'_, O>)
where
    O: KeyOps,
    O::Key: FromStr,
    <O::Key as FromStr>::Err: Display,
{
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        if stdout.flush().is_err() {
            die!("can't flush stdout");
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => {
                // EOF
                break;
            }
            Ok(_) => {
                if let CommandResult::Exit = run_shell_command(session, &line) {
                    break;
                }
            }
            Err(e) => {
                die!("Error reading input: {}", e);
            }
        }
    }
}

fn run<O>(ops: &O, args: ToolArgs, verbose: bool)
where
    O: KeyOps,
    O::Key: FromStr,
    <O::Key as FromStr>::Err: Display,
{
    let mut session = match Session::open(Config::new(args.bits), ops) {
        Ok(s) => s,
        Err(e) => {
            let note = if verbose {
                ""
            } else {
                ". Note: Use -v (one or multiple times) for more information"
            };
            die!("Error creating table: {}{}", e, note);
        }
    };

    match args.command {
        Some(cmd) => {
            execute_command(&mut session, cmd);
            if args.print {
                handle_print(&session);
            }
        }
        None => run_shell(&mut session),
    }
}

fn main() {
    let args = ToolArgs::parse();
    let (verbose, level_filter) = init_tracing(args.quiet, args.verbose);

    let cmd = ToolArgs::command();

    info!(
        "starting {} ({} {}), log level: {level_filter}",
        cmd.get_name(),
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    match args.keys {
        KeyKind::Int => run(&IntegerKeyOps, args, verbose),
        KeyKind::Str => run(&StrKeyOps, args, verbose),
    }
}
