//! CLI entry point for read-dir-files

use std::error::Error as StdError;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tokio::runtime::{Builder, Runtime};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use read_dir_files::tree::should_ignore_dir;
use read_dir_files::{
    ContentReader, Encoding, EventPrinter, ListOptions, OutputConfig, PathLister, PathPrinter,
    ReadOptions, print_json,
};

type CliResult = Result<(), Box<dyn StdError>>;

/// When to colorize directory paths
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Color when stdout is a terminal and the environment allows it
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn enabled(self) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => terminal_wants_color(),
        }
    }
}

/// NO_COLOR beats FORCE_COLOR; otherwise color a non-dumb terminal.
fn terminal_wants_color() -> bool {
    let set = |key: &str| std::env::var_os(key).is_some();
    if set("NO_COLOR") {
        return false;
    }
    if set("FORCE_COLOR") {
        return true;
    }
    let dumb = std::env::var_os("TERM").is_some_and(|term| term == "dumb");
    !dumb && std::io::stdout().is_terminal()
}

/// Diagnostic verbosity on stderr
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum LogLevel {
    Debug,
    Info,
    #[default]
    Warn,
    Error,
    Silent,
}

impl LogLevel {
    fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Silent => LevelFilter::OFF,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "read-dir-files")]
#[command(about = "Read every file under a directory into a tree, or list its paths")]
#[command(version)]
struct Cli {
    /// Diagnostic log level (RUST_LOG overrides)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Number of worker threads for concurrent traversal (0 = one per core)
    #[arg(short = 'j', long = "jobs", default_value = "0", global = true)]
    jobs: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the contents of every file under DIR as a JSON tree
    Read(ReadArgs),
    /// Print every directory and file path under DIR
    List(ListArgs),
}

#[derive(Args, Debug)]
struct ReadArgs {
    /// Directory to read
    dir: PathBuf,

    /// Decode file contents as text: utf8, ascii, latin1, utf16le, base64, hex
    #[arg(short = 'e', long = "encoding")]
    encoding: Option<Encoding>,

    /// Leave subdirectories out entirely
    #[arg(long = "no-recursive")]
    no_recursive: bool,

    /// Read sequentially on the calling thread
    #[arg(long = "sync")]
    sync: bool,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Directory to list
    dir: PathBuf,

    /// List subdirectories without descending into them
    #[arg(long = "no-recursive")]
    no_recursive: bool,

    /// Print paths relative to the base directory
    #[arg(long = "relative")]
    relative: bool,

    /// Prefix stripped by --relative (default: parent of DIR)
    #[arg(long = "base-dir", value_name = "DIR")]
    base_dir: Option<String>,

    /// Skip directories whose name matches pattern (can be used multiple times)
    #[arg(short = 'I', long = "ignore")]
    ignore: Vec<String>,

    /// Print each discovery as it happens instead of the final list
    #[arg(long = "events")]
    events: bool,

    /// Output in JSON format (JSON lines with --events)
    #[arg(long = "json")]
    json: bool,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,
}

fn setup_tracing(level: LogLevel) {
    let filter = EnvFilter::builder()
        .with_default_directive(level.to_level_filter().into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .compact()
        .init();
}

fn build_runtime(jobs: usize) -> std::io::Result<Runtime> {
    let mut builder = Builder::new_multi_thread();
    if jobs > 0 {
        builder.worker_threads(jobs);
    }
    builder.enable_all().build()
}

fn main() {
    let cli = Cli::parse();
    setup_tracing(cli.log_level);

    let result = match &cli.command {
        Command::Read(args) => run_read(args, cli.jobs),
        Command::List(args) => run_list(args, cli.jobs),
    };

    if let Err(e) = result {
        eprintln!("read-dir-files: {}", e);
        process::exit(1);
    }
}

fn run_read(args: &ReadArgs, jobs: usize) -> CliResult {
    let mut options = ReadOptions::new().recursive(!args.no_recursive);
    if let Some(encoding) = args.encoding {
        options = options.with_encoding(encoding);
    }
    let reader = ContentReader::new(options);

    let tree = if args.sync {
        reader.read_sync(&args.dir)?
    } else {
        let runtime = build_runtime(jobs)?;
        let reader = reader.with_runtime(runtime.handle().clone());
        runtime.block_on(reader.read(&args.dir))?
    };

    debug!("Read {} files", tree.file_count());
    print_json(&tree)?;
    Ok(())
}

fn run_list(args: &ListArgs, jobs: usize) -> CliResult {
    let mut options = ListOptions::new()
        .recursive(!args.no_recursive)
        .normalize(!args.relative);
    if let Some(base_dir) = &args.base_dir {
        options = options.base_dir(base_dir.clone());
    }
    if !args.ignore.is_empty() {
        let patterns = args.ignore.clone();
        options = options.filter(move |dir| !should_ignore_dir(dir, &patterns));
    }

    let config = OutputConfig {
        use_color: args.color.enabled(),
        summary: !args.json,
    };

    let runtime = build_runtime(jobs)?;
    let lister = PathLister::new(options).with_runtime(runtime.handle().clone());

    runtime.block_on(print_listing(lister, args, config))
}

async fn print_listing(lister: PathLister, args: &ListArgs, config: OutputConfig) -> CliResult {
    let mut listing = lister.list(&args.dir);

    if args.events {
        let mut printer = EventPrinter::new(config).json(args.json);
        while let Some(event) = listing.next_event().await {
            printer.print_event(&event)?;
            if event.is_end() {
                break;
            }
        }
        listing.finish().await?;
        return Ok(());
    }

    let paths = listing.finish().await?;
    if args.json {
        print_json(&paths)?;
    } else {
        PathPrinter::new(config).print(&paths)?;
    }
    Ok(())
}
