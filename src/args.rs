//! These structs provide the CLI interface for the handy CLI.

use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing::level_filters::LevelFilter;

/// handy: a toolbox of small everyday utilities.
///
/// It analyzes sales spreadsheets, keeps a to-do list (on the command line or in the browser),
/// tidies up a downloads folder, counts the words of a text file and runs a console calculator.
///
/// Settings live in $HANDY_HOME/config.json. Run `handy init` to create a default one you can
/// edit; without it every tool runs with its defaults.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the handy home directory and a default config.json.
    ///
    /// By default the home directory is $HOME/handy. Pass --handy-home or set HANDY_HOME to put it
    /// somewhere else. An existing config.json is kept as it is.
    Init,
    /// Analyze a sales CSV file and draw charts of the results.
    ///
    /// The file needs the columns fecha, producto, cantidad and precio. Dates use the YYYY-MM-DD
    /// format. Rows that cannot be read are reported and skipped.
    Sales(SalesArgs),
    /// Manage the to-do list.
    Todo(TodoArgs),
    /// Move the files of a folder into subfolders by type (Imagenes, Documentos, ...).
    Organize(OrganizeArgs),
    /// Count the words of a text file.
    Words(WordsArgs),
    /// Run the interactive calculator.
    Calc,
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber EnvFilter documentation.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where handy keeps its configuration and data. Defaults to ~/handy
    #[arg(long, env = "HANDY_HOME", default_value_t = default_handy_home())]
    handy_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, handy_home: PathBuf) -> Self {
        Self {
            log_level,
            handy_home: handy_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn handy_home(&self) -> &DisplayPath {
        &self.handy_home
    }
}

/// Args for the `handy sales` command.
#[derive(Debug, Parser, Clone)]
#[command(args_conflicts_with_subcommands = true)]
pub struct SalesArgs {
    #[command(subcommand)]
    generate: Option<SalesSubcommand>,

    /// The CSV file to analyze.
    #[arg(default_value = "ventas.csv")]
    file: PathBuf,

    /// The directory the charts are written to. Defaults to sales_output_dir from the config, or
    /// the current directory.
    #[arg(long)]
    out: Option<PathBuf>,

    /// How many products to list in the revenue ranking. Defaults to top_products from the
    /// config.
    #[arg(long)]
    top: Option<usize>,
}

impl SalesArgs {
    pub fn new(file: impl Into<PathBuf>, out: Option<PathBuf>, top: Option<usize>) -> Self {
        Self {
            generate: None,
            file: file.into(),
            out,
            top,
        }
    }

    pub fn subcommand(&self) -> Option<&SalesSubcommand> {
        self.generate.as_ref()
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn out(&self) -> Option<&Path> {
        self.out.as_deref()
    }

    pub fn top(&self) -> Option<usize> {
        self.top
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum SalesSubcommand {
    /// Write a CSV file of made-up sales records to practice with.
    Generate(GenerateArgs),
}

/// Args for the `handy sales generate` command.
#[derive(Debug, Parser, Clone)]
pub struct GenerateArgs {
    /// Where to write the CSV file.
    #[arg(default_value = "ventas.csv")]
    file: PathBuf,

    /// Number of records to generate.
    #[arg(long, default_value_t = crate::sales::DEFAULT_RECORDS)]
    records: usize,

    /// Seed for the random generator. The same seed always produces the same file.
    #[arg(long, default_value_t = crate::sales::DEFAULT_SEED)]
    seed: u64,
}

impl GenerateArgs {
    pub fn new(file: impl Into<PathBuf>, records: usize, seed: u64) -> Self {
        Self {
            file: file.into(),
            records,
            seed,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn records(&self) -> usize {
        self.records
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

/// Args for the `handy todo` command.
#[derive(Debug, Parser, Clone)]
pub struct TodoArgs {
    #[command(subcommand)]
    command: TodoSubcommand,

    /// The JSON file holding the tasks. Defaults to todo_file from the config, which defaults to
    /// $HANDY_HOME/tareas.json
    #[arg(long, global = true)]
    file: Option<PathBuf>,
}

impl TodoArgs {
    pub fn new(command: TodoSubcommand, file: Option<PathBuf>) -> Self {
        Self { command, file }
    }

    pub fn command(&self) -> &TodoSubcommand {
        &self.command
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum TodoSubcommand {
    /// Add a task.
    Add {
        /// The text of the task.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Mark a task as completed.
    Complete {
        /// The id shown by `handy todo list`.
        id: u32,
    },
    /// Show all tasks.
    List,
    /// Serve the to-do list as a web page on localhost.
    Serve {
        /// The port to listen on. Defaults to web_port from the config (5000).
        #[arg(long)]
        port: Option<u16>,
    },
}

/// Args for the `handy organize` command.
#[derive(Debug, Parser, Clone)]
pub struct OrganizeArgs {
    /// The folder to organize. Defaults to ~/Downloads
    dir: Option<PathBuf>,

    /// Do not ask for confirmation before moving files.
    #[arg(long, short)]
    yes: bool,
}

impl OrganizeArgs {
    pub fn new(dir: Option<PathBuf>, yes: bool) -> Self {
        Self { dir, yes }
    }

    /// The folder given on the command line, or `~/Downloads`.
    pub fn dir(&self) -> PathBuf {
        match &self.dir {
            Some(dir) => dir.clone(),
            None => default_downloads(),
        }
    }

    pub fn yes(&self) -> bool {
        self.yes
    }
}

/// Args for the `handy words` command.
#[derive(Debug, Parser, Clone)]
pub struct WordsArgs {
    /// The text file to read.
    file: PathBuf,

    /// How many of the most frequent words to show.
    #[arg(long, default_value_t = 10)]
    top: usize,
}

impl WordsArgs {
    pub fn new(file: impl Into<PathBuf>, top: usize) -> Self {
        Self {
            file: file.into(),
            top,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn top(&self) -> usize {
        self.top
    }
}

fn home_or_relative(name: &str) -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(name),
        None => {
            error!(
                "There was an error when trying to get your home directory. Using '{name}' \
                relative to the current directory instead. You can get around this by passing \
                the path explicitly.",
            );
            PathBuf::from(name)
        }
    }
}

fn default_handy_home() -> DisplayPath {
    DisplayPath(home_or_relative("handy"))
}

fn default_downloads() -> PathBuf {
    home_or_relative("Downloads")
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}
