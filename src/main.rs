use clap::Parser;
use handy::args::{Args, Command, SalesSubcommand, TodoSubcommand};
use handy::{commands, Config, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().handy_home().path();

    let _: () = match args.command() {
        Command::Init => commands::init(home).await?.print(),

        Command::Sales(sales_args) => match sales_args.subcommand() {
            Some(SalesSubcommand::Generate(generate_args)) => {
                commands::sales_generate(generate_args).await?.print()
            }
            None => {
                let config = Config::load(home).await?;
                commands::sales(&config, sales_args).await?.print()
            }
        },

        Command::Todo(todo_args) => {
            let config = Config::load(home).await?;
            let file = match todo_args.file() {
                Some(file) => file.to_path_buf(),
                None => config.todo_file(),
            };
            match todo_args.command() {
                TodoSubcommand::Add { text } => {
                    commands::todo_add(&file, &text.join(" ")).await?.print()
                }
                TodoSubcommand::Complete { id } => {
                    commands::todo_complete(&file, *id).await?.print()
                }
                TodoSubcommand::List => commands::todo_list(&file).await?.print(),
                TodoSubcommand::Serve { port } => {
                    let port = port.unwrap_or_else(|| config.web_port());
                    commands::todo_serve(&file, port).await?.print()
                }
            }
        }

        Command::Organize(organize_args) => {
            let config = Config::load(home).await?;
            commands::organize(
                &organize_args.dir(),
                &config.categories(),
                organize_args.yes(),
            )
            .await?
            .print()
        }

        Command::Words(words_args) => commands::words(words_args.file(), words_args.top())
            .await?
            .print(),

        Command::Calc => commands::calc().await?.print(),
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
