//! `ddp` entry point.
//!
//! Loads `.env`, parses arguments, installs the tracing subscriber and hands
//! the command to a handler. Infrastructure is only wired in `bootstrap`.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use ddp_cli::error::exit_code_for;
use ddp_cli::{Cli, CliConfig, Commands, bootstrap, handlers};

/// `warn` by default, `debug` with `--verbose`; `RUST_LOG` wins over both.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::load(&cli)?;

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    if matches!(command, Commands::Paths) {
        return handlers::paths::execute(&config);
    }

    let mut ctx = bootstrap(config)?;
    match command {
        Commands::List { json } => handlers::list::execute(&mut ctx, json).await,
        Commands::Show { app } => handlers::show::execute(&mut ctx, &app).await,
        Commands::Install { app, shortcut } => {
            handlers::install::execute(&mut ctx, &app, shortcut).await
        }
        Commands::Uninstall { app, yes } => handlers::uninstall::execute(&mut ctx, &app, yes).await,
        Commands::Shortcut { app } => handlers::shortcut::execute(&mut ctx, &app).await,
        Commands::Paths => handlers::paths::execute(&ctx.config),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Before parsing so clap's `env` attributes see `.env` values.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(u8::try_from(exit_code_for(&err)).unwrap_or(1))
        }
    }
}
