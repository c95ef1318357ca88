use clap::Parser;
use crm_auth::AuthError;

use crate::cli::Commands;
use crate::cli::subcommands::AuthCommands;

mod bootstrap;
mod cli;
mod commands;
mod context;
mod output;
mod ui;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();
    let is_login = matches!(
        cli.command,
        Commands::Auth {
            action: AuthCommands::Login(_)
        }
    );
    if let Err(error) = run(cli).await {
        eprintln!("crm error: {error:#}");
        if let Some(hint) = session_hint(is_login, &error) {
            eprintln!("hint: {hint}");
        }
        std::process::exit(1);
    }
}

async fn run(cli: cli::Cli) -> anyhow::Result<()> {
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();
    ui::init(&flags);

    let config = bootstrap::load_config(&flags)?;
    let ctx = context::AppContext::init(config)?;

    commands::dispatch::dispatch(cli.command, &ctx, &flags).await
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("CRM_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

/// A rejected login already says why; every other 401 means the stored
/// session was dropped.
fn session_hint(is_login: bool, error: &anyhow::Error) -> Option<&'static str> {
    (!is_login && is_unauthorized(error))
        .then_some("your session is no longer valid; run `crm auth login`")
}

fn is_unauthorized(error: &anyhow::Error) -> bool {
    error
        .chain()
        .filter_map(|cause| cause.downcast_ref::<AuthError>())
        .any(AuthError::is_unauthorized)
}

#[cfg(test)]
mod tests {
    use anyhow::Context;

    use super::*;

    #[test]
    fn unauthorized_is_found_through_context() {
        let error = Err::<(), _>(AuthError::Unauthorized { detail: None })
            .context("failed to load organization")
            .expect_err("error");
        assert!(is_unauthorized(&error));
    }

    #[test]
    fn other_errors_get_no_hint() {
        let error = anyhow::Error::new(AuthError::Network("refused".into()));
        assert!(!is_unauthorized(&error));
        assert!(!is_unauthorized(&anyhow::anyhow!("plain")));
    }

    #[test]
    fn rejected_login_gets_no_session_hint() {
        let error = anyhow::Error::new(AuthError::Unauthorized {
            detail: Some("Incorrect email or password".into()),
        });
        assert_eq!(session_hint(true, &error), None);
        assert!(session_hint(false, &error).is_some_and(|hint| hint.contains("crm auth login")));
    }
}
