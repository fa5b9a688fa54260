use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use mac_cleanup::cli::args::Cli;
use mac_cleanup::cli::output::Reporter;
use mac_cleanup::common::config::{self, RunConfig, Settings};
use mac_cleanup::privilege::{self, Finalizer, PrivilegeSession, SudoAuthorizer};
use mac_cleanup::space::{self, SpaceMeter};
use mac_cleanup::sweeper::{self, TargetSweeper};
use mac_cleanup::tools::SystemTools;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let color = config::color_enabled(
        cli.no_color,
        std::io::stderr().is_terminal(),
        std::env::var("NO_COLOR").ok().as_deref(),
        std::env::var("TERM").ok().as_deref(),
    );
    colored::control::set_override(color);
    init_tracing(cli.verbose, color);

    let reporter = Reporter::new(color, cli.verbose);

    match run(&cli, color, &reporter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            reporter.error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool, color: bool) {
    let filter = if verbose {
        EnvFilter::new("mac_cleanup=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mac_cleanup=error"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(color)
        .init();
}

fn run(cli: &Cli, color: bool, reporter: &Reporter) -> Result<()> {
    let settings = Settings::load()?;
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let config = RunConfig::new(cli.verbose, color, cli.update, home, &settings);

    let session = Arc::new(PrivilegeSession::new(
        Arc::new(SudoAuthorizer),
        config.keepalive_interval,
    ));

    // Registered before anything can fail, released exactly once on every exit path
    let finalizer = Arc::new(Finalizer::new({
        let session = Arc::clone(&session);
        move || session.release()
    }));
    if let Err(e) = privilege::install_signal_handler(Arc::clone(&finalizer)) {
        reporter.warn(&format!("Could not install interrupt handler: {}", e));
    }

    let outcome = sweep(&config, &session, reporter);
    finalizer.run();
    outcome
}

fn sweep(config: &RunConfig, session: &PrivilegeSession, reporter: &Reporter) -> Result<()> {
    reporter.step("Requesting administrator privileges...");
    session.acquire()?;

    let meter = SpaceMeter::new(&config.filesystem_root);
    let before = reporter.sample_space(&meter);

    if config.update {
        reporter.step("Package managers will be updated before cleaning");
    }

    let tools = SystemTools::from_env();
    let targets = sweeper::default_targets();
    let report = TargetSweeper::new(&tools, config)
        .with_observer(reporter)
        .run_all(&targets);
    reporter.print_summary(&report);

    let after = reporter.sample_space(&meter);
    reporter.success(&space::describe_reclaimed(before.as_ref(), after.as_ref()));
    Ok(())
}
