use std::io;

use anyhow::Result;
use is_terminal::IsTerminal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hardenctl::{
    cli::Cli,
    config::Config,
    printer::{print_banner, ConsolePrinter, Level, StatusSink},
    privilege, Coordinator, ProcessRunner, Registry, Session, Shell,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let cfg = Config::load(args.config.as_deref())?;

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_new(cfg.log_filter()).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();

    let color = cfg.color().unwrap_or_else(|| io::stdout().is_terminal());
    let mut printer = ConsolePrinter::new(color);
    print_banner(&mut printer);

    if let Err(e) = privilege::require_elevated(privilege::is_elevated()) {
        printer.status(Level::Error, &e.to_string());
        std::process::exit(1);
    }

    let registry = match cfg.modules_file() {
        Some(path) => Registry::from_manifest(&path)?,
        None => Registry::builtin(),
    };
    let mut runner = ProcessRunner::new(cfg.timeout());
    if let Some(program) = cfg.interpreter() {
        runner = runner.with_interpreter(program);
    }
    tracing::debug!(config = %cfg.config_path.display(), modules = registry.len(), "starting session");

    let coordinator = Coordinator::new(&registry, &runner, cfg.script_dir());
    let session = Session::start(&cfg.report_dir());
    let mut shell = Shell::new(coordinator, session, io::stdin().lock());
    shell.run(&mut printer).await?;
    Ok(())
}
