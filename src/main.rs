// pgpreload: select PostgreSQL extensions for the preload-libraries settings.

use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use pgpreload::catalog::{Catalog, PreloadFields};
use pgpreload::cli::Cli;
use pgpreload::conf::{self, ConfigStore};
use pgpreload::discovery;
use pgpreload::logging;
use pgpreload::ui::App;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init()?;

    let snapshot =
        ConfigStore::default_snapshot_path().context("cannot locate the home directory")?;

    if cli.last {
        println!("Rewriting last saved configuration...");
        conf::replay_last(&snapshot)?;
        println!("Done");
        return Ok(ExitCode::SUCCESS);
    }

    let overrides = cli.overrides();
    let probe = discovery::probe(&overrides);

    if cli.info {
        discovery::print_report(&overrides, &probe);
        return Ok(if probe.validate().is_ok() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    let install = probe
        .validate()
        .context("can't proceed: need at least the lib/share dirs and postgresql.auto.conf")?;
    let names = discovery::installed_extensions(&install)?;

    // postgresql.conf first, then postgresql.auto.conf on top
    let mut fields = PreloadFields::default();
    if let Some(conf_file) = &install.postgresql_conf {
        conf::read_preload_values(conf_file, &mut fields)?;
    }
    conf::read_preload_values(&install.auto_conf, &mut fields)?;

    let catalog = Catalog::new(names);
    let store = ConfigStore::new(install.auto_conf.clone(), snapshot);

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(catalog, fields, store);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.context("event loop failed")?;
    Ok(ExitCode::SUCCESS)
}
