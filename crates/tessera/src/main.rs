use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tessera::cli::{Args, USAGE};
use tessera::controller::environment::FsEnvironmentLoader;
use tessera::controller::map_holder::FsMapStore;
use tessera::{AppConfig, Application, Services};
use tessera_logging::{LoggingConfig, error, info, init_logging_with_reload, instrument};
use tessera_ui::FilePicker;

fn setup_logging(verbosity: u64) -> Result<()> {
    let mut config =
        LoggingConfig::from_env().context("Failed to create logging config from environment")?;

    // Command line verbosity wins; without it an explicit environment level is kept
    let env_level = std::env::var("TESSERA_LOG").is_ok() || std::env::var("RUST_LOG").is_ok();
    if verbosity > 0 || !env_level {
        let level = match verbosity {
            0 => tessera_logging::Level::WARN,
            1 => tessera_logging::Level::INFO,
            2 => tessera_logging::Level::DEBUG,
            _3_or_more => tessera_logging::Level::TRACE,
        };
        config.level = level.into();
    }

    init_logging_with_reload(config).context("Failed to initialize tessera logging")?;
    info!("Tessera logging system initialized");
    Ok(())
}

#[instrument]
fn install_panic_handler() {
    panic::set_hook(Box::new(|info| {
        let payload = info.payload();
        let location = info
            .location()
            .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()));

        let panic_message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Box<dyn Any>".to_string()
        };

        error!(
            panic_message = %panic_message,
            location = ?location,
            thread = ?std::thread::current().name(),
            "Application panic occurred"
        );

        if let Ok(backtrace) = std::env::var("RUST_BACKTRACE") {
            if backtrace == "1" || backtrace == "full" {
                let bt = std::backtrace::Backtrace::capture();
                error!(backtrace = %format!("{bt:?}"), "Panic backtrace");
                eprintln!("Backtrace:\n{bt:?}");
            }
        }

        error!(
            os = std::env::consts::OS,
            arch = std::env::consts::ARCH,
            version = env!("CARGO_PKG_VERSION"),
            "System information at panic time"
        );

        tessera_logging::flush_logs();
        eprintln!("Fatal error: {panic_message}");
        if let Some(loc) = &location {
            eprintln!("Location: {loc}");
        }
        std::process::exit(1);
    }));
}

fn main() -> Result<()> {
    let args = Args::parse_args().context("could not parse arguments")?;
    if args.display_help {
        print!("{} {}\n\n{USAGE}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    if args.display_version {
        println!("tessera {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    setup_logging(args.verbosity)?;
    install_panic_handler();

    let result = run(&args);
    if let Err(err) = &result {
        error!(error = %format!("{err:#}"), "Tessera exited with an error");
    }
    tessera_logging::flush_logs();
    result
}

fn run(args: &Args) -> Result<()> {
    let config = match &args.config_file {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::load()?,
    };

    // No native dialogs in the headless build
    let picker: Arc<dyn FilePicker> =
        Arc::new(|_: &str, _: Option<&Path>| -> Option<PathBuf> { None });
    let app = Application::wire(
        config,
        Services {
            loader: Arc::new(FsEnvironmentLoader),
            store: Arc::new(FsMapStore),
            picker,
        },
    )?;

    if let Some(environment) = &args.environment {
        app.open_startup_files(environment, &args.maps)?;
    }

    for (kind, consumers) in app.bus().registrations() {
        let name = kind.to_string();
        println!("{name:<48} {:<9} {consumers}", kind.delivery.to_string());
    }
    if let Some(map) = app.maps.selected() {
        println!("selected map: {} ({})", map.visible_name, map.id);
    }

    info!("Application shutting down");
    Ok(())
}
