use anyhow::Context;
use expire_files::cli::Cli;
use expire_files::config::Settings;
use expire_files::utils::ExpireError;
use tracing::Level;
use tracing_subscriber::EnvFilter;

fn init_logging(debug: bool) {
    let filter_level = if debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::from_default_env().add_directive(filter_level.into());

    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .with_target(true)
            .with_level(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(tracing_subscriber::fmt::time::time())
            .init();
    } else {
        // Bare message lines; cron pipes these to syslog which stamps them itself
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .without_time()
            .with_target(false)
            .with_level(false)
            .init();
    }
}

fn run(settings: &Settings) -> anyhow::Result<()> {
    expire_files::run(settings).context("session expiry failed")?;
    Ok(())
}

fn main() {
    match Cli::try_parse_legacy() {
        Ok(cli) => {
            let settings = cli.into_settings();
            init_logging(settings.debug);

            tracing::debug!("Debugging enabled");
            tracing::debug!("Starting expire-files v{}", env!("CARGO_PKG_VERSION"));

            if let Err(e) = run(&settings) {
                tracing::error!("{:#}", e);
                if let Some(hint) = e.downcast_ref::<ExpireError>().and_then(|e| e.suggestion()) {
                    tracing::error!("{}", hint);
                }
                std::process::exit(1);
            }
        }
        Err(e) => {
            use clap::error::ErrorKind;

            match e.kind() {
                ErrorKind::DisplayVersion | ErrorKind::DisplayHelp => {
                    e.print().ok();
                    std::process::exit(0);
                }
                _ => {
                    e.print().ok();
                    std::process::exit(2);
                }
            }
        }
    }
}
