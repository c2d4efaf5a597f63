//! CLI entry point for `mboxdump`.

use std::path::PathBuf;

use clap::Parser;

/// Dump out an MBOX file
#[derive(Parser)]
#[command(name = "mboxdump", version)]
struct Cli {
    /// Path to the MBOX file you wish to dump
    #[arg(short, long, value_name = "FILE")]
    mbox: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = mboxdump::config::load_config();
    setup_logging(&config);

    let stdout = std::io::stdout();
    let mut out = std::io::BufWriter::new(stdout.lock());
    mboxdump::report::run(&cli.mbox, &config, &mut out)?;
    Ok(())
}

/// Set up tracing with stderr output and optional file logging.
///
/// Stdout is reserved for the report.
fn setup_logging(config: &mboxdump::config::Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let log_dir = config
        .general
        .log_dir
        .as_ref()
        .filter(|dir| std::fs::create_dir_all(dir).is_ok());

    if let Some(dir) = log_dir {
        let file_appender =
            tracing_appender::rolling::never(dir, mboxdump::config::LOG_FILE_NAME);
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}
