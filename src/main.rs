//! Entry point: load config, set up logging, run the shell in argument or
//! interactive mode and print the result.

use age_span::config::AppConfig;
use age_span::shell::{Shell, USAGE};
use chrono::Local;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cfg = AppConfig::load().unwrap_or_else(|err| {
        warn!(%err, "could not read configuration, using defaults");
        AppConfig::default()
    });
    info!(
        leap_rule = %cfg.leap_rule_or_default(),
        reversed = %cfg.reversed_or_default(),
        "configuration loaded"
    );

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("{USAGE}");
        return Ok(());
    }

    let shell = Shell::new(&cfg);
    let today = Local::now().date_naive();
    let output = if args.is_empty() {
        shell.run_interactive(today)?
    } else {
        shell.run_args(&args, today)?
    };

    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}
