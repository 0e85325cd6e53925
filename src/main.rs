//! act-bridge - command-line entry point
//!
//! Prints exactly one JSON envelope line to stdout and exits 0 on success,
//! 1 on failure.

use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;

use act_bridge::cli::Args;
use act_bridge::{logging, Bridge, Config, Envelope, Outcome};

async fn run(args: Args, config: &Config) -> anyhow::Result<Outcome> {
    let task = args.task(&config.act.default_task);
    let bridge = Bridge::from_config(config).context("failed to set up automation")?;
    Ok(bridge.run(&task).await)
}

#[tokio::main]
async fn main() -> ExitCode {
    let (config, config_err) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    logging::init_logger(config.act.debug);
    if let Some(e) = config_err {
        tracing::warn!(error = %e, path = %Config::config_file().display(), "ignoring config file");
    }

    let outcome = match Args::try_parse() {
        Ok(args) => run(args, &config).await.unwrap_or_else(|e| {
            tracing::error!(error = %e, "setup failed");
            Outcome::failed(format!("{:#}", e))
        }),
        Err(e) => Outcome::failed(e.to_string().trim().to_string()),
    };

    let (line, code) = match outcome.envelope.to_json_line() {
        Ok(line) => (line, outcome.exit_code()),
        Err(e) => {
            let fallback = Envelope::failure(format!("failed to serialize result: {}", e));
            let line = fallback.to_json_line().unwrap_or_else(|_| {
                r#"{"success":false,"result":null,"error":"serialization failed"}"#.to_string()
            });
            (line, 1)
        }
    };

    println!("{}", line);
    ExitCode::from(code)
}
