// src/bin/render_stack.rs
//! Validates the deployment definition and prints it as JSON.
//!
//! Usage: `render_stack [path/to/stack.toml]`

use dogpic::config::AppConfig;
use dogpic::deploy::{RenderOverrides, StackSpec, DEFAULT_STACK_FILE};
use std::process::ExitCode;

fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));

    if let Err(e) = dotenv {
        log::debug!("no .env file loaded: {}", e);
    }

    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_STACK_FILE.to_string());

    let result = AppConfig::from_env()
        .map_err(|e| e.to_string())
        .and_then(|config| {
            let stack = StackSpec::load(&path).map_err(|e| e.to_string())?;
            let overrides = RenderOverrides::from_env().map_err(|e| e.to_string())?;
            stack
                .render_json(&overrides, &config.upstream.retry)
                .map_err(|e| e.to_string())
        });

    match result {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}: {}", path, e);
            eprintln!("❌ {}: {}", path, e);
            ExitCode::FAILURE
        }
    }
}
