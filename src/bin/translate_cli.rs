use std::io::{self, BufRead};
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;
use translation_failover::config::{Settings, default_config_path};
use translation_failover::core::types::DEFAULT_TARGET_LANGUAGE;
use translation_failover::facade::TranslationFacade;

struct CliConfig {
    target_language: String,
    config_path: PathBuf,
    verbose: bool,
    text: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    let Some(config) = parse_config(std::env::args().skip(1).collect())? else {
        return Ok(());
    };
    init_logging(config.verbose);

    let settings = Settings::load_from(&config.config_path)?;
    tracing::debug!(
        config = %config.config_path.display(),
        engine_order = %settings.translation.engine_order,
        proxy = settings.network.proxy.is_some(),
        "settings loaded"
    );
    let facade = TranslationFacade::from_settings(&settings)?;

    if let Some(text) = config.text {
        println!(
            "{}",
            facade
                .get_translation_text(&text, &config.target_language)
                .await
        );
        return Ok(());
    }

    for line in io::stdin().lock().lines() {
        let line = line?;
        println!(
            "{}",
            facade
                .get_translation_text(&line, &config.target_language)
                .await
        );
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn parse_config(args: Vec<String>) -> Result<Option<CliConfig>, Box<dyn std::error::Error>> {
    let mut target_language = std::env::var("TRANSLATION_FAILOVER_CLI_TO")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_TARGET_LANGUAGE.to_string());
    let mut config_path = default_config_path();
    let mut verbose = false;
    let mut words = Vec::new();

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--to" => {
                let value = args
                    .get(i + 1)
                    .ok_or("missing value for --to")?
                    .trim()
                    .to_string();
                if value.is_empty() {
                    return Err("--to must be non-empty".into());
                }
                target_language = value;
                i += 2;
            }
            "--config" => {
                let value = args.get(i + 1).ok_or("missing value for --config")?;
                config_path = PathBuf::from(value);
                i += 2;
            }
            "--verbose" | "-v" => {
                verbose = true;
                i += 1;
            }
            "--help" | "-h" => {
                print_help();
                return Ok(None);
            }
            "--" => {
                words.extend(args[i + 1..].iter().cloned());
                break;
            }
            flag if flag.starts_with("--") => {
                return Err(format!("unknown argument: {flag}").into());
            }
            word => {
                words.push(word.to_string());
                i += 1;
            }
        }
    }

    Ok(Some(CliConfig {
        target_language,
        config_path,
        verbose,
        text: (!words.is_empty()).then(|| words.join(" ")),
    }))
}

fn print_help() {
    eprintln!(
        "usage: translate_cli [--to <lang>] [--config <path>] [--verbose] [text...]\n\
         \n\
         Translates the given text, or every stdin line when no text is given.\n\
         \n\
         options:\n  \
           --to <lang>       target language (default {DEFAULT_TARGET_LANGUAGE})\n  \
           --config <path>   INI file to read (default ./CONFIG.ini)\n  \
           -v, --verbose     debug logging (RUST_LOG overrides)\n  \
           -h, --help        show this help"
    );
}
