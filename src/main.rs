//! Resolve translation keys from the command line.
//!
//! Usage:
//!   scoped-locale [--scope <a.b>] [--set name=value]... <key>...
//!   scoped-locale --currency <amount> [<code>] [<locale>]
//!
//! Site strings are loaded first when LOCALE_STRINGS_URL is set.

use anyhow::{bail, Context, Result};
use scoped_locale::config::Config;
use scoped_locale::i18n::{
    get_localized_currency_string, Resolver, TranslateOptions, TranslationRegistry,
    DEFAULT_CURRENCY,
};
use scoped_locale::loader;
use tracing::info;

enum Command {
    Resolve {
        options: TranslateOptions,
        keys: Vec<String>,
    },
    Currency {
        amount: f64,
        currency: String,
        locale: Option<String>,
    },
}

fn parse_args(args: &[String]) -> Result<Command> {
    if args.first().map(String::as_str) == Some("--currency") {
        let amount = args
            .get(1)
            .context("--currency needs an amount")?
            .parse()
            .context("amount is not a number")?;
        return Ok(Command::Currency {
            amount,
            currency: args
                .get(2)
                .cloned()
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            locale: args.get(3).cloned(),
        });
    }

    let mut options = TranslateOptions::new();
    let mut keys = Vec::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--scope" => {
                options.scope = Some(iter.next().context("--scope needs a value")?.clone());
            }
            "--fallback" => {
                options.fallback = Some(iter.next().context("--fallback needs a value")?.clone());
            }
            "--set" => {
                let binding = iter.next().context("--set needs name=value")?;
                let (name, value) = binding
                    .split_once('=')
                    .with_context(|| format!("binding is not name=value: {}", binding))?;
                options = options.with(name, value);
            }
            key => keys.push(key.to_string()),
        }
    }

    if keys.is_empty() {
        bail!("usage: scoped-locale [--scope <a.b>] [--set name=value]... <key>...");
    }

    Ok(Command::Resolve { options, keys })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("scoped_locale=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_args(&args)?;

    match command {
        Command::Currency {
            amount,
            currency,
            locale,
        } => {
            let formatted =
                get_localized_currency_string(Some(amount), Some(&currency), locale.as_deref());
            println!("{}", formatted.unwrap_or_default());
        }
        Command::Resolve { options, keys } => {
            let config = Config::from_env()?;
            let registry = TranslationRegistry::global();
            loader::init(&reqwest::Client::new(), &registry, &config).await;

            info!("Resolving {} keys in {}", keys.len(), registry.get_locale());
            let t = Resolver::new(registry);
            for key in &keys {
                let value = t
                    .translate(key, &options)
                    .with_context(|| format!("Failed to resolve {}", key))?;
                println!("{} = {}", key, value);
            }
        }
    }

    Ok(())
}
