//! Find-keys dev tool - searches loaded translations by value
//!
//! Usage:
//!   find-keys <text>...             # Keys whose value contains any <text> (case-insensitive)
//!   find-keys --regex <pattern>     # Keys whose value matches <pattern>
//!   find-keys --at <scope>          # Everything registered under <scope>
//!
//! Required environment variables:
//! - LOCALE_STRINGS_URL
//!
//! Optional:
//! - LOCALE (host locale override)
//! - DEFAULT_LOCALE (defaults to en)

use anyhow::{bail, Context, Result};
use scoped_locale::config::Config;
use scoped_locale::i18n::{find_locale_keys, KeyPredicate, TranslationRegistry};
use scoped_locale::loader;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("scoped_locale=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        bail!("usage: find-keys <text>... | --regex <pattern> | --at <scope>");
    }

    let config = Config::from_env()?;
    if config.strings_base_url.is_none() {
        bail!("LOCALE_STRINGS_URL not set");
    }

    let registry = TranslationRegistry::global();
    if !loader::init(&reqwest::Client::new(), &registry, &config).await {
        warn!("No site strings loaded; results will be empty");
    }

    let found = match args[0].as_str() {
        "--at" => {
            let scope = args.get(1).context("--at needs a scope")?;
            registry.available_translations(scope)
        }
        "--regex" => {
            let pattern = args.get(1).context("--regex needs a pattern")?;
            find_locale_keys(&registry.snapshot(), &KeyPredicate::pattern(pattern)?)
        }
        _ => {
            let predicate =
                KeyPredicate::any(args.iter().map(|text| KeyPredicate::contains(text.as_str())).collect());
            find_locale_keys(&registry.snapshot(), &predicate)
        }
    };

    match found {
        Some(tree) => println!("{}", serde_json::to_string_pretty(&tree)?),
        None => info!("No matching translations"),
    }

    Ok(())
}
