//! `config-locator`: resolve config service addresses from the command line.
//!
//! Prints the resolved endpoints once, or with `--watch SECS` keeps the locator running and
//! re-prints the cached set until Ctrl-C.

mod logging;

use std::time::Duration;

use clap::Parser;
use cli::{format_json, format_text, parse_property, SettingsOverlay};
use config::LocatorSettings;
use locator::{properties, ServiceLocator, CONFIG_SERVICE_PROPERTY};

const APP_NAME: &str = "config-locator";

#[derive(Parser, Debug)]
#[command(name = "config-locator")]
#[command(about = "Resolve config service addresses via override or meta service discovery")]
struct Args {
    /// Meta service base URL (default: APOLLO_META, config.toml, or http://apollo.meta)
    #[arg(long, value_name = "URL")]
    meta: Option<String>,

    /// Application id sent to the meta service (default: APP_ID or config.toml)
    #[arg(long, value_name = "ID")]
    app_id: Option<String>,

    /// Local IP reported to the meta service
    #[arg(long, value_name = "IP")]
    ip: Option<String>,

    /// Static config service URL list; disables remote discovery
    #[arg(long, value_name = "URLS")]
    config_service: Option<String>,

    /// Process-level property, repeatable (e.g. apollo.configService=http://host:8080)
    #[arg(short = 'D', long = "property", value_name = "KEY=VALUE")]
    properties: Vec<String>,

    /// Keep running and print the cached endpoints every SECS seconds
    #[arg(long, value_name = "SECS")]
    watch: Option<u64>,

    /// Print endpoints as a JSON array
    #[arg(long)]
    json: bool,

    /// When using --json, pretty-print
    #[arg(long)]
    pretty: bool,

    /// Verbose: log lookup attempts and trace events
    #[arg(short, long)]
    verbose: bool,
}

fn print_endpoints(
    endpoints: &[locator::ServiceEndpoint],
    json: bool,
    pretty: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", format_json(endpoints, pretty)?);
    } else {
        println!("{}", format_text(endpoints));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    logging::init(args.verbose).map_err(|e| -> Box<dyn std::error::Error> { e })?;

    for raw in &args.properties {
        let (key, value) = parse_property(raw)?;
        properties::set_property(key, value);
    }
    if let Some(urls) = &args.config_service {
        properties::set_property(CONFIG_SERVICE_PROPERTY, urls.as_str());
    }

    let overlay = SettingsOverlay {
        meta: args.meta.clone(),
        app_id: args.app_id.clone(),
        ip: args.ip.clone(),
    };
    let settings = overlay.apply(LocatorSettings::load(APP_NAME)?);
    tracing::debug!(?settings, "settings loaded");

    let locator = ServiceLocator::builder(settings).start().await?;
    let endpoints = match locator.get_endpoints().await {
        Ok(endpoints) => endpoints,
        Err(e) => {
            eprintln!("{}: {}", APP_NAME, e);
            locator.shutdown().await;
            std::process::exit(1);
        }
    };
    print_endpoints(&endpoints, args.json, args.pretty)?;

    if let Some(secs) = args.watch {
        let mut ticker = tokio::time::interval(Duration::from_secs(secs.max(1)));
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => break,
                _ = ticker.tick() => {
                    print_endpoints(&locator.cached_endpoints(), args.json, args.pretty)?;
                }
            }
        }
    }

    locator.shutdown().await;
    Ok(())
}
