//! TX Gain probe CLI
//!
//! Drives the plugin logic against a real device without the host
//! application, printing what the host would have been told.
//!
//! Usage:
//!   txgain-probe set <address> <token> <db>
//!   txgain-probe rotate <address> <token> <count> <increment> <ticks>
//!   txgain-probe replay <events-file>
//!
//! A replay file holds one host event JSON object per line. Lines of the
//! form `sleep <ms>` pause between events (e.g. to hold a key past the
//! long-press threshold). Blank lines and `#` comments are skipped.

use anyhow::{anyhow, bail, Context, Result};
use std::collections::HashMap;
use std::env;
use std::sync::Arc;
use std::time::Duration;

use pbox_txgain::actions::VolumeDispatcher;
use pbox_txgain::config::{self, PluginConfig};
use pbox_txgain::device::VolumeClient;
use pbox_txgain::host::{ActionContext, HostEvent, MemoryContext, SharedContext};
use pbox_txgain::logging::init_logging;
use pbox_txgain::settings::ControlSettings;
use pbox_txgain::Plugin;

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  txgain-probe set <address> <token> <db>");
    eprintln!("  txgain-probe rotate <address> <token> <count> <increment> <ticks>");
    eprintln!("  txgain-probe replay <events-file>");
}

fn parse_i32(value: &str, what: &str) -> Result<i32> {
    value
        .parse()
        .with_context(|| format!("{} must be an integer, got {:?}", what, value))
}

fn report(ctx: &MemoryContext) {
    let settings = ctx.settings();
    println!(
        "{}: count={}dB writes={} images={} alerts={}",
        ctx.id(),
        settings.count,
        ctx.settings_writes(),
        ctx.images().len(),
        ctx.alerts()
    );
    for feedback in ctx.feedback() {
        println!("  feedback: {} ({}%)", feedback.value, feedback.indicator);
    }
}

async fn run_set(config: &PluginConfig, args: &[String]) -> Result<()> {
    let [address, token, db] = args else {
        bail!("set takes <address> <token> <db>");
    };
    let db = parse_i32(db, "db")?;
    let settings = ControlSettings {
        ip_address: address.clone(),
        token: token.clone(),
        ..Default::default()
    };

    let dispatcher = VolumeDispatcher::new(Arc::new(VolumeClient::new(config)?));
    let ctx = MemoryContext::keypad("probe", settings.clone());
    let applied = dispatcher.apply(&ctx, &settings, db).await;

    report(&ctx);
    if !applied {
        bail!("device did not accept {}dB", db);
    }
    Ok(())
}

async fn run_rotate(config: &PluginConfig, args: &[String]) -> Result<()> {
    let [address, token, count, increment, ticks] = args else {
        bail!("rotate takes <address> <token> <count> <increment> <ticks>");
    };
    let settings = ControlSettings {
        count: parse_i32(count, "count")?,
        increment_by: parse_i32(increment, "increment")?,
        ip_address: address.clone(),
        token: token.clone(),
    };

    let plugin = Plugin::new(config, Arc::new(VolumeClient::new(config)?));
    let ctx = MemoryContext::encoder("probe-dial", settings.clone());
    let level = plugin
        .dial()
        .on_dial_rotate(&ctx, &settings, parse_i32(ticks, "ticks")?)
        .await;

    println!("requested {}dB", level);
    report(&ctx);
    Ok(())
}

async fn run_replay(config: &PluginConfig, args: &[String]) -> Result<()> {
    let [path] = args else {
        bail!("replay takes <events-file>");
    };
    let content =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path))?;

    let plugin = Plugin::new(config, Arc::new(VolumeClient::new(config)?));
    let mut contexts: HashMap<String, Arc<MemoryContext>> = HashMap::new();

    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(ms) = line.strip_prefix("sleep ") {
            let ms: u64 = ms
                .trim()
                .parse()
                .with_context(|| format!("line {}: bad sleep", lineno + 1))?;
            tokio::time::sleep(Duration::from_millis(ms)).await;
            continue;
        }

        let event = HostEvent::from_json(line)
            .map_err(|e| anyhow!("line {}: invalid event: {}", lineno + 1, e))?;
        let Some(id) = event.context().map(str::to_string) else {
            tracing::debug!("line {}: skipping {}", lineno + 1, event.name());
            continue;
        };

        let ctx = contexts
            .entry(id.clone())
            .or_insert_with(|| {
                Arc::new(MemoryContext::new(
                    id,
                    event.controller(),
                    event.settings().cloned().unwrap_or_default(),
                ))
            })
            .clone();
        let shared: SharedContext = ctx;
        plugin.handle(event, shared).await;
    }

    // Let any armed long press run out before reporting.
    tokio::time::sleep(config.long_press() + Duration::from_millis(100)).await;

    let mut ids: Vec<_> = contexts.keys().cloned().collect();
    ids.sort();
    for id in ids {
        if let Some(ctx) = contexts.get(&id) {
            report(ctx);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load_config()?;
    init_logging(&config.log_filter);

    tracing::info!(
        "txgain-probe v{} ({})",
        env!("PBOX_VERSION"),
        env!("PBOX_GIT_SHA")
    );

    let args: Vec<String> = env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        print_usage();
        std::process::exit(2);
    };

    match command.as_str() {
        "set" => run_set(&config, rest).await,
        "rotate" => run_rotate(&config, rest).await,
        "replay" => run_replay(&config, rest).await,
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            print_usage();
            Err(anyhow!("unknown command: {}", other))
        }
    }
}
