use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser};
use tokio::runtime::Runtime;

use kas_price_chart::analysis::power_law_prices;
use kas_price_chart::utils::time_utils::{format_date, format_datetime, local_now};
use kas_price_chart::utils::{describe_reading, format_hashrate};
use kas_price_chart::{ChartEngine, Cli, Command, KaspaApi, Metric, ViewRequest, data};

const REPORT_TIMEOUT: Duration = Duration::from_secs(60);

fn main() -> Result<()> {
    // A. Init Logging
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {:?}", panic_info);
    }));
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    // B. Parse Args
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);

    // C. Load settings + master data set
    let mut engine = ChartEngine::open(args.storage_paths())?;

    match args.command {
        Some(Command::Watch { interval, count }) => watch(&mut engine, interval, count),
        None if engine.settings.auto_start => {
            log::info!("Auto-start is on, watching");
            watch(&mut engine, None, None)
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
        Some(Command::Import { files, only }) => {
            let count = engine.import(&files, only)?;
            println!("Imported {} samples ({} in store)", count, engine.store().len());
            Ok(())
        }
        Some(Command::Export { path, timespan }) => {
            let timespan = timespan.unwrap_or_else(|| engine.settings.time_span_view.clone());
            let rows = engine.export(&path, &timespan)?;
            println!("Exported {} rows to {}", rows, path.display());
            Ok(())
        }
        Some(Command::Report {
            timespan,
            start,
            end,
            extend_days,
            metric,
        }) => {
            if let Some(days) = extend_days {
                engine.settings.extend_lines_by_days = days;
            }
            let request = ViewRequest {
                timespan: timespan.unwrap_or_else(|| engine.settings.time_span_view.clone()),
                start,
                end,
            };
            report(&mut engine, &request, metric)
        }
    }
}

fn watch(engine: &mut ChartEngine, interval: Option<u32>, count: Option<usize>) -> Result<()> {
    if let Some(minutes) = interval {
        engine.settings.update_interval_minutes = minutes;
        engine.save_settings()?;
    }
    let api = KaspaApi::new()?;
    let rt = Runtime::new().context("Failed to create Tokio runtime")?;
    rt.block_on(data::watch(engine, &api, count))
}

fn report(engine: &mut ChartEngine, request: &ViewRequest, metric: Metric) -> Result<()> {
    let now = local_now();
    let view = engine.view(request, now);

    if let Some(latest) = engine.latest() {
        println!(
            "{}  Last Update: {}",
            describe_reading(latest.price, latest.hashrate),
            format_datetime(latest.timestamp)
        );
    }
    println!("View '{}': {} samples", request.timespan, view.len());

    engine.request_overlay(metric, view);
    if !engine.wait_until_idle(REPORT_TIMEOUT) {
        bail!("Power law fit did not finish within {:?}", REPORT_TIMEOUT);
    }

    for line in engine.get_diagnostics(metric) {
        println!("  {}", line);
    }
    if let (_, Some(error)) = engine.get_status(metric) {
        bail!("Power law fit failed: {}", error);
    }
    let Some(overlay) = engine.get_overlay(metric) else {
        println!("No {} overlay (not enough data)", metric);
        return Ok(());
    };

    let fit = &overlay.regression;
    if fit.is_nan() {
        println!("No {} overlay (no positive values in view)", metric);
        return Ok(());
    }
    println!(
        "{} power law: exponent {:.6}, constant {:.6e}, R² {:.4} (n = {})",
        metric, fit.exponent, fit.fair_price_constant, fit.r_squared, fit.n
    );

    let show = |value: f64| match metric {
        Metric::Price => format!("${:.4}", value),
        Metric::Hashrate => format_hashrate(value),
    };
    let (support, resistance, fair) =
        power_law_prices(fit.exponent, fit.fair_price_constant, overlay.genesis, now);
    println!(
        "Today: support {}  fair {}  resistance {}",
        show(support),
        show(fair),
        show(resistance)
    );
    if let Some(last) = overlay.bands.last() {
        println!(
            "{}: support {}  fair {}  resistance {}",
            format_date(last.date),
            show(last.support),
            show(last.fair),
            show(last.resistance)
        );
    }
    Ok(())
}
