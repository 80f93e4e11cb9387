use clap::Parser;
use oib_check::utils::{logger, validation::Validate};
use oib_check::{complete, BatchPipeline, CliConfig, LocalStorage, Oib, ValidationEngine};

/// Checks the values given on the command line. Returns false if any failed.
fn check_values(config: &CliConfig) -> bool {
    let mut all_ok = true;

    for value in &config.values {
        if config.complete {
            match complete(value.trim()) {
                Some(oib) => println!("{}", oib),
                None => {
                    all_ok = false;
                    eprintln!("❌ {}: expected exactly 10 digits", value);
                }
            }
            continue;
        }

        match Oib::parse(value.trim()) {
            Ok(oib) => println!("VALID    {}", oib),
            Err(e) => {
                all_ok = false;
                tracing::debug!("{} rejected: {:?}", value, e);
                println!("INVALID  {} ({})", value, e);
            }
        }
    }

    all_ok
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if !config.is_batch() {
        if !check_values(&config) {
            std::process::exit(1);
        }
        return Ok(());
    }

    tracing::info!("Starting oib-check batch run");
    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let pipeline = BatchPipeline::new(LocalStorage::default(), config);
    let engine = ValidationEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(outcome) => {
            let summary = outcome.summary;
            println!(
                "✅ Checked {} records: {} valid, {} empty, {} invalid",
                summary.total, summary.valid, summary.empty, summary.invalid
            );
            for path in &outcome.written {
                println!("📁 Report saved to: {}", path);
            }

            // 有无效记录时以 1 退出，方便脚本判断
            let exit_code = outcome.exit_code();
            if exit_code > 0 {
                tracing::warn!("⚠️ {} invalid records found", summary.invalid);
                std::process::exit(exit_code);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Validation run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
