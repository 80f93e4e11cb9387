use anyhow::Context;
use clap::Parser;
use oib_check::config::toml_config::TomlConfig;
use oib_check::core::ConfigProvider;
use oib_check::utils::{logger, validation::Validate};
use oib_check::{BatchPipeline, LocalStorage, ValidationEngine};

#[derive(Parser)]
#[command(name = "oib-batch")]
#[command(about = "Batch OIB validation driven by a TOML job file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "oib-job.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Write only invalid records, whatever the config says
    #[arg(long)]
    only_invalid: bool,

    /// Dry run - show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if config.json_logs() {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if args.only_invalid {
        config.load.only_invalid = Some(true);
        tracing::info!("🔧 Reporting only invalid records");
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated: {}", config);
    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        perform_dry_run(&config).await?;
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let pipeline = BatchPipeline::new(LocalStorage::default(), config);
    let engine = ValidationEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(outcome) => {
            let summary = outcome.summary;
            println!("✅ Job finished");
            println!(
                "  Records: {} ({} valid, {} empty, {} invalid)",
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
                "❌ Job failed: {} (Category: {:?}, Severity: {:?})",
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

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Job: {}", config.job.name);
    if let Some(description) = &config.job.description {
        println!("  Description: {}", description);
    }
    println!("  Source: {} ({:?})", config.input_path(), config.input_format());
    println!("  Output: {}", config.output_path());
    println!(
        "  Formats: {}",
        config
            .output_formats()
            .iter()
            .map(|f| f.file_name())
            .collect::<Vec<_>>()
            .join(", ")
    );

    if let Some(max_records) = config.max_records() {
        println!("  Max Records: {}", max_records);
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

async fn perform_dry_run(config: &TomlConfig) -> anyhow::Result<()> {
    println!("🔍 Dry Run Analysis:");
    println!();

    // 輸入分析
    let input = config.input_path();
    let metadata = tokio::fs::metadata(input)
        .await
        .with_context(|| format!("input file '{}' is not readable", input))?;
    println!("📥 Input:");
    println!("  Path: {} ({} bytes)", input, metadata.len());
    println!("  Format: {:?}", config.input_format());
    if config.has_headers() {
        println!(
            "  Column: '{}' (by header name)",
            config.column().unwrap_or(oib_check::core::pipeline::DEFAULT_COLUMN)
        );
    } else {
        println!("  Column: index {}", config.column().unwrap_or("0"));
    }
    println!("  Delimiter: {:?}", config.delimiter());

    // 欄位規則
    println!();
    println!("⚙️ Field Rules:");
    let policy = config.field_policy();
    println!("  Required: {}", policy.required);
    println!("  Information collector: {}", policy.information_collector);
    println!("  Context: {:?}", config.input_context());

    // 輸出分析
    println!();
    println!("💾 Output Configuration:");
    println!("  Path: {}", config.output_path());
    println!("  Only invalid: {}", config.only_invalid());
    match config.archive_name() {
        Some(archive) => println!("  Compression: {} (ZIP)", archive),
        None => println!("  Compression: off"),
    }

    println!();
    println!("✅ Dry run completed - configuration appears valid");
    Ok(())
}
