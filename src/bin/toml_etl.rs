use clap::Parser;
use small_fin_etl::core::ConfigProvider;
use small_fin_etl::utils::{logger, validation::Validate};
use small_fin_etl::{EtlEngine, FinancialPipeline, LocalStorage, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-etl")]
#[command(about = "Financial export cleaner driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "etl-config.toml")]
    config: String,

    /// Override source.input_path from config
    #[arg(short, long)]
    input: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Dry run - show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
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

    // 初始化日誌，--verbose 優先於配置檔的 log_level
    match config.log_level() {
        Some(level) if !args.verbose => logger::init_with_level(level),
        _ => logger::init_cli_logger(args.verbose),
    }

    tracing::info!("🚀 Starting TOML-based financial ETL");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(input) = args.input.clone() {
        tracing::info!("🔧 Input path overridden to: {}", input);
        config.source.input_path = Some(input);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    // 顯示配置摘要
    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        perform_dry_run(&config);
        return Ok(());
    }

    // 決定監控設定
    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = FinancialPipeline::new(storage, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run() {
        Ok(report) => {
            println!("📊 Financial Summary:");
            println!("total_revenue: {}", report.summary.total_revenue);
            println!("total_expenses: {}", report.summary.total_expenses);
            println!("net_profit: {}", report.summary.net_profit);
            println!(
                "top_expense_categories: {}",
                report.summary.top_expense_categories
            );
            println!("✅ ETL process completed successfully!");
            for path in &report.output_files {
                println!("📁 Output saved to: {}", path);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            std::process::exit(e.severity().exit_code());
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!(
        "  Pipeline: {} v{}",
        config.pipeline.name, config.pipeline.version
    );
    println!("  Input: {}", config.input_path());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    println!("  Top Categories: {}", config.top_categories());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) {
    println!("🔍 Dry Run Analysis:");
    println!();

    // 來源分析
    println!("📂 Data Source:");
    println!("  File: {}", config.input_path());
    println!("  Delimiter: {:?}", config.delimiter() as char);
    println!(
        "  Exists: {}",
        std::path::Path::new(config.input_path()).exists()
    );

    // 清理設定
    println!();
    println!("🧹 Cleaning:");
    println!("  Column names: trimmed, lowercased, spaces → underscores");
    if config.date_formats().is_empty() {
        println!("  Date formats: built-in only");
    } else {
        println!("  Date formats: {} custom + built-in", config.date_formats().len());
    }
    println!("  Lenient amounts: {}", config.lenient_amounts());

    // 輸出分析
    println!();
    println!("💾 Output Files:");
    println!("  {}/{}", config.output_path(), config.summary_filename());
    println!("  {}/{}", config.output_path(), config.cleaned_filename());
    for format in config.output_formats() {
        match format.as_str() {
            "tsv" => println!("  + tab-separated copy of the cleaned data"),
            "json" => println!("  + JSON copy of the summary"),
            _ => {}
        }
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
}
