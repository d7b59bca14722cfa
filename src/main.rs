use anyhow::Context;
use clap::Parser;
use small_fin_etl::core::{ConfigProvider, Summary};
use small_fin_etl::utils::error::EtlError;
use small_fin_etl::utils::{logger, validation::Validate};
use small_fin_etl::{CliConfig, EtlEngine, FinancialPipeline, LocalStorage};
use std::io::{self, BufRead, Write};

fn main() -> anyhow::Result<()> {
    let mut config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting small-fin-etl CLI");

    // 未提供 --input 時改為互動式輸入
    if config.input.is_none() {
        config.input = Some(prompt_input_path().context("failed to read input path")?);
    }

    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 Run monitoring enabled");
    }

    // 創建存儲和管道
    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = FinancialPipeline::new(storage, config);

    // 創建ETL引擎並運行
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run() {
        Ok(report) => {
            print_summary(&report.summary);
            println!(
                "✅ Processed {} rows ({} kept)",
                report.rows_loaded, report.rows_retained
            );
            for path in &report.output_files {
                println!("📁 Output saved to: {}", path);
            }
        }
        Err(e) => {
            report_failure(&e);
            std::process::exit(e.severity().exit_code());
        }
    }

    Ok(())
}

fn prompt_input_path() -> io::Result<String> {
    print!("Enter path to the Sage-exported CSV file: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn print_summary(summary: &Summary) {
    println!();
    println!("📊 Financial Summary:");
    println!("total_revenue: {}", summary.total_revenue);
    println!("total_expenses: {}", summary.total_expenses);
    println!("net_profit: {}", summary.net_profit);
    println!(
        "top_expense_categories: {}",
        summary.top_expense_categories
    );
    println!();
}

fn report_failure(e: &EtlError) {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    // 輸出用戶友好的錯誤信息
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());
}
