use crate::core::{Summary, Table};
use crate::utils::error::{EtlError, Result};
use csv::WriterBuilder;

pub const DEFAULT_CLEANED_FILENAME: &str = "cleaned_data.csv";
pub const DEFAULT_SUMMARY_FILENAME: &str = "financial_summary.txt";

/// 將記錄表序列化為分隔文字，含標題列、不含索引欄
pub fn write_table(table: &Table, delimiter: u8) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }

    writer.into_inner().map_err(|e| EtlError::ProcessingError {
        message: format!("failed to flush table output: {}", e.error()),
    })
}

pub fn render_summary(summary: &Summary) -> String {
    format!(
        "total_revenue: {}\ntotal_expenses: {}\nnet_profit: {}\ntop_expense_categories: {}\n",
        summary.total_revenue,
        summary.total_expenses,
        summary.net_profit,
        summary.top_expense_categories
    )
}

pub fn summary_json(summary: &Summary) -> Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}
