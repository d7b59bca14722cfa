use crate::core::{Cell, Table};
use crate::utils::error::{EtlError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::HashSet;

pub const DATE_COLUMN: &str = "date";
pub const AMOUNT_COLUMN: &str = "amount";

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

// 月份在前的格式優先於日在前的格式
const DATE_FORMATS: [&str; 10] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// 空白標題依位置命名為 `unnamed_{idx}`，其餘照常正規化
pub fn column_identifier(idx: usize, name: &str) -> String {
    let normalized = normalize_column_name(name);
    if normalized.is_empty() {
        format!("unnamed_{}", idx)
    } else {
        normalized
    }
}

#[derive(Debug, Clone, Default)]
pub struct Cleaner {
    date_formats: Vec<String>,
    lenient_amounts: bool,
}

impl Cleaner {
    pub fn new(date_formats: Vec<String>, lenient_amounts: bool) -> Self {
        Self {
            date_formats,
            lenient_amounts,
        }
    }

    pub fn clean(&self, mut table: Table) -> Result<Table> {
        table.rename_columns(column_identifier);
        ensure_unique_columns(&table)?;

        let amount_idx =
            table
                .column_index(AMOUNT_COLUMN)
                .ok_or_else(|| EtlError::MissingColumnError {
                    column: AMOUNT_COLUMN.to_string(),
                })?;

        if let Some(date_idx) = table.column_index(DATE_COLUMN) {
            table.map_column(date_idx, |cell| self.coerce_date(cell));
        } else {
            tracing::debug!("No '{}' column, skipping date coercion", DATE_COLUMN);
        }

        table.map_column(amount_idx, |cell| self.coerce_amount(cell));

        let before = table.len();
        table.retain_rows(|row| !row[amount_idx].is_missing());
        let dropped = before - table.len();
        if dropped > 0 {
            tracing::info!(
                "🧹 Dropped {} of {} rows with a missing or invalid amount",
                dropped,
                before
            );
        }

        Ok(table)
    }

    fn coerce_date(&self, cell: Cell) -> Cell {
        match cell {
            Cell::Date(_) => cell,
            Cell::Text(raw) => self
                .parse_date(&raw)
                .map(Cell::Date)
                .unwrap_or(Cell::Missing),
            Cell::Number(_) | Cell::Missing => Cell::Missing,
        }
    }

    fn coerce_amount(&self, cell: Cell) -> Cell {
        match cell {
            Cell::Number(n) if n.is_finite() => cell,
            Cell::Text(raw) => {
                let parsed = if self.lenient_amounts {
                    parse_lenient_amount(&raw)
                } else {
                    parse_amount(&raw)
                };
                parsed.map(Cell::Number).unwrap_or(Cell::Missing)
            }
            _ => Cell::Missing,
        }
    }

    pub fn parse_date(&self, raw: &str) -> Option<NaiveDateTime> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }

        for fmt in &self.date_formats {
            if let Some(dt) = parse_with_format(s, fmt) {
                return Some(dt);
            }
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.naive_utc());
        }

        DATETIME_FORMATS
            .iter()
            .chain(DATE_FORMATS.iter())
            .find_map(|fmt| parse_with_format(s, fmt))
    }
}

fn parse_with_format(s: &str, fmt: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, fmt).ok().or_else(|| {
        NaiveDate::parse_from_str(s, fmt)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    })
}

fn ensure_unique_columns(table: &Table) -> Result<()> {
    let mut seen = HashSet::new();
    for column in table.columns() {
        if !seen.insert(column.as_str()) {
            return Err(EtlError::DuplicateColumnError {
                column: column.clone(),
            });
        }
    }
    Ok(())
}

/// 嚴格的數值解析，NaN 與無限大視為缺值
pub fn parse_amount(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// 會計匯出格式：`$1,234.50`、`(30.00)`、`€ 12`、`EUR 12`、`1,234.50 CR`
pub fn parse_lenient_amount(raw: &str) -> Option<f64> {
    let s = raw.trim();

    let (mut negative, s) = match s.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        Some(inner) => (true, inner.trim()),
        None => (false, s),
    };

    let mut number = String::new();
    let mut word = String::new();
    // 結尾補一個空白，讓最後一個字母片段也會被處理
    for c in s.chars().chain(std::iter::once(' ')) {
        if c.is_alphabetic() {
            word.push(c);
            continue;
        }
        if !word.is_empty() {
            match amount_marker(&word)? {
                AmountMarker::Credit => negative = true,
                AmountMarker::Debit | AmountMarker::Currency => {}
            }
            word.clear();
        }
        match c {
            '0'..='9' | '.' | '-' | '+' => number.push(c),
            ',' | '\'' => {}
            c if c.is_whitespace() || CURRENCY_SYMBOLS.contains(&c) => {}
            _ => return None,
        }
    }

    let amount = parse_amount(&number)?;
    if negative && amount > 0.0 {
        Some(-amount)
    } else {
        Some(amount)
    }
}

const CURRENCY_SYMBOLS: [char; 10] = ['$', '€', '£', '¥', '₹', '¢', '₩', '₽', '₺', '₦'];

enum AmountMarker {
    Credit,
    Debit,
    Currency,
}

// 只接受 CR/DR 與三碼大寫幣別代碼，其他文字代表此欄不是金額
fn amount_marker(word: &str) -> Option<AmountMarker> {
    if word.eq_ignore_ascii_case("cr") {
        Some(AmountMarker::Credit)
    } else if word.eq_ignore_ascii_case("dr") {
        Some(AmountMarker::Debit)
    } else if word.len() == 3 && word.chars().all(|c| c.is_ascii_uppercase()) {
        Some(AmountMarker::Currency)
    } else {
        None
    }
}
