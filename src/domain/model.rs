use crate::utils::error::{EtlError, Result};
use chrono::{NaiveDateTime, Timelike};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;

/// 單一儲存格的值，缺值以 `Missing` 表示而非空字串
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Date(NaiveDateTime),
    Missing,
}

impl Cell {
    /// 來源檔的空欄位視為缺值
    pub fn from_raw(raw: &str) -> Self {
        if raw.is_empty() {
            Cell::Missing
        } else {
            Cell::Text(raw.to_string())
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Date(dt) => {
                if dt.num_seconds_from_midnight() == 0 && dt.nanosecond() == 0 {
                    write!(f, "{}", dt.format("%Y-%m-%d"))
                } else if dt.nanosecond() == 0 {
                    write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S"))
                } else {
                    write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S%.f"))
                }
            }
            Cell::Missing => Ok(()),
        }
    }
}

/// 記錄表：所有列共用同一組欄位名稱
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn with_rows(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(EtlError::ProcessingError {
                message: format!(
                    "row {} has {} fields, expected {}",
                    self.rows.len() + 1,
                    row.len(),
                    self.columns.len()
                ),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Values of one column in row order; empty when the column does not exist.
    pub fn column_values<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Cell> + 'a {
        let idx = self.column_index(name);
        self.rows
            .iter()
            .filter_map(move |row| idx.map(|i| &row[i]))
    }

    /// 以欄位位置與原名稱產生新名稱
    pub fn rename_columns<F>(&mut self, mut rename: F)
    where
        F: FnMut(usize, &str) -> String,
    {
        for (idx, column) in self.columns.iter_mut().enumerate() {
            *column = rename(idx, column);
        }
    }

    pub fn map_column<F>(&mut self, idx: usize, mut convert: F)
    where
        F: FnMut(Cell) -> Cell,
    {
        for row in &mut self.rows {
            let cell = std::mem::replace(&mut row[idx], Cell::Missing);
            row[idx] = convert(cell);
        }
    }

    pub fn retain_rows<F>(&mut self, mut keep: F)
    where
        F: FnMut(&[Cell]) -> bool,
    {
        self.rows.retain(|row| keep(row));
    }
}

/// 依支出金額排序的類別加總，保留插入順序
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTotals(Vec<(String, f64)>);

impl CategoryTotals {
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[(String, f64)] {
        &self.0
    }

    pub fn get(&self, category: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, total)| *total)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CategoryTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, total)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:?}: {}", name, total)?;
        }
        f.write_str("}")
    }
}

impl Serialize for CategoryTotals {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, total) in &self.0 {
            map.serialize_entry(name, total)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total_revenue: f64,
    pub total_expenses: f64,
    pub net_profit: f64,
    pub top_expense_categories: CategoryTotals,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub cleaned: Table,
    pub summary: Summary,
    pub rows_loaded: usize,
    pub rows_dropped: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::Number(100.0).to_string(), "100");
        assert_eq!(Cell::Number(-12.5).to_string(), "-12.5");
        assert_eq!(Cell::Date(date(2024, 1, 2)).to_string(), "2024-01-02");
        assert_eq!(Cell::Missing.to_string(), "");
        assert_eq!(Cell::Text("rent".to_string()).to_string(), "rent");

        let with_time = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(Cell::Date(with_time).to_string(), "2024-01-02 09:30:00");
    }

    #[test]
    fn test_from_raw_marks_empty_as_missing() {
        assert!(Cell::from_raw("").is_missing());
        assert_eq!(Cell::from_raw(" x "), Cell::Text(" x ".to_string()));
    }

    #[test]
    fn test_push_row_rejects_ragged_rows() {
        let mut table = Table::new(vec!["date".to_string(), "amount".to_string()]);
        assert!(table.push_row(vec![Cell::Missing]).is_err());
        assert!(table
            .push_row(vec![Cell::Missing, Cell::Number(1.0)])
            .is_ok());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_column_values_of_absent_column_is_empty() {
        let table = Table::with_rows(
            vec!["amount".to_string()],
            vec![vec![Cell::Number(1.0)], vec![Cell::Number(2.0)]],
        )
        .unwrap();

        assert_eq!(table.column_values("amount").count(), 2);
        assert_eq!(table.column_values("category").count(), 0);
        assert_eq!(table.get(1, "amount"), Some(&Cell::Number(2.0)));
    }

    #[test]
    fn test_category_totals_display_and_json_keep_order() {
        let totals = CategoryTotals::new(vec![
            ("rent".to_string(), -300.0),
            ("payroll".to_string(), -12.5),
        ]);

        assert_eq!(totals.to_string(), r#"{"rent": -300, "payroll": -12.5}"#);
        assert_eq!(CategoryTotals::default().to_string(), "{}");

        let json = serde_json::to_string(&totals).unwrap();
        assert_eq!(json, r#"{"rent":-300.0,"payroll":-12.5}"#);
    }
}
