use crate::core::cleaner::AMOUNT_COLUMN;
use crate::core::{CategoryTotals, Summary, Table};

pub const CATEGORY_COLUMN: &str = "category";
pub const DEFAULT_TOP_CATEGORIES: usize = 5;

pub struct Aggregator {
    top_categories: usize,
}

impl Aggregator {
    pub fn new(top_categories: usize) -> Self {
        Self { top_categories }
    }

    pub fn aggregate(&self, table: &Table) -> Summary {
        let amounts: Vec<f64> = table
            .column_values(AMOUNT_COLUMN)
            .filter_map(|cell| cell.as_number())
            .collect();

        // 空集合的 f64 sum 為 -0.0，從 0.0 起算避免輸出 "-0"
        let total_revenue = amounts
            .iter()
            .filter(|a| **a > 0.0)
            .fold(0.0, |acc, a| acc + a);
        let total_expenses = amounts
            .iter()
            .filter(|a| **a < 0.0)
            .fold(0.0, |acc, a| acc + a);

        let summary = Summary {
            total_revenue,
            total_expenses,
            net_profit: total_revenue + total_expenses,
            top_expense_categories: self.top_expense_categories(table),
        };

        tracing::debug!("Computed summary: {:?}", summary);
        summary
    }

    fn top_expense_categories(&self, table: &Table) -> CategoryTotals {
        let (Some(amount_idx), Some(category_idx)) = (
            table.column_index(AMOUNT_COLUMN),
            table.column_index(CATEGORY_COLUMN),
        ) else {
            return CategoryTotals::default();
        };

        // 依首次出現順序分組
        let mut groups: Vec<(String, f64)> = Vec::new();
        for row in table.rows() {
            let Some(amount) = row[amount_idx].as_number().filter(|a| *a < 0.0) else {
                continue;
            };
            if row[category_idx].is_missing() {
                continue;
            }

            let category = row[category_idx].to_string();
            match groups.iter_mut().find(|(name, _)| *name == category) {
                Some((_, total)) => *total += amount,
                None => groups.push((category, amount)),
            }
        }

        // sort_by 為穩定排序，相同金額維持首次出現順序
        groups.sort_by(|a, b| a.1.total_cmp(&b.1));
        groups.truncate(self.top_categories);

        CategoryTotals::new(groups)
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_CATEGORIES)
    }
}
