pub mod aggregator;
pub mod cleaner;
pub mod etl;
pub mod loader;
pub mod pipeline;
pub mod reporter;

pub use crate::domain::model::{CategoryTotals, Cell, Summary, Table, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
