pub mod aggregation;
pub mod etl;
pub mod pipeline;
pub mod validation;

pub use crate::domain::model::{Dataset, Row};
pub use crate::domain::ports::{ConfigProvider, Pipeline};
pub use crate::utils::error::Result;
