pub mod delimiter;
pub mod extractor;

pub use delimiter::{detect, DEFAULT_DELIMITERS};
pub use extractor::{parse_field_list, read_source, CsvExtractor};
