pub mod csv_source;
pub mod row_source;

pub use csv_source::{CsvRowSource, ErrorRow};
pub use row_source::RowSource;
