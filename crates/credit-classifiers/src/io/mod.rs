pub mod csv_table;

pub use csv_table::{read_table, write_results, ERROR_MARKER};
