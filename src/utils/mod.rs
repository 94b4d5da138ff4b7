mod file_utils;
mod regex_patterns;

pub use file_utils::{
    dataset_stem, is_checked_file, is_store_file, is_xlsx_file, OutputPaths, CHECKED_MARKER,
};
pub use regex_patterns::{clean_digits, is_sql_identifier, NON_DIGIT, SQL_IDENTIFIER};
