pub mod json_writer;
pub mod summary;
pub mod xlsx_reader;
pub mod xlsx_writer;
