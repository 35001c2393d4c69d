pub mod body;
pub mod header_utils;
pub mod temp_file;
