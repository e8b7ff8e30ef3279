pub mod progress_info;
pub mod summary;
