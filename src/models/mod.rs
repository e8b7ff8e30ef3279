pub mod job;
pub mod job_result;
pub mod progress;
pub mod summary_status;
pub mod tracker_state;
