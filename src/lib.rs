//! Tracking of asynchronous identity batch imports.
//!
//! A batch endpoint accepts a CSV upload and answers with a job identifier; the
//! [`tracker::Tracker`] then polls `{endpoint}/{job}/status` until the job is
//! complete and fetches `{endpoint}/{job}` once for the per-record outcome.

pub mod config;
pub mod core;
pub mod error;
pub mod http;
pub mod models;
pub mod tracker;
pub mod utils;
pub mod widgets;
