//! Process-log input format and random trace generation for tracecop.

pub mod generator;
pub mod log;

pub use log::ProcessLog;
