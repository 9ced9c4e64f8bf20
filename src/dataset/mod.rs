//! 报表数据模块
//!
//! 从上游静态存储拉取 CSV，解析为类型化记录并计算汇总

pub mod parser;
pub mod query;
mod service;
mod source;
pub mod stats;
pub mod types;

pub use service::{ParseOptions, ReportService};
pub use source::BlobStore;
