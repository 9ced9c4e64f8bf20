//! HTTP API 模块
//!
//! Input: ReportService, AccountDirectory, JwtManager
//! Output: axum Router
//! Pos: 面向浏览器的 JSON / CSV 接口层

mod auth_handlers;
mod error;
mod handlers;
pub mod jwt;
mod middleware;
mod router;
mod types;


pub use middleware::{AppState, cors_layer};
pub use router::create_router;
