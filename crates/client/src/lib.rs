//! # Signage Client
//!
//! HTTP implementation of [`ScheduleService`](signage_core::service::ScheduleService)
//! for stores that edit schedules held by a remote signage API server.

pub mod config;
pub mod service;

pub use config::ClientConfig;
pub use service::HttpScheduleService;
