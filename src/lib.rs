//! pingstats - day and week uptime/latency metrics from a website monitoring provider.
//!
//! The [`metrics::Metrics`] entry points fetch raw telemetry through a
//! [`provider::MonitoringProvider`] and reduce it to calendar-day buckets.

pub mod config;
pub mod metrics;
pub mod provider;
