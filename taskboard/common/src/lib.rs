//! Plumbing shared by the taskboard services: the volatile record store,
//! environment-driven configuration, tracing setup and the HTTP serving glue.

pub mod config;
pub mod store;
pub mod telemetry;
pub mod web;
