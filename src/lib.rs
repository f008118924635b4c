//! solar-relay - FusionSolar API relay and polling dashboard
//!
//! The relay forwards a handful of FusionSolar northbound endpoints, capturing
//! the vendor session token at login and attaching it on every later call.
//! The dashboard client logs in through the relay, polls real-time plant KPIs
//! and folds them into production/revenue totals.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod observability;
pub mod relay;
pub mod vendor;
