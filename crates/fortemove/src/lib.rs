//! Core of the Fortemove job-board platform: domain records, the list
//! query pipeline, bulk import/export, the role access policy, and the
//! HTTP surface the service binary mounts.

pub mod access;
pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod http;
pub mod import;
pub mod query;
pub mod services;
pub mod store;
pub mod telemetry;
