//! # catpaw
//!
//! Bootstrap toolkit for the Catpaw crawl server: environment
//! normalization, configuration assembly, and sanitized fault logging.
//!
//! The crawl engine itself lives behind the [`server::Server`] trait.
//! This crate prepares the engine's configuration (defaults file, port
//! variables, site list, provider secrets) and hands it over exactly
//! once.

pub mod bootstrap;
pub mod config;
pub mod env;
pub mod error;
pub mod server;
pub mod telemetry;
