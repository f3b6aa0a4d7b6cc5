//! Linkhub - a link-in-bio service
//!
//! Each user owns a public page (`/{username}`) listing their active links in
//! a user-defined order, plus an authenticated API to manage links, profile
//! and social links.
//!
//! # Architecture
//! - `validation`: field rules for links, profiles and social links
//! - `rate_limit`: fixed-window admission per user and operation
//! - `storage`: SeaORM backends and the store traits
//! - `services`: link, profile and auth business logic
//! - `api`: HTTP handlers, middleware and sessions
//! - `config`: TOML + environment configuration
//! - `runtime`: startup, server mode and shutdown
//! - `system`: logging

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod rate_limit;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
pub mod validation;
