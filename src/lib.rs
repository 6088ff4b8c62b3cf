//! # Taskboard
//!
//! An in-memory task tracker served over HTTP.
//!
//! This library provides:
//! - A task store with category filtering, multi-field sorting and partial
//!   updates
//! - A closed task status type with a canonical string form
//! - An HTTP API exposing the store
//!
//! ## Request Flow
//! 1. Handler parses the path id and JSON body
//! 2. Store lock is taken (read for queries, write for mutations)
//! 3. Store validates, then applies the operation
//! 4. Result or error is rendered as JSON
//!
//! ## Modules
//! - `task`: Task types, status and the store
//! - `api`: HTTP routes and error mapping
//! - `config`: Environment-driven server configuration

pub mod api;
pub mod config;
pub mod task;

pub use config::Config;
pub use task::{Task, TaskStatus, TaskStore};
