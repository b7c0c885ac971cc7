//! # Growkit Architecture
//!
//! Growkit is a **garden-planning library**: a typed model of a garden (beds,
//! plantings, tasks), a validation engine that finds spatial and temporal
//! conflicts, and a commit policy that keeps bad edits out of the saved plan.
//! The `growkit` binary is one client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Loads and saves through a DataStore                      │
//! │  - Normalizes inputs (bed names, id prefixes → UUIDs)       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Commit Policy (policy.rs) + Validation (validate.rs)       │
//! │  - Validated or unvalidated commits, batch commits          │
//! │  - Spacing, boundary and task-date checks                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs) over the model (model.rs)    │
//! │  - One function per edit, structural checks up front        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/, document.rs, schema.rs)             │
//! │  - JSON document codec with legacy migration                │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes Rust values and returns
//! `Result<CmdResult>`. It never prints and never exits. Diagnostics go
//! through `tracing`; the binary decides where they end up.
//!
//! ## Module Overview
//!
//! - [`model`]: Garden, Bed, Planting, Task and their value types
//! - [`validate`]: the validation engine
//! - [`commands`]: mutation operations and the [`commands::Mutation`] enum
//! - [`policy`]: commit modes and batch commits
//! - [`document`]: JSON persistence
//! - [`schema`]: JSON Schema export
//! - [`api`]: the facade used by every client
//! - [`store`]: storage backends
//! - [`config`], [`init`]: store configuration and discovery
//! - [`error`]: the crate error type

pub mod api;
pub mod commands;
pub mod config;
pub mod document;
pub mod error;
pub mod init;
pub mod model;
pub mod policy;
pub mod schema;
pub mod store;
pub mod validate;
