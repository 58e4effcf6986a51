//! # Site Atlas
//!
//! Filter and explore a map of archaeological sites by architectural
//! order, typology, age tag and historical period.
//!
//! The filtering and selection engine lives in the `site-atlas-core`
//! crate. This crate is the application shell around it: configuration,
//! logging, the filesystem dataset source, the HTTP surface used by the
//! map and filter controls, and the `atlas` operator commands.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │  FileSource  │──▶│   Session    │──▶│  Controller  │
//! │  (GeoJSON)   │   │ load once    │   │ filters+sel  │
//! └──────────────┘   └──────────────┘   └──────┬───────┘
//!                                              │
//!                          ┌───────────────────┤
//!                          ▼                   ▼
//!                     ┌──────────┐       ┌──────────┐
//!                     │   CLI    │       │   HTTP   │
//!                     │ (atlas)  │       │  (axum)  │
//!                     └──────────┘       └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! atlas periods                               # print the period table
//! atlas check                                 # load and summarise the dataset
//! atlas filter --order Doric --period classical
//! atlas serve                                 # start the HTTP server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`logging`] | `tracing` subscriber setup |
//! | [`source_file`] | Filesystem dataset source |
//! | [`server`] | HTTP surface |
//! | [`check`] | `atlas check` |
//! | [`filter_cmd`] | `atlas filter` |
//! | [`periods_cmd`] | `atlas periods` |

pub mod check;
pub mod config;
pub mod filter_cmd;
pub mod logging;
pub mod periods_cmd;
pub mod server;
pub mod source_file;
