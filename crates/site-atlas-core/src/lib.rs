//! # Site Atlas Core
//!
//! The filtering and selection engine behind Site Atlas: data models,
//! record sanitizer, option index, period table, filter engine, selection
//! manager and the controller that ties them together.
//!
//! This crate contains no tokio, filesystem or network I/O. The only
//! asynchronous boundary is the [`source::DatasetSource`] trait, which the
//! application implements.
//!
//! ```text
//! raw FeatureCollection ──▶ sanitize ──▶ canonical Dataset ─┬─▶ OptionIndex
//!                                                           │
//!          FilterState + PeriodTable ──▶ filter::apply ◀────┘
//!                                            │
//!                                            ▼
//!                                   derived Dataset ──▶ Selection::reconcile
//! ```

pub mod controller;
pub mod error;
pub mod filter;
pub mod geojson;
pub mod models;
pub mod options;
pub mod periods;
pub mod sanitize;
pub mod selection;
pub mod session;
pub mod source;
