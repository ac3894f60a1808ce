//! Cadence - keeps epic start and end dates consistent with the epics that
//! block them.
//!
//! The crate reads epics from an [`IssueSource`](source::IssueSource),
//! builds a dependency [`Graph`](graph::Graph), repairs dates with
//! [`schedule::repair_dates`], and renders the result as Graphviz, text
//! reports or a business-day calendar.

#![forbid(unsafe_code)]

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod graph;
pub mod render;
pub mod schedule;
pub mod source;
pub mod writeback;

pub use error::{Error, Result};
