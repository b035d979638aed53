//! The cdp-loadgen profile ingestion load generation tool.
//!
//! This library supports the cdp-loadgen binary found elsewhere in this
//! project. Events come from `cdp-loadgen-payload`, are pushed at an ingestion
//! endpoint by [`dispatch`], and the per-event outcomes are folded into a
//! [`report::Report`].

#![deny(clippy::all)]
#![deny(clippy::cargo)]
#![allow(clippy::cargo_common_metadata)]
#![deny(clippy::pedantic)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
#![deny(clippy::dbg_macro)]
#![deny(unused_extern_crates)]
#![deny(unused_allocation)]
#![deny(unused_assignments)]
#![deny(unused_comparisons)]
#![deny(unreachable_pub)]
#![deny(missing_docs)]
#![deny(missing_copy_implementations)]
#![deny(missing_debug_implementations)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::multiple_crate_versions)]

pub mod config;
pub mod dispatch;
pub mod persist;
pub mod report;
