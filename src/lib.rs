//! Beat-synchronized rhythm game library crate.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

#[cfg(feature = "desktop")]
#[cfg_attr(coverage_nightly, coverage(off))]
pub mod app;
#[cfg(feature = "desktop")]
#[cfg_attr(coverage_nightly, coverage(off))]
pub mod audio;
#[cfg_attr(coverage_nightly, coverage(off))]
pub mod error;
#[cfg_attr(coverage_nightly, coverage(off))]
pub mod events;
#[cfg_attr(coverage_nightly, coverage(off))]
pub mod formatter;
#[cfg_attr(coverage_nightly, coverage(off))]
pub mod platform;

pub mod beat;
pub mod cli;
pub mod config;
pub mod constants;
pub mod game;
pub mod summary;
pub mod systems;
