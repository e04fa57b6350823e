#![doc = include_str!("../README.md")]

pub mod annotation;
pub mod callset;
pub mod clade;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod group;
pub mod gvf;
pub mod merge;
pub mod report;
pub mod run;
pub mod utils;

#[doc(inline)]
#[cfg(feature = "cli")]
pub use crate::cli::Cli;
#[doc(inline)]
pub use crate::config::Config;
#[doc(inline)]
pub use crate::merge::merge;
#[doc(inline)]
pub use crate::run::{run, RunArgs};
