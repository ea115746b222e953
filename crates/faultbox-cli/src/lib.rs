#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by main.rs binary
use dotenvy as _;
use tokio as _;
use tracing as _;

pub mod logging;
pub mod parser;

pub use logging::{LogFormat, init_tracing};
pub use parser::Cli;
