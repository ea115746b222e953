#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]

pub mod fanout;
pub mod lockboard;
pub mod scenarios;
pub mod status_log;
pub mod system;
pub mod workers;

pub use fanout::FanOut;
pub use lockboard::{HoldOutcome, LockBoard, LockStatus};
pub use scenarios::{CpuBurnOutcome, HangOutcome, ScenarioError, burn_cpu, hang};
pub use status_log::{StatusLogConfig, StatusLogger};
pub use system::{SystemProbe, SystemSnapshot};
pub use workers::{WorkerLease, WorkerPool, WorkerPoolError};
