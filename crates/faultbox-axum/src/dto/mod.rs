//! Data Transfer Objects (DTOs) for the HTTP API contract.
//!
//! Scenario and actuator responses keep the field names and string-typed
//! values existing clients and probes already parse.

pub mod actuator;
pub mod scenarios;

pub use actuator::{AppInfo, ComponentHealth, HealthComponents, HealthResponse, InfoResponse};
pub use scenarios::{
    BlockQuery, BlockResponse, CpuQuery, CpuResponse, HangQuery, HangResponse, PingResponse,
    ThreadStatusResponse,
};
