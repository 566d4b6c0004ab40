//! # Node Runtime Library
//!
//! Configuration loading and subsystem wiring for the Photo-Feed backend.
//! The main entry point is the `main.rs` binary.
//!
//! ## Wiring
//!
//! ```text
//! StoreConfig ──→ Post Store (memory | sqlite)
//!                      │
//!                      ├──→ Stream Assembler (StreamConfig)
//!                      │          │
//!                      └──────────┴──→ API Gateway (GatewayConfig)
//! ```

pub mod config;
pub mod runtime;

pub use config::{load_config, ConfigError, NodeConfig, StoreBackend, StoreConfig};
pub use runtime::{open_store, NodeRuntime};
