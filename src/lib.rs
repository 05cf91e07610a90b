//! jjws library crate.
//!
//! The primary interface is the `jjws` binary. The library exposes the
//! workspace logic so integration tests can drive [`WorkspaceManager`]
//! against temporary directories with a scripted [`exec::CommandRunner`].

pub mod config;
pub mod error;
pub mod exec;
pub mod fsops;
pub mod layout;
pub mod listing;
pub mod names;
pub mod repo;
pub mod telemetry;
pub mod workspace;

pub use config::Config;
pub use error::WorkspaceError;
pub use workspace::WorkspaceManager;
