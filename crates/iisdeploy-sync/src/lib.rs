//! # iisdeploy-sync
//!
//! Pushes a prepared Web Deploy package to every server of an environment.
//!
//! This crate provides:
//! - Construction of `msdeploy -verb:sync` argument strings
//! - Resolution of the target server list from an [`Environment`]
//! - Sequential or bounded-parallel dispatch with per-server outcomes
//! - Cooperative cancellation between servers
//!
//! ## Example
//!
//! ```ignore
//! use iisdeploy_sync::{Credentials, DeployOptions, DeploymentDispatcher, ProcessRunner};
//! use iisdeploy_package::{ArchivePreparer, Environment, PlaceholderConfigurer};
//!
//! let environment = Environment::load("environments/production.toml")?;
//! let dispatcher =
//!     DeploymentDispatcher::new(ProcessRunner, ArchivePreparer::new(PlaceholderConfigurer));
//!
//! let report = dispatcher.deploy(
//!     "site.zip".as_ref(),
//!     "src/Web".as_ref(),
//!     &environment,
//!     &Credentials::new("deploy", "secret"),
//!     &DeployOptions::default(),
//! )?;
//! println!("{}", report);
//! ```

mod args;
mod cancel;
mod command;
mod dispatcher;
mod error;
mod report;
mod runner;
mod servers;

pub use args::ArgumentList;
pub use cancel::CancelSignal;
pub use command::{Credentials, SyncCommand, DISABLED_LINKS, MSDEPLOY_PROGRAM, SITE_PARAMETER};
pub use dispatcher::{DeployOptions, DeploymentDispatcher, DispatchMode, FailurePolicy};
pub use error::{Error, Result};
pub use report::{DeployReport, ServerOutcome, ServerReport};
pub use runner::{CommandRunner, ProcessRunner};
pub use servers::resolve_servers;

// Re-export iisdeploy-package types for convenience
pub use iisdeploy_package::{ArchivePreparer, Environment, PlaceholderConfigurer};
