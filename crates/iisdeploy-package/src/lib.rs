//! # iisdeploy-package
//!
//! Prepares a Web Deploy (msdeploy) package for one environment.
//!
//! This crate provides:
//! - Typed deployment environments loaded from TOML
//! - Zip package extraction into a scoped temporary directory
//! - Lookup of the `Web.config` inside the extracted package
//! - Rendering of `web.template.config` over that file
//! - Removal of `XmlFile` parameters from `parameters.xml`
//!
//! ## Example
//!
//! ```ignore
//! use iisdeploy_package::{ArchivePreparer, Environment, PlaceholderConfigurer};
//!
//! let environment = Environment::load("environments/staging.toml")?;
//! let preparer = ArchivePreparer::new(PlaceholderConfigurer);
//! let archive = preparer.prepare("site.zip".as_ref(), "src/Web".as_ref(), &environment, false)?;
//!
//! println!("ready: {}", archive.path().display());
//! // the directory is removed when `archive` is dropped
//! ```

mod builder;
mod environment;
mod error;
mod extract;
mod locate;
mod parameters;
mod prepare;
mod template;

pub use builder::PackageBuilder;
pub use environment::{Environment, SERVERS_KEY, SERVER_KEY, SITE_KEY};
pub use error::{Error, Result};
pub use extract::{extract_archive, LogProgress, ProgressSink};
pub use locate::{locate_config, CONFIG_FILE_NAME};
pub use parameters::{prune_document, prune_parameters, PARAMETERS_FILE_NAME, XML_FILE_KIND};
pub use prepare::{ArchivePreparer, PreparedArchive, TEMPLATE_FILE_NAME};
pub use template::{PlaceholderConfigurer, TemplateConfigurer};
