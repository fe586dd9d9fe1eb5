//! iisdeploy: push a Web Deploy package to the IIS servers of an environment.
//!
//! # Usage
//!
//! ```bash
//! iisdeploy build/Site.zip --project src/Site --environment env/production.toml \
//!     --username deploy --password secret --parallel 4
//! ```

use clap::Parser;
use env_logger::Env;
use iisdeploy_package::{ArchivePreparer, Environment, LogProgress, PlaceholderConfigurer};
use iisdeploy_sync::{
    CancelSignal, Credentials, DeployOptions, DeploymentDispatcher, DispatchMode, Error,
    FailurePolicy, ProcessRunner, MSDEPLOY_PROGRAM,
};
use log::{error, info, warn};
use std::fs;
use std::path::PathBuf;
use std::process;

/// Configure a Web Deploy package for one environment and sync it to IIS.
///
/// The package's Web.config is rendered from `web.template.config` in the
/// project directory, XmlFile parameters are dropped from parameters.xml,
/// and `msdeploy -verb:sync` runs once per server.
#[derive(Parser, Debug)]
#[command(name = "iisdeploy")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the zip package produced by the web project build
    #[arg(value_name = "PACKAGE")]
    package: PathBuf,

    /// Web project directory holding web.template.config
    #[arg(short, long, value_name = "DIR")]
    project: PathBuf,

    /// TOML file with `site`, `servers`/`server` and template variables
    #[arg(short, long, value_name = "FILE")]
    environment: PathBuf,

    /// Username for the remote agent
    #[arg(short, long, default_value = "")]
    username: String,

    /// Password for the remote agent
    #[arg(long, default_value = "")]
    password: String,

    /// Sync up to N servers at once instead of one after another
    #[arg(long, value_name = "N")]
    parallel: Option<usize>,

    /// Keep deploying to the remaining servers after a failure
    #[arg(long)]
    continue_on_error: bool,

    /// Leave the extracted archive directory on disk
    #[arg(long)]
    keep_archive: bool,

    /// Web Deploy client to invoke
    #[arg(long, default_value = MSDEPLOY_PROGRAM)]
    msdeploy: String,

    /// Write the per-server report as JSON to this file
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Enable verbose logging and per-entry extraction output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    if !args.package.is_file() {
        error!("Package not found: {}", args.package.display());
        process::exit(1);
    }

    let environment = match Environment::load(&args.environment) {
        Ok(env) => env,
        Err(e) => {
            error!(
                "Failed to load environment {}: {}",
                args.environment.display(),
                e
            );
            process::exit(1);
        }
    };

    let cancel = CancelSignal::new();
    {
        let cancel = cancel.clone();
        if let Err(e) = ctrlc::set_handler(move || {
            warn!("Interrupt received, stopping before the next server");
            cancel.cancel();
        }) {
            warn!("Could not install Ctrl-C handler: {}", e);
        }
    }

    let options = DeployOptions {
        verbose: args.verbose,
        keep_archive: args.keep_archive,
        program: args.msdeploy.clone(),
        dispatch: match args.parallel {
            Some(max_workers) => DispatchMode::Parallel { max_workers },
            None => DispatchMode::Sequential,
        },
        failure_policy: if args.continue_on_error {
            FailurePolicy::ContinueOnError
        } else {
            FailurePolicy::FailFast
        },
    };
    let credentials = Credentials::new(args.username.clone(), args.password.clone());

    let preparer = ArchivePreparer::new(PlaceholderConfigurer).with_progress(LogProgress);
    let dispatcher =
        DeploymentDispatcher::new(ProcessRunner, preparer).with_cancel_signal(cancel);

    info!(
        "Deploying {} to site {}",
        args.package.display(),
        environment.site()
    );
    let result = dispatcher.deploy(
        &args.package,
        &args.project,
        &environment,
        &credentials,
        &options,
    );

    let report = match &result {
        Ok(report) => Some(report),
        Err(Error::Rollout(report)) => Some(report),
        Err(_) => None,
    };
    if let (Some(report), Some(path)) = (report, &args.report) {
        let written = report
            .to_json()
            .map_err(Error::from)
            .and_then(|json| fs::write(path, json).map_err(Error::from));
        if let Err(e) = written {
            error!("Failed to write report {}: {}", path.display(), e);
        }
    }

    match result {
        Ok(report) => info!("Deployment finished: {}", report),
        Err(e) => {
            error!("Deployment failed: {}", e);
            process::exit(1);
        }
    }
}
