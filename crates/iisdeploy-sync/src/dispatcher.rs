use crate::{
    resolve_servers, CancelSignal, CommandRunner, Credentials, DeployReport, Error, Result,
    ServerOutcome, ServerReport, SyncCommand, MSDEPLOY_PROGRAM,
};
use iisdeploy_package::{ArchivePreparer, Environment, TemplateConfigurer};
use log::{info, warn};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;

/// How per-server synchronisations are scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DispatchMode {
    /// One server after another, in listed order.
    #[default]
    Sequential,
    /// Up to `max_workers` servers at once.
    Parallel { max_workers: usize },
}

/// What to do with the remaining servers after one fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Skip every server not yet contacted.
    #[default]
    FailFast,
    /// Keep going and report every failure.
    ContinueOnError,
}

/// Per-call deployment settings.
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// Report each extracted package entry.
    pub verbose: bool,
    /// Leave the archive directory on disk after the run.
    pub keep_archive: bool,
    /// Program invoked once per server.
    pub program: String,
    pub dispatch: DispatchMode,
    pub failure_policy: FailurePolicy,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            keep_archive: false,
            program: MSDEPLOY_PROGRAM.to_string(),
            dispatch: DispatchMode::default(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// Prepares a package once and synchronises it to every server of an
/// environment.
pub struct DeploymentDispatcher<R, T> {
    runner: R,
    preparer: ArchivePreparer<T>,
    cancel: CancelSignal,
}

impl<R: CommandRunner, T: TemplateConfigurer> DeploymentDispatcher<R, T> {
    pub fn new(runner: R, preparer: ArchivePreparer<T>) -> Self {
        Self {
            runner,
            preparer,
            cancel: CancelSignal::new(),
        }
    }

    /// Use `cancel` to stop the run before the next server is contacted.
    pub fn with_cancel_signal(mut self, cancel: CancelSignal) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_signal(&self) -> &CancelSignal {
        &self.cancel
    }

    /// Deploy `package` to every server of `environment`.
    ///
    /// Package preparation failures abort before any server is contacted.
    /// Server failures are collected into the report; anything short of
    /// full success is returned as [`Error::Rollout`].
    pub fn deploy(
        &self,
        package: &Path,
        project_dir: &Path,
        environment: &Environment,
        credentials: &Credentials,
        options: &DeployOptions,
    ) -> Result<DeployReport> {
        let servers = resolve_servers(environment)?;
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let archive = self
            .preparer
            .prepare(package, project_dir, environment, options.verbose)?;

        let site = environment.site();
        let job = SyncJob {
            runner: &self.runner,
            cancel: &self.cancel,
            archive_dir: archive.path(),
            credentials,
            site,
            program: &options.program,
            failure_policy: options.failure_policy,
        };

        let (outcomes, cancelled) = match options.dispatch {
            DispatchMode::Sequential => job.run_sequential(&servers),
            DispatchMode::Parallel { max_workers } => job.run_parallel(&servers, max_workers),
        };

        if options.keep_archive {
            let path = archive.keep();
            info!("archive kept at {}", path.display());
        }

        let report = DeployReport {
            site: site.to_string(),
            servers: servers
                .into_iter()
                .zip(outcomes)
                .map(|(server, outcome)| ServerReport { server, outcome })
                .collect(),
            cancelled,
        };

        if report.is_success() {
            Ok(report)
        } else {
            Err(Error::Rollout(report))
        }
    }
}

/// Everything needed to synchronise the prepared archive to one server.
struct SyncJob<'a> {
    runner: &'a dyn CommandRunner,
    cancel: &'a CancelSignal,
    archive_dir: &'a Path,
    credentials: &'a Credentials,
    site: &'a str,
    program: &'a str,
    failure_policy: FailurePolicy,
}

impl SyncJob<'_> {
    fn run_sequential(&self, servers: &[String]) -> (Vec<ServerOutcome>, bool) {
        let mut outcomes = Vec::with_capacity(servers.len());
        let mut halted = false;
        let mut cancelled = false;

        for server in servers {
            if !halted && self.cancel.is_cancelled() {
                warn!("deployment cancelled before server {}", server);
                halted = true;
                cancelled = true;
            }
            if halted {
                outcomes.push(ServerOutcome::Skipped);
                continue;
            }

            let outcome = self.sync(server);
            if !outcome.is_success() && self.failure_policy == FailurePolicy::FailFast {
                halted = true;
            }
            outcomes.push(outcome);
        }

        (outcomes, cancelled)
    }

    fn run_parallel(&self, servers: &[String], max_workers: usize) -> (Vec<ServerOutcome>, bool) {
        let workers = max_workers.clamp(1, servers.len().max(1));
        let next = AtomicUsize::new(0);
        let halted = AtomicBool::new(false);
        let cancelled = AtomicBool::new(false);
        let slots: Mutex<Vec<Option<ServerOutcome>>> = Mutex::new(vec![None; servers.len()]);

        thread::scope(|scope| {
            for _ in 0..workers {
                scope.spawn(|| loop {
                    let index = next.fetch_add(1, Ordering::SeqCst);
                    let Some(server) = servers.get(index) else {
                        break;
                    };

                    if self.cancel.is_cancelled() {
                        cancelled.store(true, Ordering::SeqCst);
                        halted.store(true, Ordering::SeqCst);
                    }
                    let outcome = if halted.load(Ordering::SeqCst) {
                        ServerOutcome::Skipped
                    } else {
                        let outcome = self.sync(server);
                        if !outcome.is_success() && self.failure_policy == FailurePolicy::FailFast {
                            halted.store(true, Ordering::SeqCst);
                        }
                        outcome
                    };

                    if let Ok(mut slots) = slots.lock() {
                        slots[index] = Some(outcome);
                    }
                });
            }
        });

        let outcomes = slots
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .into_iter()
            .map(|slot| slot.unwrap_or(ServerOutcome::Skipped))
            .collect();

        (outcomes, cancelled.into_inner())
    }

    fn sync(&self, server: &str) -> ServerOutcome {
        info!("deploying to server: {}, site: {}", server, self.site);
        let command = SyncCommand::new(self.archive_dir, server, self.credentials, self.site);

        match self.runner.exec(self.program, &command.render()) {
            Ok(()) => ServerOutcome::Succeeded,
            Err(err) => {
                warn!("deployment to {} failed: {}", server, err);
                ServerOutcome::Failed(err.to_string())
            }
        }
    }
}
