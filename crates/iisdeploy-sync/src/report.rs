use serde::Serialize;
use std::fmt;

/// What happened on one server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ServerOutcome {
    Succeeded,
    Failed(String),
    /// Not contacted: an earlier server failed or the run was cancelled.
    Skipped,
}

impl ServerOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ServerOutcome::Succeeded)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerReport {
    pub server: String,
    pub outcome: ServerOutcome,
}

/// Per-server outcomes of one deployment, in server list order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeployReport {
    pub site: String,
    pub servers: Vec<ServerReport>,
    pub cancelled: bool,
}

impl DeployReport {
    /// True when every server succeeded and nothing was cancelled.
    pub fn is_success(&self) -> bool {
        !self.cancelled && self.servers.iter().all(|s| s.outcome.is_success())
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &str> {
        self.with_outcome(|o| matches!(o, ServerOutcome::Succeeded))
    }

    pub fn failed(&self) -> impl Iterator<Item = &str> {
        self.with_outcome(|o| matches!(o, ServerOutcome::Failed(_)))
    }

    pub fn skipped(&self) -> impl Iterator<Item = &str> {
        self.with_outcome(|o| matches!(o, ServerOutcome::Skipped))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    fn with_outcome<'a>(
        &'a self,
        pred: impl Fn(&ServerOutcome) -> bool + 'a,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.servers
            .iter()
            .filter(move |s| pred(&s.outcome))
            .map(|s| s.server.as_str())
    }
}

impl fmt::Display for DeployReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "site {}: {} succeeded, {} failed, {} skipped",
            self.site,
            self.succeeded().count(),
            self.failed().count(),
            self.skipped().count()
        )?;
        if self.cancelled {
            f.write_str(" (cancelled)")?;
        }
        for report in &self.servers {
            if let ServerOutcome::Failed(reason) = &report.outcome {
                write!(f, "; {}: {}", report.server, reason)?;
            }
        }
        Ok(())
    }
}
