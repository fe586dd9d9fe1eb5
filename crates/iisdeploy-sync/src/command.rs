use crate::ArgumentList;
use std::fmt;
use std::path::Path;

/// Web Deploy command-line client.
pub const MSDEPLOY_PROGRAM: &str = "msdeploy";
/// Providers left untouched on the destination server.
pub const DISABLED_LINKS: [&str; 3] = [
    "AppPoolExtension",
    "ContentExtension",
    "CertificateExtension",
];
/// Package parameter overridden with the environment's site.
pub const SITE_PARAMETER: &str = "IIS Web Application Name";

/// Account used by the remote agent's NTLM authentication.
///
/// Both values are passed to the agent verbatim; empty means unset.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Arguments synchronising one archive directory to one server.
#[derive(Debug, Clone)]
pub struct SyncCommand {
    server: String,
    arguments: ArgumentList,
}

impl SyncCommand {
    pub fn new(archive_dir: &Path, server: &str, credentials: &Credentials, site: &str) -> Self {
        let mut arguments = ArgumentList::new();
        arguments
            .add(format!("-source:archiveDir='{}'", archive_dir.display()))
            .add(format!(
                "-dest:auto,computerName='http://{}/MSDeployAgentService',includeAcls='False',username='{}',password='{}',authtype=ntlm",
                server, credentials.username, credentials.password
            ))
            .add("-verb:sync");
        for link in DISABLED_LINKS {
            arguments.add(format!("-disableLink:{}", link));
        }
        arguments.add(format!("-setParam:\"{}\"=\"{}\"", SITE_PARAMETER, site));

        Self {
            server: server.to_string(),
            arguments,
        }
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn arguments(&self) -> &ArgumentList {
        &self.arguments
    }

    /// The argument string passed to `msdeploy`.
    pub fn render(&self) -> String {
        self.arguments.render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_command_matches_agent_invocation() {
        let command = SyncCommand::new(
            &PathBuf::from("/tmp/iisdeploy-abc"),
            "web01",
            &Credentials::new("deploy", "s3cret"),
            "MySite",
        );

        assert_eq!(
            command.arguments().fragments(),
            [
                "-source:archiveDir='/tmp/iisdeploy-abc'",
                "-dest:auto,computerName='http://web01/MSDeployAgentService',includeAcls='False',username='deploy',password='s3cret',authtype=ntlm",
                "-verb:sync",
                "-disableLink:AppPoolExtension",
                "-disableLink:ContentExtension",
                "-disableLink:CertificateExtension",
                "-setParam:\"IIS Web Application Name\"=\"MySite\"",
            ]
        );
        assert_eq!(command.server(), "web01");
    }

    #[test]
    fn test_default_credentials_are_empty() {
        let command = SyncCommand::new(
            &PathBuf::from("/a"),
            "web01",
            &Credentials::default(),
            "Site",
        );
        assert!(command
            .render()
            .contains(",username='',password='',authtype=ntlm"));
    }

    #[test]
    fn test_debug_hides_password() {
        let rendered = format!("{:?}", Credentials::new("deploy", "s3cret"));
        assert!(rendered.contains("deploy"));
        assert!(!rendered.contains("s3cret"));
    }
}
