use crate::{Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Key naming the IIS application to deploy into.
pub const SITE_KEY: &str = "site";
/// Key holding a comma separated list of target servers.
pub const SERVERS_KEY: &str = "servers";
/// Key holding a single target server, used when `servers` is absent.
pub const SERVER_KEY: &str = "server";

/// Settings for one deployment environment.
///
/// The recognised keys are kept as typed fields. Every other key is an
/// opaque template variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    site: String,
    servers: Option<String>,
    server: Option<String>,
    variables: BTreeMap<String, String>,
}

impl Environment {
    /// Create an environment targeting `site` with no servers or variables.
    pub fn new(site: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            servers: None,
            server: None,
            variables: BTreeMap::new(),
        }
    }

    /// Set the comma separated server list.
    pub fn with_servers(mut self, servers: impl Into<String>) -> Self {
        self.servers = Some(servers.into());
        self
    }

    /// Set the single server fallback.
    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    /// Add a key/value pair. Recognised keys update their typed field.
    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key.into(), value.into());
        self
    }

    /// Build an environment from loose key/value pairs.
    ///
    /// Fails with [`Error::MissingConfiguration`] unless `site` and at least
    /// one of `servers`/`server` are present.
    pub fn from_map<I, K, V>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut variables: BTreeMap<String, String> = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let site = variables
            .remove(SITE_KEY)
            .ok_or_else(|| Error::MissingConfiguration(SITE_KEY.to_string()))?;
        let servers = variables.remove(SERVERS_KEY);
        let server = variables.remove(SERVER_KEY);
        if servers.is_none() && server.is_none() {
            return Err(Error::MissingConfiguration(format!(
                "{} or {}",
                SERVERS_KEY, SERVER_KEY
            )));
        }

        Ok(Self {
            site,
            servers,
            server,
            variables,
        })
    }

    /// Parse an environment from a TOML document of top-level scalars.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let table: toml::Table = text
            .parse()
            .map_err(|e: toml::de::Error| Error::InvalidEnvironment(e.to_string()))?;

        let mut entries = Vec::with_capacity(table.len());
        for (key, value) in table {
            let value = scalar_to_string(&key, value)?;
            entries.push((key, value));
        }
        Self::from_map(entries)
    }

    /// Read and parse a TOML environment file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    pub fn servers(&self) -> Option<&str> {
        self.servers.as_deref()
    }

    pub fn server(&self) -> Option<&str> {
        self.server.as_deref()
    }

    /// Template variables other than the recognised keys.
    pub fn variables(&self) -> &BTreeMap<String, String> {
        &self.variables
    }

    /// Look up any key, recognised or not.
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            SITE_KEY => Some(&self.site),
            SERVERS_KEY => self.servers(),
            SERVER_KEY => self.server(),
            _ => self.variables.get(key).map(String::as_str),
        }
    }

    /// Every key/value pair, recognised keys included, as handed to the
    /// template engine.
    pub fn variables_for_template(&self) -> BTreeMap<String, String> {
        let mut all = self.variables.clone();
        all.insert(SITE_KEY.to_string(), self.site.clone());
        if let Some(servers) = &self.servers {
            all.insert(SERVERS_KEY.to_string(), servers.clone());
        }
        if let Some(server) = &self.server {
            all.insert(SERVER_KEY.to_string(), server.clone());
        }
        all
    }

    fn set(&mut self, key: String, value: String) {
        match key.as_str() {
            SITE_KEY => self.site = value,
            SERVERS_KEY => self.servers = Some(value),
            SERVER_KEY => self.server = Some(value),
            _ => {
                self.variables.insert(key, value);
            }
        }
    }
}

fn scalar_to_string(key: &str, value: toml::Value) -> Result<String> {
    match value {
        toml::Value::String(s) => Ok(s),
        toml::Value::Integer(i) => Ok(i.to_string()),
        toml::Value::Float(f) => Ok(f.to_string()),
        toml::Value::Boolean(b) => Ok(b.to_string()),
        toml::Value::Datetime(d) => Ok(d.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => Err(Error::InvalidEnvironment(format!(
            "`{}` must be a scalar value",
            key
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_map_splits_recognised_keys() {
        let env = Environment::from_map([
            ("site", "MySite"),
            ("servers", "a,b"),
            ("connection", "Server=db"),
        ])
        .unwrap();

        assert_eq!(env.site(), "MySite");
        assert_eq!(env.servers(), Some("a,b"));
        assert_eq!(env.server(), None);
        assert_eq!(env.variables().len(), 1);
        assert_eq!(env.get("connection"), Some("Server=db"));
    }

    #[test]
    fn test_from_map_requires_site() {
        let err = Environment::from_map([("servers", "a")]).unwrap_err();
        assert!(matches!(err, Error::MissingConfiguration(key) if key == "site"));
    }

    #[test]
    fn test_from_map_requires_a_server_key() {
        let err = Environment::from_map([("site", "MySite")]).unwrap_err();
        assert!(matches!(err, Error::MissingConfiguration(_)));
    }

    #[test]
    fn test_from_toml_stringifies_scalars() {
        let env = Environment::from_toml_str(
            r#"
site = "MySite"
server = "web01"
port = 8080
debug = false
"#,
        )
        .unwrap();

        assert_eq!(env.server(), Some("web01"));
        assert_eq!(env.get("port"), Some("8080"));
        assert_eq!(env.get("debug"), Some("false"));
    }

    #[test]
    fn test_from_toml_rejects_tables() {
        let err = Environment::from_toml_str(
            r#"
site = "MySite"
server = "web01"

[nested]
key = "value"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidEnvironment(_)));
    }

    #[test]
    fn test_variables_for_template_includes_recognised_keys() {
        let env = Environment::new("MySite")
            .with_servers("a,b")
            .with_variable("connection", "Server=db");

        let vars = env.variables_for_template();
        assert_eq!(vars.get("site").map(String::as_str), Some("MySite"));
        assert_eq!(vars.get("servers").map(String::as_str), Some("a,b"));
        assert_eq!(vars.get("connection").map(String::as_str), Some("Server=db"));
        assert!(!vars.contains_key("server"));
    }

    #[test]
    fn test_with_variable_routes_recognised_keys() {
        let env = Environment::new("Old").with_variable("site", "New");
        assert_eq!(env.site(), "New");
        assert!(env.variables().is_empty());
    }
}
