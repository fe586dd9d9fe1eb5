use crate::{Error, Result};
use iisdeploy_package::{Environment, SERVERS_KEY, SERVER_KEY};

/// Target servers for `environment`, in listed order.
///
/// `servers` wins over `server`. The value is split on commas and each piece
/// trimmed; duplicates are kept. Empty pieces are rejected.
pub fn resolve_servers(environment: &Environment) -> Result<Vec<String>> {
    let (key, value) = match (environment.servers(), environment.server()) {
        (Some(servers), _) => (SERVERS_KEY, servers),
        (None, Some(server)) => (SERVER_KEY, server),
        (None, None) => {
            return Err(Error::MissingConfiguration(format!(
                "{} or {}",
                SERVERS_KEY, SERVER_KEY
            )))
        }
    };

    let servers: Vec<String> = value.split(',').map(|s| s.trim().to_string()).collect();
    if servers.iter().any(String::is_empty) {
        return Err(Error::MissingConfiguration(format!(
            "empty server name in `{}`",
            key
        )));
    }
    Ok(servers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_servers_are_trimmed_in_order() {
        let env = Environment::new("Site").with_servers("a, b ,c");
        assert_eq!(resolve_servers(&env).unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_single_server_fallback() {
        let env = Environment::new("Site").with_server("x");
        assert_eq!(resolve_servers(&env).unwrap(), vec!["x"]);
    }

    #[test]
    fn test_servers_takes_precedence() {
        let env = Environment::new("Site").with_servers("a").with_server("x");
        assert_eq!(resolve_servers(&env).unwrap(), vec!["a"]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let env = Environment::new("Site").with_servers("a,a");
        assert_eq!(resolve_servers(&env).unwrap(), vec!["a", "a"]);
    }

    #[test]
    fn test_missing_keys_fail() {
        let env = Environment::new("Site");
        let err = resolve_servers(&env).unwrap_err();
        assert!(matches!(err, Error::MissingConfiguration(_)));
    }

    #[test]
    fn test_empty_entries_fail() {
        for value in ["", "a,,b", "a, "] {
            let env = Environment::new("Site").with_servers(value);
            let err = resolve_servers(&env).unwrap_err();
            assert!(matches!(err, Error::MissingConfiguration(_)), "{value:?}");
        }
    }
}
