// Configuration: where the admin password comes from, and fixed service
// constants. Nothing here mutates process state; `.env` files are parsed
// into memory and consulted as a lookup source.

use crate::error::ClientError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Named value holding the admin password when `--password` is not given.
pub const ADMIN_PASSWORD_ENV: &str = "ADMIN_PASSWORD";

/// Production service root.
pub const DEFAULT_URL: &str = "https://api.arietguillaume.ca";

/// Basic-auth username the authorize endpoint expects from this frontend.
pub const CLIENT_ID: &str = "py_frontend";

/// Somewhere a named value can be looked up.
pub trait CredentialSource {
    fn lookup(&self, key: &str) -> Option<String>;
}

/// The real process environment.
pub struct ProcessEnv;

impl CredentialSource for ProcessEnv {
    fn lookup(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Key/value pairs held in memory. Built from a `.env` file or directly in tests.
#[derive(Debug, Default, Clone)]
pub struct StaticSource {
    values: HashMap<String, String>,
}

impl StaticSource {
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        StaticSource {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Parse a dotenv file. A missing file yields `Ok(None)`.
    pub fn from_env_file(path: &Path) -> Result<Option<Self>, ClientError> {
        let iter = match dotenvy::from_path_iter(path) {
            Ok(iter) => iter,
            Err(e) if e.not_found() => return Ok(None),
            Err(e) => {
                return Err(ClientError::Configuration(format!(
                    "cannot read {}: {e}",
                    path.display()
                )))
            }
        };
        let mut values = HashMap::new();
        for entry in iter {
            let (key, value) = entry.map_err(|e| {
                ClientError::Configuration(format!("malformed {}: {e}", path.display()))
            })?;
            values.insert(key, value);
        }
        debug!(path = %path.display(), keys = values.len(), "loaded env file");
        Ok(Some(StaticSource { values }))
    }
}

impl CredentialSource for StaticSource {
    fn lookup(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Per-user dotenv file, e.g. `~/.config/registry-frontend/.env`.
pub fn user_env_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("registry-frontend").join(".env"))
}

/// Lookup chain used by the binary: process environment, `./.env`, then
/// the per-user file.
pub fn default_sources() -> Result<Vec<Box<dyn CredentialSource>>, ClientError> {
    sources_in(Path::new("."), user_env_file())
}

/// Process environment, then `<dir>/.env`, then `user_file` if given.
pub fn sources_in(
    dir: &Path,
    user_file: Option<PathBuf>,
) -> Result<Vec<Box<dyn CredentialSource>>, ClientError> {
    let mut sources: Vec<Box<dyn CredentialSource>> = vec![Box::new(ProcessEnv)];
    let files = std::iter::once(dir.join(".env")).chain(user_file);
    for path in files {
        if let Some(source) = StaticSource::from_env_file(&path)? {
            sources.push(Box::new(source));
        }
    }
    Ok(sources)
}

/// Like `resolve_password`, but only builds the source chain when no
/// explicit password was given. A broken `.env` cannot block `--password`.
pub fn resolve_with<F>(explicit: Option<String>, load_sources: F) -> Result<String, ClientError>
where
    F: FnOnce() -> Result<Vec<Box<dyn CredentialSource>>, ClientError>,
{
    match explicit {
        Some(password) => Ok(password),
        None => resolve_password(None, &load_sources()?),
    }
}

/// Determine the admin password.
///
/// An explicit value is returned verbatim. Otherwise the first source that
/// knows `ADMIN_PASSWORD` wins. Callers resolve once per process and reuse
/// the result for every re-authentication.
pub fn resolve_password<S>(explicit: Option<String>, sources: &[S]) -> Result<String, ClientError>
where
    S: AsRef<dyn CredentialSource>,
{
    if let Some(password) = explicit {
        return Ok(password);
    }
    sources
        .iter()
        .find_map(|source| source.as_ref().lookup(ADMIN_PASSWORD_ENV))
        .ok_or_else(|| {
            ClientError::Configuration(format!(
                "credential not provided: pass --password or set {ADMIN_PASSWORD_ENV}"
            ))
        })
}

/// Strip a single trailing slash so operation paths join cleanly.
pub fn normalize_base_url(url: &str) -> String {
    url.strip_suffix('/').unwrap_or(url).to_string()
}
