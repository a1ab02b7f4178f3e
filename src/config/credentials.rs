//! API token resolution
//!
//! Sources, first match wins: the `--token` flag, `TFC_TOKEN`, Terraform's
//! `TF_TOKEN_<host>` variable, then the Terraform CLI credentials file.
//! Finding no token is not an error; requests are then sent without an
//! `Authorization` header.

use crate::error::{ErrorCode, Result, TfcError};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

pub const ENV_TOKEN: &str = "TFC_TOKEN";

/// Where a resolved token came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    Flag,
    Env(String),
    CredentialsFile(PathBuf),
}

impl fmt::Display for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag => f.write_str("--token"),
            Self::Env(name) => write!(f, "${name}"),
            Self::CredentialsFile(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CredentialsFile {
    #[serde(default)]
    credentials: HashMap<String, HostCredentials>,
}

#[derive(Debug, Deserialize)]
struct HostCredentials {
    token: String,
}

/// `~/.terraform.d/credentials.tfrc.json`
pub fn default_credentials_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".terraform.d").join("credentials.tfrc.json"))
}

/// Name of Terraform's per-host token variable, e.g. `TF_TOKEN_app_terraform_io`
pub fn terraform_token_var(host: &str) -> String {
    format!("TF_TOKEN_{}", host.replace('-', "__").replace('.', "_"))
}

/// Resolve the token from the process environment and the home directory
pub fn resolve_token(flag: Option<&str>, base_url: &str) -> Result<Option<(String, TokenSource)>> {
    resolve_token_with(
        flag,
        base_url,
        |key| std::env::var(key).ok(),
        default_credentials_path().as_deref(),
    )
}

pub fn resolve_token_with(
    flag: Option<&str>,
    base_url: &str,
    lookup: impl Fn(&str) -> Option<String>,
    credentials_path: Option<&Path>,
) -> Result<Option<(String, TokenSource)>> {
    if let Some(token) = flag.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(Some((token.to_string(), TokenSource::Flag)));
    }

    let host = host_of(base_url)?;
    for name in [ENV_TOKEN.to_string(), terraform_token_var(&host)] {
        if let Some(token) = lookup(&name).filter(|t| !t.trim().is_empty()) {
            return Ok(Some((token.trim().to_string(), TokenSource::Env(name))));
        }
    }

    match credentials_path {
        Some(path) => read_credentials_file(path, &host),
        None => Ok(None),
    }
}

fn host_of(base_url: &str) -> Result<String> {
    Url::parse(base_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .ok_or_else(|| {
            TfcError::config_with_code(
                ErrorCode::CONFIG_INVALID_VALUE,
                format!("cannot derive a host name from '{base_url}'"),
                Some("base_url".to_string()),
            )
        })
}

fn read_credentials_file(path: &Path, host: &str) -> Result<Option<(String, TokenSource)>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No credentials file at {}", path.display());
            return Ok(None);
        }
        Err(e) => {
            return Err(TfcError::config_with_code(
                ErrorCode::CONFIG_CREDENTIALS,
                format!("cannot read {}", path.display()),
                Some("credentials".to_string()),
            )
            .with_source(e))
        }
    };

    let file: CredentialsFile = serde_json::from_str(&content).map_err(|e| {
        TfcError::config_with_code(
            ErrorCode::CONFIG_INVALID_JSON,
            format!("malformed credentials file {}", path.display()),
            Some("credentials".to_string()),
        )
        .with_source(e)
    })?;

    Ok(file
        .credentials
        .get(host)
        .map(|c| c.token.trim())
        .filter(|t| !t.is_empty())
        .map(|t| (t.to_string(), TokenSource::CredentialsFile(path.to_path_buf()))))
}
