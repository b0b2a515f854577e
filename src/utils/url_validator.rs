//! URL 验证模块
//!
//! Canonicalization is the only check the registry performs itself. Which
//! schemes and hosts are acceptable is a [`UrlPolicy`] injected by the
//! deployment.

use std::collections::HashSet;

use url::Url;

/// URL 验证错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    InvalidProtocol(String),
    DangerousProtocol(String),
    InvalidFormat(String),
    HostNotAllowed(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::InvalidProtocol(proto) => write!(
                f,
                "Invalid protocol: {}. Only http:// and https:// are allowed",
                proto
            ),
            Self::DangerousProtocol(proto) => {
                write!(f, "Dangerous protocol blocked: {}", proto)
            }
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
            Self::HostNotAllowed(host) => write!(f, "URL host is not allowed: {}", host),
        }
    }
}

impl std::error::Error for UrlValidationError {}

impl From<UrlValidationError> for crate::errors::SharelinkError {
    fn from(err: UrlValidationError) -> Self {
        crate::errors::SharelinkError::validation(err.to_string())
    }
}

/// 危险协议列表
const DANGEROUS_PROTOCOLS: &[&str] = &["javascript", "data", "file", "vbscript", "about", "blob"];

/// Trim and parse `raw` as an absolute URL, returning the canonical form
/// used for deduplication together with the parsed URL.
///
/// The canonical form is the parser's serialization: scheme and host are
/// lowercased and an empty path becomes `/`.
pub fn canonicalize_url(raw: &str) -> Result<(String, Url), UrlValidationError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    let url = Url::parse(trimmed).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;
    Ok((url.to_string(), url))
}

/// Deployment policy deciding which canonical URLs may be shortened.
pub trait UrlPolicy: Send + Sync {
    fn check(&self, url: &Url) -> Result<(), UrlValidationError>;

    fn name(&self) -> &'static str;
}

/// 只允许 http/https，拦截危险协议
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpUrlPolicy;

impl UrlPolicy for HttpUrlPolicy {
    fn check(&self, url: &Url) -> Result<(), UrlValidationError> {
        let scheme = url.scheme();

        if DANGEROUS_PROTOCOLS.contains(&scheme) {
            return Err(UrlValidationError::DangerousProtocol(format!("{}:", scheme)));
        }

        if scheme != "http" && scheme != "https" {
            return Err(UrlValidationError::InvalidProtocol(format!("{}:", scheme)));
        }

        if url.host_str().is_none_or(str::is_empty) {
            return Err(UrlValidationError::InvalidFormat(
                "URL must include a host".to_string(),
            ));
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// HTTP policy plus an exact hostname allow-list.
#[derive(Debug, Clone)]
pub struct HostAllowList {
    hosts: HashSet<String>,
}

impl HostAllowList {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            hosts: hosts
                .into_iter()
                .map(|h| h.as_ref().trim().to_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

impl UrlPolicy for HostAllowList {
    fn check(&self, url: &Url) -> Result<(), UrlValidationError> {
        HttpUrlPolicy.check(url)?;

        let host = url.host_str().unwrap_or_default();
        if !self.hosts.contains(host) {
            return Err(UrlValidationError::HostNotAllowed(host.to_string()));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "host-allow-list"
    }
}
