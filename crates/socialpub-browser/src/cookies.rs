//! Cookie files exported from a logged-in browser.
//!
//! Files hold either a JSON list of cookie records or an object with a
//! `cookies` list. Records are reduced to the fields a browser accepts when
//! setting a cookie; anything else is dropped.

use crate::Result;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use url::Url;

/// Normalized `SameSite` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SameSite {
    Lax,
    Strict,
    None,
}

impl SameSite {
    /// Case-insensitive parse; anything but lax/strict/none is rejected
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "lax" => Some(SameSite::Lax),
            "strict" => Some(SameSite::Strict),
            "none" => Some(SameSite::None),
            _ => None,
        }
    }
}

/// A cookie reduced to the injectable allow-list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub same_site: Option<SameSite>,
}

impl SessionCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: None,
            path: None,
            secure: None,
            http_only: None,
            expiry: None,
            same_site: None,
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }
}

/// Read and sanitize a cookie file
pub fn load_cookies(path: &Path) -> Result<Vec<SessionCookie>> {
    tracing::debug!("Reading cookie file from: {}", path.display());

    let content = std::fs::read_to_string(path)?;
    let cookies = parse_cookies(content.trim())?;

    tracing::debug!("Loaded {} usable cookie(s)", cookies.len());
    Ok(cookies)
}

/// Parse cookie file content, keeping only records with a name and value
pub fn parse_cookies(content: &str) -> Result<Vec<SessionCookie>> {
    let data: Value = serde_json::from_str(content)?;

    let records: &[Value] = match &data {
        Value::Array(records) => records.as_slice(),
        Value::Object(map) => match map.get("cookies") {
            Some(Value::Array(records)) => records.as_slice(),
            _ => &[],
        },
        _ => &[],
    };

    Ok(records.iter().filter_map(sanitize).collect())
}

/// Reduce one raw cookie record to the allow-list
///
/// Returns `None` when the record is not an object or lacks `name`/`value`.
pub fn sanitize(record: &Value) -> Option<SessionCookie> {
    let fields = record.as_object()?;

    let name = fields.get("name")?.as_str()?;
    let value = fields.get("value")?.as_str()?;

    let mut cookie = SessionCookie::new(name, value);
    cookie.domain = fields.get("domain").and_then(Value::as_str).map(String::from);
    cookie.path = fields.get("path").and_then(Value::as_str).map(String::from);
    cookie.secure = fields.get("secure").map(truthy);
    cookie.http_only = fields.get("httpOnly").map(truthy);

    // expirationDate wins when both are present, even if it is unusable
    cookie.expiry = match fields.get("expirationDate") {
        Some(raw) => as_epoch(raw),
        None => fields.get("expiry").and_then(as_epoch),
    };

    cookie.same_site = fields
        .get("sameSite")
        .and_then(Value::as_str)
        .and_then(SameSite::parse);

    Some(cookie)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn as_epoch(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

/// Which cookies belong to the page a session is on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieScope {
    host: String,
    apex: String,
}

impl CookieScope {
    pub fn new(host: &str) -> Self {
        let host = host.to_lowercase();
        let apex = root_domain(&host);
        Self { host, apex }
    }

    pub fn for_url(url: &str) -> Option<Self> {
        let parsed = Url::parse(url).ok()?;
        parsed.host_str().map(Self::new)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn apex(&self) -> &str {
        &self.apex
    }

    /// A cookie is in scope when its domain starts with a dot, equals the
    /// current host, or equals the bare apex domain.
    pub fn matches(&self, cookie: &SessionCookie) -> bool {
        let domain = cookie.domain.as_deref().unwrap_or_default();
        if domain.starts_with('.') {
            return true;
        }
        domain == self.host || domain == self.apex
    }

    /// Keep only the cookies that [`Self::matches`]
    pub fn filter<'a>(&self, cookies: &'a [SessionCookie]) -> Vec<&'a SessionCookie> {
        cookies.iter().filter(|c| self.matches(c)).collect()
    }
}

/// Registrable domain of a host using the Public Suffix List
fn root_domain(host: &str) -> String {
    if host.parse::<std::net::IpAddr>().is_ok() {
        return host.to_string();
    }

    match psl::domain(host.as_bytes()) {
        Some(root) => String::from_utf8_lossy(root.as_bytes()).to_string(),
        None => {
            let parts: Vec<&str> = host.split('.').collect();
            if parts.len() >= 2 {
                format!("{}.{}", parts[parts.len() - 2], parts[parts.len() - 1])
            } else {
                host.to_string()
            }
        }
    }
}
