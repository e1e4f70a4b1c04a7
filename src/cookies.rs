//! Session cookie tracking between Access API calls.
//!
//! The CMS runs its session over a handful of cookies (the ASP.NET session
//! id, two gateway session ids and the AWS load-balancer pair). The jar
//! keeps exactly those and discards everything else the service sets. There
//! is no expiry handling: stored cookies live as long as the client.

use std::collections::HashMap;

/// Cookie names the CMS session depends on. Any `Set-Cookie` for a name
/// outside this list is ignored, on both store and render.
pub const SESSION_COOKIE_NAMES: [&str; 5] = [
    "ASP.NET_SessionId",
    "GLBSESSIONID",
    "CMSSESSIONIDALT",
    "AWSALB",
    "AWSALBCORS",
];

/// Filtered store of session cookies, rendered back as a `Cookie` header.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    cookies: HashMap<String, String>,
}

impl CookieJar {
    /// Creates an empty jar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a single `Set-Cookie` header value into the jar.
    ///
    /// Only the leading `name=value` pair is read; attributes (`Path`,
    /// `Expires`, `HttpOnly`, ...) are dropped. Values for names outside
    /// the session allow-list are discarded, later values overwrite
    /// earlier ones.
    pub fn store(&mut self, set_cookie: &str) {
        let pair = set_cookie.split(';').next().unwrap_or_default();
        let Some((name, value)) = pair.split_once('=') else {
            return;
        };

        let name = name.trim();
        if !SESSION_COOKIE_NAMES.contains(&name) {
            return;
        }

        self.cookies.insert(name.to_string(), value.trim().to_string());
    }

    /// Feeds every `Set-Cookie` value of a response into the jar.
    pub fn update<'a>(&mut self, set_cookie_values: impl IntoIterator<Item = &'a str>) {
        for value in set_cookie_values {
            self.store(value);
        }
    }

    /// True if no session cookie has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Looks up a stored cookie value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Renders the jar as a `Cookie` request header value, or `None` when
    /// nothing is stored. Cookies are emitted in allow-list order so the
    /// rendering is stable.
    pub fn header_value(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }

        let rendered = SESSION_COOKIE_NAMES
            .iter()
            .filter_map(|name| {
                self.cookies
                    .get(*name)
                    .map(|value| format!("{name}={value}"))
            })
            .collect::<Vec<_>>()
            .join("; ");
        Some(rendered)
    }
}
