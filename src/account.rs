//! Account context a search session runs against
//!
//! Credentials are acquired elsewhere; this type only carries what the
//! request layer and the icon resolution need.

use crate::config::AccountSettings;
use url::Url;

/// An authenticated account on a server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Server base URL (may carry a sub-path such as `/nextcloud`)
    server_url: Url,
    /// Login name
    user: String,
    /// App password for basic auth
    app_password: Option<String>,
}

impl Account {
    /// Create an account for a server
    pub fn new(server_url: Url, user: impl Into<String>) -> Self {
        Self {
            server_url,
            user: user.into(),
            app_password: None,
        }
    }

    /// Attach an app password
    pub fn with_app_password(mut self, password: impl Into<String>) -> Self {
        self.app_password = Some(password.into());
        self
    }

    /// Build an account from settings
    pub fn from_settings(settings: &AccountSettings) -> Result<Self, url::ParseError> {
        let server_url = Url::parse(&settings.server_url)?;
        let mut account = Self::new(server_url, settings.user.clone());
        account.app_password = settings.app_password.clone().filter(|p| !p.is_empty());
        Ok(account)
    }

    pub fn server_url(&self) -> &Url {
        &self.server_url
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn app_password(&self) -> Option<&str> {
        self.app_password.as_deref()
    }

    /// URL of an API endpoint below the server base URL
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        let mut base = self.server_url.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        base.join(path.trim_start_matches('/'))
    }

    /// Resolve a server-relative resource path against the server origin.
    ///
    /// The path replaces the server URL's path entirely; a trailing
    /// `?query` segment is carried over verbatim.
    pub fn resolve_path(&self, path: &str) -> String {
        let (path, query) = match path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path, None),
        };

        let mut url = self.server_url.clone();
        url.set_path(path);
        url.set_query(None);
        url.set_fragment(None);

        let mut resolved = url.to_string();
        if let Some(query) = query {
            resolved.push('?');
            resolved.push_str(query);
        }
        resolved
    }
}
