use std::sync::{Mutex, MutexGuard};
use url::Url;

/// Query parameter carrying the provider's authorization code
pub const CODE_PARAM: &str = "code";

/// What the app can do with the page it is running in
pub trait Browser {
    /// Location of the current page, including its query string
    fn current_url(&self) -> Url;

    /// Rewrite the current location without a navigation (history replace)
    fn replace_url(&self, url: Url);

    /// Leave the app for `url` (full-page navigation)
    fn navigate(&self, url: &Url) -> std::io::Result<()>;
}

/// Browser boundary for the desktop CLI
///
/// Navigation hands the URL to the system browser; the "current page" is
/// whatever callback URL the user pasted back.
pub struct SystemBrowser {
    current: Mutex<Url>,
}

impl SystemBrowser {
    pub fn new(current: Url) -> Self {
        Self {
            current: Mutex::new(current),
        }
    }

    fn current(&self) -> MutexGuard<'_, Url> {
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Browser for SystemBrowser {
    fn current_url(&self) -> Url {
        self.current().clone()
    }

    fn replace_url(&self, url: Url) {
        *self.current() = url;
    }

    fn navigate(&self, url: &Url) -> std::io::Result<()> {
        if let Err(e) = open::that(url.as_str()) {
            eprintln!("Failed to open browser automatically: {}", e);
            eprintln!("\nPlease open this URL in your browser:");
            eprintln!("{}\n", url);
        } else {
            println!("Browser opened. Please authorize the application...");
            println!("\nYou can also open this URL directly in your browser:");
            println!("{}\n", url);
        }
        Ok(())
    }
}

/// Authorization code in `url`, if any (empty values count as absent)
pub fn authorization_code(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == CODE_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|code| !code.is_empty())
}

/// `url` without the authorization code parameter, other parameters kept in order
pub fn strip_authorization_code(url: &Url) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != CODE_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut stripped = url.clone();
    if kept.is_empty() {
        stripped.set_query(None);
    } else {
        stripped.query_pairs_mut().clear().extend_pairs(kept);
    }
    stripped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn finds_code_parameter() {
        let u = url("http://localhost:5173/connections?code=abc123&state=x");
        assert_eq!(authorization_code(&u).as_deref(), Some("abc123"));
        assert_eq!(authorization_code(&url("http://localhost:5173/connections")), None);
        assert_eq!(authorization_code(&url("http://localhost:5173/connections?code=")), None);
    }

    #[test]
    fn strips_only_the_code() {
        let u = url("http://localhost:5173/connections?state=x&code=abc#frag");
        assert_eq!(
            strip_authorization_code(&u).as_str(),
            "http://localhost:5173/connections?state=x#frag"
        );
    }

    #[test]
    fn strips_query_entirely_when_code_was_alone() {
        let u = url("http://localhost:5173/connections?code=abc");
        assert_eq!(
            strip_authorization_code(&u).as_str(),
            "http://localhost:5173/connections"
        );
    }
}
