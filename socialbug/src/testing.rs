use crate::browser::Browser;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use url::Url;

#[derive(Debug, Default)]
struct BrowserLog {
    current: Option<Url>,
    navigations: Vec<Url>,
    replacements: Vec<Url>,
    fail_navigation: bool,
}

/// In-memory browser for tests
///
/// Records every navigation and history replacement. Clones share the same
/// log so a test can keep a handle after moving one into a controller.
#[derive(Debug, Clone)]
pub struct RecordingBrowser {
    log: Arc<Mutex<BrowserLog>>,
}

impl RecordingBrowser {
    /// Browser sitting on `current`
    pub fn at(current: &str) -> Self {
        let log = BrowserLog {
            current: Some(Url::parse(current).expect("valid test url")),
            ..BrowserLog::default()
        };
        Self {
            log: Arc::new(Mutex::new(log)),
        }
    }

    /// Make every later navigation fail
    pub fn failing_navigation(self) -> Self {
        self.log.lock().unwrap().fail_navigation = true;
        self
    }

    pub fn navigations(&self) -> Vec<Url> {
        self.log.lock().unwrap().navigations.clone()
    }

    pub fn replacements(&self) -> Vec<Url> {
        self.log.lock().unwrap().replacements.clone()
    }
}

impl Browser for RecordingBrowser {
    fn current_url(&self) -> Url {
        self.log
            .lock()
            .unwrap()
            .current
            .clone()
            .expect("browser has a current url")
    }

    fn replace_url(&self, url: Url) {
        let mut log = self.log.lock().unwrap();
        log.replacements.push(url.clone());
        log.current = Some(url);
    }

    fn navigate(&self, url: &Url) -> std::io::Result<()> {
        let mut log = self.log.lock().unwrap();
        if log.fail_navigation {
            return Err(std::io::Error::other("navigation blocked"));
        }
        log.navigations.push(url.clone());
        Ok(())
    }
}

/// Body of a paginated response as the backend serializes it
pub fn page_json(content: Value, number: u32, total_pages: u32, total_elements: u64) -> String {
    let size = content.as_array().map(|a| a.len()).unwrap_or(0);
    json!({
        "content": content,
        "number": number,
        "size": size,
        "first": number == 0,
        "last": number + 1 >= total_pages,
        "totalPages": total_pages,
        "totalElements": total_elements,
    })
    .to_string()
}

/// Minimal campaign record
pub fn campaign_json(id: i64, name: &str, status: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "status": status,
        "platforms": ["INSTAGRAM"],
        "createdAt": "2025-01-02T10:00:00",
    })
}

/// Minimal post record
pub fn post_json(id: i64, caption: &str) -> Value {
    json!({
        "id": id,
        "caption": caption,
        "providerPostId": format!("p{}", id),
        "createdAt": "2025-01-02T10:00:00Z",
    })
}
