use crate::Result;
use crate::cookies::SessionCookie;
use async_trait::async_trait;
use std::fmt;
use std::path::Path;

/// How to find an element on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locator {
    Css(&'static str),
    XPath(&'static str),
}

impl Locator {
    pub fn selector(&self) -> &'static str {
        match self {
            Locator::Css(s) | Locator::XPath(s) => s,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(s) => write!(f, "css `{}`", s),
            Locator::XPath(s) => write!(f, "xpath `{}`", s),
        }
    }
}

/// Handle to an element found by a [`Driver`].
///
/// Handles are only valid until the next navigation or reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementRef(pub usize);

/// Returns whether an element is rendered and not disabled
pub const IS_INTERACTABLE_JS: &str = "function() { \
    const rect = this.getBoundingClientRect(); \
    const style = window.getComputedStyle(this); \
    const visible = style.visibility !== 'hidden' && style.display !== 'none' \
        && (rect.width > 0 || rect.height > 0); \
    return visible && !this.disabled; \
}";

/// One exclusively owned browser session.
///
/// Every call takes `&mut self`: a session is driven by a single publisher
/// and never shared.
#[async_trait]
pub trait Driver: Send {
    async fn goto(&mut self, url: &str) -> Result<()>;

    async fn reload(&mut self) -> Result<()>;

    async fn current_url(&mut self) -> Result<String>;

    /// Serialized DOM of the current page
    async fn page_source(&mut self) -> Result<String>;

    /// All elements matching `locator`, possibly none
    async fn find_all(&mut self, locator: &Locator) -> Result<Vec<ElementRef>>;

    async fn set_cookie(&mut self, cookie: &SessionCookie) -> Result<()>;

    /// Call a JS function declaration with `this` bound to `element`
    async fn call_function(
        &mut self,
        element: ElementRef,
        function: &str,
    ) -> Result<Option<serde_json::Value>>;

    /// Set the files of an `<input type=file>` in a single interaction
    async fn upload_files(&mut self, element: ElementRef, files: &[String]) -> Result<()>;

    /// Type text into an element as key presses
    async fn send_keys(&mut self, element: ElementRef, text: &str) -> Result<()>;

    async fn click(&mut self, element: ElementRef) -> Result<()>;

    async fn is_interactable(&mut self, element: ElementRef) -> Result<bool> {
        let value = self.call_function(element, IS_INTERACTABLE_JS).await?;
        Ok(value.and_then(|v| v.as_bool()).unwrap_or(false))
    }

    async fn screenshot(&mut self, path: &Path) -> Result<()>;

    /// End the session and release the browser
    async fn quit(&mut self) -> Result<()>;
}
