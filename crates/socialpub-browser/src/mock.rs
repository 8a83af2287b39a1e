//! Scriptable in-memory driver for tests.
//!
//! A [`MockDriver`] knows which locators resolve to elements, which of those
//! are hidden, and where the page goes after a click. Every interaction is
//! recorded so tests can assert on the exact sequence a publisher performed
//! without a real browser.

use crate::cookies::SessionCookie;
use crate::driver::{Driver, ElementRef, Locator};
use crate::launcher::{LaunchOptions, Launcher};
use crate::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// One recorded interaction
#[derive(Debug, Clone, PartialEq)]
pub enum DriverCall {
    Launch {
        headless: bool,
        profile: Option<PathBuf>,
    },
    Goto(String),
    Reload,
    Find(Locator),
    SetCookie(SessionCookie),
    CallFunction {
        target: Locator,
        function: String,
    },
    UploadFiles {
        target: Locator,
        files: Vec<String>,
    },
    SendKeys {
        target: Locator,
        text: String,
    },
    Click(Locator),
    Screenshot(PathBuf),
    Quit,
}

/// Page behavior the mock simulates
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Locators that resolve to a visible, enabled element
    pub present: Vec<Locator>,
    /// Locators that resolve to an element that is not interactable
    pub hidden: Vec<Locator>,
    /// URL the page moves to after a successful click
    pub url_after_click: Option<String>,
    pub page_source: String,
    /// Launch fails with this message
    pub launch_error: Option<String>,
    /// Navigation fails
    pub goto_fails: bool,
    /// Reading the current URL fails
    pub url_unreadable: bool,
    /// Direct clicks fail as if another element covered the target
    pub click_intercepted: bool,
    /// Cookie names the browser refuses to set
    pub rejected_cookies: Vec<String>,
}

impl MockConfig {
    pub fn with_present(mut self, locators: &[Locator]) -> Self {
        self.present.extend_from_slice(locators);
        self
    }

    pub fn with_hidden(mut self, locators: &[Locator]) -> Self {
        self.hidden.extend_from_slice(locators);
        self
    }

    pub fn with_url_after_click(mut self, url: &str) -> Self {
        self.url_after_click = Some(url.to_string());
        self
    }

    pub fn with_page_source(mut self, source: &str) -> Self {
        self.page_source = source.to_string();
        self
    }

    pub fn failing_launch(mut self, message: &str) -> Self {
        self.launch_error = Some(message.to_string());
        self
    }

    pub fn failing_goto(mut self) -> Self {
        self.goto_fails = true;
        self
    }

    pub fn with_unreadable_url(mut self) -> Self {
        self.url_unreadable = true;
        self
    }

    pub fn with_click_intercepted(mut self) -> Self {
        self.click_intercepted = true;
        self
    }

    pub fn rejecting_cookie(mut self, name: &str) -> Self {
        self.rejected_cookies.push(name.to_string());
        self
    }

    fn resolves(&self, locator: &Locator) -> bool {
        self.present.contains(locator) || self.hidden.contains(locator)
    }
}

/// Shared view of everything a mock session did
#[derive(Debug, Clone, Default)]
pub struct MockRecorder {
    calls: Arc<Mutex<Vec<DriverCall>>>,
    elements: Arc<Mutex<Vec<Locator>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockRecorder {
    fn record(&self, call: DriverCall) {
        lock(&self.calls).push(call);
    }

    fn register(&self, locator: Locator) -> ElementRef {
        let mut elements = lock(&self.elements);
        elements.push(locator);
        ElementRef(elements.len() - 1)
    }

    fn forget_elements(&self) {
        lock(&self.elements).clear();
    }

    pub fn calls(&self) -> Vec<DriverCall> {
        lock(&self.calls).clone()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.calls).is_empty()
    }

    /// Locator an element handle was found by
    pub fn element_locator(&self, element: ElementRef) -> Option<Locator> {
        lock(&self.elements).get(element.0).copied()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                DriverCall::Goto(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn cookies_set(&self) -> Vec<SessionCookie> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                DriverCall::SetCookie(cookie) => Some(cookie),
                _ => None,
            })
            .collect()
    }

    pub fn typed_text(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                DriverCall::SendKeys { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Function declarations called on elements found by `target`
    pub fn functions_on(&self, target: Locator) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                DriverCall::CallFunction { target: t, function } if t == target => Some(function),
                _ => None,
            })
            .collect()
    }

    pub fn screenshots(&self) -> Vec<PathBuf> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                DriverCall::Screenshot(path) => Some(path),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, predicate: impl Fn(&DriverCall) -> bool) -> usize {
        lock(&self.calls).iter().filter(|c| predicate(c)).count()
    }
}

/// In-memory [`Driver`]
#[derive(Debug)]
pub struct MockDriver {
    config: MockConfig,
    recorder: MockRecorder,
    url: String,
}

impl MockDriver {
    pub fn new(config: MockConfig) -> Self {
        Self::with_recorder(config, MockRecorder::default())
    }

    pub fn with_recorder(config: MockConfig, recorder: MockRecorder) -> Self {
        Self {
            config,
            recorder,
            url: "about:blank".to_string(),
        }
    }

    pub fn recorder(&self) -> MockRecorder {
        self.recorder.clone()
    }

    fn target(&self, element: ElementRef) -> Result<Locator> {
        self.recorder
            .element_locator(element)
            .ok_or(Error::StaleElement(element.0))
    }

    fn follow_click(&mut self) {
        if let Some(url) = &self.config.url_after_click {
            self.url = url.clone();
            self.recorder.forget_elements();
        }
    }
}

#[async_trait]
impl Driver for MockDriver {
    async fn goto(&mut self, url: &str) -> Result<()> {
        self.recorder.record(DriverCall::Goto(url.to_string()));
        if self.config.goto_fails {
            return Err(Error::Cdp("net::ERR_CONNECTION_REFUSED".to_string()));
        }
        self.url = url.to_string();
        self.recorder.forget_elements();
        Ok(())
    }

    async fn reload(&mut self) -> Result<()> {
        self.recorder.record(DriverCall::Reload);
        self.recorder.forget_elements();
        Ok(())
    }

    async fn current_url(&mut self) -> Result<String> {
        if self.config.url_unreadable {
            return Err(Error::Cdp("Target page crashed".to_string()));
        }
        Ok(self.url.clone())
    }

    async fn page_source(&mut self) -> Result<String> {
        Ok(self.config.page_source.clone())
    }

    async fn find_all(&mut self, locator: &Locator) -> Result<Vec<ElementRef>> {
        self.recorder.record(DriverCall::Find(*locator));
        if self.config.resolves(locator) {
            Ok(vec![self.recorder.register(*locator)])
        } else {
            Ok(Vec::new())
        }
    }

    async fn set_cookie(&mut self, cookie: &SessionCookie) -> Result<()> {
        if self.config.rejected_cookies.contains(&cookie.name) {
            return Err(Error::Cdp(format!("Invalid cookie fields: {}", cookie.name)));
        }
        self.recorder.record(DriverCall::SetCookie(cookie.clone()));
        Ok(())
    }

    async fn call_function(
        &mut self,
        element: ElementRef,
        function: &str,
    ) -> Result<Option<serde_json::Value>> {
        let target = self.target(element)?;
        self.recorder.record(DriverCall::CallFunction {
            target,
            function: function.to_string(),
        });
        if function.contains("this.click()") {
            self.follow_click();
        }
        Ok(None)
    }

    async fn upload_files(&mut self, element: ElementRef, files: &[String]) -> Result<()> {
        let target = self.target(element)?;
        self.recorder.record(DriverCall::UploadFiles {
            target,
            files: files.to_vec(),
        });
        Ok(())
    }

    async fn send_keys(&mut self, element: ElementRef, text: &str) -> Result<()> {
        let target = self.target(element)?;
        self.recorder.record(DriverCall::SendKeys {
            target,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn click(&mut self, element: ElementRef) -> Result<()> {
        let target = self.target(element)?;
        if self.config.click_intercepted {
            return Err(Error::Browser(format!("Click on {} was intercepted", target)));
        }
        self.recorder.record(DriverCall::Click(target));
        self.follow_click();
        Ok(())
    }

    async fn is_interactable(&mut self, element: ElementRef) -> Result<bool> {
        let target = self.target(element)?;
        Ok(!self.config.hidden.contains(&target))
    }

    async fn screenshot(&mut self, path: &Path) -> Result<()> {
        self.recorder.record(DriverCall::Screenshot(path.to_path_buf()));
        Ok(())
    }

    async fn quit(&mut self) -> Result<()> {
        self.recorder.record(DriverCall::Quit);
        Ok(())
    }
}

/// [`Launcher`] handing out [`MockDriver`]s that share one recorder
#[derive(Debug, Clone, Default)]
pub struct MockLauncher {
    config: MockConfig,
    recorder: MockRecorder,
}

impl MockLauncher {
    pub fn new(config: MockConfig) -> Self {
        Self {
            config,
            recorder: MockRecorder::default(),
        }
    }

    pub fn recorder(&self) -> MockRecorder {
        self.recorder.clone()
    }

    pub fn launch_count(&self) -> usize {
        self.recorder.count(|c| matches!(c, DriverCall::Launch { .. }))
    }
}

#[async_trait]
impl Launcher for MockLauncher {
    type Driver = MockDriver;

    async fn launch(&self, options: &LaunchOptions) -> Result<MockDriver> {
        self.recorder.record(DriverCall::Launch {
            headless: options.is_headless(),
            profile: options.profile_path.clone(),
        });
        if let Some(message) = &self.config.launch_error {
            return Err(Error::Browser(message.clone()));
        }
        Ok(MockDriver::with_recorder(self.config.clone(), self.recorder.clone()))
    }
}
