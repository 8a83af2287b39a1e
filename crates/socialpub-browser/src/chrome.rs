use crate::cookies::{SameSite, SessionCookie};
use crate::driver::{Driver, ElementRef, Locator};
use crate::launcher::{LaunchOptions, STEALTH_SCRIPT};
use crate::{ChromeFinder, Error, ProfileManager, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::dom::SetFileInputFilesParams;
use chromiumoxide::cdp::browser_protocol::input::InsertTextParams;
use chromiumoxide::cdp::browser_protocol::network::{CookieParam, CookieSameSite, TimeSinceEpoch};
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::element::Element;
use chromiumoxide::page::{Page, ScreenshotParams};
use chromiumoxide::keys::get_key_definition;
use futures::StreamExt;
use std::path::Path;
use tokio::task::JoinHandle;

/// A Chrome session driven over the DevTools protocol
pub struct ChromeDriver {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    /// Elements handed out since the last navigation, indexed by `ElementRef`
    elements: Vec<Element>,
    // Declared after `browser` so the directory outlives the process using it
    profile: ProfileManager,
}

impl ChromeDriver {
    /// Launch Chrome and open a blank page with the stealth script installed
    pub async fn launch(options: &LaunchOptions) -> Result<Self> {
        let chrome_binary = ChromeFinder::new(options.chrome_path.clone()).locate()?;

        let profile = match &options.profile_path {
            Some(path) => ProfileManager::persistent(path.clone())?,
            None => ProfileManager::temporary()?,
        };

        let (width, height) = options.window_size;
        let mut builder = BrowserConfig::builder()
            .disable_default_args()
            .args(options.build_args())
            .user_data_dir(profile.path())
            .window_size(width, height)
            .request_timeout(options.page_load_timeout);

        if !options.is_headless() {
            builder = builder.with_head();
        }
        if let Some(path) = chrome_binary {
            builder = builder.chrome_executable(path);
        }

        let config = builder.build().map_err(Error::Browser)?;

        tracing::info!(
            "Starting Chrome (headless: {}, profile: {})",
            options.is_headless(),
            profile.path().display()
        );

        let (browser, mut handler) = Browser::launch(config).await?;

        // The handler must be polled for any command to complete
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler event error (continuing): {}", e);
                }
            }
        });

        let page = browser.new_page("about:blank").await?;
        page.execute(AddScriptToEvaluateOnNewDocumentParams::new(STEALTH_SCRIPT))
            .await?;

        tracing::info!("Chrome session ready");

        Ok(Self {
            browser,
            page,
            handler_task,
            elements: Vec::new(),
            profile,
        })
    }

    fn element(&self, element: ElementRef) -> Result<&Element> {
        self.elements
            .get(element.0)
            .ok_or(Error::StaleElement(element.0))
    }
}

/// One step of typing text into the focused element
#[derive(Debug, PartialEq, Eq)]
enum Keystroke<'a> {
    /// A character with a keyboard definition, sent as key events
    Key(&'a str),
    /// A run of characters no key produces (CJK, emoji), inserted as text
    Insert(&'a str),
}

/// Split text into key presses and inserted runs, keeping order
fn keystrokes(text: &str) -> Vec<Keystroke<'_>> {
    let mut strokes = Vec::new();
    let mut run_start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        let ch = &text[i..i + c.len_utf8()];
        if get_key_definition(ch).is_some() {
            if let Some(start) = run_start.take() {
                strokes.push(Keystroke::Insert(&text[start..i]));
            }
            strokes.push(Keystroke::Key(ch));
        } else if run_start.is_none() {
            run_start = Some(i);
        }
    }
    if let Some(start) = run_start {
        strokes.push(Keystroke::Insert(&text[start..]));
    }

    strokes
}

fn cookie_param(cookie: &SessionCookie) -> CookieParam {
    let mut param = CookieParam::new(cookie.name.clone(), cookie.value.clone());
    param.domain = cookie.domain.clone();
    param.path = cookie.path.clone();
    param.secure = cookie.secure;
    param.http_only = cookie.http_only;
    param.expires = cookie.expiry.map(|e| TimeSinceEpoch::new(e as f64));
    param.same_site = cookie.same_site.map(|s| match s {
        SameSite::Lax => CookieSameSite::Lax,
        SameSite::Strict => CookieSameSite::Strict,
        SameSite::None => CookieSameSite::None,
    });
    param
}

#[async_trait]
impl Driver for ChromeDriver {
    async fn goto(&mut self, url: &str) -> Result<()> {
        tracing::debug!("Navigating to {}", url);
        self.elements.clear();
        self.page.goto(url).await?;
        Ok(())
    }

    async fn reload(&mut self) -> Result<()> {
        self.elements.clear();
        self.page.reload().await?;
        Ok(())
    }

    async fn current_url(&mut self) -> Result<String> {
        Ok(self.page.url().await?.unwrap_or_default())
    }

    async fn page_source(&mut self) -> Result<String> {
        Ok(self.page.content().await?)
    }

    async fn find_all(&mut self, locator: &Locator) -> Result<Vec<ElementRef>> {
        let found = match locator {
            Locator::Css(selector) => self.page.find_elements(*selector).await?,
            Locator::XPath(xpath) => self.page.find_xpaths(*xpath).await?,
        };

        let start = self.elements.len();
        self.elements.extend(found);
        Ok((start..self.elements.len()).map(ElementRef).collect())
    }

    async fn set_cookie(&mut self, cookie: &SessionCookie) -> Result<()> {
        self.page.set_cookie(cookie_param(cookie)).await?;
        Ok(())
    }

    async fn call_function(
        &mut self,
        element: ElementRef,
        function: &str,
    ) -> Result<Option<serde_json::Value>> {
        let returns = self.element(element)?.call_js_fn(function, false).await?;
        Ok(returns.result.value)
    }

    async fn upload_files(&mut self, element: ElementRef, files: &[String]) -> Result<()> {
        let mut params = SetFileInputFilesParams::new(files.to_vec());
        params.backend_node_id = Some(self.element(element)?.backend_node_id.clone());
        self.page.execute(params).await?;
        Ok(())
    }

    async fn send_keys(&mut self, element: ElementRef, text: &str) -> Result<()> {
        let target = self.element(element)?;
        for stroke in keystrokes(text) {
            match stroke {
                Keystroke::Key(key) => {
                    target.press_key(key).await?;
                }
                Keystroke::Insert(run) => {
                    self.page.execute(InsertTextParams::new(run)).await?;
                }
            }
        }
        Ok(())
    }

    async fn click(&mut self, element: ElementRef) -> Result<()> {
        self.element(element)?.click().await?;
        Ok(())
    }

    async fn screenshot(&mut self, path: &Path) -> Result<()> {
        self.page
            .save_screenshot(ScreenshotParams::builder().build(), path)
            .await?;
        Ok(())
    }

    async fn quit(&mut self) -> Result<()> {
        tracing::info!(
            "Closing Chrome session (profile: {})",
            self.profile.path().display()
        );
        self.elements.clear();
        self.browser.close().await?;
        if let Err(e) = self.browser.wait().await {
            tracing::debug!("Chrome did not exit cleanly: {}", e);
        }
        self.handler_task.abort();
        Ok(())
    }
}

impl Drop for ChromeDriver {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}
