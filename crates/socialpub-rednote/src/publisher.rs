use crate::diagnostics::capture_debug_page;
use crate::editor;
use crate::site::{self, limit, pause};
use async_trait::async_trait;
use socialpub_browser::cookies::{self, CookieScope, SessionCookie};
use socialpub_browser::wait::{
    any_present, find_first, first_interactable, wait_for_element, wait_for_url,
};
use socialpub_browser::{ChromeLauncher, Driver, ElementRef, LaunchOptions, Launcher};
use socialpub_core::{AuthConfig, Platform, PostContent, PublishError, Publisher};
use std::path::{Path, PathBuf};
use tokio::time::sleep;

type StepResult<T = ()> = std::result::Result<T, PublishError>;

/// Publishes image notes on the Rednote creator site.
///
/// The browser session starts on the first `login` and is owned by this
/// publisher until `cleanup`.
pub struct RednotePublisher<L: Launcher = ChromeLauncher> {
    launcher: L,
    options: LaunchOptions,
    driver: Option<L::Driver>,
    last_error: Option<PublishError>,
}

impl RednotePublisher<ChromeLauncher> {
    pub fn new(options: LaunchOptions) -> Self {
        Self::with_launcher(ChromeLauncher, options)
    }
}

impl<L: Launcher> RednotePublisher<L> {
    pub fn with_launcher(launcher: L, options: LaunchOptions) -> Self {
        Self {
            launcher,
            options,
            driver: None,
            last_error: None,
        }
    }

    /// Start the browser unless a session is already running
    async fn start_driver(&mut self, auth: &AuthConfig) -> StepResult {
        if self.driver.is_some() {
            return Ok(());
        }

        tracing::info!("Starting browser session");
        let profile = auth
            .profile_path
            .clone()
            .or_else(|| self.options.profile_path.clone());
        let options = self.options.clone().with_profile(profile);
        if let Some(profile) = &options.profile_path {
            tracing::info!("Using Chrome profile: {}", profile.display());
        }

        let driver = self
            .launcher
            .launch(&options)
            .await
            .map_err(|e| PublishError::Setup(e.to_string()))?;
        self.driver = Some(driver);

        tracing::info!("Browser session started");
        Ok(())
    }

    async fn try_login(&mut self, auth: &AuthConfig) -> StepResult {
        if auth.profile_path.is_some() {
            self.start_driver(auth).await?;
            tracing::info!("Using Chrome profile - skipping cookie login");
            return Ok(());
        }

        let cookie_file = auth.cookie_file.as_deref().ok_or_else(|| {
            PublishError::Input("No cookie file or profile path provided for auth".to_string())
        })?;
        let cookies = read_cookie_file(cookie_file)?;

        self.start_driver(auth).await?;
        let driver = self.driver.as_mut().ok_or(PublishError::NotStarted)?;
        login_with_cookies(driver, &cookies).await
    }

    async fn try_publish(&mut self, content: &PostContent) -> StepResult {
        let driver = self.driver.as_mut().ok_or(PublishError::NotStarted)?;

        if content.image_paths.is_empty() {
            return Err(PublishError::Input(
                "No images available for upload".to_string(),
            ));
        }

        publish_note(driver, content).await
    }

    fn settle(&mut self, operation: &str, result: StepResult) -> bool {
        match result {
            Ok(()) => {
                self.last_error = None;
                true
            }
            Err(e) => {
                tracing::error!("{} failed: {}", operation, e);
                self.last_error = Some(e);
                false
            }
        }
    }
}

#[async_trait]
impl<L: Launcher> Publisher for RednotePublisher<L> {
    fn platform(&self) -> &str {
        Platform::Rednote.as_str()
    }

    async fn login(&mut self, auth: &AuthConfig) -> bool {
        let result = self.try_login(auth).await;
        if result.is_ok() {
            tracing::info!("Login successful");
        }
        self.settle("Login", result)
    }

    async fn publish(&mut self, content: &PostContent) -> bool {
        tracing::info!("Publishing to Rednote: {}", content.title);
        let result = self.try_publish(content).await;
        if result.is_ok() {
            tracing::info!("Post published");
        }
        self.settle("Publish", result)
    }

    async fn cleanup(&mut self) {
        if let Some(mut driver) = self.driver.take() {
            if let Err(e) = driver.quit().await {
                tracing::debug!("Ignoring error while closing browser: {}", e);
            }
        }
    }

    fn is_started(&self) -> bool {
        self.driver.is_some()
    }

    fn last_error(&self) -> Option<&PublishError> {
        self.last_error.as_ref()
    }
}

fn read_cookie_file(path: &Path) -> StepResult<Vec<SessionCookie>> {
    if !path.exists() {
        return Err(PublishError::Input(format!(
            "Cookie file not found: {}",
            path.display()
        )));
    }

    cookies::load_cookies(path).map_err(|e| PublishError::Input(e.to_string()))
}

/// Open the dashboard, inject in-scope cookies, reload and look for a
/// logged-in marker.
async fn login_with_cookies<D: Driver>(driver: &mut D, cookies: &[SessionCookie]) -> StepResult {
    tracing::info!("Navigating to creator dashboard");
    driver.goto(site::CREATOR_URL).await?;
    sleep(pause::LOGIN_PAGE_SETTLE).await;

    tracing::info!("Injecting {} cookies", cookies.len());
    let scope = current_scope(driver).await;
    let mut injected = 0;
    for cookie in cookies.iter().filter(|c| scope.matches(c)) {
        match driver.set_cookie(cookie).await {
            Ok(()) => injected += 1,
            Err(e) => tracing::debug!("Skipping cookie {}: {}", cookie.name, e),
        }
    }
    tracing::info!("Injected {} relevant cookies", injected);

    driver.reload().await?;
    tracing::info!("Page refreshed, verifying login");
    sleep(pause::AFTER_COOKIE_RELOAD).await;

    if any_present(driver, site::LOGIN_MARKERS).await {
        Ok(())
    } else {
        Err(PublishError::Verification(
            "No logged-in marker found after cookie injection".to_string(),
        ))
    }
}

/// Cookie scope for the page the session landed on
async fn current_scope<D: Driver>(driver: &mut D) -> CookieScope {
    match driver.current_url().await {
        Ok(url) => CookieScope::for_url(&url),
        Err(e) => {
            tracing::debug!("Could not read current URL: {}", e);
            None
        }
    }
    .unwrap_or_else(|| CookieScope::new(site::CREATOR_HOST))
}

/// Screenshot the page when a step fails, then pass the result through
async fn checkpoint<D: Driver, T>(
    driver: &mut D,
    step: &str,
    result: StepResult<T>,
) -> StepResult<T> {
    if result.is_err() {
        capture_debug_page(driver, step).await;
    }
    result
}

async fn publish_note<D: Driver>(driver: &mut D, content: &PostContent) -> StepResult {
    driver.goto(site::PUBLISH_URL).await?;
    sleep(pause::PUBLISH_PAGE_SETTLE).await;

    let uploaded = upload_images(driver, &content.image_paths).await;
    checkpoint(driver, "image_upload_failed", uploaded).await?;
    sleep(pause::UPLOAD_SETTLE).await;

    let titled = fill_title(driver, &content.title).await;
    checkpoint(driver, "title_fill_failed", titled).await?;

    let written = fill_body(driver, &content.body, &content.hashtags).await;
    checkpoint(driver, "body_fill_failed", written).await?;
    sleep(pause::EDITOR_SETTLE).await;

    let button = first_interactable(driver, site::SUBMIT_BUTTON)
        .await
        .ok_or_else(|| PublishError::Interaction("Failed to locate submit button".to_string()));
    let button = checkpoint(driver, "submit_button_missing", button).await?;

    let submitted = submit(driver, button).await;
    checkpoint(driver, "submit_failed", submitted).await
}

async fn upload_images<D: Driver>(driver: &mut D, image_paths: &[PathBuf]) -> StepResult {
    let files = image_paths
        .iter()
        .map(|path| {
            std::path::absolute(path)
                .map(|abs| abs.to_string_lossy().into_owned())
                .map_err(|e| {
                    PublishError::Input(format!("Bad image path {}: {}", path.display(), e))
                })
        })
        .collect::<StepResult<Vec<_>>>()?;

    tracing::info!("Uploading {} image(s)", files.len());
    let input = wait_for_element(driver, &site::FILE_INPUT, limit::ELEMENT).await?;
    driver.upload_files(input, &files).await?;
    Ok(())
}

async fn fill_title<D: Driver>(driver: &mut D, title: &str) -> StepResult {
    let input = wait_for_element(driver, &site::TITLE_INPUT, limit::ELEMENT).await?;
    driver.call_function(input, &editor::set_value_js(title)).await?;
    Ok(())
}

async fn fill_body<D: Driver>(driver: &mut D, body: &str, hashtags: &[String]) -> StepResult {
    let body_editor = find_first(driver, &site::BODY_EDITOR)
        .await?
        .ok_or_else(|| PublishError::Interaction("Body editor not found".to_string()))?;

    let html = editor::body_html(body);
    driver
        .call_function(body_editor, &editor::set_html_js(&html))
        .await?;
    sleep(pause::BODY_SETTLE).await;

    if !hashtags.is_empty() {
        driver
            .call_function(body_editor, editor::CARET_TO_END_JS)
            .await?;
        sleep(pause::CARET_SETTLE).await;

        for tag in hashtags.iter().filter_map(|t| editor::clean_hashtag(t)) {
            driver.send_keys(body_editor, &format!("#{}", tag)).await?;
            sleep(pause::TAG_SUGGESTION).await;
            driver.send_keys(body_editor, " ").await?;
            sleep(pause::AFTER_TAG).await;
        }
    }

    driver
        .call_function(body_editor, editor::DISPATCH_INPUT_JS)
        .await?;
    driver
        .call_function(body_editor, editor::DISPATCH_BLUR_JS)
        .await?;
    Ok(())
}

/// Click the submit control and confirm the post went through
async fn submit<D: Driver>(driver: &mut D, button: ElementRef) -> StepResult {
    sleep(pause::BEFORE_SUBMIT).await;
    driver
        .call_function(button, editor::SCROLL_INTO_VIEW_JS)
        .await?;
    sleep(pause::SCROLL_SETTLE).await;

    if let Err(e) = driver.click(button).await {
        tracing::debug!("Direct click failed ({}), clicking from script", e);
        driver.call_function(button, editor::CLICK_JS).await?;
    }

    match wait_for_url(driver, limit::SUBMIT_REDIRECT, |url| !site::on_publish_page(url)).await {
        Ok(true) => return Ok(()),
        Ok(false) => tracing::debug!("Still on the publish page, checking for a success message"),
        Err(e) => tracing::debug!("Redirect check failed ({}), checking for a success message", e),
    }

    let source = driver.page_source().await?;
    if site::SUCCESS_PHRASES.iter().any(|phrase| source.contains(phrase)) {
        tracing::info!("Success message found on page");
        return Ok(());
    }

    if let Ok(url) = driver.current_url().await
        && !site::on_publish_page(&url)
    {
        return Ok(());
    }

    Err(PublishError::Verification(
        "Still on the publish page and no success message shown".to_string(),
    ))
}
