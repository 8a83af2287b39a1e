use crate::Result;
use crate::chrome::ChromeDriver;
use crate::driver::Driver;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const DEFAULT_PAGE_LOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Installed on every new document to hide `navigator.webdriver`
pub const STEALTH_SCRIPT: &str =
    "Object.defineProperty(navigator, 'webdriver', { get: () => undefined });";

/// How a browser session is started
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchOptions {
    pub chrome_path: Option<PathBuf>,
    /// Persistent user-data directory holding a logged-in state
    pub profile_path: Option<PathBuf>,
    /// Ignored when a profile is attached; profile sessions always run headed
    pub headless: bool,
    pub user_agent: String,
    pub window_size: (u32, u32),
    pub page_load_timeout: Duration,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            chrome_path: None,
            profile_path: None,
            headless: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            window_size: (1920, 1080),
            page_load_timeout: DEFAULT_PAGE_LOAD_TIMEOUT,
        }
    }
}

impl LaunchOptions {
    pub fn with_profile(mut self, profile_path: Option<PathBuf>) -> Self {
        self.profile_path = profile_path;
        self
    }

    pub fn is_headless(&self) -> bool {
        self.headless && self.profile_path.is_none()
    }

    /// Chrome command-line switches on top of what chromiumoxide sets itself
    /// (headless mode, user-data dir, window size, debugging port).
    ///
    /// Never includes `--enable-automation`.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = vec![
            "--no-sandbox".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--disable-gpu".to_string(),
            "--disable-blink-features=AutomationControlled".to_string(),
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
            format!("--user-agent={}", self.user_agent),
        ];

        if self.profile_path.is_some() {
            args.push("--profile-directory=Default".to_string());
        }

        args
    }
}

/// Starts browser sessions for a publisher
#[async_trait]
pub trait Launcher: Send + Sync {
    type Driver: Driver;

    async fn launch(&self, options: &LaunchOptions) -> Result<Self::Driver>;
}

/// Launches a local Chrome through chromiumoxide
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeLauncher;

#[async_trait]
impl Launcher for ChromeLauncher {
    type Driver = ChromeDriver;

    async fn launch(&self, options: &LaunchOptions) -> Result<ChromeDriver> {
        ChromeDriver::launch(options).await
    }
}
