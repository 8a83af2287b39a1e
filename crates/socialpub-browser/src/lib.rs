//! Browser sessions for socialpub publishers.
//!
//! Publishers talk to the browser only through the [`Driver`] trait. The
//! production implementation is [`ChromeDriver`], a chromiumoxide session
//! started by [`ChromeLauncher`]; tests use the `mock` module (feature
//! `mock`).

mod chrome;
mod chrome_finder;
pub mod cookies;
mod driver;
mod error;
mod launcher;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
mod profile;
pub mod wait;

pub use chrome::ChromeDriver;
pub use chrome_finder::ChromeFinder;
pub use cookies::{CookieScope, SameSite, SessionCookie};
pub use driver::{Driver, ElementRef, IS_INTERACTABLE_JS, Locator};
pub use error::{Error, Result};
pub use launcher::{
    ChromeLauncher, DEFAULT_PAGE_LOAD_TIMEOUT, DEFAULT_USER_AGENT, LaunchOptions, Launcher,
    STEALTH_SCRIPT,
};
pub use profile::ProfileManager;
