//! Everything that ties the publisher to the current creator-site markup.
//!
//! The site changes without notice; when a step starts failing, this is the
//! file to update.

use socialpub_browser::Locator;
use std::time::Duration;

pub const CREATOR_HOST: &str = "creator.xiaohongshu.com";
pub const CREATOR_URL: &str = "https://creator.xiaohongshu.com";
pub const PUBLISH_URL: &str = "https://creator.xiaohongshu.com/publish/publish?target=image";

/// Substring of the publish page URL; leaving it means the post went through
pub const PUBLISH_URL_MARKER: &str = "publish";

/// Present only on an authenticated dashboard, checked in order
pub const LOGIN_MARKERS: &[Locator] = &[
    Locator::Css(".creator-header"),
    Locator::Css("[class*='creator']"),
    Locator::Css(".user-avatar"),
    Locator::Css(".avatar"),
    Locator::Css("[class*='avatar']"),
];

pub const FILE_INPUT: Locator = Locator::Css("input[type='file']");

pub const TITLE_INPUT: Locator =
    Locator::Css(".c-input_inner input.d-text, input[placeholder*='标题']");

pub const BODY_EDITOR: Locator = Locator::Css("div.ProseMirror, [contenteditable='true']");

/// Submit control strategies, most specific first
pub const SUBMIT_BUTTON: &[Locator] = &[
    Locator::Css("button.bg-red"),
    Locator::XPath("//button[contains(.,'发布')]"),
    Locator::Css("button[type='submit']"),
    Locator::Css(".publish-btn"),
];

/// Page text shown after a successful post
pub const SUCCESS_PHRASES: &[&str] = &["发布成功", "笔记发布成功"];

/// True while the browser is still on the publish page
pub fn on_publish_page(url: &str) -> bool {
    url.to_lowercase().contains(PUBLISH_URL_MARKER)
}

/// Fixed pauses that let the remote page catch up
pub mod pause {
    use super::Duration;

    pub const LOGIN_PAGE_SETTLE: Duration = Duration::from_secs(5);
    pub const AFTER_COOKIE_RELOAD: Duration = Duration::from_secs(12);
    pub const PUBLISH_PAGE_SETTLE: Duration = Duration::from_secs(8);
    pub const UPLOAD_SETTLE: Duration = Duration::from_secs(15);
    pub const BODY_SETTLE: Duration = Duration::from_secs(1);
    pub const CARET_SETTLE: Duration = Duration::from_millis(500);
    /// Lets the tag suggestion popup open before the space commits the tag
    pub const TAG_SUGGESTION: Duration = Duration::from_millis(1500);
    pub const AFTER_TAG: Duration = Duration::from_millis(500);
    pub const EDITOR_SETTLE: Duration = Duration::from_secs(5);
    pub const BEFORE_SUBMIT: Duration = Duration::from_secs(10);
    pub const SCROLL_SETTLE: Duration = Duration::from_secs(2);
}

/// Bounded waits
pub mod limit {
    use super::Duration;

    pub const ELEMENT: Duration = Duration::from_secs(30);
    pub const SUBMIT_REDIRECT: Duration = Duration::from_secs(30);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_page_marker() {
        assert!(on_publish_page(PUBLISH_URL));
        assert!(on_publish_page("https://creator.xiaohongshu.com/PUBLISH/success"));
        assert!(!on_publish_page("https://creator.xiaohongshu.com/new/note-manager"));
    }
}
