use chrono::{Local, NaiveDateTime};
use socialpub_browser::Driver;
use std::path::PathBuf;

/// `<step>_<YYYYMMDD_HHMMSS>.png` in the working directory
pub fn screenshot_path(step: &str, at: NaiveDateTime) -> PathBuf {
    PathBuf::from(format!("{}_{}.png", step, at.format("%Y%m%d_%H%M%S")))
}

/// Save a screenshot of the current page. Failures are only logged.
pub async fn capture_debug_page<D: Driver + ?Sized>(driver: &mut D, step: &str) {
    let path = screenshot_path(step, Local::now().naive_local());
    match driver.screenshot(&path).await {
        Ok(()) => tracing::info!("Saved screenshot to {}", path.display()),
        Err(e) => tracing::debug!("Could not save screenshot {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_screenshot_path_format() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 1)
            .unwrap();

        assert_eq!(
            screenshot_path("title_fill_failed", at),
            PathBuf::from("title_fill_failed_20240307_090501.png")
        );
    }
}
