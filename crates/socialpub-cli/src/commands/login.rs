use super::{AuthArgs, BrowserArgs, SessionReport, runtime};
use crate::OutputFormat;
use anyhow::Result;
use socialpub_core::{AuthConfig, Platform, Publisher, scoped};
use socialpub_rednote::RednotePublisher;

pub fn execute(
    platform: &str,
    auth: &AuthArgs,
    browser: &BrowserArgs,
    format: OutputFormat,
) -> Result<()> {
    let platform: Platform = platform.parse()?;
    let auth = auth.resolve()?;
    let options = browser.launch_options();

    let report = runtime()?.block_on(async {
        match platform {
            Platform::Rednote => login_with(RednotePublisher::new(options), auth).await,
        }
    });

    report.print(format)?;
    report.into_result()
}

async fn login_with<P: Publisher>(publisher: P, auth: AuthConfig) -> SessionReport {
    scoped(publisher, move |p| {
        Box::pin(async move {
            let mut report = SessionReport::new(p.platform());
            report.logged_in = p.login(&auth).await;
            report.error = p.last_error().map(ToString::to_string);
            report
        })
    })
    .await
}
