use super::{AuthArgs, BrowserArgs, PostArgs, SessionReport, runtime};
use crate::OutputFormat;
use anyhow::Result;
use socialpub_core::{Platform, PostReader, Publisher, SocialPost, scoped};
use socialpub_rednote::RednotePublisher;

pub fn execute(
    post_args: &PostArgs,
    auth: &AuthArgs,
    browser: &BrowserArgs,
    format: OutputFormat,
) -> Result<()> {
    let post = post_args.build(auth)?;
    let platform = PostReader::validate(&post)?;
    let options = browser.launch_options();

    tracing::info!(
        "Publishing '{}' to {} with {} image(s)",
        post.content.title,
        platform,
        post.content.image_paths.len()
    );

    let report = runtime()?.block_on(async {
        match platform {
            Platform::Rednote => publish_with(RednotePublisher::new(options), post).await,
        }
    });

    report.print(format)?;
    report.into_result()
}

/// Log in and publish inside a scoped session so the browser is always released
async fn publish_with<P: Publisher>(publisher: P, post: SocialPost) -> SessionReport {
    let SocialPost { auth, content, .. } = post;

    scoped(publisher, move |p| {
        Box::pin(async move {
            let mut report = SessionReport::new(p.platform());
            report.logged_in = p.login(&auth).await;
            if report.logged_in {
                report.published = Some(p.publish(&content).await);
            }
            report.error = p.last_error().map(ToString::to_string);
            report
        })
    })
    .await
}
