use socialpub_browser::LaunchOptions;
use socialpub_browser::mock::{DriverCall, MockConfig, MockLauncher};
use socialpub_core::{AuthConfig, PostContent, PublishError, Publisher, scoped};
use socialpub_rednote::{RednotePublisher, editor, site};
use std::io::Write;
use tempfile::NamedTempFile;

const COOKIES: &str = r#"[
    {"name": "a1", "value": "1", "domain": ".xiaohongshu.com", "secure": 1,
     "expirationDate": 1893456000.5},
    {"name": "tracker", "value": "2", "domain": "other.com"}
]"#;

fn cookie_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(COOKIES.as_bytes()).unwrap();
    file
}

fn working_site() -> MockConfig {
    MockConfig::default()
        .with_present(&[site::LOGIN_MARKERS[0]])
        .with_present(&[site::FILE_INPUT, site::TITLE_INPUT, site::BODY_EDITOR])
        .with_present(&[site::SUBMIT_BUTTON[0]])
        .with_url_after_click("https://creator.xiaohongshu.com/new/note-manager")
}

fn sample_post() -> PostContent {
    PostContent::new("T", "line1\nline2")
        .with_hashtags(["#a", "b"])
        .with_images(["img.jpg"])
}

#[tokio::test(start_paused = true)]
async fn test_cookie_login_then_publish() {
    let launcher = MockLauncher::new(working_site());
    let recorder = launcher.recorder();
    let mut publisher = RednotePublisher::with_launcher(launcher, LaunchOptions::default());
    let cookies = cookie_file();

    assert!(publisher.login(&AuthConfig::with_cookie_file(cookies.path())).await);
    assert!(publisher.publish(&sample_post()).await);
    publisher.cleanup().await;

    // Cookie session runs headless and only in-scope cookies are injected
    assert_eq!(
        recorder.calls()[0],
        DriverCall::Launch {
            headless: true,
            profile: None
        }
    );
    let injected = recorder.cookies_set();
    assert_eq!(injected.len(), 1);
    assert_eq!(injected[0].name, "a1");
    assert_eq!(injected[0].secure, Some(true));
    assert_eq!(injected[0].expiry, Some(1893456000));

    assert_eq!(
        recorder.navigations(),
        vec![site::CREATOR_URL.to_string(), site::PUBLISH_URL.to_string()]
    );

    let expected_image = std::path::absolute("img.jpg")
        .unwrap()
        .to_string_lossy()
        .into_owned();
    assert_eq!(
        recorder.count(|c| *c
            == DriverCall::UploadFiles {
                target: site::FILE_INPUT,
                files: vec![expected_image.clone()],
            }),
        1
    );

    assert_eq!(
        recorder.functions_on(site::TITLE_INPUT),
        vec![editor::set_value_js("T")]
    );

    let body_scripts = recorder.functions_on(site::BODY_EDITOR);
    assert_eq!(
        body_scripts[0],
        editor::set_html_js("<p>line1</p><p>line2</p><p><br></p>")
    );
    assert_eq!(body_scripts[1], editor::CARET_TO_END_JS);
    assert_eq!(recorder.typed_text(), vec!["#a", " ", "#b", " "]);

    assert_eq!(
        recorder.count(|c| *c == DriverCall::Click(site::SUBMIT_BUTTON[0])),
        1
    );
    assert_eq!(recorder.count(|c| *c == DriverCall::Quit), 1);
    assert!(recorder.screenshots().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_scoped_session_cleans_up_on_failure() {
    let launcher = MockLauncher::new(MockConfig::default().with_present(&[site::LOGIN_MARKERS[2]]));
    let recorder = launcher.recorder();
    let publisher = RednotePublisher::with_launcher(launcher, LaunchOptions::default());
    let cookies = cookie_file();
    let auth = AuthConfig::with_cookie_file(cookies.path());

    let (logged_in, published, error) = scoped(publisher, move |p| {
        Box::pin(async move {
            let logged_in = p.login(&auth).await;
            let published = p.publish(&sample_post()).await;
            (logged_in, published, p.last_error().cloned())
        })
    })
    .await;

    assert!(logged_in);
    assert!(!published);
    assert!(matches!(error, Some(PublishError::Interaction(_))));
    assert_eq!(recorder.count(|c| *c == DriverCall::Quit), 1);
}

#[tokio::test(start_paused = true)]
async fn test_profile_session_runs_headed() {
    let profile = tempfile::tempdir().unwrap();
    let launcher = MockLauncher::new(working_site());
    let recorder = launcher.recorder();
    let mut publisher = RednotePublisher::with_launcher(launcher, LaunchOptions::default());

    assert!(publisher.login(&AuthConfig::with_profile(profile.path())).await);
    assert!(publisher.publish(&sample_post()).await);

    assert_eq!(
        recorder.calls()[0],
        DriverCall::Launch {
            headless: false,
            profile: Some(profile.path().to_path_buf()),
        }
    );
    assert!(recorder.cookies_set().is_empty());
    assert_eq!(recorder.navigations(), vec![site::PUBLISH_URL.to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_navigation_failure_is_reported() {
    let launcher = MockLauncher::new(working_site().failing_goto());
    let mut publisher = RednotePublisher::with_launcher(launcher, LaunchOptions::default());
    let cookies = cookie_file();

    assert!(!publisher.login(&AuthConfig::with_cookie_file(cookies.path())).await);
    assert!(matches!(
        publisher.last_error(),
        Some(PublishError::Interaction(_))
    ));
    publisher.cleanup().await;
    assert!(!publisher.is_started());
}

#[tokio::test]
async fn test_publish_after_cleanup_is_rejected() {
    let launcher = MockLauncher::new(working_site());
    let recorder = launcher.recorder();
    let mut publisher = RednotePublisher::with_launcher(launcher, LaunchOptions::default());

    assert!(!publisher.publish(&sample_post()).await);
    assert!(recorder.is_empty());

    publisher.cleanup().await;
    publisher.cleanup().await;
    assert!(!publisher.publish(&sample_post()).await);
    assert_eq!(publisher.last_error(), Some(&PublishError::NotStarted));
    assert!(recorder.is_empty());
}
