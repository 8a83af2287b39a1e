//! Subcommand implementations and the flag groups they share.

pub mod completion;
pub mod cookies;
pub mod login;
pub mod publish;

use crate::OutputFormat;
use anyhow::{Result, anyhow};
use clap::Args;
use console::style;
use serde::Serialize;
use socialpub_browser::{LaunchOptions, ProfileManager};
use socialpub_core::{AuthConfig, PostContent, PostReader, SocialPost};
use std::fs;
use std::path::PathBuf;

/// Where the post comes from: a JSON post file, or individual flags
#[derive(Args, Debug, Clone, Default)]
pub struct PostArgs {
    /// JSON post file ({"platform": ..., "auth": {...}, "content": {...}})
    #[arg(
        long,
        value_name = "FILE",
        conflicts_with_all = ["title", "body", "body_file", "tags", "images"]
    )]
    pub post: Option<PathBuf>,

    /// Post title
    #[arg(long)]
    pub title: Option<String>,

    /// Post body; each non-blank line becomes a paragraph
    #[arg(long, conflicts_with = "body_file")]
    pub body: Option<String>,

    /// Read the post body from a file
    #[arg(long, value_name = "FILE")]
    pub body_file: Option<PathBuf>,

    /// Hashtag to append (repeatable, leading '#' optional)
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Image to upload (repeatable, in order)
    #[arg(long = "image", value_name = "FILE")]
    pub images: Vec<PathBuf>,

    /// Target platform; overrides the post file's platform
    #[arg(long)]
    pub platform: Option<String>,
}

impl PostArgs {
    /// Build the post, letting auth flags replace the post file's auth
    pub fn build(&self, auth: &AuthArgs) -> Result<SocialPost> {
        let mut post = match &self.post {
            Some(path) => PostReader::from_file(path)?,
            None => SocialPost::new("rednote", AuthConfig::default(), self.content()?),
        };

        if let Some(platform) = &self.platform {
            post.platform = platform.clone();
        }

        let flags = auth.resolve()?;
        if flags.active_source().is_some() {
            post.auth = flags;
        }

        Ok(post)
    }

    fn content(&self) -> Result<PostContent> {
        let title = self
            .title
            .clone()
            .ok_or_else(|| anyhow!("--title is required unless --post is given"))?;

        let body = match (&self.body, &self.body_file) {
            (Some(body), _) => body.clone(),
            (None, Some(path)) => fs::read_to_string(path)
                .map_err(|e| anyhow!("Failed to read body file {}: {}", path.display(), e))?,
            (None, None) => String::new(),
        };

        Ok(PostContent::new(title, body)
            .with_hashtags(self.tags.iter().cloned())
            .with_images(self.images.iter().cloned()))
    }
}

/// Credentials for the creator site
#[derive(Args, Debug, Clone, Default)]
pub struct AuthArgs {
    /// Cookie file exported from a logged-in browser
    #[arg(long, value_name = "FILE", env = "SOCIALPUB_COOKIES")]
    pub cookies: Option<PathBuf>,

    /// Chrome user-data directory that is already logged in (wins over --cookies)
    #[arg(
        long,
        value_name = "DIR",
        env = "SOCIALPUB_PROFILE",
        conflicts_with = "profile_name"
    )]
    pub profile: Option<PathBuf>,

    /// Named profile under ~/.socialpub/profiles
    #[arg(long, value_name = "NAME")]
    pub profile_name: Option<String>,
}

impl AuthArgs {
    pub fn resolve(&self) -> Result<AuthConfig> {
        let profile_path = match (&self.profile, &self.profile_name) {
            (Some(path), _) => Some(path.clone()),
            (None, Some(name)) => Some(ProfileManager::named_path(name)?),
            (None, None) => None,
        };

        Ok(AuthConfig {
            cookie_file: self.cookies.clone(),
            profile_path,
        })
    }
}

/// How the browser is started
#[derive(Args, Debug, Clone, Default)]
pub struct BrowserArgs {
    /// Show the browser window (profile sessions are always headed)
    #[arg(long)]
    pub headed: bool,

    /// Path to the Chrome binary
    #[arg(long, value_name = "PATH", env = "CHROME_PATH")]
    pub chrome_path: Option<PathBuf>,
}

impl BrowserArgs {
    pub fn launch_options(&self) -> LaunchOptions {
        LaunchOptions {
            chrome_path: self.chrome_path.clone(),
            headless: !self.headed,
            ..LaunchOptions::default()
        }
    }
}

/// Single-threaded runtime; one publisher drives one browser sequentially
fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

/// Outcome of one publisher session
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionReport {
    pub platform: String,
    pub logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SessionReport {
    pub fn new(platform: &str) -> Self {
        Self {
            platform: platform.to_string(),
            ..Self::default()
        }
    }

    pub fn print(&self, format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(self)?),
            OutputFormat::Pretty => {
                println!("\n{}", style(format!("Platform: {}", self.platform)).bold());
                println!("  Login:   {}", status(self.logged_in));
                if let Some(published) = self.published {
                    println!("  Publish: {}", status(published));
                }
                if let Some(error) = &self.error {
                    println!("  Reason:  {}", style(error).red());
                }
            }
        }
        Ok(())
    }

    /// Failed sessions become an error so the process exits non-zero
    pub fn into_result(self) -> Result<()> {
        let reason = self.error.as_deref().unwrap_or("unknown error");
        if !self.logged_in {
            return Err(anyhow!("Login to {} failed: {}", self.platform, reason));
        }
        if self.published == Some(false) {
            return Err(anyhow!("Publishing to {} failed: {}", self.platform, reason));
        }
        Ok(())
    }
}

fn status(ok: bool) -> String {
    if ok {
        style("ok").green().to_string()
    } else {
        style("failed").red().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_post_from_flags() {
        let args = PostArgs {
            title: Some("Weekend".to_string()),
            body: Some("line1\nline2".to_string()),
            tags: vec!["#travel".to_string(), "food".to_string()],
            images: vec![PathBuf::from("a.jpg"), PathBuf::from("b.jpg")],
            ..PostArgs::default()
        };
        let auth = AuthArgs {
            cookies: Some(PathBuf::from("cookies.json")),
            ..AuthArgs::default()
        };

        let post = args.build(&auth).unwrap();
        assert_eq!(post.platform, "rednote");
        assert_eq!(post.content.title, "Weekend");
        assert_eq!(post.content.hashtags, vec!["#travel", "food"]);
        assert_eq!(post.content.image_paths.len(), 2);
        assert_eq!(post.auth.cookie_file, Some(PathBuf::from("cookies.json")));
    }

    #[test]
    fn test_post_requires_title_without_file() {
        let err = PostArgs::default().build(&AuthArgs::default()).unwrap_err();
        assert!(err.to_string().contains("--title"));
    }

    #[test]
    fn test_body_file() {
        let mut body = tempfile::NamedTempFile::new().unwrap();
        write!(body, "from a file").unwrap();
        let args = PostArgs {
            title: Some("T".to_string()),
            body_file: Some(body.path().to_path_buf()),
            ..PostArgs::default()
        };

        let post = args.build(&AuthArgs::default()).unwrap();
        assert_eq!(post.content.body, "from a file");
    }

    #[test]
    fn test_flags_override_post_file_auth() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"platform": "xhs", "auth": {{"cookie_file": "old.json"}},
                "content": {{"title": "T", "body": "B", "image_paths": ["x.jpg"]}}}}"#
        )
        .unwrap();
        let args = PostArgs {
            post: Some(file.path().to_path_buf()),
            ..PostArgs::default()
        };

        let kept = args.build(&AuthArgs::default()).unwrap();
        assert_eq!(kept.platform, "xhs");
        assert_eq!(kept.auth.cookie_file, Some(PathBuf::from("old.json")));

        let auth = AuthArgs {
            profile: Some(PathBuf::from("/tmp/profile")),
            ..AuthArgs::default()
        };
        let replaced = args.build(&auth).unwrap();
        assert_eq!(replaced.auth.cookie_file, None);
        assert_eq!(replaced.auth.profile_path, Some(PathBuf::from("/tmp/profile")));
    }

    #[test]
    fn test_named_profile_resolves_under_home() {
        let auth = AuthArgs {
            profile_name: Some("work".to_string()),
            ..AuthArgs::default()
        };
        let resolved = auth.resolve().unwrap();
        let path = resolved.profile_path.unwrap();
        assert!(path.ends_with(".socialpub/profiles/work"));

        let bad = AuthArgs {
            profile_name: Some("../escape".to_string()),
            ..AuthArgs::default()
        };
        assert!(bad.resolve().is_err());
    }

    #[test]
    fn test_launch_options_from_flags() {
        assert!(BrowserArgs::default().launch_options().headless);

        let headed = BrowserArgs {
            headed: true,
            chrome_path: Some(PathBuf::from("/opt/chrome")),
        };
        let options = headed.launch_options();
        assert!(!options.headless);
        assert_eq!(options.chrome_path, Some(PathBuf::from("/opt/chrome")));
    }

    #[test]
    fn test_report_result() {
        let mut report = SessionReport::new("rednote");
        report.error = Some("Invalid input: no images".to_string());
        let err = report.clone().into_result().unwrap_err();
        assert!(err.to_string().starts_with("Login to rednote failed"));

        report.logged_in = true;
        report.published = Some(false);
        let err = report.clone().into_result().unwrap_err();
        assert!(err.to_string().contains("no images"));

        report.published = Some(true);
        assert!(report.into_result().is_ok());
    }
}
