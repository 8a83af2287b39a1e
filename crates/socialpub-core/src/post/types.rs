use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Where a publisher gets its authenticated state from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_path: Option<PathBuf>,
}

/// The credential source a session will actually use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource<'a> {
    Profile(&'a Path),
    CookieFile(&'a Path),
}

impl AuthConfig {
    pub fn with_cookie_file(path: impl Into<PathBuf>) -> Self {
        Self {
            cookie_file: Some(path.into()),
            profile_path: None,
        }
    }

    pub fn with_profile(path: impl Into<PathBuf>) -> Self {
        Self {
            cookie_file: None,
            profile_path: Some(path.into()),
        }
    }

    /// Resolve the active source. A profile wins over a cookie file.
    pub fn active_source(&self) -> Option<AuthSource<'_>> {
        if let Some(profile) = &self.profile_path {
            return Some(AuthSource::Profile(profile));
        }
        self.cookie_file.as_deref().map(AuthSource::CookieFile)
    }
}

/// Content of a single post
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostContent {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub image_paths: Vec<PathBuf>,
    /// Platform-specific extension fields not otherwise modeled
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl PostContent {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            ..Default::default()
        }
    }

    pub fn with_hashtags<I, S>(mut self, hashtags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hashtags = hashtags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_images<I, P>(mut self, image_paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.image_paths = image_paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// A post addressed to one platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialPost {
    pub platform: String,
    #[serde(default)]
    pub auth: AuthConfig,
    pub content: PostContent,
}

impl SocialPost {
    pub fn new(platform: impl Into<String>, auth: AuthConfig, content: PostContent) -> Self {
        Self {
            platform: platform.into(),
            auth,
            content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_models_keep_values() {
        let auth = AuthConfig::with_cookie_file("cookies.json");
        let content = PostContent::new("Test Title", "Test Body")
            .with_hashtags(["#test"])
            .with_images(["img.jpg"]);
        let post = SocialPost::new("rednote", auth, content);

        assert_eq!(post.platform, "rednote");
        assert_eq!(post.auth.cookie_file, Some(PathBuf::from("cookies.json")));
        assert_eq!(post.content.title, "Test Title");
        assert!(post.content.hashtags.contains(&"#test".to_string()));
    }

    #[test]
    fn test_post_content_is_not_normalized() {
        let content = PostContent::new("  Title ", "line1\n\n  line2  ")
            .with_hashtags(["#a", "", "b "])
            .with_images(["./rel/img.jpg", "/abs/img.png"])
            .with_metadata("visibility", json!("private"));

        assert_eq!(content.title, "  Title ");
        assert_eq!(content.body, "line1\n\n  line2  ");
        assert_eq!(content.hashtags, vec!["#a", "", "b "]);
        assert_eq!(
            content.image_paths,
            vec![PathBuf::from("./rel/img.jpg"), PathBuf::from("/abs/img.png")]
        );
        assert_eq!(content.metadata.get("visibility"), Some(&json!("private")));

        let copy = content.clone();
        assert_eq!(copy, content);
    }

    #[test]
    fn test_profile_takes_precedence() {
        let auth = AuthConfig {
            cookie_file: Some(PathBuf::from("cookies.json")),
            profile_path: Some(PathBuf::from("/tmp/profile")),
        };

        assert_eq!(
            auth.active_source(),
            Some(AuthSource::Profile(Path::new("/tmp/profile")))
        );
    }

    #[test]
    fn test_cookie_file_source() {
        let auth = AuthConfig::with_cookie_file("cookies.json");
        assert_eq!(
            auth.active_source(),
            Some(AuthSource::CookieFile(Path::new("cookies.json")))
        );
        assert_eq!(AuthConfig::default().active_source(), None);
    }
}
