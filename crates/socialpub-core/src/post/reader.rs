use super::types::SocialPost;
use crate::platform::Platform;
use crate::Result;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub struct PostReader;

impl PostReader {
    /// Read and parse a post file from the given path
    pub fn from_file(path: &Path) -> Result<SocialPost> {
        tracing::debug!("Reading post file from: {}", path.display());

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let post: SocialPost = serde_json::from_reader(reader)?;

        tracing::info!(
            "Parsed post '{}' for {} with {} image(s)",
            post.content.title,
            post.platform,
            post.content.image_paths.len()
        );

        Ok(post)
    }

    /// Parse a post from a JSON string
    pub fn from_str(content: &str) -> Result<SocialPost> {
        tracing::debug!("Parsing post from string");

        let post: SocialPost = serde_json::from_str(content)?;
        Ok(post)
    }

    /// Check that a post can be handed to a publisher
    ///
    /// Only the platform name is enforced here. Missing credentials or images
    /// are logged; the publisher itself reports them as failures.
    pub fn validate(post: &SocialPost) -> Result<Platform> {
        let platform: Platform = post.platform.parse()?;

        if post.auth.active_source().is_none() {
            tracing::warn!("Post has no cookie file or profile path; login will fail");
        }

        if post.content.image_paths.is_empty() {
            tracing::warn!("Post has no images; publishing will fail");
        }

        Ok(platform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_parse_minimal_post() {
        let post_json = r#"{
            "platform": "rednote",
            "content": {"title": "T", "body": "B"}
        }"#;

        let post = PostReader::from_str(post_json).unwrap();
        assert_eq!(post.platform, "rednote");
        assert_eq!(post.auth.cookie_file, None);
        assert!(post.content.hashtags.is_empty());
        assert!(post.content.image_paths.is_empty());
        assert!(post.content.metadata.is_empty());
    }

    #[test]
    fn test_parse_full_post_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r##"{{
                "platform": "xhs",
                "auth": {{"cookie_file": "cookies.json"}},
                "content": {{
                    "title": "T",
                    "body": "line1\nline2",
                    "hashtags": ["#a", "b"],
                    "image_paths": ["img.jpg"],
                    "metadata": {{"draft": false}}
                }}
            }}"##
        )
        .unwrap();

        let post = PostReader::from_file(file.path()).unwrap();
        assert_eq!(post.auth.cookie_file, Some(PathBuf::from("cookies.json")));
        assert_eq!(post.content.body, "line1\nline2");
        assert_eq!(post.content.hashtags, vec!["#a", "b"]);
        assert_eq!(post.content.image_paths, vec![PathBuf::from("img.jpg")]);
        assert_eq!(PostReader::validate(&post).unwrap(), Platform::Rednote);
    }

    #[test]
    fn test_validate_unknown_platform() {
        let post = PostReader::from_str(
            r#"{"platform": "myspace", "content": {"title": "T", "body": ""}}"#,
        )
        .unwrap();

        let err = PostReader::validate(&post).unwrap_err();
        assert!(err.to_string().contains("myspace"));
    }

    #[test]
    fn test_missing_file() {
        let result = PostReader::from_file(Path::new("/nonexistent/post.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
