pub mod error;
pub mod platform;
pub mod post;
pub mod publisher;

pub use error::{Error, PublishError, Result};
pub use platform::Platform;
pub use post::{AuthConfig, AuthSource, PostContent, PostReader, SocialPost};
pub use publisher::{Publisher, scoped};
