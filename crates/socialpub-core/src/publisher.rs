//! Publisher contract shared by all platforms.
//!
//! A publisher authenticates with `login`, posts with `publish` and releases
//! its browser session with `cleanup`. Both `login` and `publish` report
//! plain success or failure; the reason for a failure is logged and kept in
//! [`Publisher::last_error`].
//!
//! Use [`scoped`] to make sure the session is released on every exit path:
//!
//! ```no_run
//! use socialpub_core::{scoped, AuthConfig, PostContent, Publisher};
//!
//! # async fn example<P: Publisher>(publisher: P) -> bool {
//! let auth = AuthConfig::with_cookie_file("cookies.json");
//! let content = PostContent::new("Title", "Body").with_images(["img.jpg"]);
//!
//! scoped(publisher, move |p| {
//!     Box::pin(async move { p.login(&auth).await && p.publish(&content).await })
//! })
//! .await
//! # }
//! ```

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::panic::{self, AssertUnwindSafe};

use crate::error::PublishError;
use crate::post::{AuthConfig, PostContent};

#[async_trait]
pub trait Publisher: Send {
    /// Platform identifier, e.g. "rednote"
    fn platform(&self) -> &str;

    /// Start a session if needed and authenticate it.
    async fn login(&mut self, auth: &AuthConfig) -> bool;

    /// Publish content. Fails without touching the browser if `login` has
    /// not started a session.
    async fn publish(&mut self, content: &PostContent) -> bool;

    /// Release the session. Safe to call repeatedly or before `login`.
    async fn cleanup(&mut self);

    fn is_started(&self) -> bool;

    /// Reason for the most recent failed `login` or `publish`
    fn last_error(&self) -> Option<&PublishError>;
}

/// Run `body` with exclusive access to `publisher`, then always clean up.
///
/// Cleanup runs after a normal return and after a panic inside `body`; a
/// panic is re-raised once the session has been released.
pub async fn scoped<P, T, F>(mut publisher: P, body: F) -> T
where
    P: Publisher,
    F: for<'a> FnOnce(&'a mut P) -> BoxFuture<'a, T>,
{
    let outcome = AssertUnwindSafe(body(&mut publisher)).catch_unwind().await;

    tracing::debug!("Releasing {} session", publisher.platform());
    publisher.cleanup().await;

    match outcome {
        Ok(value) => value,
        Err(payload) => panic::resume_unwind(payload),
    }
}
