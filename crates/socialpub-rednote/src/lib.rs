//! Rednote (Xiaohongshu) publisher.
//!
//! Drives the creator site through a [`socialpub_browser::Driver`]: cookie or
//! profile login, image upload, title and body entry, hashtags, submission
//! and a success check.

pub mod diagnostics;
pub mod editor;
mod publisher;
pub mod site;

pub use publisher::RednotePublisher;
