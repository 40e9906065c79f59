//! Publish/subscribe bus for progress notifications
//!
//! A [`Subject`] never owns its observers. Whoever creates an observer keeps
//! the only strong reference; once it is dropped the subject forgets it on the
//! next notification.

pub mod progress;
pub mod subject;

pub use progress::{ProgressEvent, ProgressStatus};
pub use subject::{Observer, Subject};
