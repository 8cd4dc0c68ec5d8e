//! Notification panel backed by the user notification REST API.

pub mod center;
pub mod client;
pub mod error;
pub mod format;
pub mod types;
pub mod worker;

pub use center::{NotificationCenter, Opened, Poller, Toast, ToastLevel};
pub use client::{HttpNotificationApi, NotificationApi};
pub use worker::{Command, NotificationWorker};
