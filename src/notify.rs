//! Transient user notifications ("toasts").
//!
//! View models never hand errors to the presentation layer. Failures are
//! reported here instead and the view model settles on an empty result.

use std::fmt;

use serde::Serialize;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::api::{ApiError, FailureKind};

/// Shown when the backend reports that the session has expired.
pub const UNAUTHENTICATED_MESSAGE: &str = "ログインの有効期限が切れました。再度ログインしてください。";

/// Shown when the backend cannot find the requested data.
pub const NOT_FOUND_MESSAGE: &str = "データが見つかりませんでした。";

/// Toast styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    /// An action completed.
    Success,
    /// An action failed.
    Error,
}

/// A short message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    /// How the toast should be styled.
    pub kind: ToastKind,
    /// The message text.
    pub message: String,
}

impl Toast {
    /// Create a success toast.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    /// Create an error toast.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }
}

/// Receives toasts from view models.
pub trait Notifier: Send + Sync + fmt::Debug {
    /// Show `toast` to the user.
    fn notify(&self, toast: Toast);
}

/// Sends toasts over a channel to whatever renders them.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: UnboundedSender<Toast>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiver its toasts are delivered to.
    pub fn new() -> (Self, UnboundedReceiver<Toast>) {
        let (sender, receiver) = unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, toast: Toast) {
        if self.sender.send(toast).is_err() {
            tracing::warn!("toast dropped because the receiver has been closed");
        }
    }
}

/// The message to show the user for `error`.
///
/// Authentication and not-found failures get fixed messages; everything
/// else uses `default_message`.
pub fn failure_message(error: &ApiError, default_message: &str) -> String {
    match error.kind() {
        FailureKind::Unauthenticated => UNAUTHENTICATED_MESSAGE.to_owned(),
        FailureKind::NotFound => NOT_FOUND_MESSAGE.to_owned(),
        FailureKind::Generic => default_message.to_owned(),
    }
}

/// Log `error` and show the user an error toast for it.
pub fn notify_failure(notifier: &dyn Notifier, error: &ApiError, default_message: &str) {
    tracing::error!("{default_message}: {error}");
    notifier.notify(Toast::error(failure_message(error, default_message)));
}

#[cfg(test)]
mod tests {
    use crate::{
        api::ApiError,
        notify::{
            ChannelNotifier, NOT_FOUND_MESSAGE, Notifier, Toast, ToastKind,
            UNAUTHENTICATED_MESSAGE, failure_message, notify_failure,
        },
    };

    #[test]
    fn unauthenticated_has_fixed_message() {
        assert_eq!(
            failure_message(&ApiError::Unauthenticated, "取得に失敗しました"),
            UNAUTHENTICATED_MESSAGE
        );
    }

    #[test]
    fn not_found_has_fixed_message() {
        assert_eq!(
            failure_message(&ApiError::NotFound, "取得に失敗しました"),
            NOT_FOUND_MESSAGE
        );
    }

    #[test]
    fn other_failures_use_default_message() {
        assert_eq!(
            failure_message(&ApiError::Status(500), "取得に失敗しました"),
            "取得に失敗しました"
        );
        assert_eq!(
            failure_message(&ApiError::Network("timeout".to_owned()), "保存に失敗しました"),
            "保存に失敗しました"
        );
    }

    #[tokio::test]
    async fn channel_notifier_delivers_toasts() {
        let (notifier, mut receiver) = ChannelNotifier::new();

        notifier.notify(Toast::success("保存しました"));
        notify_failure(&notifier, &ApiError::NotFound, "取得に失敗しました");

        assert_eq!(receiver.recv().await, Some(Toast::success("保存しました")));
        let toast = receiver.recv().await.unwrap();
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.message, NOT_FOUND_MESSAGE);
    }

    #[test]
    fn closed_channel_does_not_panic() {
        let (notifier, receiver) = ChannelNotifier::new();
        drop(receiver);

        notifier.notify(Toast::error("失敗しました"));
    }
}
