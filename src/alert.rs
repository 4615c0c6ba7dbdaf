//! Rendering of toast notifications.
//!
//! Toasts are collected while the view models run and shown at the top of the
//! rendered page.

use maud::{Markup, html};

use crate::notify::{Toast, ToastKind};

fn toast_style(kind: ToastKind) -> &'static str {
    match kind {
        ToastKind::Success => {
            "flex items-center p-4 mb-2 text-green-800 border border-green-300 rounded-lg \
            bg-green-50 dark:bg-gray-800 dark:text-green-400 dark:border-green-800"
        }
        ToastKind::Error => {
            "flex items-center p-4 mb-2 text-red-800 border border-red-300 rounded-lg \
            bg-red-50 dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
        }
    }
}

/// Renders a single toast.
pub fn toast_view(toast: &Toast) -> Markup {
    let role = match toast.kind {
        ToastKind::Success => "status",
        ToastKind::Error => "alert",
    };

    html! {
        div
            class=(toast_style(toast.kind))
            role=(role)
            data-kind=(match toast.kind { ToastKind::Success => "success", ToastKind::Error => "error" })
        {
            span class="text-sm font-medium" { (toast.message) }
        }
    }
}

/// Renders the toasts in the order they were raised. Renders nothing when
/// there are no toasts.
pub fn toasts_view(toasts: &[Toast]) -> Markup {
    html! {
        @if !toasts.is_empty() {
            div id="alert-container" class="w-full max-w-screen-lg mb-4" {
                @for toast in toasts {
                    (toast_view(toast))
                }
            }
        }
    }
}
