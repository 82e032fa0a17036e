use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};
use tracing::warn;

use crate::context::{AppContext, Identity, Notice};
use crate::routes::Route;
use crate::views::ViewError;
use crate::vm::TestCardVm;

/// Error panel with a retry button. Expired sessions get a sign-in button instead.
#[component]
pub fn ErrorNotice(error: ViewError, on_retry: EventHandler<()>) -> Element {
    let ctx = use_context::<AppContext>();
    let mut identity = use_context::<Identity>();
    let navigator = use_navigator();

    let on_sign_in = move |_| {
        let session = ctx.session();
        spawn(async move {
            if let Err(err) = session.logout().await {
                warn!(error = %err, "logout did not clear stored credentials");
            }
            identity.sign_out();
            let _ = navigator.replace(Route::Login {});
        });
    };

    rsx! {
        div { class: "notice notice-error",
            p { "{error.message()}" }
            if error == ViewError::Unauthorized {
                button { class: "btn", onclick: on_sign_in, "Sign in" }
            } else {
                button { class: "btn", onclick: move |_| on_retry.call(()), "Retry" }
            }
        }
    }
}

/// Message left by a view that redirected here.
#[component]
pub fn NoticeBar() -> Element {
    let mut notice = use_context::<Notice>();
    let Some(message) = notice.message() else {
        return rsx! {};
    };
    rsx! {
        div { class: "notice notice-info notice-bar", role: "status",
            p { "{message}" }
            button { class: "btn btn-ghost", onclick: move |_| notice.dismiss(), "Dismiss" }
        }
    }
}

#[component]
pub fn TestCard(card: TestCardVm) -> Element {
    rsx! {
        li { class: "test-card",
            div { class: "test-card-head",
                h3 { "{card.name}" }
                span { class: "pill", "{card.duration_label}" }
            }
            if let Some(description) = card.description.clone() {
                p { class: "muted", "{description}" }
            }
            div { class: "test-card-meta",
                if let Some(questions) = card.question_label.clone() {
                    span { "{questions}" }
                }
                if let Some(classes) = card.classes_label.clone() {
                    span { "Classes: {classes}" }
                }
            }
            div { class: "test-card-actions",
                if let Some(score) = card.score_label.clone() {
                    span { class: "score", "Completed · {score}" }
                } else if card.can_start {
                    Link { class: "btn btn-primary", to: Route::TakeTest { test_id: card.id.value() }, "Start test" }
                } else {
                    span { class: "muted", "Completed" }
                }
            }
        }
    }
}
