use dioxus::prelude::*;
use dioxus_router::Link;

use intellitest_core::model::{Role, User};

use crate::context::{AppContext, Identity};
use crate::routes::Route;
use crate::views::common::{ErrorNotice, TestCard};
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{map_student_dashboard, map_test_card};

#[component]
pub fn DashboardView() -> Element {
    let identity = use_context::<Identity>();
    let Some(user) = identity.user() else {
        return rsx! {};
    };

    match user.role {
        Role::Student => rsx! { StudentHome { user } },
        Role::Teacher | Role::Admin => rsx! { StaffHome { user } },
    }
}

#[component]
fn StudentHome(user: User) -> Element {
    let ctx = use_context::<AppContext>();
    let dashboard = ctx.dashboard();
    let first_name = user.full_name.split_whitespace().next().unwrap_or_default().to_string();

    let mut resource = use_resource(move || {
        let dashboard = dashboard.clone();
        let user = user.clone();
        async move {
            let data = dashboard
                .student_dashboard(&user)
                .await
                .map_err(ViewError::from)?;
            Ok(map_student_dashboard(&data))
        }
    });
    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page",
            h2 { "Welcome back, {first_name}" }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    div { class: "stats",
                        for stat in data.stats {
                            div { class: "stat",
                                span { class: "stat-value", "{stat.value}" }
                                span { class: "stat-label", "{stat.label}" }
                            }
                        }
                    }
                    if let Some(notice) = data.notice {
                        p { class: "notice notice-info", "{notice}" }
                    } else if data.tests.iter().any(|card| card.can_start) {
                        h3 { "Waiting for you" }
                        ul { class: "test-list",
                            for card in data.tests.into_iter().filter(|card| card.can_start) {
                                TestCard { card }
                            }
                        }
                    } else {
                        p { class: "muted", "You are all caught up." }
                    }
                },
                ViewState::Error(err) => rsx! {
                    ErrorNotice { error: err, on_retry: move |()| resource.restart() }
                },
            }
        }
    }
}

#[component]
fn StaffHome(user: User) -> Element {
    let ctx = use_context::<AppContext>();
    let dashboard = ctx.dashboard();

    let mut resource = use_resource(move || {
        let dashboard = dashboard.clone();
        async move {
            let tests = dashboard.staff_overview().await.map_err(ViewError::from)?;
            Ok(tests.iter().map(map_test_card).collect::<Vec<_>>())
        }
    });
    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page",
            h2 { "Welcome back, {user.full_name}" }
            p { class: "muted", "Signed in as {user.role.label()}" }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(cards) => rsx! {
                    div { class: "stats",
                        div { class: "stat",
                            span { class: "stat-value", "{cards.len()}" }
                            span { class: "stat-label", "Live tests" }
                        }
                    }
                    if cards.is_empty() {
                        p { class: "muted", "No tests are live right now." }
                    } else {
                        ul { class: "test-list",
                            for card in cards {
                                li { key: "{card.id}", class: "test-card",
                                    div { class: "test-card-head",
                                        h3 { "{card.name}" }
                                        span { class: "pill", "{card.duration_label}" }
                                    }
                                    if let Some(classes) = card.classes_label.clone() {
                                        p { class: "muted", "Classes: {classes}" }
                                    }
                                }
                            }
                        }
                        Link { class: "btn btn-primary", to: Route::Monitoring {}, "Open live monitoring" }
                    }
                },
                ViewState::Error(err) => rsx! {
                    ErrorNotice { error: err, on_retry: move |()| resource.restart() }
                },
            }
        }
    }
}
