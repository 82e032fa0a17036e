use std::rc::Rc;
use std::sync::Arc;

use dioxus::prelude::*;
use tracing::warn;

use intellitest_core::model::TestId;
use services::{MonitorBoard, MonitoringPoller};

use crate::context::AppContext;
use crate::views::common::ErrorNotice;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{MonitorBoardVm, map_board, map_test_card};

#[component]
pub fn MonitoringView() -> Element {
    let ctx = use_context::<AppContext>();
    let monitoring = ctx.monitoring();
    let interval = ctx.poll_interval();
    let mut board = use_signal(MonitorBoard::default);

    let poller = use_hook(|| {
        let poller = match MonitoringPoller::new(Arc::clone(&monitoring), interval) {
            Ok(poller) => Rc::new(poller),
            Err(err) => {
                warn!(error = %err, "live monitoring unavailable");
                return None;
            }
        };
        let mut updates = poller.subscribe();
        spawn(async move {
            while updates.changed().await.is_ok() {
                let next = updates.borrow_and_update().clone();
                board.set(next);
            }
        });
        Some(poller)
    });

    {
        let poller = poller.clone();
        use_drop(move || {
            if let Some(poller) = poller {
                poller.stop();
            }
        });
    }

    // Follow the first live test until one is picked.
    let follow = poller.clone();
    let mut resource = use_resource(move || {
        let monitoring = monitoring.clone();
        let follow = follow.clone();
        async move {
            let tests = monitoring.live_tests().await.map_err(ViewError::from)?;
            if let (Some(poller), Some(first)) = (follow.as_ref(), tests.first()) {
                if poller.selected().is_none() {
                    poller.select(first.id);
                }
            }
            Ok(tests.iter().map(map_test_card).collect::<Vec<_>>())
        }
    });
    let state = view_state_from_resource(resource);

    let on_select = use_callback(move |test_id: TestId| {
        if let Some(poller) = poller.as_ref() {
            poller.select(test_id);
        }
    });

    let current = board.read().clone();
    let selected = current.test_id;
    let board_vm = map_board(&current);

    rsx! {
        div { class: "page monitoring",
            h2 { "Live monitoring" }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(cards) => rsx! {
                    if cards.is_empty() {
                        p { class: "muted", "No tests are live right now." }
                    } else {
                        ul { class: "live-tests",
                            for card in cards {
                                li { key: "{card.id}",
                                    button {
                                        class: if selected == Some(card.id) { "live-test selected" } else { "live-test" },
                                        onclick: move |_| on_select.call(card.id),
                                        span { class: "live-test-name", "{card.name}" }
                                        span { class: "pill", "{card.duration_label}" }
                                    }
                                }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    ErrorNotice { error: err, on_retry: move |()| resource.restart() }
                },
            }
            if selected.is_some() {
                BoardPanel { board: board_vm }
            } else {
                p { class: "muted", "Select a live test to follow its students." }
            }
        }
    }
}

#[component]
fn BoardPanel(board: MonitorBoardVm) -> Element {
    rsx! {
        section { class: "board",
            div { class: "stats",
                div { class: "stat",
                    span { class: "stat-value", "{board.total}" }
                    span { class: "stat-label", "Students" }
                }
                div { class: "stat",
                    span { class: "stat-value", "{board.submitted}" }
                    span { class: "stat-label", "Submitted" }
                }
                div { class: "stat",
                    span { class: "stat-value", "{board.in_progress}" }
                    span { class: "stat-label", "In progress" }
                }
                div { class: "stat",
                    span { class: "stat-value", "{board.not_started}" }
                    span { class: "stat-label", "Not started" }
                }
            }
            if let Some(refreshed) = board.refreshed_label.clone() {
                p { class: "muted", "{refreshed}" }
            }
            if !board.loaded {
                p { "Loading progress..." }
            } else if board.rows.is_empty() {
                p { class: "muted", "No students have progress on this test yet." }
            } else {
                table { class: "progress-table",
                    thead {
                        tr {
                            th { "Student" }
                            th { "Class" }
                            th { "Answered" }
                            th { "Progress" }
                            th { "Status" }
                        }
                    }
                    tbody {
                        for row in board.rows {
                            tr { key: "{row.user_id}",
                                td { "{row.name}" }
                                td { "{row.class_name}" }
                                td { "{row.progress_label}" }
                                td {
                                    div { class: "bar",
                                        div { class: "bar-fill", style: "width: {row.percent:.0}%" }
                                    }
                                }
                                td { span { class: row.status_class, "{row.status_label}" } }
                            }
                        }
                    }
                }
            }
        }
    }
}
