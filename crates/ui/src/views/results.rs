use dioxus::prelude::*;

use crate::context::AppContext;
use crate::views::common::ErrorNotice;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::map_result_rows;

#[component]
pub fn ResultsView() -> Element {
    let ctx = use_context::<AppContext>();
    let dashboard = ctx.dashboard();

    let mut resource = use_resource(move || {
        let dashboard = dashboard.clone();
        async move {
            let rows = dashboard.results().await.map_err(ViewError::from)?;
            Ok(map_result_rows(&rows))
        }
    });
    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page",
            h2 { "My results" }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(rows) => rsx! {
                    if rows.is_empty() {
                        p { class: "muted", "You have not submitted any tests yet." }
                    } else {
                        table { class: "results",
                            thead {
                                tr {
                                    th { "Test" }
                                    th { "Score" }
                                    th { "Answered" }
                                    th { "Submitted" }
                                }
                            }
                            tbody {
                                for row in rows {
                                    tr { key: "{row.id}",
                                        td {
                                            "{row.test_name}"
                                            if row.auto_submitted {
                                                span { class: "pill pill-warn", "Auto-submitted" }
                                            }
                                        }
                                        td { "{row.score_label}" }
                                        td { "{row.attempted_label}" }
                                        td { "{row.submitted_label}" }
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
        }
    }
}
