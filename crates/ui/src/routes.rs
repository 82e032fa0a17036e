use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable, use_navigator, use_route};
use tracing::warn;

use intellitest_core::model::{AppView, User};

use crate::context::{AppContext, Identity};
use crate::views::{
    AvailableTestsView, DashboardView, LoginView, MonitoringView, NoticeBar, ResultsView,
    TakeTestView,
};
use crate::vm::nav_items;

#[derive(Clone, Debug, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[route("/login", LoginView)] Login {},
    #[layout(Layout)]
        #[route("/", DashboardView)] Dashboard {},
        #[route("/tests", AvailableTestsView)] AvailableTests {},
        #[route("/tests/:test_id", TakeTestView)] TakeTest { test_id: u64 },
        #[route("/results", ResultsView)] Results {},
        #[route("/monitoring", MonitoringView)] Monitoring {},
}

impl Route {
    /// The guarded view behind this route. `Login` is open to everyone.
    #[must_use]
    pub fn app_view(&self) -> Option<AppView> {
        match self {
            Self::Login {} => None,
            Self::Dashboard {} => Some(AppView::Dashboard),
            Self::AvailableTests {} => Some(AppView::AvailableTests),
            Self::TakeTest { .. } => Some(AppView::TakeTest),
            Self::Results {} => Some(AppView::Results),
            Self::Monitoring {} => Some(AppView::Monitoring),
        }
    }
}

impl From<AppView> for Route {
    fn from(view: AppView) -> Self {
        match view {
            AppView::Dashboard => Self::Dashboard {},
            AppView::AvailableTests | AppView::TakeTest => Self::AvailableTests {},
            AppView::Results => Self::Results {},
            AppView::Monitoring => Self::Monitoring {},
        }
    }
}

#[component]
fn Layout() -> Element {
    let identity = use_context::<Identity>();
    let navigator = use_navigator();
    let route = use_route::<Route>();

    use_effect(move || {
        if identity.user().is_none() {
            let _ = navigator.replace(Route::Login {});
        }
    });

    let Some(user) = identity.user() else {
        return rsx! {
            p { class: "muted", "Redirecting to sign in..." }
        };
    };
    let allowed = route
        .app_view()
        .is_none_or(|view| user.role.can_view(view));

    rsx! {
        div { class: "app",
            Sidebar { user }
            main { class: "content",
                NoticeBar {}
                if allowed {
                    Outlet::<Route> {}
                } else {
                    AccessDenied {}
                }
            }
        }
    }
}

#[component]
fn Sidebar(user: User) -> Element {
    let ctx = use_context::<AppContext>();
    let mut identity = use_context::<Identity>();
    let navigator = use_navigator();
    let items = nav_items(user.role);
    let role_line = match user.class() {
        Some(class_name) => format!("{} · {class_name}", user.role.label()),
        None => user.role.label().to_string(),
    };

    let on_logout = move |_| {
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
        nav { class: "sidebar",
            h1 { "IntelliTest" }
            div { class: "who",
                p { class: "who-name", "{user.full_name}" }
                p { class: "who-role", "{role_line}" }
            }
            ul {
                for item in items {
                    li { Link { to: Route::from(item.view), "{item.label}" } }
                }
            }
            button { class: "btn btn-ghost logout", onclick: on_logout, "Sign out" }
        }
    }
}

#[component]
fn AccessDenied() -> Element {
    rsx! {
        div { class: "page",
            h2 { "Not available" }
            p { "Your role does not have access to this page." }
            Link { to: Route::Dashboard {}, "Back to dashboard" }
        }
    }
}
