use dioxus::prelude::*;
use dioxus_router::use_navigator;
use tracing::info;

use crate::context::{AppContext, Identity};
use crate::routes::Route;
use crate::vm::login_error_message;

#[component]
pub fn LoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let mut identity = use_context::<Identity>();
    let navigator = use_navigator();

    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);

    use_effect(move || {
        if identity.user().is_some() {
            let _ = navigator.replace(Route::Dashboard {});
        }
    });

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if busy() {
            return;
        }
        let session = ctx.session();
        let name = username();
        let secret = password();
        busy.set(true);
        spawn(async move {
            match session.login(&name, &secret).await {
                Ok(user) => {
                    info!(user_id = user.id.value(), role = user.role.label(), "signed in");
                    error.set(None);
                    password.set(String::new());
                    identity.sign_in(user);
                    let _ = navigator.replace(Route::Dashboard {});
                }
                Err(err) => error.set(Some(login_error_message(&err))),
            }
            busy.set(false);
        });
    };

    rsx! {
        div { class: "login",
            form { class: "login-card", onsubmit: on_submit,
                h1 { "IntelliTest" }
                p { class: "muted", "Sign in to continue" }
                label { r#for: "login-username", "Username" }
                input {
                    id: "login-username",
                    r#type: "text",
                    autocomplete: "username",
                    value: "{username}",
                    oninput: move |evt| username.set(evt.value()),
                }
                label { r#for: "login-password", "Password" }
                input {
                    id: "login-password",
                    r#type: "password",
                    autocomplete: "current-password",
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                }
                if let Some(message) = error() {
                    p { class: "notice notice-error", "{message}" }
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: busy(),
                    if busy() { "Signing in..." } else { "Sign in" }
                }
            }
        }
    }
}
