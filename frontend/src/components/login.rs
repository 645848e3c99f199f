use crate::api::use_api;
use crate::auth::{AuthDialog, use_auth};
use crate::components::modal::Modal;
use crate::notify::use_notifier;
use leptos::prelude::*;
use leptos::task::spawn_local;
use mebeli::auth::{self, LoginForm};

#[component]
pub fn LoginDialog() -> impl IntoView {
    let auth_ctx = use_auth();
    let notifier = use_notifier();
    let api = StoredValue::new_local(use_api());

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let reset = move || {
        set_password.set(String::new());
        set_error_msg.set(None);
        set_is_submitting.set(false);
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = LoginForm {
            email: email.get_untracked(),
            password: password.get_untracked(),
        };
        if form.email.trim().is_empty() || form.password.is_empty() {
            set_error_msg.set(Some("Please fill in all fields".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let api = api.get_value();
        spawn_local(async move {
            match auth::login(&api, &form).await {
                Ok(outcome) => {
                    let greeting = outcome.message.unwrap_or_else(|| match &outcome.user {
                        Some(user) => format!("Welcome back, {}", user.name),
                        None => "Logged in".to_string(),
                    });
                    notifier.success(greeting);
                    set_email.try_set(String::new());
                    auth_ctx.close();
                }
                Err(e) => {
                    set_error_msg.try_set(Some(e.user_message()));
                }
            }
            set_is_submitting.try_set(false);
        });
    };

    view! {
        <Modal
            open=auth_ctx.is_open(AuthDialog::Login)
            on_close=move |_| {
                if auth_ctx.dialog.get_untracked() == Some(AuthDialog::Login) {
                    auth_ctx.close();
                }
                reset();
            }
        >
            <h3 class="font-bold text-lg">"Login"</h3>
            <p class="text-sm text-base-content/70 mb-2">"Sign in to manage your cart and track orders."</p>
            <form class="space-y-3" on:submit=on_submit>
                <Show when=move || error_msg.get().is_some()>
                    <div role="alert" class="alert alert-error text-sm py-2">
                        <span>{move || error_msg.get().unwrap_or_default()}</span>
                    </div>
                </Show>

                <div class="form-control">
                    <label class="label" for="login-email">
                        <span class="label-text">"Email"</span>
                    </label>
                    <input
                        id="login-email"
                        type="email"
                        autocomplete="email"
                        class="input input-bordered"
                        prop:value=email
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                        required
                    />
                </div>
                <div class="form-control">
                    <label class="label" for="login-password">
                        <span class="label-text">"Password"</span>
                    </label>
                    <input
                        id="login-password"
                        type="password"
                        autocomplete="current-password"
                        class="input input-bordered"
                        prop:value=password
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                        required
                    />
                </div>

                <button class="btn btn-primary w-full mt-4" disabled=move || is_submitting.get()>
                    {move || if is_submitting.get() {
                        view! { <span class="loading loading-spinner"></span> "Signing in..." }.into_any()
                    } else {
                        "Login".into_any()
                    }}
                </button>
            </form>
            <p class="text-sm text-center mt-4">
                "Don't have an account? "
                <a class="link link-primary" on:click=move |_| auth_ctx.open(AuthDialog::Register)>"Register"</a>
            </p>
        </Modal>
    }
}
