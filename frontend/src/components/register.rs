use crate::api::use_api;
use crate::auth::{AuthDialog, use_auth};
use crate::components::modal::{Modal, TextField};
use crate::notify::use_notifier;
use leptos::prelude::*;
use leptos::task::spawn_local;
use mebeli::auth::{self, RegisterForm};

#[component]
pub fn RegisterDialog() -> impl IntoView {
    let auth_ctx = use_auth();
    let notifier = use_notifier();
    let api = StoredValue::new_local(use_api());

    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let phone = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm_password = RwSignal::new(String::new());
    let is_submitting = RwSignal::new(false);
    let error_msg = RwSignal::new(Option::<String>::None);

    let reset = move || {
        for field in [name, email, phone, password, confirm_password] {
            field.set(String::new());
        }
        error_msg.set(None);
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = RegisterForm {
            name: name.get_untracked(),
            email: email.get_untracked(),
            phone: phone.get_untracked(),
            password: password.get_untracked(),
            confirm_password: confirm_password.get_untracked(),
        };

        is_submitting.set(true);
        error_msg.set(None);

        let api = api.get_value();
        spawn_local(async move {
            match auth::register(&api, &form).await {
                Ok(message) => {
                    notifier.success(format!("{}. Please log in now.", message.trim_end_matches('.')));
                    // 注册成功后直接切到登录
                    auth_ctx.open(AuthDialog::Login);
                }
                Err(e) => {
                    error_msg.try_set(Some(e.user_message()));
                }
            }
            is_submitting.try_set(false);
        });
    };

    view! {
        <Modal
            open=auth_ctx.is_open(AuthDialog::Register)
            on_close=move |_| {
                if auth_ctx.dialog.get_untracked() == Some(AuthDialog::Register) {
                    auth_ctx.close();
                }
                reset();
            }
        >
            <h3 class="font-bold text-lg mb-2">"Create an account"</h3>
            <form class="space-y-2" on:submit=on_submit>
                <Show when=move || error_msg.get().is_some()>
                    <div role="alert" class="alert alert-error text-sm py-2">
                        <span>{move || error_msg.get().unwrap_or_default()}</span>
                    </div>
                </Show>

                <TextField id="register-name" label="Name" value=name autocomplete="name" required=true />
                <TextField id="register-email" label="Email" value=email kind="email" autocomplete="email" required=true />
                <TextField id="register-phone" label="Phone Number" value=phone kind="tel" autocomplete="tel" />
                <TextField id="register-password" label="Password" value=password kind="password" autocomplete="new-password" required=true />
                <TextField id="register-confirm" label="Confirm Password" value=confirm_password kind="password" autocomplete="new-password" required=true />

                <button class="btn btn-primary w-full mt-4" disabled=move || is_submitting.get()>
                    {move || if is_submitting.get() {
                        view! { <span class="loading loading-spinner"></span> "Registering..." }.into_any()
                    } else {
                        "Register".into_any()
                    }}
                </button>
            </form>
            <p class="text-sm text-center mt-4">
                "Already have an account? "
                <a class="link link-primary" on:click=move |_| auth_ctx.open(AuthDialog::Login)>"Login"</a>
            </p>
        </Modal>
    }
}
