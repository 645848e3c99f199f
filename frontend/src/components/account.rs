use crate::api::use_api;
use crate::auth::{AuthDialog, use_auth};
use crate::components::modal::{Modal, TextField};
use crate::notify::use_notifier;
use leptos::prelude::*;
use leptos::task::spawn_local;
use mebeli::auth::{self, AccountForm};
use tracing::warn;

#[component]
pub fn AccountDialog() -> impl IntoView {
    let auth_ctx = use_auth();
    let notifier = use_notifier();
    let api = StoredValue::new_local(use_api());
    let open = auth_ctx.is_open(AuthDialog::Account);

    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let phone = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm_password = RwSignal::new(String::new());

    let loading = RwSignal::new(false);
    let saving = RwSignal::new(false);
    let edit_mode = RwSignal::new(false);
    let error_msg = RwSignal::new(Option::<String>::None);

    let fill = move |form: AccountForm| {
        name.try_set(form.name);
        email.try_set(form.email);
        phone.try_set(form.phone);
        password.try_set(String::new());
        confirm_password.try_set(String::new());
    };

    // 每次打开都重新拉取资料
    Effect::new(move |_| {
        if !open.get() {
            return;
        }
        edit_mode.set(false);
        error_msg.set(None);
        loading.set(true);
        let api = api.get_value();
        spawn_local(async move {
            match auth::load_account(&api).await {
                Ok(form) => fill(form),
                Err(e) => {
                    warn!(error = %e, "failed to load account");
                    error_msg.try_set(Some(e.user_message()));
                }
            }
            loading.try_set(false);
        });
    });

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = AccountForm {
            name: name.get_untracked(),
            email: email.get_untracked(),
            phone: phone.get_untracked(),
            password: password.get_untracked(),
            confirm_password: confirm_password.get_untracked(),
        };

        saving.set(true);
        error_msg.set(None);

        let api = api.get_value();
        spawn_local(async move {
            match auth::update_account(&api, &form).await {
                Ok(user) => {
                    fill(AccountForm::from_user(&user));
                    edit_mode.try_set(false);
                    notifier.success("Your account details have been saved.");
                }
                Err(e) => {
                    error_msg.try_set(Some(e.user_message()));
                }
            }
            saving.try_set(false);
        });
    };

    let read_only = Signal::derive(move || !edit_mode.get() || saving.get());

    view! {
        <Modal
            open=open
            on_close=move |_| {
                if auth_ctx.dialog.get_untracked() == Some(AuthDialog::Account) {
                    auth_ctx.close();
                }
            }
        >
            <div class="flex items-center gap-2 mb-2">
                <h3 class="font-bold text-lg">"My Account"</h3>
                <button
                    type="button"
                    class="btn btn-ghost btn-xs"
                    disabled=move || loading.get()
                    on:click=move |_| edit_mode.update(|e| *e = !*e)
                >
                    {move || if edit_mode.get() { "Cancel" } else { "Edit" }}
                </button>
            </div>

            <Show
                when=move || !loading.get()
                fallback=|| view! {
                    <div class="flex justify-center py-8">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                    </div>
                }
            >
                <form class="space-y-2" on:submit=on_submit>
                    <Show when=move || error_msg.get().is_some()>
                        <div role="alert" class="alert alert-error text-sm py-2">
                            <span>{move || error_msg.get().unwrap_or_default()}</span>
                        </div>
                    </Show>

                    <TextField id="account-name" label="Name" value=name autocomplete="name" disabled=read_only />
                    <TextField id="account-email" label="Email" value=email kind="email" autocomplete="email" disabled=read_only />
                    <TextField id="account-phone" label="Phone Number" value=phone kind="tel" autocomplete="tel" disabled=read_only />

                    <Show when=move || edit_mode.get()>
                        <p class="text-xs text-base-content/60 pt-2">"Leave the password empty to keep the current one."</p>
                        <TextField id="account-password" label="New Password" value=password kind="password" autocomplete="new-password" />
                        <TextField id="account-confirm" label="Confirm Password" value=confirm_password kind="password" autocomplete="new-password" />
                        <button class="btn btn-primary w-full mt-4" disabled=move || saving.get()>
                            {move || if saving.get() {
                                view! { <span class="loading loading-spinner"></span> "Saving..." }.into_any()
                            } else {
                                "Save".into_any()
                            }}
                        </button>
                    </Show>
                </form>
            </Show>
        </Modal>
    }
}
