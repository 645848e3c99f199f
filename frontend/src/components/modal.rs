//! `<dialog>` 模态框外壳
//!
//! 打开状态由外部信号驱动，Effect 同步到原生 `showModal()` / `close()`；
//! 用户按 Esc 关闭时回调 `on_close`，保证信号与 DOM 一致。

use leptos::prelude::*;

#[component]
pub fn Modal(
    #[prop(into)] open: Signal<bool>,
    #[prop(into)] on_close: Callback<()>,
    children: Children,
) -> impl IntoView {
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    Effect::new(move |_| {
        let Some(dialog) = dialog_ref.get() else {
            return;
        };
        if open.get() {
            if !dialog.open() {
                let _ = dialog.show_modal();
            }
        } else if dialog.open() {
            dialog.close();
        }
    });

    view! {
        <dialog class="modal" node_ref=dialog_ref on:close=move |_| on_close.run(())>
            <div class="modal-box">
                <form method="dialog">
                    <button class="btn btn-sm btn-circle btn-ghost absolute right-2 top-2">"✕"</button>
                </form>
                {children()}
            </div>
            <form method="dialog" class="modal-backdrop">
                <button>"close"</button>
            </form>
        </dialog>
    }
}

/// 带标签的单行输入，值双向绑定到信号
#[component]
pub fn TextField(
    id: &'static str,
    label: &'static str,
    value: RwSignal<String>,
    #[prop(default = "text")] kind: &'static str,
    #[prop(default = "off")] autocomplete: &'static str,
    #[prop(default = false)] required: bool,
    #[prop(into, default = Signal::stored(false))] disabled: Signal<bool>,
) -> impl IntoView {
    view! {
        <div class="form-control">
            <label class="label" for=id>
                <span class="label-text">{label}</span>
            </label>
            <input
                id=id
                type=kind
                autocomplete=autocomplete
                class="input input-bordered"
                required=required
                disabled=move || disabled.get()
                prop:value=value
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        </div>
    }
}
