//! 非阻塞通知（toast）
//!
//! 调用点捕获错误后推一条通知，超时自动消失；错误永远不会让视图崩溃。

use leptos::prelude::*;
use mebeli::ApiError;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    fn alert_class(&self) -> &'static str {
        match self {
            ToastKind::Success => "alert alert-success shadow-lg",
            ToastKind::Error => "alert alert-error shadow-lg",
            ToastKind::Info => "alert alert-info shadow-lg",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    id: u64,
    kind: ToastKind,
    text: String,
}

#[derive(Clone, Copy)]
pub struct Notifier {
    toasts: RwSignal<Vec<Toast>>,
    next_id: StoredValue<u64>,
    timeout: Duration,
}

impl Notifier {
    pub fn new(timeout: Duration) -> Self {
        Self {
            toasts: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
            timeout,
        }
    }

    pub fn push(&self, kind: ToastKind, text: impl Into<String>) {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);
        self.toasts.update(|list| {
            list.push(Toast {
                id,
                kind,
                text: text.into(),
            })
        });

        let this = *self;
        set_timeout(move || this.dismiss(id), self.timeout);
    }

    pub fn success(&self, text: impl Into<String>) {
        self.push(ToastKind::Success, text);
    }

    pub fn info(&self, text: impl Into<String>) {
        self.push(ToastKind::Info, text);
    }

    /// 以用户可读的文本展示错误（后端 message 原样透出）
    pub fn error(&self, title: &str, err: &ApiError) {
        self.push(ToastKind::Error, format!("{}: {}", title, err.user_message()));
    }

    pub fn error_text(&self, text: impl Into<String>) {
        self.push(ToastKind::Error, text);
    }

    pub fn dismiss(&self, id: u64) {
        // 视图卸载后定时器仍可能触发
        self.toasts.try_update(|list| list.retain(|t| t.id != id));
    }
}

pub fn use_notifier() -> Notifier {
    use_context::<Notifier>().expect("Notifier should be provided")
}

#[component]
pub fn ToastHost() -> impl IntoView {
    let notifier = use_notifier();
    let toasts = notifier.toasts;

    view! {
        <div class="toast toast-top toast-end z-[2000]">
            <For
                each=move || toasts.get()
                key=|t| t.id
                children=move |toast| {
                    let id = toast.id;
                    view! {
                        <div class=toast.kind.alert_class() on:click=move |_| notifier.dismiss(id)>
                            <span>{toast.text}</span>
                        </div>
                    }
                }
            />
        </div>
    }
}
