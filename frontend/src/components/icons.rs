//! 内联 SVG 图标（Heroicons outline）

use leptos::prelude::*;

#[component]
fn Outline(path: &'static str) -> impl IntoView {
    view! {
        <svg
            xmlns="http://www.w3.org/2000/svg"
            fill="none"
            viewBox="0 0 24 24"
            stroke-width="1.5"
            stroke="currentColor"
        >
            <path stroke-linecap="round" stroke-linejoin="round" d=path />
        </svg>
    }
}

#[component]
pub fn Menu() -> impl IntoView {
    view! { <Outline path="M3.75 6.75h16.5M3.75 12h16.5m-16.5 5.25h16.5" /> }
}

#[component]
pub fn Cart() -> impl IntoView {
    view! {
        <Outline path="M2.25 3h1.386c.51 0 .955.343 1.087.835l.383 1.437M7.5 14.25a3 3 0 0 0-3 3h15.75m-12.75-3h11.218c1.121-2.3 2.1-4.684 2.924-7.138a60.114 60.114 0 0 0-16.536-1.84M7.5 14.25 5.106 5.272M6 20.25a.75.75 0 1 1-1.5 0 .75.75 0 0 1 1.5 0Zm12.75 0a.75.75 0 1 1-1.5 0 .75.75 0 0 1 1.5 0Z" />
    }
}

#[component]
pub fn MapPin() -> impl IntoView {
    view! {
        <Outline path="M15 10.5a3 3 0 1 1-6 0 3 3 0 0 1 6 0ZM19.5 10.5c0 7.142-7.5 11.25-7.5 11.25S4.5 17.642 4.5 10.5a7.5 7.5 0 1 1 15 0Z" />
    }
}

#[component]
pub fn User() -> impl IntoView {
    view! {
        <Outline path="M15.75 6a3.75 3.75 0 1 1-7.5 0 3.75 3.75 0 0 1 7.5 0ZM4.501 20.118a7.5 7.5 0 0 1 14.998 0A17.933 17.933 0 0 1 12 21.75c-2.676 0-5.216-.584-7.499-1.632Z" />
    }
}

#[component]
pub fn Trash() -> impl IntoView {
    view! {
        <Outline path="m14.74 9-.346 9m-4.788 0L9.26 9m9.968-3.21c.342.052.682.107 1.022.166m-1.022-.165L18.16 19.673a2.25 2.25 0 0 1-2.244 2.077H8.084a2.25 2.25 0 0 1-2.244-2.077L4.772 5.79m14.456 0a48.108 48.108 0 0 0-3.478-.397m-12 .562c.34-.059.68-.114 1.022-.165m0 0a48.11 48.11 0 0 1 3.478-.397m7.5 0v-.916c0-1.18-.91-2.164-2.09-2.201a51.964 51.964 0 0 0-3.32 0c-1.18.037-2.09 1.022-2.09 2.201v.916m7.5 0a48.667 48.667 0 0 0-7.5 0" />
    }
}

#[component]
pub fn ChevronLeft() -> impl IntoView {
    view! { <Outline path="M15.75 19.5 8.25 12l7.5-7.5" /> }
}

#[component]
pub fn ChevronRight() -> impl IntoView {
    view! { <Outline path="m8.25 4.5 7.5 7.5-7.5 7.5" /> }
}

#[component]
pub fn Minus() -> impl IntoView {
    view! { <Outline path="M5 12h14" /> }
}

#[component]
pub fn Plus() -> impl IntoView {
    view! { <Outline path="M12 4.5v15m7.5-7.5h-15" /> }
}

#[component]
pub fn Refresh() -> impl IntoView {
    view! {
        <Outline path="M16.023 9.348h4.992v-.001M2.985 19.644v-4.992m0 0h4.992m-4.993 0 3.181 3.183a8.25 8.25 0 0 0 13.803-3.7M4.031 9.865a8.25 8.25 0 0 1 13.803-3.7l3.181 3.182m0-4.991v4.99" />
    }
}
