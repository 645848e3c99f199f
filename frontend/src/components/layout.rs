use crate::auth::{AuthDialog, use_auth};
use crate::components::icons::{Cart, Menu, User};
use crate::notify::use_notifier;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use leptos::prelude::*;

/// 导航栏 + 内容区
#[component]
pub fn Layout(children: Children) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let notifier = use_notifier();
    let current = router.current_route();
    let is_authenticated = auth.is_authenticated_signal();
    let display_name = auth.display_name();

    // 窄屏下的折叠菜单
    let (menu_open, set_menu_open) = signal(false);

    let go = move |route: AppRoute| {
        set_menu_open.set(false);
        router.navigate(route);
    };

    let nav_links = move || {
        AppRoute::NAV
            .into_iter()
            .filter(|r| !r.requires_auth() || is_authenticated.get())
            .map(|route| {
                let class = move || {
                    if current.get() == route {
                        "btn btn-ghost btn-sm btn-active"
                    } else {
                        "btn btn-ghost btn-sm"
                    }
                };
                view! {
                    <li>
                        <button class=class on:click=move |_| go(route)>
                            {route.label()}
                        </button>
                    </li>
                }
            })
            .collect_view()
    };

    let on_logout = move |_| {
        auth.logout();
        set_menu_open.set(false);
        router.navigate(AppRoute::Home);
        notifier.info("Logged out");
    };

    let auth_actions = move || {
        if is_authenticated.get() {
            view! {
                <button class="btn btn-ghost btn-sm gap-2" on:click=move |_| auth.open(AuthDialog::Account)>
                    <User attr:class="h-4 w-4" />
                    {move || display_name.get().unwrap_or_else(|| "Account".to_string())}
                </button>
                <button class="btn btn-ghost btn-sm btn-circle" title="Cart" on:click=move |_| go(AppRoute::Cart)>
                    <Cart attr:class="h-5 w-5" />
                </button>
                <button class="btn btn-outline btn-error btn-sm" on:click=on_logout>"Logout"</button>
            }
            .into_any()
        } else {
            view! {
                <button class="btn btn-ghost btn-sm" on:click=move |_| auth.open(AuthDialog::Login)>"Login"</button>
                <button class="btn btn-primary btn-sm" on:click=move |_| auth.open(AuthDialog::Register)>"Register"</button>
            }
            .into_any()
        }
    };

    view! {
        <div class="min-h-screen bg-base-200 font-sans">
            <div class="navbar bg-base-100 shadow-sm sticky top-0 z-[1000]">
                <div class="navbar-start">
                    <div class="dropdown lg:hidden">
                        <button class="btn btn-ghost btn-circle" on:click=move |_| set_menu_open.update(|o| *o = !*o)>
                            <Menu attr:class="h-5 w-5" />
                        </button>
                        <Show when=move || menu_open.get()>
                            <ul class="menu menu-sm dropdown-content bg-base-100 rounded-box z-[1001] mt-3 w-52 p-2 shadow">
                                {nav_links}
                            </ul>
                        </Show>
                    </div>
                    <button class="btn btn-ghost text-xl font-bold" on:click=move |_| go(AppRoute::Home)>
                        "Mebeli"
                    </button>
                </div>
                <div class="navbar-center hidden lg:flex">
                    <ul class="menu menu-horizontal px-1 gap-1">{nav_links}</ul>
                </div>
                <div class="navbar-end gap-1">{auth_actions}</div>
            </div>

            <main class="max-w-7xl mx-auto p-4 md:p-8">{children()}</main>
        </div>
    }
}
