use crate::api::use_cart_service;
use crate::components::catalog::format_price;
use crate::components::icons::{MapPin, Minus, Plus, Refresh, Trash};
use crate::notify::use_notifier;
use crate::web::current_position;
use leptos::prelude::*;
use leptos::task::spawn_local;
use mebeli::ApiResult;
use mebeli::cart::{cart_total, resolve_checkout_location};
use mebeli::shared::{CartLine, Id};
use tracing::{info, warn};

#[component]
pub fn CartPage() -> impl IntoView {
    let notifier = use_notifier();
    // CartService 持有 Rc，放进本地存储以便在各个 Copy 闭包之间共享
    let service = StoredValue::new_local(use_cart_service());

    let lines = RwSignal::new(Vec::<CartLine>::new());
    let loading = RwSignal::new(true);
    // 正在修改的购物车行，期间禁用该行按钮
    let busy_line = RwSignal::new(Option::<Id>::None);
    let checking_out = RwSignal::new(false);
    let manual_lat = RwSignal::new(String::new());
    let manual_lng = RwSignal::new(String::new());

    // 所有修改的结果都是完整的购物车
    let apply = move |result: ApiResult<Vec<CartLine>>, failure: &str| {
        match result {
            Ok(fresh) => {
                lines.try_set(fresh);
            }
            Err(e) => {
                warn!(error = %e, "{}", failure);
                notifier.error(failure, &e);
            }
        }
        busy_line.try_set(None);
    };

    let reload = move || {
        let service = service.get_value();
        loading.set(true);
        spawn_local(async move {
            apply(service.fetch().await, "Failed to load cart");
            loading.try_set(false);
        });
    };
    reload();

    let set_quantity = move |line_id: Id, quantity: u32| {
        let service = service.get_value();
        busy_line.set(Some(line_id));
        spawn_local(async move {
            apply(
                service.update_quantity(line_id, quantity).await,
                "Could not update quantity",
            );
        });
    };

    let remove = move |line_id: Id| {
        let service = service.get_value();
        busy_line.set(Some(line_id));
        spawn_local(async move {
            apply(service.remove(line_id).await, "Could not remove item");
        });
    };

    let checkout = move |_| {
        let service = service.get_value();
        let lat = manual_lat.get_untracked();
        let lng = manual_lng.get_untracked();
        checking_out.set(true);
        spawn_local(async move {
            let device = current_position().await;
            match resolve_checkout_location(device, &lat, &lng) {
                Ok(point) => match service.checkout(point).await {
                    Ok(receipt) => {
                        info!(lat = point.lat, lng = point.lng, "checkout complete");
                        notifier.success(receipt.notice());
                        lines.try_set(receipt.lines);
                    }
                    Err(e) => {
                        warn!(error = %e, "checkout failed");
                        notifier.error("Checkout failed", &e);
                    }
                },
                Err(e) => {
                    warn!(error = %e, "no usable delivery location");
                    notifier.error_text(format!(
                        "{}. Enter the delivery latitude and longitude manually.",
                        e
                    ));
                }
            }
            checking_out.try_set(false);
        });
    };

    let total = move || lines.with(|l| cart_total(l));
    let is_empty = move || lines.with(Vec::is_empty);

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-2xl font-bold">"Your Shopping Cart"</h1>
                <button class="btn btn-ghost btn-sm btn-circle" title="Reload" on:click=move |_| reload()>
                    <Refresh attr:class="h-5 w-5" />
                </button>
            </div>

            <div class="card bg-base-100 shadow">
                <div class="card-body">
                    <Show
                        when=move || !loading.get()
                        fallback=|| view! {
                            <div class="flex justify-center py-8">
                                <span class="loading loading-spinner loading-lg text-primary"></span>
                            </div>
                        }
                    >
                        <Show
                            when=move || !is_empty()
                            fallback=|| view! { <p class="text-center text-base-content/60 py-8">"Your cart is empty."</p> }
                        >
                            <ul class="divide-y divide-base-200">
                                <For
                                    each=move || lines.get()
                                    key=|line| (line.id, line.quantity)
                                    children=move |line| {
                                        let id = line.id;
                                        let qty = line.quantity;
                                        let busy = move || busy_line.get() == Some(id);
                                        view! {
                                            <li class="flex items-center gap-4 py-3">
                                                <div class="avatar">
                                                    <div class="w-16 h-16 rounded bg-base-200">
                                                        {line.furniture.image.clone().map(|src| view! { <img src=src alt="" /> })}
                                                    </div>
                                                </div>
                                                <div class="flex-1">
                                                    <p class="font-semibold">{line.furniture.name.clone()}</p>
                                                    <p class="text-sm text-base-content/70">
                                                        {format!("Price: {}", format_price(line.furniture.price))}
                                                    </p>
                                                </div>
                                                <div class="join">
                                                    <button
                                                        class="btn btn-sm join-item"
                                                        disabled=move || busy() || qty <= 1
                                                        on:click=move |_| set_quantity(id, qty.saturating_sub(1))
                                                    >
                                                        <Minus attr:class="h-3 w-3" />
                                                    </button>
                                                    <span class="btn btn-sm join-item no-animation">{qty}</span>
                                                    <button
                                                        class="btn btn-sm join-item"
                                                        disabled=busy
                                                        on:click=move |_| set_quantity(id, qty + 1)
                                                    >
                                                        <Plus attr:class="h-3 w-3" />
                                                    </button>
                                                </div>
                                                <p class="w-32 text-right font-medium">{format_price(line.line_total())}</p>
                                                <button
                                                    class="btn btn-ghost btn-sm btn-circle text-error"
                                                    title="Remove"
                                                    disabled=busy
                                                    on:click=move |_| remove(id)
                                                >
                                                    <Trash attr:class="h-4 w-4" />
                                                </button>
                                            </li>
                                        }
                                    }
                                />
                            </ul>

                            <div class="flex justify-between items-center mt-4">
                                <span class="text-lg font-semibold">"Total:"</span>
                                <span class="text-lg font-bold text-primary">{move || format_price(total())}</span>
                            </div>
                        </Show>
                    </Show>
                </div>
            </div>

            <Show when=move || !is_empty()>
                <div class="card bg-base-100 shadow">
                    <div class="card-body space-y-3">
                        <h2 class="card-title gap-2">
                            <MapPin attr:class="h-5 w-5" /> "Delivery location"
                        </h2>
                        <p class="text-sm text-base-content/70">
                            "Your device location is used when available. Otherwise enter the coordinates below."
                        </p>
                        <div class="grid grid-cols-1 sm:grid-cols-2 gap-4">
                            <label class="form-control">
                                <span class="label-text">"Latitude"</span>
                                <input
                                    type="text"
                                    inputmode="decimal"
                                    placeholder="-1.2864"
                                    class="input input-bordered"
                                    prop:value=manual_lat
                                    on:input=move |ev| manual_lat.set(event_target_value(&ev))
                                />
                            </label>
                            <label class="form-control">
                                <span class="label-text">"Longitude"</span>
                                <input
                                    type="text"
                                    inputmode="decimal"
                                    placeholder="36.8172"
                                    class="input input-bordered"
                                    prop:value=manual_lng
                                    on:input=move |ev| manual_lng.set(event_target_value(&ev))
                                />
                            </label>
                        </div>
                        <button class="btn btn-primary w-full" disabled=move || checking_out.get() on:click=checkout>
                            {move || if checking_out.get() {
                                view! { <span class="loading loading-spinner"></span> "Placing order..." }.into_any()
                            } else {
                                "Proceed to Checkout".into_any()
                            }}
                        </button>
                    </div>
                </div>
            </Show>
        </div>
    }
}
