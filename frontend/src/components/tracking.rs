use crate::api::use_api;
use crate::components::catalog::format_price;
use crate::components::icons::{MapPin, Refresh};
use crate::components::routing_overlay::RoutingOverlay;
use leptos::prelude::*;
use leptos::task::spawn_local;
use mebeli::ClientConfig;
use mebeli::route::RouteResult;
use mebeli::shared::Order;
use mebeli::tracking::{Panel, TrackingState};
use wasm_bindgen::JsValue;

#[component]
pub fn TrackOrderPage() -> impl IntoView {
    let config = use_context::<ClientConfig>().expect("ClientConfig should be provided");
    let api = StoredValue::new_local(use_api());
    let overlay = RoutingOverlay::new(&config);
    let state = overlay.state();
    let map_ref = NodeRef::<leptos::html::Div>::new();
    let loading = RwSignal::new(false);

    // 容器挂载后创建地图
    Effect::new(move |_| {
        if let Some(el) = map_ref.get() {
            let container: &JsValue = el.as_ref();
            overlay.attach_map(container);
        }
    });

    let load = move || {
        let api = api.get_value();
        loading.set(true);
        spawn_local(async move {
            let result = api.list_orders().await;
            overlay.load_orders(result);
            loading.try_set(false);
        });
    };
    load();

    on_cleanup(move || overlay.teardown());

    view! {
        <div class="flex flex-col gap-6">
            <div class="card bg-base-100 shadow overflow-hidden">
                <div node_ref=map_ref class="h-[400px] w-full z-0"></div>
            </div>

            <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
                <div class="card bg-base-100 shadow">
                    <div class="card-body">
                        <div class="flex items-center justify-between">
                            <h2 class="card-title">"Your orders"</h2>
                            <button class="btn btn-ghost btn-sm btn-circle" title="Reload" disabled=move || loading.get() on:click=move |_| load()>
                                <Refresh attr:class="h-4 w-4" />
                            </button>
                        </div>
                        {move || state.with(|s| order_list(s, overlay))}
                    </div>
                </div>

                <div class="card bg-base-100 shadow">
                    <div class="card-body">
                        <h2 class="card-title">"Track Your Order"</h2>
                        {move || state.with(|s| route_panel(s.panel(), overlay))}
                    </div>
                </div>
            </div>
        </div>
    }
}

fn order_list(state: &TrackingState, overlay: RoutingOverlay) -> AnyView {
    if state.orders().is_empty() {
        return view! { <p class="text-base-content/60">"No orders yet."</p> }.into_any();
    }

    let selected = state.selected_order().map(|o| o.id);
    let rows = state
        .orders()
        .iter()
        .map(|order| {
            let id = order.id;
            let on_map = state.markers().iter().any(|m| m.order_id == id);
            let class = if selected == Some(id) { "bg-base-200" } else { "" };
            view! {
                <tr class=class>
                    <td class="font-mono">{order.order_number.clone()}</td>
                    <td><span class="badge badge-outline">{order.status.label()}</span></td>
                    <td class="text-right">{format_price(order.total_price)}</td>
                    <td class="text-right">
                        {on_map.then(|| view! {
                            <button class="btn btn-ghost btn-xs" title="Show route" on:click=move |_| overlay.select(id)>
                                <MapPin attr:class="h-4 w-4" />
                            </button>
                        })}
                    </td>
                </tr>
            }
        })
        .collect_view();

    view! {
        <div class="overflow-x-auto">
            <table class="table table-sm">
                <thead>
                    <tr><th>"Order"</th><th>"Status"</th><th class="text-right">"Total"</th><th></th></tr>
                </thead>
                <tbody>{rows}</tbody>
            </table>
        </div>
    }
    .into_any()
}

fn route_panel(panel: Panel<'_>, overlay: RoutingOverlay) -> AnyView {
    match panel {
        Panel::NoSelection => view! {
            <p class="text-base-content/70">
                "Click a destination marker on the map to see the delivery route from our shop."
            </p>
        }
        .into_any(),
        Panel::AwaitingRoute(order) => view! {
            <div class="space-y-2">
                <OrderHeading order=order.clone() overlay=overlay />
                <p class="text-base-content/70 flex items-center gap-2">
                    <span class="loading loading-dots loading-sm"></span>
                    "Calculating the route to this destination..."
                </p>
            </div>
        }
        .into_any(),
        Panel::RouteUnavailable(order) => view! {
            <div class="space-y-2">
                <OrderHeading order=order.clone() overlay=overlay />
                <p class="text-base-content/70">
                    "Click the destination marker again to retry the delivery route."
                </p>
            </div>
        }
        .into_any(),
        Panel::Route(order, route) => view! {
            <div class="space-y-3">
                <OrderHeading order=order.clone() overlay=overlay />
                <RouteDetails route=route.clone() />
            </div>
        }
        .into_any(),
    }
}

#[component]
fn OrderHeading(order: Order, overlay: RoutingOverlay) -> impl IntoView {
    view! {
        <div class="flex items-center justify-between">
            <div>
                <p class="font-semibold">{format!("Order {}", order.order_number)}</p>
                <p class="text-sm text-base-content/70">
                    {format!("{} · {}", order.status.label(), format_price(order.total_price))}
                </p>
            </div>
            <button class="btn btn-ghost btn-xs" on:click=move |_| overlay.clear_selection()>"Clear"</button>
        </div>
    }
}

#[component]
fn RouteDetails(route: RouteResult) -> impl IntoView {
    let RouteResult {
        distance,
        duration,
        steps,
    } = route;

    view! {
        <div class="stats shadow w-full">
            <div class="stat">
                <div class="stat-title">"Distance"</div>
                <div class="stat-value text-2xl">{distance}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Estimated time"</div>
                <div class="stat-value text-2xl">{duration}</div>
            </div>
        </div>
        <ol class="space-y-1 max-h-72 overflow-y-auto">
            {steps
                .into_iter()
                .map(|step| view! {
                    <li class="flex items-center gap-3">
                        <span class=format!("w-6 text-center text-lg {}", step.icon.css_class())>
                            {step.icon.glyph()}
                        </span>
                        <span class="flex-1">{step.text}</span>
                        <span class="text-sm text-base-content/60">{step.distance}</span>
                    </li>
                })
                .collect_view()}
        </ol>
    }
}
