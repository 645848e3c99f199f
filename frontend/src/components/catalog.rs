use crate::api::use_api;
use crate::auth::{AuthDialog, use_auth};
use crate::components::icons::{Cart, ChevronLeft, ChevronRight, Minus, Plus};
use crate::components::modal::Modal;
use crate::notify::use_notifier;
use leptos::prelude::*;
use leptos::task::spawn_local;
use mebeli::ApiError;
use mebeli::catalog::{self, Category, ImageCursor, Quantity};
use mebeli::shared::Furniture;
use tracing::warn;

#[component]
pub fn CatalogPage() -> impl IntoView {
    let auth = use_auth();
    let notifier = use_notifier();
    let api = use_api();

    let items = RwSignal::new(Vec::<Furniture>::new());
    let loading = RwSignal::new(true);
    let category = RwSignal::new(Category::All);
    // 详情弹窗 / 数量弹窗的目标商品
    let detail = RwSignal::new(Option::<Furniture>::None);
    let cart_target = RwSignal::new(Option::<Furniture>::None);
    let quantity = RwSignal::new(Quantity::default());
    let submitting = RwSignal::new(false);

    {
        let api = api.clone();
        spawn_local(async move {
            match api.list_furniture().await {
                Ok(list) => {
                    items.try_set(list);
                }
                Err(e) => {
                    warn!(error = %e, "failed to load furniture");
                    notifier.error("Failed to load furniture", &e);
                }
            }
            loading.try_set(false);
        });
    }

    let visible = Memo::new(move |_| {
        let selected = category.get();
        items.with(|all| {
            catalog::filter_by_category(all, selected)
                .into_iter()
                .cloned()
                .collect::<Vec<_>>()
        })
    });

    // 未登录时改为打开登录对话框
    let on_add = Callback::new(move |item: Furniture| {
        if !auth.session.with_untracked(|s| s.is_authenticated()) {
            notifier.info("Please log in to add items to your cart");
            auth.open(AuthDialog::Login);
            return;
        }
        quantity.set(Quantity::default());
        cart_target.set(Some(item));
    });
    let on_detail = Callback::new(move |item: Furniture| detail.set(Some(item)));

    let close_quantity = move || {
        cart_target.set(None);
        quantity.update(Quantity::reset);
    };

    let on_confirm = move |_| {
        let Some(item) = cart_target.get_untracked() else {
            return;
        };
        let qty = quantity.get_untracked();
        let api = api.clone();
        submitting.set(true);
        spawn_local(async move {
            match catalog::add_to_cart(&api, item.id, qty).await {
                Ok(resp) => {
                    notifier.success(
                        resp.message
                            .unwrap_or_else(|| format!("Added {} × {} to cart", qty.get(), item.name)),
                    );
                    cart_target.try_set(None);
                }
                Err(ApiError::Unauthenticated) => {
                    cart_target.try_set(None);
                    auth.open(AuthDialog::Login);
                }
                Err(e) => notifier.error("Could not add to cart", &e),
            }
            submitting.try_set(false);
        });
    };

    view! {
        <div class="card bg-base-100 shadow p-4 space-y-4">
            <h1 class="text-2xl font-bold">"Furniture"</h1>

            <div role="tablist" class="tabs tabs-boxed justify-center overflow-x-auto">
                {Category::ALL
                    .into_iter()
                    .map(|c| {
                        let class = move || {
                            if category.get() == c { "tab tab-active" } else { "tab" }
                        };
                        view! {
                            <a role="tab" class=class on:click=move |_| category.set(c)>
                                {c.label()}
                            </a>
                        }
                    })
                    .collect_view()}
            </div>

            <Show
                when=move || !loading.get()
                fallback=|| view! {
                    <div class="flex justify-center py-12">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                    </div>
                }
            >
                <Show
                    when=move || visible.with(|v| !v.is_empty())
                    fallback=|| view! {
                        <p class="text-center text-base-content/60 py-12">"No furniture in this category yet."</p>
                    }
                >
                    <div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 gap-4">
                        <For
                            each=move || visible.get()
                            key=|item| item.id
                            children=move |item| view! {
                                <FurnitureCard item=item on_detail=on_detail on_add=on_add />
                            }
                        />
                    </div>
                </Show>
            </Show>

            // 数量选择
            <Modal
                open=Signal::derive(move || cart_target.with(Option::is_some))
                on_close=move |_| close_quantity()
            >
                <h3 class="font-bold text-lg mb-2 text-center">"Quantity"</h3>
                <p class="text-center text-base-content/70">
                    {move || cart_target.with(|t| t.as_ref().map(|f| f.name.clone()).unwrap_or_default())}
                </p>
                <div class="flex items-center justify-center gap-4 my-6">
                    <button class="btn btn-circle btn-sm" on:click=move |_| quantity.update(Quantity::decrement)>
                        <Minus attr:class="h-4 w-4" />
                    </button>
                    <span class="text-2xl font-semibold w-12 text-center">{move || quantity.get().get()}</span>
                    <button class="btn btn-circle btn-sm" on:click=move |_| quantity.update(Quantity::increment)>
                        <Plus attr:class="h-4 w-4" />
                    </button>
                </div>
                <div class="modal-action justify-center">
                    <button class="btn btn-primary" disabled=move || submitting.get() on:click=on_confirm>
                        {move || if submitting.get() {
                            view! { <span class="loading loading-spinner"></span> "Adding..." }.into_any()
                        } else {
                            "Confirm".into_any()
                        }}
                    </button>
                </div>
            </Modal>

            // 商品详情
            <Modal
                open=Signal::derive(move || detail.with(Option::is_some))
                on_close=move |_| detail.set(None)
            >
                {move || detail.get().map(|item| {
                    let add_item = item.clone();
                    view! {
                        <div class="space-y-3">
                            <ImageCarousel images=item.images.clone() alt=item.name.clone() />
                            <h3 class="font-bold text-xl">{item.name.clone()}</h3>
                            <p class="text-primary font-semibold">{format_price(item.price)}</p>
                            <p class="text-base-content/70">
                                {item.description.clone().unwrap_or_else(|| "No description available.".to_string())}
                            </p>
                            <div class="modal-action">
                                <button
                                    class="btn btn-primary gap-2"
                                    on:click=move |_| {
                                        detail.set(None);
                                        on_add.run(add_item.clone());
                                    }
                                >
                                    <Cart attr:class="h-4 w-4" /> "Add to cart"
                                </button>
                            </div>
                        </div>
                    }
                })}
            </Modal>
        </div>
    }
}

#[component]
fn FurnitureCard(
    item: Furniture,
    on_detail: Callback<Furniture>,
    on_add: Callback<Furniture>,
) -> impl IntoView {
    let detail_item = item.clone();
    let add_item = item.clone();
    let Furniture {
        name,
        price,
        images,
        ..
    } = item;

    view! {
        <div
            class="card bg-base-100 shadow hover:shadow-xl transition-shadow cursor-pointer"
            on:click=move |_| on_detail.run(detail_item.clone())
        >
            <ImageCarousel images=images alt=name.clone() />
            <div class="card-body p-4 flex-row items-center justify-between">
                <div>
                    <h2 class="font-bold">{name}</h2>
                    <p class="text-sm text-base-content/70">{format_price(price)}</p>
                </div>
                <button
                    class="btn btn-primary btn-circle btn-sm"
                    title="Add to cart"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        on_add.run(add_item.clone());
                    }
                >
                    <Cart attr:class="h-4 w-4" />
                </button>
            </div>
        </div>
    }
}

/// 商品图片翻页；首张 / 末张时隐藏对应方向的按钮
#[component]
fn ImageCarousel(images: Vec<String>, alt: String) -> impl IntoView {
    let cursor = RwSignal::new(ImageCursor::new(images.len()));
    let images = StoredValue::new(images);
    let current = move || images.with_value(|all| cursor.get().current(all).map(str::to_string));

    view! {
        <figure class="relative h-48 bg-base-200 flex items-center justify-center">
            {move || match current() {
                Some(src) => view! { <img class="h-full w-full object-cover" src=src alt=alt.clone() /> }.into_any(),
                None => view! { <span class="text-sm text-base-content/50">"No image"</span> }.into_any(),
            }}
            <Show when=move || cursor.get().has_prev()>
                <button
                    class="btn btn-circle btn-xs absolute left-2"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        cursor.update(ImageCursor::prev);
                    }
                >
                    <ChevronLeft attr:class="h-3 w-3" />
                </button>
            </Show>
            <Show when=move || cursor.get().has_next()>
                <button
                    class="btn btn-circle btn-xs absolute right-2"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        cursor.update(ImageCursor::next);
                    }
                >
                    <ChevronRight attr:class="h-3 w-3" />
                </button>
            </Show>
        </figure>
    }
}

pub(crate) fn format_price(price: f64) -> String {
    format!("KES {:.2}", price)
}
