use crate::web::Interval;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use leptos::prelude::*;
use std::time::Duration;

const SHOWCASE: [&str; 3] = ["/mirror.jpg", "/mirror2.jpg", "/mirror3.jpg"];
const ROTATE_EVERY: Duration = Duration::from_secs(10);

const HIGHLIGHTS: [(&str, &str); 6] = [
    (
        "Comfortable Sofas",
        "Relax in style with our wide range of sofas tailored for comfort.",
    ),
    (
        "Elegant Chairs",
        "Find stylish and ergonomic chairs perfect for home or office.",
    ),
    (
        "Modern Beds",
        "Upgrade your sleep with our sleek and comfy bed designs.",
    ),
    (
        "Dining Sets",
        "Dine with elegance with our collection of dining furniture.",
    ),
    (
        "Bathroom Vanity",
        "Luxurious vanities that add style to your bathroom space.",
    ),
    (
        "Lighting & Decor",
        "Enhance your home ambiance with our unique lighting pieces.",
    ),
];

#[component]
pub fn HomePage() -> impl IntoView {
    let router = use_router();
    let (slide, set_slide) = signal(0usize);

    // 随视图所有者一起释放，drop 即 clearInterval
    let _ticker = StoredValue::new_local(Interval::new(ROTATE_EVERY, move || {
        set_slide.try_update(|i| *i = (*i + 1) % SHOWCASE.len());
    }));

    view! {
        <div class="space-y-8">
            <div class="card bg-base-100 shadow p-3">
                <img
                    class="w-full h-[50vh] object-cover rounded-xl transition-opacity duration-1000"
                    alt="Furniture showcase"
                    src=move || SHOWCASE[slide.get()]
                />
                <div class="flex justify-center gap-2 mt-2">
                    {(0..SHOWCASE.len())
                        .map(|idx| {
                            let class = move || {
                                if slide.get() == idx {
                                    "w-3 h-3 rounded-full bg-primary"
                                } else {
                                    "w-3 h-3 rounded-full bg-base-300 hover:bg-primary"
                                }
                            };
                            view! { <button class=class on:click=move |_| set_slide.set(idx)></button> }
                        })
                        .collect_view()}
                </div>
            </div>

            <div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 gap-4">
                {HIGHLIGHTS
                    .into_iter()
                    .map(|(title, description)| {
                        view! {
                            <div class="card bg-base-100 shadow hover:shadow-xl transition-shadow">
                                <div class="card-body items-center text-center">
                                    <h2 class="card-title">{title}</h2>
                                    <p class="text-base-content/70">{description}</p>
                                </div>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>

            <div class="text-center">
                <button class="btn btn-primary" on:click=move |_| router.navigate(AppRoute::Furniture)>
                    "Browse furniture"
                </button>
            </div>
        </div>
    }
}
