use leptos::prelude::*;
use mebeli_frontend::{App, logging};

// lol_alloc 作为全局分配器，减小 WASM 体积
#[cfg(target_arch = "wasm32")]
use lol_alloc::{AssumeSingleThreaded, FreeListAllocator};

#[cfg(target_arch = "wasm32")]
#[global_allocator]
static ALLOCATOR: AssumeSingleThreaded<FreeListAllocator> =
    unsafe { AssumeSingleThreaded::new(FreeListAllocator::new()) };

pub fn main() {
    console_error_panic_hook::set_once();
    logging::init();
    mount_to_body(App);
}
