//! 设备定位
//!
//! `navigator.geolocation` 基于回调，这里用 inline JS 包成 Promise。

use crate::serde_helper;
use mebeli::GeoError;
use mebeli_shared::LatLng;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen(inline_js = "
export function mebeli_current_position(timeoutMs) {
    return new Promise((resolve, reject) => {
        if (!('geolocation' in navigator)) {
            reject(new Error('geolocation is not supported'));
            return;
        }
        navigator.geolocation.getCurrentPosition(
            (pos) => resolve({ lat: pos.coords.latitude, lng: pos.coords.longitude }),
            (err) => reject(new Error(err.message || 'permission denied')),
            { enableHighAccuracy: true, timeout: timeoutMs, maximumAge: 60000 }
        );
    });
}
")]
extern "C" {
    #[wasm_bindgen(catch)]
    fn mebeli_current_position(timeout_ms: u32) -> Result<js_sys::Promise, JsValue>;
}

const POSITION_TIMEOUT_MS: u32 = 10_000;

pub async fn current_position() -> Result<LatLng, GeoError> {
    let unavailable = |e: JsValue| GeoError::Unavailable(serde_helper::Error::from(e).to_string());

    let promise = mebeli_current_position(POSITION_TIMEOUT_MS).map_err(unavailable)?;
    let value = JsFuture::from(promise).await.map_err(unavailable)?;
    let point: LatLng = serde_helper::from_value(value)
        .map_err(|e| GeoError::Unavailable(e.to_string()))?;

    if point.is_valid() {
        Ok(point)
    } else {
        Err(GeoError::InvalidCoordinates)
    }
}
