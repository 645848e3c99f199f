//! Leaflet / Leaflet Routing Machine 绑定
//!
//! 页面通过 `<script>` 引入全局 `L`，这里用 inline JS 暴露最小接口。
//! 每个地图对象都对应一个 Rust 句柄，句柄 drop 时从地图上移除对应图层，
//! 并解除事件，之后 JS 不会再调用已释放的闭包。

use crate::serde_helper;
use mebeli::RouteError;
use mebeli::route::RawRoute;
use mebeli_shared::LatLng;
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;

pub const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const TILE_ATTRIBUTION: &str =
    r#"&copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors"#;
pub const DEFAULT_ZOOM: u8 = 13;

#[wasm_bindgen(inline_js = r#"
let safeClearLinesInstalled = false;

function installSafeClearLines() {
    if (safeClearLinesInstalled || !L.Routing || !L.Routing.Control) return;
    safeClearLinesInstalled = true;
    L.Routing.Control.prototype._clearLines = function () {
        if (!this._lines) return;
        for (const line of this._lines) {
            if (line && this._map && this._map.hasLayer(line)) {
                try {
                    this._map.removeLayer(line);
                } catch (err) {
                    console.warn('route line removal failed:', err && err.message);
                }
            }
        }
        this._lines = [];
    };
}

export function mebeli_create_map(el, lat, lng, zoom, tileUrl, attribution) {
    const map = L.map(el, { scrollWheelZoom: true }).setView([lat, lng], zoom);
    L.tileLayer(tileUrl, { attribution }).addTo(map);
    return map;
}

export function mebeli_destroy_map(map) {
    try {
        map.off();
        map.remove();
    } catch (err) {
        console.warn('map teardown failed:', err && err.message);
    }
}

export function mebeli_add_marker(map, lat, lng, popupHtml, isShop, onClick, onPopupClose) {
    const options = isShop
        ? { icon: L.divIcon({ className: 'shop-marker', html: '🏬', iconSize: [28, 28] }) }
        : {};
    const marker = L.marker([lat, lng], options).addTo(map);
    marker.bindPopup(popupHtml);
    if (typeof onClick === 'function') marker.on('click', () => onClick());
    if (typeof onPopupClose === 'function') marker.on('popupclose', () => onPopupClose());
    return marker;
}

export function mebeli_remove_marker(map, marker) {
    try {
        marker.off();
        if (map.hasLayer(marker)) map.removeLayer(marker);
    } catch (err) {
        console.warn('marker removal failed:', err && err.message);
    }
}

export function mebeli_add_route(map, fromLat, fromLng, toLat, toLng, onFound, onError) {
    installSafeClearLines();
    const control = L.Routing.control({
        waypoints: [L.latLng(fromLat, fromLng), L.latLng(toLat, toLng)],
        lineOptions: { styles: [{ color: 'black', weight: 4 }] },
        addWaypoints: false,
        draggableWaypoints: false,
        routeWhileDragging: false,
        createMarker: () => null,
        show: false,
    });
    control.__mebeliLive = true;

    control.on('routesfound', (e) => {
        if (!control.__mebeliLive) return;
        const route = e.routes && e.routes[0];
        if (!route) {
            onError('no route');
            return;
        }
        onFound({
            summary: {
                totalDistance: route.summary.totalDistance,
                totalTime: route.summary.totalTime,
            },
            instructions: (route.instructions || []).map((inst) => ({
                text: inst.text || '',
                distance: inst.distance || 0,
                type: inst.type || null,
            })),
        });
    });
    control.on('routingerror', (e) => {
        if (!control.__mebeliLive) return;
        const err = e && e.error;
        onError(err ? String(err.message || err.status || 'routing failed') : 'routing failed');
    });

    control.addTo(map);
    return control;
}

export function mebeli_remove_route(map, control) {
    control.__mebeliLive = false;
    try {
        control.off();
        map.removeControl(control);
    } catch (err) {
        console.warn('routing control removal failed:', err && err.message);
    }
}
"#)]
extern "C" {
    #[wasm_bindgen(catch)]
    fn mebeli_create_map(
        el: &JsValue,
        lat: f64,
        lng: f64,
        zoom: u8,
        tile_url: &str,
        attribution: &str,
    ) -> Result<JsValue, JsValue>;

    fn mebeli_destroy_map(map: &JsValue);

    #[wasm_bindgen(catch)]
    fn mebeli_add_marker(
        map: &JsValue,
        lat: f64,
        lng: f64,
        popup_html: &str,
        is_shop: bool,
        on_click: &JsValue,
        on_popup_close: &JsValue,
    ) -> Result<JsValue, JsValue>;

    fn mebeli_remove_marker(map: &JsValue, marker: &JsValue);

    #[wasm_bindgen(catch)]
    fn mebeli_add_route(
        map: &JsValue,
        from_lat: f64,
        from_lng: f64,
        to_lat: f64,
        to_lng: f64,
        on_found: &JsValue,
        on_error: &JsValue,
    ) -> Result<JsValue, JsValue>;

    fn mebeli_remove_route(map: &JsValue, control: &JsValue);
}

// =========================================================
// 地图
// =========================================================

pub struct LeafletMap {
    map: JsValue,
}

impl LeafletMap {
    pub fn new(container: &JsValue, center: LatLng) -> Result<Self, serde_helper::Error> {
        let map = mebeli_create_map(
            container,
            center.lat,
            center.lng,
            DEFAULT_ZOOM,
            TILE_URL,
            TILE_ATTRIBUTION,
        )?;
        debug!(lat = center.lat, lng = center.lng, "map created");
        Ok(Self { map })
    }

    pub fn add_shop_marker(&self, at: LatLng, popup_html: &str) -> Option<MarkerHandle> {
        self.marker(at, popup_html, true, None, None)
    }

    /// 目的地标记；点击与弹窗关闭回调随句柄存活
    pub fn add_destination_marker(
        &self,
        at: LatLng,
        popup_html: &str,
        on_click: impl Fn() + 'static,
        on_popup_close: impl Fn() + 'static,
    ) -> Option<MarkerHandle> {
        self.marker(
            at,
            popup_html,
            false,
            Some(Closure::new(on_click)),
            Some(Closure::new(on_popup_close)),
        )
    }

    fn marker(
        &self,
        at: LatLng,
        popup_html: &str,
        is_shop: bool,
        on_click: Option<Closure<dyn Fn()>>,
        on_close: Option<Closure<dyn Fn()>>,
    ) -> Option<MarkerHandle> {
        let as_js = |c: &Option<Closure<dyn Fn()>>| {
            c.as_ref()
                .map(|c| AsRef::<JsValue>::as_ref(c).clone())
                .unwrap_or(JsValue::NULL)
        };
        match mebeli_add_marker(
            &self.map,
            at.lat,
            at.lng,
            popup_html,
            is_shop,
            &as_js(&on_click),
            &as_js(&on_close),
        ) {
            Ok(layer) => Some(MarkerHandle {
                map: self.map.clone(),
                layer,
                _on_click: on_click,
                _on_close: on_close,
            }),
            Err(e) => {
                warn!(error = %serde_helper::Error::from(e), "could not add marker");
                None
            }
        }
    }

    /// 创建路线控件；`routesfound` / `routingerror` 转成核心库的类型后回调
    pub fn add_route(
        &self,
        from: LatLng,
        to: LatLng,
        on_found: impl Fn(Result<RawRoute, RouteError>) + 'static,
    ) -> Option<RoutingHandle> {
        let on_found = std::rc::Rc::new(on_found);

        let found = {
            let cb = on_found.clone();
            Closure::<dyn Fn(JsValue)>::new(move |value: JsValue| {
                let parsed = serde_helper::from_value::<RawRoute>(value)
                    .map_err(|e| RouteError::Service(e.to_string()));
                (*cb)(parsed);
            })
        };
        let error = {
            let cb = on_found.clone();
            Closure::<dyn Fn(JsValue)>::new(move |value: JsValue| {
                let msg = value.as_string().unwrap_or_default();
                (*cb)(Err(if msg == "no route" {
                    RouteError::NoRoute
                } else {
                    RouteError::Service(msg)
                }));
            })
        };

        match mebeli_add_route(
            &self.map,
            from.lat,
            from.lng,
            to.lat,
            to.lng,
            found.as_ref(),
            error.as_ref(),
        ) {
            Ok(control) => Some(RoutingHandle {
                map: self.map.clone(),
                control,
                _found: found,
                _error: error,
            }),
            Err(e) => {
                warn!(error = %serde_helper::Error::from(e), "could not create routing control");
                None
            }
        }
    }
}

impl Drop for LeafletMap {
    fn drop(&mut self) {
        mebeli_destroy_map(&self.map);
        debug!("map destroyed");
    }
}

// =========================================================
// 图层句柄
// =========================================================

pub struct MarkerHandle {
    map: JsValue,
    layer: JsValue,
    _on_click: Option<Closure<dyn Fn()>>,
    _on_close: Option<Closure<dyn Fn()>>,
}

impl Drop for MarkerHandle {
    fn drop(&mut self) {
        mebeli_remove_marker(&self.map, &self.layer);
    }
}

/// 地图上的一条路线控件；drop 即移除
pub struct RoutingHandle {
    map: JsValue,
    control: JsValue,
    _found: Closure<dyn Fn(JsValue)>,
    _error: Closure<dyn Fn(JsValue)>,
}

impl Drop for RoutingHandle {
    fn drop(&mut self) {
        mebeli_remove_route(&self.map, &self.control);
        debug!("routing control removed");
    }
}
