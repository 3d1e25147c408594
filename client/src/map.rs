use std::collections::HashMap;
use std::f64::consts::{FRAC_PI_4, PI};
use std::fmt::Write;

use leptos::prelude::*;

use wayfarer_shared::geography::{Geometry, PlaceShape};
use wayfarer_shared::{MapFrame, Palette, PlaceId};

use crate::app::{FrameSignal, Hovered, MapShapes, PaletteSetting};

/// Width of the projected world in SVG user units.
pub const MAP_WIDTH: f64 = 1000.0;
const MAX_LAT: f64 = 85.0;
const MIN_VISIBLE_LAT: f64 = -60.0;
const STROKE_WIDTH: &str = "0.7";

/// Drawable outline of one place.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapePath {
    pub id: PlaceId,
    pub name: String,
    pub d: String,
}

/// Web Mercator into a `MAP_WIDTH` square, equator at the vertical centre.
pub fn mercator(lon: f64, lat: f64) -> (f64, f64) {
    let x = (lon + 180.0) / 360.0 * MAP_WIDTH;
    let phi = lat.clamp(-MAX_LAT, MAX_LAT).to_radians();
    let y = MAP_WIDTH / 2.0 - (FRAC_PI_4 + phi / 2.0).tan().ln() * MAP_WIDTH / (2.0 * PI);
    (x, y)
}

/// Crop to the inhabited latitudes.
pub fn view_box() -> String {
    let (_, top) = mercator(0.0, MAX_LAT);
    let (_, bottom) = mercator(0.0, MIN_VISIBLE_LAT);
    format!("0 {top:.1} {MAP_WIDTH:.1} {:.1}", bottom - top)
}

/// SVG path data for every ring; degenerate rings are skipped.
pub fn path_data(geometry: &Geometry) -> String {
    let mut d = String::new();
    for ring in geometry.rings() {
        let mut points = ring
            .iter()
            .filter(|coord| coord.len() >= 2)
            .map(|coord| mercator(coord[0], coord[1]));
        let Some((x, y)) = points.next() else {
            continue;
        };
        let rest: Vec<(f64, f64)> = points.collect();
        if rest.len() < 2 {
            continue;
        }
        let _ = write!(d, "M{x:.1},{y:.1}");
        for (x, y) in rest {
            let _ = write!(d, "L{x:.1},{y:.1}");
        }
        d.push('Z');
    }
    d
}

pub fn shape_paths(shapes: &[PlaceShape]) -> Vec<ShapePath> {
    shapes
        .iter()
        .map(|shape| ShapePath {
            id: shape.id.clone(),
            name: shape.name.clone(),
            d: path_data(&shape.geometry),
        })
        .filter(|path| !path.d.is_empty())
        .collect()
}

/// CSS fill per place for a frame. Places absent from the map are kept; the
/// renderer simply never looks them up.
pub fn fill_css(frame: &MapFrame, palette: &Palette) -> HashMap<PlaceId, String> {
    frame
        .fills
        .iter()
        .map(|f| (f.place.clone(), f.fill.color(palette).to_css()))
        .collect()
}

/// World map with per-place fills from the current frame.
#[component]
pub fn WorldMap() -> impl IntoView {
    let FrameSignal(frame) = expect_context();
    let MapShapes(shapes) = expect_context();
    let PaletteSetting(palette) = expect_context();
    let Hovered(hovered) = expect_context();

    let fills = Memo::new(move |_| {
        let palette = palette.get();
        frame.with(|frame| fill_css(frame, &palette))
    });

    view! {
        <div class="map-wrap">
            <svg
                class="world-map"
                viewBox=view_box()
                preserveAspectRatio="xMidYMid meet"
                style=move || format!("--hover-fill: {}", palette.with(|p| p.hover.to_css()))
                on:mouseleave=move |_| hovered.set(None)
            >
                {move || {
                    let palette = palette.get();
                    let unvisited = palette.unvisited.to_css();
                    let stroke = palette.stroke.to_css();
                    shapes
                        .get()
                        .into_iter()
                        .map(|shape| {
                            let ShapePath { id, name, d } = shape;
                            let unvisited = unvisited.clone();
                            let fill = move || {
                                fills.with(|m| m.get(&id).cloned().unwrap_or_else(|| unvisited.clone()))
                            };
                            view! {
                                <path
                                    class="place"
                                    d=d
                                    fill=fill
                                    stroke=stroke.clone()
                                    stroke-width=STROKE_WIDTH
                                    on:mouseenter=move |_| hovered.set(Some(name.clone()))
                                />
                            }
                        })
                        .collect::<Vec<_>>()
                }}
            </svg>
            <div
                class="map-label"
                style:display=move || if frame.with(|f| f.label.is_some()) { "block" } else { "none" }
            >
                {move || frame.with(|f| f.label.clone().unwrap_or_default())}
            </div>
            <div
                class="map-tooltip"
                style:display=move || if hovered.with(Option::is_some) { "block" } else { "none" }
            >
                {move || hovered.get().unwrap_or_default()}
            </div>
        </div>
    }
}
