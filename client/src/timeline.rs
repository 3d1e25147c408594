use leptos::prelude::*;
use wasm_bindgen::JsValue;

use wayfarer_shared::YearBounds;

use crate::app::ViewState;

/// Slider properties in the order they must be written. The browser clamps
/// `value` against the current range, so `min` and `max` go first.
fn slider_props(bounds: YearBounds, year: i32) -> [(&'static str, String); 3] {
    [
        ("min", bounds.min.to_string()),
        ("max", bounds.max.to_string()),
        ("value", bounds.clamp(year).to_string()),
    ]
}

/// Year slider with play/pause and reset.
#[component]
pub fn Timeline() -> impl IntoView {
    let view_state: ViewState = expect_context();
    let frame = view_state.frame;
    let slider_ref = NodeRef::<leptos::html::Input>::new();

    Effect::new(move || {
        let (bounds, year) = frame.with(|f| (f.bounds, f.year));
        let Some(input) = slider_ref.get() else {
            return;
        };
        for (name, value) in slider_props(bounds, year) {
            if js_sys::Reflect::set(&input, &JsValue::from_str(name), &JsValue::from_str(&value))
                .is_err()
            {
                tracing::warn!(property = name, "cannot update year slider");
            }
        }
    });

    let on_slider_input = move |ev: leptos::ev::Event| {
        let Ok(year) = event_target_value(&ev).parse::<i32>() else {
            return;
        };
        view_state.dispatch(|viewer| viewer.set_year(year));
    };
    let on_play = move |_: web_sys::MouseEvent| {
        view_state.dispatch(|viewer| viewer.toggle_playback());
    };
    let on_reset = move |_: web_sys::MouseEvent| {
        view_state.dispatch(|viewer| viewer.reset());
    };

    view! {
        <div class="timeline-bar">
            <button
                class="play-btn"
                class:playing=move || frame.with(|f| f.playing)
                on:click=on_play
            >
                {move || if frame.with(|f| f.playing) { "Pause" } else { "Play" }}
            </button>
            <button class="reset-btn" on:click=on_reset>"Reset"</button>
            <span class="bound-label">{move || frame.with(|f| f.bounds.min)}</span>
            <input
                type="range"
                class="year-slider"
                step="1"
                node_ref=slider_ref
                on:input=on_slider_input
            />
            <span class="bound-label">{move || frame.with(|f| f.bounds.max)}</span>
            <span class="year-label">{move || frame.with(|f| f.year)}</span>
        </div>
    }
}
