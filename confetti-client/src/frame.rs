use confetti_common::scheduler::{FrameCallback, FrameScheduler};
use log::warn;
use wasm_bindgen::prelude::*;

/// Delay used when `requestAnimationFrame` is missing, roughly 60 fps.
const FALLBACK_FRAME_MS: i32 = 1000 / 60;

/// Schedules frames with `requestAnimationFrame`, or a timer where the
/// browser does not provide it.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnimationFrameScheduler;

impl FrameScheduler for AnimationFrameScheduler {
    fn schedule_frame(&self, callback: FrameCallback) {
        let Some(window) = web_sys::window() else {
            warn!("confetti: no window, dropping frame");
            return;
        };

        let callback = Closure::once_into_js(move || callback());
        let function = callback.unchecked_ref::<js_sys::Function>();

        let has_raf = js_sys::Reflect::has(&window, &JsValue::from_str("requestAnimationFrame"))
            .unwrap_or(false);
        if has_raf && window.request_animation_frame(function).is_ok() {
            return;
        }

        if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            function,
            FALLBACK_FRAME_MS,
        ) {
            warn!("confetti: failed to schedule frame: {:?}", e);
        }
    }
}
