//! Confetti - WASM front end
//!
//! Exposes `confetti(options)` to JavaScript. Bursts are painted on a
//! throwaway `<canvas>` laid over the page and driven by
//! `requestAnimationFrame`; a burst fired while one is still animating joins
//! it instead of opening a second canvas.

use confetti_common::core::ConfettiOptions;
use confetti_common::Launcher;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::sync::Once;
use wasm_bindgen::prelude::*;

mod canvas;
pub use canvas::{BodyCanvasProvider, CanvasSurface};

mod frame;
pub use frame::AnimationFrameScheduler;

type PageLauncher = Launcher<BodyCanvasProvider, AnimationFrameScheduler, SmallRng>;

thread_local! {
    // One animation per page
    static LAUNCHER: PageLauncher = Launcher::new(
        BodyCanvasProvider,
        AnimationFrameScheduler,
        SmallRng::seed_from_u64(js_seed()),
    );
}

fn js_seed() -> u64 {
    (js_sys::Math::random() * u64::MAX as f64) as u64
}

fn init() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        console_error_panic_hook::set_once();
        // Another logger may already be installed by the host page
        let _ = console_log::init_with_level(log::Level::Info);
    });
}

/// Fire a burst of confetti.
///
/// `options` is a plain object with any of `particleCount`, `angle`,
/// `spread`, `startVelocity`, `decay`, `ticks`, `origin: { x, y }`,
/// `zIndex` and `colors`. Missing or malformed fields take their defaults,
/// and a value that is not an object fires a default burst.
#[wasm_bindgen]
pub fn confetti(options: JsValue) -> Result<(), JsValue> {
    init();

    let options: ConfettiOptions = if options.is_undefined() || options.is_null() {
        ConfettiOptions::default()
    } else {
        ConfettiOptions::deserialize_lenient(serde_wasm_bindgen::Deserializer::from(options))
            .map_err(|e| JsValue::from_str(&format!("Failed to read confetti options: {}", e)))?
    };

    LAUNCHER
        .with(|launcher| launcher.launch(&options))
        .map_err(|e| JsValue::from_str(&format!("{:#}", e)))
}

/// Whether a confetti animation is currently on screen.
#[wasm_bindgen(js_name = isAnimating)]
pub fn is_animating() -> bool {
    LAUNCHER.with(|launcher| launcher.is_running())
}
