use log::{error, info};
use web_sys::Element;
use yew::prelude::*;

mod config;
mod controller;
mod dom;
mod effects;
mod error;
mod motion;
mod runtime;
mod surface;
#[cfg(test)]
mod testing;

use config::MotionConfig;
use controller::Overlay;
use effects::progress;
use runtime::Runtime;

/// Cursor ring, cursor dot and scroll progress bar. Mounting the component
/// boots the motion runtime; unmounting tears it down.
#[function_component(MotionLayer)]
fn motion_layer() -> Html {
    let config = use_state(MotionConfig::from_document);
    let ring = use_node_ref();
    let dot = use_node_ref();
    let bar = use_node_ref();

    {
        let config = (*config).clone();
        let ring = ring.clone();
        let dot = dot.clone();
        let bar = bar.clone();
        use_effect_with_deps(
            move |_| {
                let overlay = Overlay {
                    ring: ring.cast::<Element>(),
                    dot: dot.cast::<Element>(),
                    progress: bar.cast::<Element>(),
                };
                let runtime = match Runtime::boot(config, overlay) {
                    Ok(runtime) => Some(runtime),
                    Err(e) => {
                        error!("Motion layer disabled: {}", e);
                        None
                    }
                };
                move || drop(runtime)
            },
            (),
        );
    }

    html! {
        <>
            <div ref={ring} class="cursor"></div>
            <div ref={dot} class="cursor-dot"></div>
            <div ref={bar} class="scroll-progress" style={progress::BAR_STYLE}></div>
        </>
    }
}

/// Host element appended to `<body>`, so the layer sits on top of the page.
fn mount_point() -> Option<Element> {
    let document = web_sys::window()?.document()?;
    let body = document.body()?;
    let host = document.create_element("div").ok()?;
    host.set_id("motion-layer");
    body.append_child(&host).ok()?;
    Some(host)
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    console_log::init_with_level(config::log_level()).expect("error initializing log");

    match mount_point() {
        Some(host) => {
            info!("Starting motion layer");
            yew::Renderer::<MotionLayer>::with_root(host).render();
        }
        None => error!("{}", error::MotionError::NoBody),
    }
}
