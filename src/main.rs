//! Curvecast entry point
//!
//! On the web this runs the interactive viewer: arrow keys move the viewpoint,
//! every move recomputes the ray fan and redraws both views. Natively there is
//! no window; the binary walks the viewpoint around with a seeded random walk
//! and logs what each frame sees.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use curvecast::Settings;
    use curvecast::renderer::{RenderState, SceneStyle, build_scene, hud_summary};
    use curvecast::sim::{
        Direction, FrameInput, FrameResult, FrameSolver, MovementController, NewtonSolver,
        Polynomial, ViewportState, tick,
    };

    /// Viewer instance holding all state
    struct App {
        state: ViewportState,
        curve: Polynomial,
        solver: FrameSolver<NewtonSolver>,
        controller: MovementController,
        style: SceneStyle,
        input: FrameInput,
        frame: Option<FrameResult>,
        render_state: Option<RenderState>,
    }

    impl App {
        fn new(settings: &Settings) -> Result<Self, curvecast::sim::ConfigError> {
            Ok(Self {
                state: settings.viewport()?,
                curve: settings.curve.clone(),
                solver: settings.frame_solver()?,
                controller: settings.movement()?,
                style: SceneStyle::from(settings),
                input: FrameInput::default(),
                frame: None,
                render_state: None,
            })
        }

        /// Apply queued moves and recompute; a frame with no input reuses the last result
        fn update(&mut self) {
            if self.frame.is_some() && self.input.is_empty() {
                return;
            }
            let input = self.input.take();
            let frame = tick(
                &mut self.state,
                &self.controller,
                &self.solver,
                &self.curve,
                &input,
            );
            self.frame = Some(frame);
            self.update_hud();
        }

        /// Render the current frame
        fn render(&mut self) {
            let (Some(frame), Some(render_state)) = (&self.frame, &mut self.render_state) else {
                return;
            };
            let vertices = build_scene(frame, &self.curve, &self.style, render_state.aspect());
            match render_state.render(&vertices) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    render_state.resize(render_state.size.0, render_state.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(frame) = &self.frame else {
                return;
            };
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id("hud-status") {
                el.set_text_content(Some(&hud_summary(frame)));
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("logger init failed: {}", e).into());
        }

        log::info!("Curvecast starting...");

        if let Err(e) = start().await {
            log::error!("Curvecast failed to start: {}", e);
        }
    }

    async fn start() -> Result<(), String> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()
            .map_err(|_| "element #canvas is not a canvas")?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
        let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);

        let mut settings = Settings::load();
        // `?density=high` switches preset and remembers it
        if let Some(name) = density_from_query(&window) {
            match settings.apply_preset_name(&name) {
                Some(preset) => {
                    log::info!("Density preset: {}", preset.as_str());
                    settings.save();
                }
                None => log::warn!("Unknown density preset {:?}", name),
            }
        }
        let app = App::new(&settings).map_err(|e| e.to_string())?;
        let app = Rc::new(RefCell::new(app));
        log::info!(
            "Casting {} rays per frame",
            settings.view_config().map(|c| c.angles().len()).unwrap_or(0)
        );

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| e.to_string())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| e.to_string())?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| e.to_string())?;
        app.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(app.clone());

        // Start render loop
        request_animation_frame(app);

        log::info!("Curvecast running!");
        Ok(())
    }

    fn density_from_query(window: &web_sys::Window) -> Option<String> {
        let search = window.location().search().ok()?;
        search
            .trim_start_matches('?')
            .split('&')
            .find_map(|pair| pair.strip_prefix("density="))
            .map(str::to_string)
    }

    fn setup_input_handlers(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            if let Some(direction) = Direction::from_key(event.key().as_str()) {
                // Keep arrow keys from scrolling the page
                event.prevent_default();
                app.borrow_mut().input.push(direction);
            }
        });
        let _ =
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            frame_loop(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>) {
        {
            let mut a = app.borrow_mut();
            a.update();
            a.render();
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Curvecast (native) starting...");
    log::info!("Native mode has no window - run with `trunk serve` for the interactive viewer");

    let mut args = std::env::args().skip(1);
    let frames = args.next().and_then(|s| s.parse().ok()).unwrap_or(40);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345);

    let mut settings = curvecast::Settings::load();
    if let Some(name) = args.next() {
        match settings.apply_preset_name(&name) {
            Some(preset) => log::info!("Density preset: {}", preset.as_str()),
            None => log::warn!(
                "Unknown density preset {:?}, keeping {}",
                name,
                settings.density.as_str()
            ),
        }
    }
    if let Err(e) = native::random_walk(&settings, frames, seed) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use curvecast::Settings;
    use curvecast::renderer::hud_summary;
    use curvecast::sim::{ConfigError, Direction, FrameInput, tick};

    /// Drive the frame loop with one random move per frame
    pub fn random_walk(settings: &Settings, frames: u32, seed: u64) -> Result<(), ConfigError> {
        let mut state = settings.viewport()?;
        let solver = settings.frame_solver()?;
        let controller = settings.movement()?;
        let mut rng = Pcg32::seed_from_u64(seed);

        log::info!("Random walk: {} frames, seed {}", frames, seed);

        // Frame 0 is a pure redraw at the start position
        let first = tick(&mut state, &controller, &solver, &settings.curve, &FrameInput::default());
        println!("frame   0: {}", hud_summary(&first));

        for i in 1..=frames {
            let direction = Direction::ALL[rng.random_range(0..Direction::ALL.len())];
            let input = FrameInput {
                moves: vec![direction],
            };
            let frame = tick(&mut state, &controller, &solver, &settings.curve, &input);
            println!("frame {:>3}: {:?} -> {}", i, direction, hud_summary(&frame));
        }
        Ok(())
    }
}
