#![cfg_attr(target_family = "wasm", no_main)]
use log::warn;
use nannou::prelude::*;
use nannou_egui::Egui;
use std::sync::OnceLock;
use wasm_timer::Instant;

use pluckstring::audio::{Clip, SpritePlayer};
use pluckstring::config::PluckConfig;
use pluckstring::model::Model;
use pluckstring::{console, input, inspector};

/// The masthead the string was first drawn on.
const DEFAULT_WIDTH: f32 = 635.0;
const DEFAULT_HEIGHT: f32 = 115.0;

static CONFIG: OnceLock<PluckConfig> = OnceLock::new();

fn config() -> &'static PluckConfig {
    CONFIG.get_or_init(PluckConfig::default)
}

fn window_size(config: &PluckConfig) -> (u32, u32) {
    (
        config.width.unwrap_or(DEFAULT_WIDTH) as u32,
        config.height.unwrap_or(DEFAULT_HEIGHT) as u32,
    )
}

fn load_player(
    config: &PluckConfig,
    clip: pluckstring::Result<(String, Clip)>,
) -> Option<SpritePlayer> {
    match clip.and_then(|(_, clip)| SpritePlayer::new(clip, config.sound.clone())) {
        Ok(player) => Some(player),
        Err(err) => {
            warn!("plucks will be silent: {}", err);
            None
        }
    }
}

fn build_model(app: &App, window: WindowId, config: &PluckConfig, player: Option<SpritePlayer>) -> Model {
    let size = app
        .window(window)
        .map(|w| w.rect().wh())
        .unwrap_or_else(|| {
            let (w, h) = window_size(config);
            vec2(w as f32, h as f32)
        });
    Model::new(window, size, config, player)
        .unwrap_or_else(|err| panic!("failed to create string widget: {}", err))
}

fn update(app: &App, m: &mut Model, update: Update) {
    if m.egui.is_none() {
        if let Some(window) = app.window(m.window) {
            m.egui = Some(Egui::from_window(&window));
        }
    }

    if let Err(err) = m.widget.poll(Instant::now()) {
        warn!("deferred event failed: {}", err);
    }
    if m.widget.ticker().is_subscribed() {
        if let Err(err) = m.widget.on_tick() {
            warn!("tick failed: {}", err);
        }
    }

    if m.show_inspector {
        if let Some(egui) = m.egui.as_mut() {
            inspector::update(egui, update.since_start, &m.widget);
        }
    }
}

fn view(app: &App, m: &Model, frame: Frame) {
    let draw = app.draw();
    draw.background().color(WHITE);
    m.widget.surface().draw(&draw);

    if let Err(err) = draw.to_frame(app, &frame) {
        warn!("draw failed: {:?}", err);
    }
    if m.show_inspector {
        if let Some(egui) = m.egui.as_ref() {
            if let Err(err) = egui.draw_to_frame(&frame) {
                warn!("inspector draw failed: {:?}", err);
            }
        }
    }
}

#[cfg(not(target_family = "wasm"))]
fn model(app: &App) -> Model {
    let config = config();
    let (width, height) = window_size(config);
    let window = app
        .new_window()
        .size(width, height)
        .title(&config.element)
        .view(view)
        .event(input::event)
        .key_pressed(input::key_pressed)
        .raw_event(input::raw_window_event)
        .build()
        .unwrap_or_else(|err| panic!("failed to create window: {:?}", err));

    let player = load_player(config, Clip::load_first_playable(&config.sound_urls()));
    build_model(app, window, config, player)
}

#[cfg(not(target_family = "wasm"))]
fn main() {
    use clap::Parser;

    let args = pluckstring::config::Args::parse();
    let config = match PluckConfig::from_args(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(2);
        }
    };
    console::init(config.level_filter());
    let _ = CONFIG.set(config);

    nannou::app(model).update(update).run();
}

#[cfg(target_family = "wasm")]
mod web {
    use pluckstring::audio::Clip;
    use pluckstring::{PluckError, Result};
    use std::cell::RefCell;
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;

    const QUERY_KEYS: [&str; 5] = ["element", "width", "height", "scriptPath", "logLevel"];

    thread_local!(pub static CLIP: RefCell<Option<Result<(String, Clip)>>> = RefCell::new(None));

    fn js_err(err: JsValue) -> PluckError {
        PluckError::Fetch(format!("{:?}", err))
    }

    pub fn query_pairs() -> Vec<(String, String)> {
        let Some(window) = web_sys::window() else {
            return vec![];
        };
        let search = window.location().search().unwrap_or_default();
        let Ok(params) = web_sys::UrlSearchParams::new_with_str(&search) else {
            return vec![];
        };
        QUERY_KEYS
            .iter()
            .filter_map(|key| params.get(key).map(|value| (key.to_string(), value)))
            .collect()
    }

    pub async fn fetch_bytes(url: &str) -> Result<Vec<u8>> {
        let window = web_sys::window().ok_or_else(|| PluckError::Fetch("no window".to_string()))?;
        let response: web_sys::Response = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(js_err)?
            .dyn_into()
            .map_err(js_err)?;
        if !response.ok() {
            return Err(PluckError::Fetch(format!("{} answered {}", url, response.status())));
        }
        let buffer = JsFuture::from(response.array_buffer().map_err(js_err)?)
            .await
            .map_err(js_err)?;
        Ok(js_sys::Uint8Array::new(&buffer).to_vec())
    }
}

#[cfg(target_family = "wasm")]
async fn create_window(app: &App) -> WindowId {
    use nannou::wgpu::{DeviceDescriptor, Limits};

    let config = config();
    let (width, height) = window_size(config);
    let device_desc = DeviceDescriptor {
        limits: Limits {
            max_texture_dimension_2d: 8192,
            ..Limits::downlevel_webgl2_defaults()
        },
        ..Default::default()
    };

    app.new_window()
        .size(width, height)
        .device_descriptor(device_desc)
        .title(&config.element)
        .view(view)
        .event(input::event)
        .key_pressed(input::key_pressed)
        .raw_event(input::raw_window_event)
        .build_async()
        .await
        .unwrap_or_else(|err| panic!("failed to create window: {:?}", err))
}

#[cfg(target_family = "wasm")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub async fn start() -> Result<(), wasm_bindgen::JsValue> {
    use nannou::app;
    use nannou::wgpu::Backends;

    std::panic::set_hook(Box::new(console_error_panic_hook::hook));

    let mut config = PluckConfig::default();
    config.apply_query(web::query_pairs());
    console::init(config.level_filter());

    let mut candidates = Vec::new();
    for url in config.sound_urls() {
        let bytes = web::fetch_bytes(&url).await;
        candidates.push((url, bytes));
    }
    let clip = Clip::first_playable(candidates);
    web::CLIP.with(|c| c.replace(Some(clip)));
    let _ = CONFIG.set(config);

    app::Builder::new_async(|app| {
        Box::new(async move {
            let window = create_window(app).await;
            let clip = web::CLIP
                .with(|c| c.borrow_mut().take())
                .unwrap_or_else(|| Err(pluckstring::PluckError::NoPlayableSource(vec![])));
            let config = config();
            build_model(app, window, config, load_player(config, clip))
        })
    })
    .backends(Backends::PRIMARY | Backends::GL)
    .update(update)
    .run_async()
    .await;

    Ok(())
}
