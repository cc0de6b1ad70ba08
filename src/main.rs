use std::collections::HashSet;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use log::{debug, error, info, warn};
use simplelog::TermLogger;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::config::{Cli, Config};
use crate::input::Controls;
use crate::observer::Observer;
use crate::projection::Viewport;
use crate::raster::Framebuffer;
use crate::scaler::{ScaleLut, blit_nearest_stretch};
use crate::world::WallList;

mod clip;
mod config;
mod geometry;
mod input;
mod observer;
mod projection;
mod raster;
mod renderer;
mod scaler;
mod world;

struct App {
    config: Config,
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,
    walls: WallList,
    observer: Observer,

    // Internal buffer the pipeline renders at, stretched to the window
    fb: Framebuffer,
    viewport: Viewport,
    scale_lut: ScaleLut,

    keys_down: HashSet<KeyCode>,
    frame_interval: Duration,
    next_frame: Instant,
}

impl App {
    fn new(config: Config, walls: WallList) -> Self {
        let fb = Framebuffer::new(config.width, config.height);
        let viewport = Viewport::new(config.width, config.height);
        let frame_interval = Duration::from_secs_f64(1.0 / config.target_fps as f64);

        Self {
            config,
            window: None,
            surface: None,
            walls,
            observer: Observer::default(),
            fb,
            viewport,
            scale_lut: ScaleLut::empty(),
            keys_down: HashSet::new(),
            frame_interval,
            next_frame: Instant::now(),
        }
    }

    fn tick(&mut self) {
        let controls = Controls::from_keys(&self.keys_down);
        self.observer
            .apply(&controls, self.config.move_speed, self.config.turn_step);

        if controls.debug {
            info!("observer {}", self.observer.debug_report());
        }
    }

    fn present(&mut self, id: WindowId) -> anyhow::Result<()> {
        let (window, surface) = match (&self.window, &mut self.surface) {
            (Some(w), Some(s)) if w.id() == id => (w, s),
            _ => return Ok(()),
        };

        let size = window.inner_size();
        let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) else {
            return Ok(()); // minimized
        };
        let (dw, dh) = (size.width as usize, size.height as usize);

        surface
            .resize(w, h)
            .map_err(|e| anyhow::anyhow!("{e}"))
            .context("resizing surface")?;

        let commands = renderer::render_frame(&self.walls, &self.observer, &self.viewport);
        self.fb.clear(self.config.background);
        self.fb.draw(&commands);

        if !self.scale_lut.matches(dw, dh) {
            debug!("rebuilding scale table for {dw}x{dh}");
            self.scale_lut = ScaleLut::new(dw, dh, self.fb.width, self.fb.height);
        }

        let mut buf = surface
            .buffer_mut()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .context("mapping surface buffer")?;
        blit_nearest_stretch(&mut buf, dw, &self.fb.pixels, &self.scale_lut);
        buf.present()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .context("presenting frame")?;
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.width as f64,
                self.config.height as f64,
            ));

        let window = match event_loop.create_window(attributes) {
            Ok(w) => Rc::new(w),
            Err(e) => {
                error!("could not create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let surface = softbuffer::Context::new(window.clone())
            .and_then(|context| softbuffer::Surface::new(&context, window.clone()));
        match surface {
            Ok(s) => self.surface = Some(s),
            Err(e) => {
                error!("could not create softbuffer surface: {e}");
                event_loop.exit();
                return;
            }
        }

        info!(
            "window ready, rendering {}x{} at {} fps",
            self.config.width, self.config.height, self.config.target_fps
        );
        window.request_redraw();
        self.window = Some(window);
        self.next_frame = Instant::now() + self.frame_interval;
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("close requested; stopping");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key,
                        state,
                        ..
                    },
                ..
            } => {
                if let PhysicalKey::Code(code) = physical_key {
                    use winit::event::ElementState;
                    match state {
                        ElementState::Pressed if code == KeyCode::Escape => {
                            info!("escape pressed; stopping");
                            event_loop.exit();
                        }
                        ElementState::Pressed => {
                            self.keys_down.insert(code);
                        }
                        ElementState::Released => {
                            self.keys_down.remove(&code);
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                self.tick();
                if let Err(e) = self.present(id) {
                    error!("{e:#}");
                    event_loop.exit();
                }
            }

            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if now >= self.next_frame {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
            self.next_frame += self.frame_interval;
            // Don't try to catch up after a stall
            if self.next_frame < now {
                self.next_frame = now + self.frame_interval;
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame));
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    TermLogger::init(
        cli.log_level,
        simplelog::ConfigBuilder::default()
            .set_time_level(log::LevelFilter::Trace)
            .build(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )
    .context("initialising logger")?;

    let config = Config::try_from(&cli).context("invalid configuration")?;

    let walls = match &cli.scene {
        Some(path) => WallList::load(path)
            .with_context(|| format!("loading scene {}", path.display()))?,
        None => WallList::builtin().context("building the default scene")?,
    };
    if walls.is_empty() {
        warn!("scene has no walls; only the horizon will be drawn");
    } else {
        info!("scene has {} walls", walls.len());
    }

    let event_loop = EventLoop::new().context("creating event loop")?;
    event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now()));

    let mut app = App::new(config, walls);
    event_loop.run_app(&mut app).context("running event loop")?;
    Ok(())
}
