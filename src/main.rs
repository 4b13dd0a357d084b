use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context, anyhow};
use clap::Parser;
use log::{debug, error, info, trace};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::cli::Args;
use crate::config::Settings;
use crate::framebuffer::FrameBuffer;
use crate::input::Action;
use crate::logger::init_logger;
use crate::player::Player;
use crate::renderer::{Minimap, render_frame};
use crate::scaler::Stretch;
use crate::scene::Scene;
use crate::vector::Vector2D;

mod cli;
mod config;
mod framebuffer;
mod input;
mod logger;
mod player;
mod raycast;
mod renderer;
mod scaler;
mod scene;
mod vector;

/// Share of the framebuffer's shorter side taken by the minimap
const MINIMAP_FRACTION: f64 = 0.35;

type WindowSurface = softbuffer::Surface<Rc<Window>, Rc<Window>>;

struct App {
    settings: Settings,
    window: Option<Rc<Window>>,
    surface: Option<WindowSurface>,
    scene: Scene,
    player: Player,

    // Internal fixed-size buffer, stretched to the window
    frame: FrameBuffer,
    stretch: Stretch,
    minimap: Minimap,

    /// Pointer in scene space, target of the minimap cursor ray
    cursor: Option<Vector2D>,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(settings: Settings, scene: Scene) -> Self {
        let (w, h) = (settings.fb_width, settings.fb_height);
        Self {
            window: None,
            surface: None,
            player: Player::spawn(&scene),
            frame: FrameBuffer::new(w, h),
            stretch: Stretch::new(w, h, w, h),
            minimap: Minimap::fit(&scene, w, h, MINIMAP_FRACTION),
            cursor: None,
            error: None,
            scene,
            settings,
        }
    }

    fn create_window(&self, event_loop: &ActiveEventLoop) -> anyhow::Result<(Rc<Window>, WindowSurface)> {
        let attributes = Window::default_attributes()
            .with_title("Tile Raycaster")
            .with_inner_size(LogicalSize::new(
                self.settings.fb_width as f64,
                self.settings.fb_height as f64,
            ));

        let window = Rc::new(
            event_loop
                .create_window(attributes)
                .map_err(|e| anyhow!("create window: {e}"))?,
        );
        let context = softbuffer::Context::new(window.clone())
            .map_err(|e| anyhow!("softbuffer context: {e}"))?;
        let surface = softbuffer::Surface::new(&context, window.clone())
            .map_err(|e| anyhow!("softbuffer surface: {e}"))?;
        Ok((window, surface))
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        error!("{err:#}");
        self.error = Some(err);
        event_loop.exit();
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn redraw(&mut self) -> anyhow::Result<()> {
        let (Some(window), Some(surface)) = (&self.window, &mut self.surface) else {
            return Ok(());
        };

        let size = window.inner_size();
        let (Some(dw), Some(dh)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return Ok(()); // Minimized window, skip drawing
        };
        surface
            .resize(dw, dh)
            .map_err(|e| anyhow!("resize surface: {e}"))?;

        let started = Instant::now();
        render_frame(&mut self.frame, &self.scene, &self.player, &self.settings.view);
        self.minimap.render(
            &mut self.frame,
            &self.scene,
            &self.player,
            &self.settings.view,
            self.cursor,
        );

        let (dw, dh) = (dw.get() as usize, dh.get() as usize);
        if !self.stretch.matches(dw, dh) {
            self.stretch = Stretch::new(self.settings.fb_width, self.settings.fb_height, dw, dh);
        }

        let mut buf = surface
            .buffer_mut()
            .map_err(|e| anyhow!("surface buffer: {e}"))?;
        self.stretch.blit(self.frame.pixels(), &mut buf);
        buf.present().map_err(|e| anyhow!("present: {e}"))?;

        trace!("frame rendered in {:?}", started.elapsed());
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        match self.create_window(event_loop) {
            Ok((window, surface)) => {
                window.request_redraw();
                self.surface = Some(surface);
                self.window = Some(window);
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if self.window.as_ref().is_none_or(|w| w.id() != id) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                info!("close requested, stopping");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                if code == KeyCode::Escape {
                    event_loop.exit();
                    return;
                }
                let Some(action) = Action::from_key(code) else {
                    return;
                };
                if action.apply(&mut self.player, &self.scene, &self.settings.motion) {
                    debug!(
                        "{action:?}: position {:?}, direction {:.3}",
                        self.player.position, self.player.direction
                    );
                    self.request_redraw();
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let px = self.stretch.to_source(Vector2D::new(position.x, position.y));
                self.cursor = Some(self.minimap.to_scene(px));
                self.request_redraw();
            }

            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                self.request_redraw();
            }

            WindowEvent::Resized(_) => self.request_redraw(),

            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw() {
                    self.fail(event_loop, err);
                }
            }

            _ => (),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.clone().into());

    let settings = Settings::from(&args);
    let scene = match &settings.map {
        Some(path) => {
            Scene::load(path).with_context(|| format!("loading map {}", path.display()))?
        }
        None => Scene::default(),
    };
    info!("scene {}x{} loaded", scene.width(), scene.height());

    let event_loop = EventLoop::new().map_err(|e| anyhow!("create event loop: {e}"))?;
    // Only input events trigger a new frame
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(settings, scene);
    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow!("event loop: {e}"))?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
