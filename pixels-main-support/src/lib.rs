#![deny(clippy::all)]
#![forbid(unsafe_code)]

mod palette;
mod sink;

pub use palette::{CellLook, Palette};
pub use sink::{BACKGROUND_COLOR, FrameSink};

use error_iter::ErrorIter as _;
use log::{debug, error};
use pixels::wgpu::Color;
use pixels::{Pixels, PixelsBuilder, SurfaceTexture, TextureError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, KeyEvent, StartCause, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Cursor, CursorIcon, Fullscreen, Window, WindowId};
use wireworld::{PixelSize, RenderSink, WireError, World};

const MIN_DELAY: Duration = Duration::from_millis(1);

#[derive(Debug, Error)]
pub enum HostError {
    #[error("event loop failed")]
    EventLoop(#[from] EventLoopError),

    #[error("could not open a window")]
    Window(#[from] OsError),

    #[error("could not create the pixel surface")]
    Pixels(#[from] pixels::Error),

    #[error("could not resize the pixel surface")]
    Texture(#[from] TextureError),

    #[error("could not build the circuit")]
    World(#[from] WireError),
}

#[derive(Debug)]
pub struct AnimateOptions {
    /// Time between generations.
    pub delay: Duration,
    pub fullscreen: bool,
    pub palette: Palette,
}

/// Opens a window and runs `build_world`'s world in it until the window closes.
/// Generations advance on a timer; full redraws run every frame until done.
pub fn animate<W, F>(options: AnimateOptions, build_world: F) -> Result<(), HostError>
where
    W: World,
    F: Fn(PixelSize) -> Result<W, WireError>,
{
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);
    let mut handler = AppEventHandler::new(options, build_world);
    event_loop.run_app(&mut handler)?;
    handler.failure.map_or(Ok(()), Err)
}

pub fn log_error<E: std::error::Error + 'static>(method_name: &str, err: E) {
    error!("{method_name}() failed: {err}");
    for source in err.sources().skip(1) {
        error!("  Caused by: {source}");
    }
}

struct App<W: World> {
    world: W,
    window: Arc<Window>,
    pixels: Pixels<'static>,
    palette: Palette,
    frame_size: PixelSize,
    delay: Duration,
    next_update: Instant,
}

impl<W: World> App<W> {
    fn new<F>(
        event_loop: &ActiveEventLoop,
        build_world: &F,
        options: AnimateOptions,
    ) -> Result<Self, HostError>
    where
        F: Fn(PixelSize) -> Result<W, WireError>,
    {
        let window = Arc::new(Self::build_window(event_loop, options.fullscreen)?);
        let frame_size = Self::frame_size(window.inner_size());
        let world = build_world(frame_size)?;
        let pixels = Self::build_pixels(&window, frame_size)?;
        let mut result = Self {
            world,
            window,
            pixels,
            palette: options.palette,
            frame_size,
            delay: options.delay.max(MIN_DELAY),
            next_update: Instant::now(),
        };
        result.clear_frame();
        Ok(result)
    }

    fn build_window(event_loop: &ActiveEventLoop, fullscreen: bool) -> Result<Window, OsError> {
        let window_attributes = Window::default_attributes()
            .with_title("wire")
            .with_cursor(Cursor::Icon(CursorIcon::Crosshair))
            .with_fullscreen(fullscreen.then_some(Fullscreen::Borderless(None)))
            .with_visible(false);
        event_loop.create_window(window_attributes)
    }

    fn build_pixels(
        window: &Arc<Window>,
        frame_size: PixelSize,
    ) -> Result<Pixels<'static>, pixels::Error> {
        let window_size = window.inner_size();
        let surface_texture =
            SurfaceTexture::new(window_size.width, window_size.height, window.clone());
        PixelsBuilder::new(frame_size.width, frame_size.height, surface_texture)
            .clear_color(Color::BLACK)
            .build()
    }

    fn frame_size(window_size: PhysicalSize<u32>) -> PixelSize {
        PixelSize::new(window_size.width.max(1), window_size.height.max(1))
    }

    fn world_and_sink(&mut self) -> (&mut W, FrameSink<'_>) {
        let sink = FrameSink::new(
            self.pixels.frame_mut(),
            self.frame_size,
            self.world.layout(),
            &mut self.palette,
        );
        (&mut self.world, sink)
    }

    fn clear_frame(&mut self) {
        let (_, mut sink) = self.world_and_sink();
        if let Err(err) = sink.clear_all() {
            debug!("Could not clear the frame: {err}");
        }
    }

    fn on_create(&mut self) {
        self.window.request_redraw();
        self.window.set_visible(true);
    }

    fn on_time_step(&mut self) {
        let (world, mut sink) = self.world_and_sink();
        match world.step(&mut sink) {
            Ok(outcome) if outcome.regenerated => debug!("Circuit replaced"),
            Ok(_) => (),
            Err(err) => log_error("world.step", err),
        }
        self.window.request_redraw();

        while self.next_update < Instant::now() {
            self.next_update += self.delay;
        }
    }

    fn on_redraw_batch(&mut self) {
        let (world, mut sink) = self.world_and_sink();
        if let Err(err) = world.continue_redraw(&mut sink) {
            log_error("world.continue_redraw", err);
        }
        self.window.request_redraw();
    }

    fn on_expose(&mut self) {
        self.world.request_full_redraw();
    }

    fn on_resize(&mut self, window_size: PhysicalSize<u32>) -> Result<(), HostError> {
        let frame_size = Self::frame_size(window_size);
        self.pixels.resize_surface(frame_size.width, frame_size.height)?;
        self.pixels.resize_buffer(frame_size.width, frame_size.height)?;
        self.frame_size = frame_size;
        if let Err(err) = self.world.resize(frame_size) {
            log_error("world.resize", err);
        }
        self.clear_frame();
        self.palette.reroll();
        self.window.request_redraw();
        Ok(())
    }

    fn on_redraw(&mut self) {
        if let Err(err) = self.pixels.render() {
            log_error("pixels.render", err);
        }
    }
}

struct AppEventHandler<W, F>
where
    W: World,
    F: Fn(PixelSize) -> Result<W, WireError>,
{
    build_world: F,
    options: Option<AnimateOptions>,
    app: Option<App<W>>,
    failure: Option<HostError>,
}

impl<W, F> AppEventHandler<W, F>
where
    W: World,
    F: Fn(PixelSize) -> Result<W, WireError>,
{
    fn new(options: AnimateOptions, build_world: F) -> Self {
        Self {
            build_world,
            options: Some(options),
            app: None,
            failure: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, method_name: &str, err: HostError) {
        error!("{method_name}() failed: {err}");
        self.failure = Some(err);
        event_loop.exit();
    }
}

impl<W, F> ApplicationHandler for AppEventHandler<W, F>
where
    W: World,
    F: Fn(PixelSize) -> Result<W, WireError>,
{
    fn new_events(&mut self, _event_loop: &ActiveEventLoop, cause: StartCause) {
        let Some(app) = self.app.as_mut() else {
            return;
        };
        match cause {
            StartCause::ResumeTimeReached { .. } => app.on_time_step(),
            StartCause::Poll if app.next_update <= Instant::now() => app.on_time_step(),
            _ => (),
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.app.is_some() {
            return;
        }
        let Some(options) = self.options.take() else {
            return;
        };
        match App::new(event_loop, &self.build_world, options) {
            Ok(mut app) => {
                app.on_create();
                self.app = Some(app);
            }
            Err(err) => self.fail(event_loop, "App::new", err),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(app) = self.app.as_mut() else {
            return;
        };
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Released,
                        repeat: false,
                        ..
                    },
                ..
            } => match code {
                KeyCode::Escape | KeyCode::KeyQ | KeyCode::KeyX => {
                    event_loop.exit();
                }
                _ => (),
            },
            WindowEvent::Resized(window_size) => {
                if let Err(err) = app.on_resize(window_size) {
                    self.fail(event_loop, "App::on_resize", err);
                }
            }
            WindowEvent::Occluded(false) => {
                app.on_expose();
            }
            WindowEvent::RedrawRequested => {
                app.on_redraw();
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(app) = self.app.as_mut() else {
            return;
        };
        if app.world.is_redrawing() {
            app.on_redraw_batch();
        }
        let control_flow = if app.world.is_redrawing() {
            ControlFlow::Poll
        } else {
            ControlFlow::WaitUntil(app.next_update)
        };
        event_loop.set_control_flow(control_flow);
    }
}
