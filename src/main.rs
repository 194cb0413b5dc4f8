use anyhow::{anyhow, Context, Result};
use glutin::{
    config::ConfigTemplateBuilder,
    context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version},
    display::{Display, GetGlDisplay, GlDisplay},
    prelude::*,
    surface::{Surface, SwapInterval, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow};
use log::{error, info, warn, LevelFilter};
use raw_window_handle::HasRawWindowHandle;
use simple_logger::SimpleLogger;
use std::{
    ffi::{c_void, CString},
    num::NonZeroU32,
    path::Path,
    sync::Arc,
};
use winit::{
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopBuilder},
    keyboard::{Key, NamedKey},
    window::{Window, WindowBuilder},
};

use fragview::{
    config::ViewerConfig,
    render::{FullscreenQuad, ShaderProgram, ShaderProgramSource},
    ui::{EguiLayer, Overlay},
    utils::{shader_time, FrameContext},
};

struct App {
    window: Window,
    gl_context: PossiblyCurrentContext,
    gl_surface: Surface<WindowSurface>,
    config: ViewerConfig,
    frame: FrameContext,
    program: Option<ShaderProgram>,
    quad: Option<FullscreenQuad>,
    overlay: Overlay,
    egui: EguiLayer,
    running: bool,
}

fn get_proc_address(display: &Display, symbol: &str) -> *const c_void {
    match CString::new(symbol) {
        Ok(symbol) => display.get_proc_address(symbol.as_c_str()),
        Err(_) => std::ptr::null(),
    }
}

fn load_shader_source(path: &Path) -> Result<ShaderProgramSource> {
    let source = ShaderProgramSource::from_file(path)
        .with_context(|| format!("Could not load shader {:?}", path))?;

    // An empty stage still goes to the compiler, but the cause is logged here first.
    if let Err(e) = source.validate() {
        warn!("{} in {:?}", e, path);
    }
    Ok(source)
}

impl App {
    fn new(config: ViewerConfig, source: &ShaderProgramSource) -> Result<(Self, EventLoop<()>)> {
        let event_loop = EventLoopBuilder::new().build()?;
        let window_builder = WindowBuilder::new()
            .with_title(config.window.title.as_str())
            .with_inner_size(LogicalSize::new(config.window.width, config.window.height));

        let template = ConfigTemplateBuilder::new().with_alpha_size(8);
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));

        let (window, gl_config) = display_builder
            .build(&event_loop, template, |configs| {
                configs
                    .reduce(|accum, config| {
                        if config.num_samples() > accum.num_samples() {
                            config
                        } else {
                            accum
                        }
                    })
                    .expect("display offered no GL configs")
            })
            .map_err(|e| anyhow!("Failed to create display: {}", e))?;

        let window = window.ok_or_else(|| anyhow!("Display did not create a window"))?;
        let raw_window_handle = window.raw_window_handle();

        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Core)
            .build(Some(raw_window_handle));

        let gl_display = gl_config.display();

        let gl_context = unsafe {
            gl_display
                .create_context(&gl_config, &context_attributes)
                .context("Failed to create OpenGL context")?
        };

        let attrs = window.build_surface_attributes(<_>::default());
        let gl_surface = unsafe {
            gl_display
                .create_window_surface(&gl_config, &attrs)
                .context("Failed to create GL surface")?
        };

        let gl_context = gl_context
            .make_current(&gl_surface)
            .context("Failed to make context current")?;

        let interval = if config.window.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(e) = gl_surface.set_swap_interval(&gl_context, interval) {
            warn!("Could not set swap interval: {}", e);
        }

        // Load OpenGL functions
        gl::load_with(|symbol| get_proc_address(&gl_display, symbol));
        let glow_context = Arc::new(unsafe {
            glow::Context::from_loader_function(|symbol| get_proc_address(&gl_display, symbol))
        });

        let program = match ShaderProgram::from_source(source) {
            Ok(program) => {
                info!("Linked shader program {}", program.id());
                Some(program)
            }
            Err(e) => {
                error!("{}", e);
                None
            }
        };

        let egui = EguiLayer::new(&window, glow_context)?;
        let overlay = Overlay::from_config(&config.overlay);

        Ok((
            Self {
                window,
                gl_context,
                gl_surface,
                config,
                frame: FrameContext::new(),
                program,
                quad: Some(FullscreenQuad::new()),
                overlay,
                egui,
                running: true,
            },
            event_loop,
        ))
    }

    /// Returns true when the app should exit.
    fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        let consumed = self.egui.on_window_event(&self.window, event);

        match event {
            WindowEvent::CloseRequested => true,
            WindowEvent::KeyboardInput { event, .. } if !consumed => {
                event.state == ElementState::Pressed
                    && event.logical_key == Key::Named(NamedKey::Escape)
            }
            WindowEvent::Resized(size) => {
                self.resize(*size);
                false
            }
            _ => false,
        }
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        if let (Some(width), Some(height)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) {
            self.gl_surface.resize(&self.gl_context, width, height);
        }
    }

    fn render(&mut self) -> Result<()> {
        self.frame.begin_frame();
        let size = self.window.inner_size();
        let [r, g, b, a] = self.config.render.clear_color;

        unsafe {
            gl::Viewport(0, 0, size.width as i32, size.height as i32);
            gl::Disable(gl::SCISSOR_TEST);
            gl::Disable(gl::BLEND);
            gl::ClearColor(r, g, b, a);
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }

        if let (Some(program), Some(quad)) = (&mut self.program, &self.quad) {
            let render = &self.config.render;
            program.set_uniform_1f(
                &render.time_uniform,
                shader_time(self.frame.elapsed(), render.time_wrap_secs),
            );
            program.set_uniform_2f(
                &render.resolution_uniform,
                glam::Vec2::new(size.width as f32, size.height as f32),
            );
            quad.draw();
        }

        if self.config.overlay.enabled {
            let (overlay, frame) = (&self.overlay, &self.frame);
            self.egui.paint(&self.window, |ctx| {
                overlay.show(ctx, frame);
            });
        }

        self.gl_surface
            .swap_buffers(&self.gl_context)
            .context("Failed to swap buffers")?;
        Ok(())
    }

    fn cleanup(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;

        if let Err(e) = self.gl_context.make_current(&self.gl_surface) {
            warn!("Context lost before cleanup: {}", e);
        }
        self.egui.destroy();
        self.program = None;
        self.quad = None;
        info!("Shut down after {} frames", self.frame.frame_count());
    }
}

/// Logging starts before the config is read so config errors go through `log`.
fn init_logging() -> Result<()> {
    SimpleLogger::new().with_level(LevelFilter::Trace).init()?;
    log::set_max_level(LevelFilter::Info);
    Ok(())
}

fn load_config() -> Result<ViewerConfig> {
    let mut config = ViewerConfig::load()?;
    if let Some(path) = std::env::args_os().nth(1) {
        config.render.shader_path = path.into();
    }
    config.apply_log_level()?;
    Ok(config)
}

fn main() -> Result<()> {
    init_logging()?;

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{:#}", e);
            return Err(e);
        }
    };
    info!("Initializing fragview...");

    let source = match load_shader_source(&config.render.shader_path) {
        Ok(source) => source,
        Err(e) => {
            error!("{:#}", e);
            return Err(e);
        }
    };

    let (mut app, event_loop) = App::new(config, &source)?;
    drop(source);

    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => {
            if app.handle_window_event(&event) {
                app.cleanup();
                elwt.exit();
            } else if let WindowEvent::RedrawRequested = event {
                if !app.running {
                    return;
                }
                if let Err(e) = app.render() {
                    error!("{:#}", e);
                    app.cleanup();
                    elwt.exit();
                }
            }
        }
        Event::AboutToWait => {
            app.window.request_redraw();
        }
        _ => (),
    })?;

    Ok(())
}
