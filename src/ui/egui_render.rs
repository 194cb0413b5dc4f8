use egui::Context as EguiContext;
use egui_winit::State as EguiWinitState;
use std::sync::Arc;
use thiserror::Error;
use winit::{event::WindowEvent, window::Window};

#[derive(Debug, Error)]
pub enum EguiLayerError {
    #[error("Failed to create egui painter: {0}")]
    Painter(String),
}

/// egui context, winit input state and glow painter for one window
pub struct EguiLayer {
    ctx: EguiContext,
    state: EguiWinitState,
    painter: egui_glow::Painter,
}

impl EguiLayer {
    pub fn new(window: &Window, gl: Arc<glow::Context>) -> Result<Self, EguiLayerError> {
        let painter = egui_glow::Painter::new(gl, "", None)
            .map_err(|e| EguiLayerError::Painter(e.to_string()))?;

        let ctx = EguiContext::default();
        let state = EguiWinitState::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            Some(painter.max_texture_side()),
        );

        log::info!("egui overlay ready (max texture side {})", painter.max_texture_side());
        Ok(Self {
            ctx,
            state,
            painter,
        })
    }

    /// Returns true when egui consumed the event.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// Runs one egui frame and paints it over the current framebuffer.
    pub fn paint(&mut self, window: &Window, run_ui: impl FnOnce(&EguiContext)) {
        let raw_input = self.state.take_egui_input(window);
        let full_output = self.ctx.run(raw_input, run_ui);

        self.state
            .handle_platform_output(window, full_output.platform_output);

        let clipped_primitives = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let size = window.inner_size();
        self.painter.paint_and_update_textures(
            [size.width, size.height],
            full_output.pixels_per_point,
            &clipped_primitives,
            &full_output.textures_delta,
        );
    }

    pub fn destroy(&mut self) {
        self.painter.destroy();
    }
}
