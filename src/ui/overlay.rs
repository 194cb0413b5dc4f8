use crate::config::OverlayConfig;
use crate::utils::FrameContext;

/// Text panel composited over the shader output
#[derive(Debug, Clone)]
pub struct Overlay {
    pub title: String,
    pub text: String,
    pub show_stats: bool,
}

impl Overlay {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            show_stats: false,
        }
    }

    pub fn from_config(config: &OverlayConfig) -> Self {
        Self {
            show_stats: config.show_stats,
            ..Self::new(config.title.clone(), config.text.clone())
        }
    }

    pub fn show(&self, ctx: &egui::Context, frame: &FrameContext) -> Option<egui::Response> {
        egui::Window::new(self.title.as_str())
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(self.text.as_str());

                if self.show_stats {
                    ui.separator();
                    ui.label(format!("{:.0} fps", frame.fps()));
                    ui.label(format!("{:.1}s elapsed", frame.elapsed()));
                }
            })
            .map(|inner| inner.response)
    }
}

impl Default for Overlay {
    fn default() -> Self {
        Self::from_config(&OverlayConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_text() {
        let overlay = Overlay::default();
        assert_eq!(overlay.title, "You're awake");
        assert_eq!(overlay.text, "Now what will you do?");
        assert!(!overlay.show_stats);
    }

    #[test]
    fn test_renders_headless() {
        let ctx = egui::Context::default();
        let frame = FrameContext::new();
        let mut overlay = Overlay::new("Stats", "hello");
        overlay.show_stats = true;

        for _ in 0..2 {
            let mut shown = None;
            let _ = ctx.run(egui::RawInput::default(), |ctx| {
                shown = overlay.show(ctx, &frame);
            });
            assert!(shown.is_some());
        }
    }
}
