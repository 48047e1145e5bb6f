use eframe::egui;

use mono_cam::camera::pattern::PatternProvider;
use mono_cam::camera::session::CameraSession;
use mono_cam::error::Result;
use mono_cam::export;
use mono_cam::pipeline::PipelineParams;
use mono_cam::render_loop::{RenderLoop, TickOutcome};

pub struct MonoCamApp {
    session: CameraSession,
    render_loop: RenderLoop,
    params: PipelineParams,
    texture: Option<egui::TextureHandle>,
    error_message: Option<String>,
}

impl MonoCamApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let mut app = Self {
            session: CameraSession::new(Box::new(PatternProvider::default())),
            render_loop: RenderLoop::new(0, 0),
            params: PipelineParams::default(),
            texture: None,
            error_message: None,
        };
        app.restart_stream(|session| session.start());
        app
    }

    /// Stop the loop, run a session transition, and resume only if a stream came up.
    fn restart_stream(&mut self, transition: impl FnOnce(&mut CameraSession) -> Result<()>) {
        let handle = self.render_loop.handle();
        handle.stop();
        match transition(&mut self.session) {
            Ok(()) => {
                self.error_message = None;
                handle.resume();
            }
            Err(e) => {
                self.error_message = Some(format!("Camera access required: {e}"));
            }
        }
    }

    fn take_snapshot(&mut self) {
        if self.render_loop.frames_rendered() == 0 {
            return;
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let Some(path) = rfd::FileDialog::new()
                .add_filter("JPEG", &["jpg", "jpeg"])
                .set_file_name(export::snapshot_file_name())
                .save_file()
            else {
                return;
            };
            if let Err(e) = export::save_snapshot(self.render_loop.display(), &path) {
                log::warn!("snapshot failed: {e}");
                self.error_message = Some(e.to_string());
            }
        }

        #[cfg(target_arch = "wasm32")]
        if let Err(e) = export::download_snapshot(self.render_loop.display()) {
            log::warn!("snapshot failed: {e}");
            self.error_message = Some(e.to_string());
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn open_image(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg", "tiff", "tif", "bmp", "webp"])
            .pick_file()
        {
            let provider = mono_cam::camera::still::StillProvider::new(path);
            self.restart_stream(|session| session.replace_provider(Box::new(provider)));
        }
    }

    fn upload_display(&mut self, ctx: &egui::Context) {
        let display = self.render_loop.display();
        let (w, h) = display.dimensions();
        let image =
            egui::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], display.as_raw());
        match &mut self.texture {
            Some(tex) => tex.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.texture =
                    Some(ctx.load_texture("display", image, egui::TextureOptions::LINEAR));
            }
        }
    }
}

impl eframe::App for MonoCamApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Shutter").clicked() {
                    self.take_snapshot();
                }
                if ui.button("Flip Camera").clicked() {
                    self.restart_stream(|session| session.switch_camera());
                }
                ui.separator();

                if ui.button("Test Pattern").clicked() {
                    self.restart_stream(|session| {
                        session.replace_provider(Box::new(PatternProvider::default()))
                    });
                }
                #[cfg(not(target_arch = "wasm32"))]
                if ui.button("Open Image").clicked() {
                    self.open_image();
                }

                ui.separator();
                let (w, h) = self.render_loop.display().dimensions();
                ui.label(format!(
                    "{} | {} | {}x{} | {:.1}ms",
                    self.session.provider_name(),
                    self.session.facing().label(),
                    w,
                    h,
                    self.render_loop.last_frame_ms()
                ));
            });
        });

        egui::SidePanel::left("controls")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                ui_look(ui, &mut self.params);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(message) = &self.error_message {
                ui.colored_label(egui::Color32::LIGHT_RED, message);
            }

            let available = ui.available_size();
            self.render_loop
                .resize_display(available.x.max(0.0) as u32, available.y.max(0.0) as u32);

            match self.render_loop.tick(&mut self.session, &self.params) {
                Ok(TickOutcome::Rendered) => self.upload_display(ctx),
                Ok(TickOutcome::Waiting | TickOutcome::Stopped) => {}
                Err(e) => {
                    log::warn!("frame rejected: {e}");
                    self.error_message = Some(e.to_string());
                }
            }

            if let Some(tex) = &self.texture {
                let mut image =
                    egui::Image::new(egui::load::SizedTexture::new(tex.id(), available));
                if self.session.mirrors_preview() {
                    image = image.uv(egui::Rect::from_min_max(
                        egui::pos2(1.0, 0.0),
                        egui::pos2(0.0, 1.0),
                    ));
                }
                ui.add(image);
            } else if self.error_message.is_none() {
                ui.centered_and_justified(|ui| {
                    ui.label("Waiting for camera...");
                });
            }
        });

        if self.session.is_active() && !self.render_loop.handle().is_stopped() {
            ctx.request_repaint();
        }
    }
}

fn ui_look(ui: &mut egui::Ui, params: &mut PipelineParams) {
    egui::CollapsingHeader::new("Look")
        .default_open(true)
        .show(ui, |ui| {
            ui.add(
                egui::Slider::new(&mut params.contrast, PipelineParams::CONTRAST_RANGE)
                    .step_by(0.01)
                    .text("Contrast"),
            );
            ui.add(
                egui::Slider::new(&mut params.grain_amount, PipelineParams::GRAIN_RANGE)
                    .step_by(0.01)
                    .text("Grain"),
            );
            if ui.button("Reset").clicked() {
                *params = PipelineParams::default();
            }
        });
}
