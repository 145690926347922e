use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use egui::{Align2, Color32, Context, FontId, TextureHandle, TextureOptions};

use crate::color::schemes::SCHEMES;
use crate::fractal::branching::GeneratorPreset;
use crate::fractal::{default_params_for_type, FractalParams, FractalType, GeneratorParams};
use crate::gui::texture::rgb_to_color_image;
use crate::io;
use crate::render::{ActiveRenderer, AnimationTicker, RenderError, SystemClock, VectorRenderer};

/// Page active de l'interface : exploration des familles de fractales,
/// ou générateur d'arbres de ramification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Page {
    Explorer,
    Generator,
}

/// Application egui de fractaloom.
///
/// Modèle de rendu synchrone : les changements de paramètres lèvent un
/// drapeau, la frame suivante recalcule l'image dans le moteur actif et
/// recharge la texture. La boucle d'animation n'est qu'un drapeau de
/// plus : tant qu'elle tourne, chaque frame relance un rendu avec le
/// temps écoulé.
pub struct FractaloomApp {
    page: Page,
    selected_type: FractalType,
    params: FractalParams,
    gen_params: GeneratorParams,
    selected_preset: Option<GeneratorPreset>,

    renderer: ActiveRenderer,
    texture: Option<TextureHandle>,
    needs_render: bool,

    clock: SystemClock,
    ticker: AnimationTicker,
    last_time: f64,
    last_render_secs: Option<f64>,

    // Texte édité des règles L-système, une règle "X=..." par ligne.
    axiom_text: String,
    rules_text: String,

    preset_path: String,
    status_message: Option<String>,
}

impl FractaloomApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let selected_type = FractalType::Mandelbrot;
        let params = default_params_for_type(selected_type);
        let renderer = ActiveRenderer::for_type(selected_type, 1024, 768, true);

        Self {
            page: Page::Explorer,
            selected_type,
            params,
            gen_params: GeneratorParams::default(),
            selected_preset: None,
            renderer,
            texture: None,
            needs_render: true,
            clock: SystemClock::new(),
            ticker: AnimationTicker::new(),
            last_time: 0.0,
            last_render_secs: None,
            axiom_text: "F".to_string(),
            rules_text: "F=F+F-F-F+F".to_string(),
            preset_path: String::new(),
            status_message: None,
        }
    }

    /// Change de famille : paramètres par défaut de la nouvelle famille,
    /// en conservant les réglages de couleur et d'affichage, puis
    /// reconstruction du moteur de rendu adapté.
    fn set_fractal_type(&mut self, new_type: FractalType) {
        if new_type == self.selected_type {
            return;
        }
        self.selected_type = new_type;

        let mut new_params = default_params_for_type(new_type);
        new_params.color_scheme = self.params.color_scheme.clone();
        new_params.color_intensity = self.params.color_intensity;
        new_params.primary_color = self.params.primary_color.clone();
        new_params.background_color = self.params.background_color.clone();
        new_params.animation_effects = self.params.animation_effects;
        new_params.grid_display = self.params.grid_display;
        new_params.smooth_coloring = self.params.smooth_coloring;
        self.params = new_params;

        if new_type == FractalType::LSystem {
            self.sync_lsystem_text();
        }

        self.renderer.switch_to(new_type, true);
        self.needs_render = true;
    }

    fn set_page(&mut self, page: Page) {
        if page == self.page {
            return;
        }
        self.page = page;
        let (width, height) = (self.renderer.width(), self.renderer.height());
        self.renderer.destroy();
        self.renderer = match page {
            Page::Explorer => ActiveRenderer::for_type(self.selected_type, width, height, true),
            Page::Generator => ActiveRenderer::Vector(VectorRenderer::new(width, height)),
        };
        self.needs_render = true;
    }

    /// Recopie axiome et règles des paramètres vers les champs d'édition.
    fn sync_lsystem_text(&mut self) {
        self.axiom_text = self.params.axiom.clone().unwrap_or_else(|| "F".to_string());
        if let Some(rules) = &self.params.rules {
            let mut lines: Vec<String> = rules
                .iter()
                .map(|(symbol, replacement)| format!("{symbol}={replacement}"))
                .collect();
            lines.sort();
            self.rules_text = lines.join("\n");
        }
    }

    /// Analyse le texte des règles : une ligne "X=remplacement" par
    /// règle, les lignes sans '=' sont ignorées.
    fn parse_rules(text: &str) -> HashMap<char, String> {
        let mut rules = HashMap::new();
        for line in text.lines() {
            let Some((symbol, replacement)) = line.split_once('=') else {
                continue;
            };
            let Some(symbol) = symbol.trim().chars().next() else {
                continue;
            };
            rules.insert(symbol, replacement.trim().to_string());
        }
        rules
    }

    /// Rend une frame dans le moteur actif et recharge la texture.
    fn render_frame(&mut self, ctx: &Context) {
        let started = Instant::now();
        match self.page {
            Page::Explorer => {
                self.renderer
                    .render(self.selected_type, &self.params, self.last_time);
            }
            Page::Generator => self.renderer.render_pattern(&self.gen_params),
        }
        let elapsed = started.elapsed().as_secs_f64();
        self.last_render_secs = Some(elapsed);
        log::debug!(
            "rendu {}x{} en {:.1} ms",
            self.renderer.width(),
            self.renderer.height(),
            elapsed * 1000.0
        );

        let image = rgb_to_color_image(
            self.renderer.pixels(),
            self.renderer.width(),
            self.renderer.height(),
        );
        self.texture = Some(ctx.load_texture("fractal", image, TextureOptions::LINEAR));
    }

    /// Exporte la surface du dernier rendu en PNG horodaté.
    fn export_png(&mut self) {
        match self.try_export_png() {
            Ok(name) => self.status_message = Some(format!("Image exportée: {name}")),
            Err(e) => {
                log::warn!("export PNG impossible: {e}");
                self.status_message = Some(format!("Export impossible: {e}"));
            }
        }
    }

    fn try_export_png(&self) -> Result<String, RenderError> {
        let subject = match self.page {
            Page::Explorer => self.selected_type.cli_name(),
            Page::Generator => "pattern",
        };
        let name = io::export_file_name(subject, "png");
        io::png::save_png(
            self.renderer.pixels(),
            self.renderer.width(),
            self.renderer.height(),
            Path::new(&name),
        )?;
        Ok(name)
    }

    /// Exporte les paramètres courants du générateur en JSON horodaté.
    fn export_preset(&mut self) {
        match self.try_export_preset() {
            Ok(name) => self.status_message = Some(format!("Préréglage exporté: {name}")),
            Err(e) => {
                log::warn!("export du préréglage impossible: {e}");
                self.status_message = Some(format!("Export impossible: {e}"));
            }
        }
    }

    fn try_export_preset(&self) -> Result<String, RenderError> {
        let name = self
            .selected_preset
            .map(|p| p.name().to_string())
            .unwrap_or_else(|| "Personnalisé".to_string());
        let file_name = io::export_file_name("preset", "json");
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        io::preset::save_generator_preset(
            &name,
            &self.gen_params,
            timestamp,
            Path::new(&file_name),
        )?;
        Ok(file_name)
    }

    /// Recharge des paramètres de générateur depuis le chemin saisi.
    fn import_preset(&mut self) {
        match io::preset::load_generator_params(Path::new(&self.preset_path)) {
            Ok(params) => {
                self.gen_params = params;
                self.selected_preset = None;
                self.needs_render = true;
                self.status_message = Some(format!("Préréglage chargé: {}", self.preset_path));
            }
            Err(e) => {
                log::warn!("lecture du préréglage impossible: {e}");
                self.status_message = Some(format!("Lecture impossible: {e}"));
            }
        }
    }

    /// Palette suivante dans la table des palettes nommées.
    fn cycle_scheme(&mut self) {
        let current = SCHEMES
            .iter()
            .position(|s| s.name == self.params.color_scheme)
            .unwrap_or(0);
        self.params.color_scheme = SCHEMES[(current + 1) % SCHEMES.len()].name.to_string();
        self.needs_render = true;
    }

    fn handle_shortcuts(&mut self, ctx: &Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let (export, cycle, grid, animate) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::S),
                i.key_pressed(egui::Key::C),
                i.key_pressed(egui::Key::G),
                i.key_pressed(egui::Key::A),
            )
        });
        if export {
            self.export_png();
        }
        if cycle {
            self.cycle_scheme();
        }
        if grid {
            self.params.grid_display = !self.params.grid_display;
            self.needs_render = true;
        }
        if animate {
            self.params.animation_effects = !self.params.animation_effects;
            self.needs_render = true;
        }
    }

    fn explorer_panel(&mut self, ui: &mut egui::Ui) {
        let mut changed = false;
        let mut new_type = self.selected_type;

        egui::ComboBox::from_label("Famille")
            .selected_text(self.selected_type.name())
            .show_ui(ui, |ui| {
                for t in FractalType::all() {
                    ui.selectable_value(&mut new_type, t, t.name());
                }
            });
        self.set_fractal_type(new_type);

        ui.separator();

        if self.selected_type.uses_escape_time() {
            ui.label("Itération");
            changed |= ui
                .add(
                    egui::Slider::new(&mut self.params.max_iterations, 50..=500)
                        .text("itérations max"),
                )
                .changed();
            changed |= ui
                .add(egui::Slider::new(&mut self.params.escape_radius, 1.0..=10.0).text("rayon"))
                .changed();
            changed |= ui
                .add(egui::Slider::new(&mut self.params.power, 1.0..=5.0).text("exposant"))
                .changed();

            if self.selected_type == FractalType::Julia {
                ui.horizontal(|ui| {
                    ui.label("c =");
                    changed |= ui
                        .add(egui::DragValue::new(&mut self.params.c_real).speed(0.001))
                        .changed();
                    ui.label("+ i");
                    changed |= ui
                        .add(egui::DragValue::new(&mut self.params.c_imag).speed(0.001))
                        .changed();
                });
                changed |= ui
                    .checkbox(&mut self.params.julia_animation, "Animer la constante c")
                    .changed();
            }
            changed |= ui
                .checkbox(&mut self.params.smooth_coloring, "Dégradé lissé")
                .changed();
        }

        match self.selected_type {
            FractalType::LSystem => {
                ui.label("Axiome");
                if ui.text_edit_singleline(&mut self.axiom_text).changed() {
                    self.params.axiom = Some(self.axiom_text.clone());
                    changed = true;
                }
                ui.label("Règles (une par ligne, X=...)");
                if ui.text_edit_multiline(&mut self.rules_text).changed() {
                    self.params.rules = Some(Self::parse_rules(&self.rules_text));
                    changed = true;
                }
                let generations = self.params.generations.get_or_insert(4);
                changed |= ui
                    .add(egui::Slider::new(generations, 1..=8).text("générations"))
                    .changed();
                let angle = self.params.branching_angle.get_or_insert(20.0);
                changed |= ui
                    .add(egui::Slider::new(angle, 0.0..=360.0).text("angle"))
                    .changed();
                let length = self.params.length.get_or_insert(10.0);
                changed |= ui
                    .add(egui::Slider::new(length, 1.0..=20.0).text("longueur"))
                    .changed();
            }
            FractalType::Barnsley => {
                let depth = self.params.iteration_depth.get_or_insert(50_000);
                changed |= ui
                    .add(
                        egui::Slider::new(depth, 1_000..=100_000)
                            .step_by(1_000.0)
                            .text("points"),
                    )
                    .changed();
                let seed = self.params.seed.get_or_insert(42);
                ui.horizontal(|ui| {
                    ui.label("Graine");
                    changed |= ui.add(egui::DragValue::new(seed)).changed();
                });
            }
            FractalType::Koch => {
                let generations = self.params.generations.get_or_insert(4);
                changed |= ui
                    .add(egui::Slider::new(generations, 1..=6).text("générations"))
                    .changed();
                let side = self.params.base_segment_length.get_or_insert(200.0);
                changed |= ui
                    .add(egui::Slider::new(side, 50.0..=400.0).text("côté"))
                    .changed();
                let angle = self.params.rotation_angle.get_or_insert(60.0);
                changed |= ui
                    .add(egui::Slider::new(angle, 30.0..=120.0).text("angle du pic"))
                    .changed();
            }
            FractalType::Cantor => {
                let generations = self.params.generations.get_or_insert(6);
                changed |= ui
                    .add(egui::Slider::new(generations, 1..=10).text("générations"))
                    .changed();
                let ratio = self.params.spacing_ratio.get_or_insert(0.33);
                changed |= ui
                    .add(egui::Slider::new(ratio, 0.1..=0.5).text("écart central"))
                    .changed();
                let thickness = self.params.line_thickness.get_or_insert(10.0);
                changed |= ui
                    .add(egui::Slider::new(thickness, 1.0..=20.0).text("épaisseur"))
                    .changed();
            }
            FractalType::Vicsek => {
                let level = self.params.recursion_level.get_or_insert(5);
                changed |= ui
                    .add(egui::Slider::new(level, 1..=7).text("profondeur"))
                    .changed();
                let factor = self.params.scale_factor.get_or_insert(0.33);
                changed |= ui
                    .add(egui::Slider::new(factor, 0.1..=0.5).text("échelle"))
                    .changed();
                let rotation = self.params.rotation_options.get_or_insert(0.0);
                changed |= ui
                    .add(
                        egui::Slider::new(rotation, 0.0..=360.0)
                            .step_by(15.0)
                            .text("rotation"),
                    )
                    .changed();
            }
            _ => {}
        }

        ui.separator();
        ui.label("Couleur");
        let mut scheme = self.params.color_scheme.clone();
        egui::ComboBox::from_label("Palette")
            .selected_text(&scheme)
            .show_ui(ui, |ui| {
                for s in &SCHEMES {
                    ui.selectable_value(&mut scheme, s.name.to_string(), s.name);
                }
            });
        if scheme != self.params.color_scheme {
            self.params.color_scheme = scheme;
            changed = true;
        }
        changed |= ui
            .add(egui::Slider::new(&mut self.params.color_intensity, 0.1..=2.0).text("intensité"))
            .changed();
        if !self.selected_type.uses_escape_time() {
            ui.horizontal(|ui| {
                ui.label("Trait");
                changed |= ui
                    .text_edit_singleline(&mut self.params.primary_color)
                    .changed();
            });
            ui.horizontal(|ui| {
                ui.label("Fond");
                changed |= ui
                    .text_edit_singleline(&mut self.params.background_color)
                    .changed();
            });
        }

        ui.separator();
        ui.label("Vue");
        changed |= ui
            .add(egui::Slider::new(&mut self.params.zoom, 0.1..=10.0).text("zoom"))
            .changed();
        if ui.button("Recentrer la vue").clicked() {
            self.params.zoom = 1.0;
            self.params.pan_x = 0.0;
            self.params.pan_y = 0.0;
            changed = true;
        }

        ui.separator();
        changed |= ui
            .checkbox(&mut self.params.animation_effects, "Animation (A)")
            .changed();
        changed |= ui
            .checkbox(&mut self.params.grid_display, "Grille (G)")
            .changed();

        ui.separator();
        if ui.button("Exporter en PNG (S)").clicked() {
            self.export_png();
        }

        self.needs_render |= changed;
    }

    fn generator_panel(&mut self, ui: &mut egui::Ui) {
        let mut changed = false;

        let preset_label = self
            .selected_preset
            .map(|p| p.name())
            .unwrap_or("Personnalisé");
        egui::ComboBox::from_label("Préréglage")
            .selected_text(preset_label)
            .show_ui(ui, |ui| {
                for preset in GeneratorPreset::all() {
                    if ui
                        .selectable_label(self.selected_preset == Some(preset), preset.name())
                        .clicked()
                    {
                        self.selected_preset = Some(preset);
                        self.gen_params = preset.params();
                        changed = true;
                    }
                }
            });

        ui.separator();
        let g = &mut self.gen_params;
        changed |= ui
            .add(egui::Slider::new(&mut g.angle1, 0.0..=360.0).text("angle entre branches"))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut g.angle2, 0.0..=360.0).text("torsion"))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut g.iterations, 1..=12).text("générations"))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut g.branches, 1..=10).text("branches"))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut g.start_length, 0.0..=10.0).text("longueur initiale"))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut g.length_multiplier, 0.0..=5.0).text("facteur longueur"))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut g.start_width, 0.0..=5.0).text("largeur initiale"))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut g.width_multiplier, 0.0..=5.0).text("facteur largeur"))
            .changed();

        ui.separator();
        // Estimation affichée : branches^iterations, comme le seuil de
        // complexité. Le compte exact de segments tracés suit.
        ui.label(format!(
            "Segments totaux: {}",
            self.gen_params.leaf_count()
        ));
        ui.label(format!(
            "Segments tracés: {}",
            self.gen_params.total_segments()
        ));
        ui.label(self.gen_params.complexity_hint());

        ui.separator();
        if ui.button("Exporter en PNG (S)").clicked() {
            self.export_png();
        }
        if ui.button("Exporter le préréglage (JSON)").clicked() {
            self.export_preset();
        }
        ui.horizontal(|ui| {
            ui.text_edit_singleline(&mut self.preset_path);
            if ui.button("Charger").clicked() {
                self.import_preset();
            }
        });

        if changed && self.selected_preset.is_some() {
            // Un réglage manuel quitte le préréglage nommé.
            let preset_params = self.selected_preset.map(|p| p.params());
            if preset_params != Some(self.gen_params) {
                self.selected_preset = None;
            }
        }
        self.needs_render |= changed;
    }

    /// Applique les interactions pointeur sur l'image rendue.
    fn pointer_interactions(&mut self, ctx: &Context, response: &egui::Response) {
        let rect = response.rect;
        let escape = self.page == Page::Explorer && self.selected_type.uses_escape_time();

        // Glisser : panoramique.
        if response.dragged() {
            let delta = response.drag_delta();
            if delta != egui::Vec2::ZERO {
                if escape {
                    // 4/zoom unités de plan sur la hauteur de l'image.
                    let per_pixel = 4.0 / (self.params.zoom * rect.height() as f64);
                    self.params.pan_x -= delta.x as f64 * per_pixel;
                    self.params.pan_y += delta.y as f64 * per_pixel;
                } else {
                    // Les familles géométriques décalent l'écran de pan * 100.
                    self.params.pan_x += delta.x as f64 / 100.0;
                    self.params.pan_y += delta.y as f64 / 100.0;
                }
                self.needs_render = true;
            }
        }

        // Clic : zoom x2 centré sur le point (familles escape-time).
        if escape && response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let u = ((pos.x - rect.min.x) / rect.width()) as f64;
                let v = 1.0 - ((pos.y - rect.min.y) / rect.height()) as f64;
                self.params.pan_x += (u - 0.5) * 4.0 / self.params.zoom;
                self.params.pan_y += (v - 0.5) * 4.0 / self.params.zoom;
                self.params.zoom *= 2.0;
                self.needs_render = true;
            }
        }
        if response.secondary_clicked() {
            self.params.zoom = (self.params.zoom / 2.0).max(0.1);
            self.needs_render = true;
        }

        // Molette : zoom continu.
        if response.hovered() {
            let scroll = ctx.input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                self.params.zoom =
                    (self.params.zoom * (1.0 + scroll as f64 * 0.001)).max(0.1);
                self.needs_render = true;
            }
        }
    }
}

impl eframe::App for FractaloomApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_shortcuts(ctx);

        egui::TopBottomPanel::top("pages").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let mut page = self.page;
                ui.selectable_value(&mut page, Page::Explorer, "Explorateur");
                ui.selectable_value(&mut page, Page::Generator, "Générateur de motifs");
                self.set_page(page);
            });
        });

        egui::SidePanel::left("controls")
            .min_width(230.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| match self.page {
                    Page::Explorer => self.explorer_panel(ui),
                    Page::Generator => self.generator_panel(ui),
                });
            });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                match self.page {
                    Page::Explorer => {
                        ui.label(format!("Type: {}", self.selected_type.name()));
                        ui.separator();
                        ui.label(format!("Palette: {}", self.params.color_scheme));
                        if self.selected_type.uses_escape_time() {
                            ui.separator();
                            ui.label(format!("Itérations: {}", self.params.max_iterations));
                            ui.separator();
                            ui.label(if self.renderer.uses_gpu() { "GPU" } else { "CPU" });
                        }
                        ui.separator();
                        ui.label(format!("Zoom: {:.2}x", self.params.zoom));
                    }
                    Page::Generator => {
                        ui.label("Générateur de motifs");
                        ui.separator();
                        ui.label(format!(
                            "Segments: {}",
                            self.gen_params.total_segments()
                        ));
                    }
                }
                if let Some(secs) = self.last_render_secs {
                    ui.separator();
                    ui.label(format!("Rendu: {:.1} ms", secs * 1000.0));
                }
                if let Some(message) = &self.status_message {
                    ui.separator();
                    ui.label(message);
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            // La surface suit la zone disponible ; tout changement de
            // taille réalloue et relance un rendu immédiat.
            let available = ui.available_size();
            let target_w = available.x.max(1.0).floor() as u32;
            let target_h = available.y.max(1.0).floor() as u32;
            if target_w != self.renderer.width() || target_h != self.renderer.height() {
                self.renderer.resize(target_w, target_h);
                self.needs_render = true;
            }

            let animating = self.page == Page::Explorer && self.params.animation_effects;
            match self.ticker.tick(&self.clock, animating) {
                Some(time) => {
                    self.last_time = time;
                    self.needs_render = true;
                    ctx.request_repaint();
                }
                None => {
                    self.last_time = 0.0;
                }
            }

            if self.needs_render {
                self.render_frame(ctx);
                self.needs_render = false;
            }

            if let Some(texture) = &self.texture {
                let size = egui::Vec2::new(
                    self.renderer.width() as f32,
                    self.renderer.height() as f32,
                );
                let response = ui.add(
                    egui::Image::new(texture)
                        .fit_to_exact_size(size)
                        .sense(egui::Sense::click_and_drag()),
                );

                // Étiquettes de génération (Cantor/Vicsek) par-dessus
                // la texture, aux coordonnées raster.
                let origin = response.rect.min;
                for label in self.renderer.labels() {
                    ui.painter().text(
                        origin + egui::vec2(label.x, label.y),
                        Align2::LEFT_BOTTOM,
                        &label.text,
                        FontId::monospace(10.0),
                        Color32::from_white_alpha((label.alpha * 255.0) as u8),
                    );
                }

                self.pointer_interactions(ctx, &response);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rules_lines() {
        let rules = FractaloomApp::parse_rules("F=F+F-F-F+F\nX=F[+X]F\n\npas une règle\n");
        assert_eq!(rules.get(&'F').map(String::as_str), Some("F+F-F-F+F"));
        assert_eq!(rules.get(&'X').map(String::as_str), Some("F[+X]F"));
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn test_parse_rules_trims_symbol() {
        let rules = FractaloomApp::parse_rules("  F = FF ");
        assert_eq!(rules.get(&'F').map(String::as_str), Some("FF"));
    }
}
