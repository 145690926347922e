use crate::color::schemes::{anchor_rgb, parse_hex_or, scheme_by_name};
use crate::fractal::barnsley;
use crate::fractal::branching::{bounding_box, generate_tree};
use crate::fractal::cantor::cantor_bars;
use crate::fractal::definitions::{
    default_axiom, default_rules, DEFAULT_BASE_SEGMENT_LENGTH, DEFAULT_BRANCHING_ANGLE,
    DEFAULT_CANTOR_GENERATIONS, DEFAULT_ITERATION_DEPTH, DEFAULT_LINE_THICKNESS,
    DEFAULT_LSYSTEM_GENERATIONS, DEFAULT_LSYSTEM_LENGTH, DEFAULT_RECURSION_LEVEL,
    DEFAULT_ROTATION_ANGLE, DEFAULT_SCALE_FACTOR, DEFAULT_SEED, DEFAULT_SPACING_RATIO,
};
use crate::fractal::koch::{koch_curve, snowflake_triangle};
use crate::fractal::lsystem::{expand, interpret};
use crate::fractal::vicsek::vicsek_squares;
use crate::fractal::{FractalParams, FractalType, GeneratorParams};
use crate::render::raster::Raster;

/// Couleurs de génération du générateur d'arbres (cycle de 12).
pub const GENERATION_COLORS: [[u8; 3]; 12] = [
    [0xff, 0xff, 0x00],
    [0xff, 0x00, 0x00],
    [0x00, 0xff, 0x00],
    [0x00, 0x00, 0xff],
    [0xff, 0x00, 0xff],
    [0x00, 0xff, 0xff],
    [0xff, 0xa5, 0x00],
    [0x80, 0x00, 0x80],
    [0xff, 0xb3, 0x66],
    [0xff, 0x66, 0x66],
    [0xb3, 0x66, 0xff],
    [0x66, 0xb3, 0xff],
];

/// Fond bleu nuit du générateur d'arbres.
const PATTERN_BACKGROUND: [u8; 3] = [0x1a, 0x22, 0x38];

/// Étiquette textuelle à superposer par l'interface graphique.
/// La surface raster ne rastérise pas de texte : l'export PNG les omet.
#[derive(Clone, Debug)]
pub struct Label {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub alpha: f32,
}

/// Moteur de rendu des familles géométriques.
///
/// Reconstruit la liste de primitives de la famille à chaque appel puis
/// la trace dans la surface raster. Les étiquettes de génération sont
/// collectées à part pour l'interface.
pub struct VectorRenderer {
    raster: Raster,
    labels: Vec<Label>,
}

impl VectorRenderer {
    pub fn new(width: u32, height: u32) -> VectorRenderer {
        VectorRenderer {
            raster: Raster::new(width, height),
            labels: Vec::new(),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    pub fn pixels(&self) -> &[u8] {
        self.raster.pixels()
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    #[cfg(test)]
    fn pixel_at(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = (y as usize * self.width() as usize + x as usize) * 3;
        let px = self.pixels();
        [px[idx], px[idx + 1], px[idx + 2]]
    }

    /// Réalloue la surface aux nouvelles dimensions.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.raster = Raster::new(width, height);
        self.labels.clear();
    }

    /// Libère la surface (l'instance ne doit plus servir ensuite).
    pub fn destroy(&mut self) {
        self.raster = Raster::new(0, 0);
        self.labels = Vec::new();
    }

    /// Rend une image complète de la famille demandée.
    pub fn render(&mut self, fractal_type: FractalType, params: &FractalParams, time: f64) {
        self.labels.clear();
        let background = parse_hex_or(&params.background_color, [0, 0, 0]);
        self.raster.fill(background);

        match fractal_type {
            FractalType::LSystem => self.draw_lsystem(params, time),
            FractalType::Koch => self.draw_koch(params, time),
            FractalType::Cantor => self.draw_cantor(params, time),
            FractalType::Vicsek => self.draw_vicsek(params, time),
            FractalType::Barnsley => self.draw_barnsley(params, time),
            FractalType::Mandelbrot | FractalType::Julia => {
                log::warn!("famille escape-time envoyée au moteur vectoriel, image vide");
            }
        }

        if params.grid_display {
            self.raster.draw_grid();
        }
    }

    /// Rend un arbre du générateur de motifs.
    pub fn render_pattern(&mut self, params: &GeneratorParams) {
        self.labels.clear();
        self.raster.fill(PATTERN_BACKGROUND);

        let segments = generate_tree(params);
        let Some((min, max)) = bounding_box(&segments) else {
            return;
        };

        // Cadrage volontairement fixe : l'échelle suit la longueur de
        // branche initiale, seul le centre de la boîte est recalé.
        let scale = 17.0 * params.start_length;
        let offset_x = self.width() as f64 / 2.0 - (min.x + (max.x - min.x) / 2.0) * scale;
        let offset_y = self.height() as f64 / 2.0 - (min.y + (max.y - min.y) / 2.0) * scale;

        for segment in &segments {
            let color = GENERATION_COLORS[(segment.generation % 12) as usize];
            let thickness = (segment.width * 12.0).max(0.5);
            self.raster.draw_line_thick(
                offset_x + segment.start.x * scale,
                offset_y + segment.start.y * scale,
                offset_x + segment.end.x * scale,
                offset_y + segment.end.y * scale,
                thickness,
                color,
            );
        }
    }

    fn draw_lsystem(&mut self, params: &FractalParams, time: f64) {
        let owned_axiom;
        let axiom = match &params.axiom {
            Some(a) => a.as_str(),
            None => {
                owned_axiom = default_axiom();
                owned_axiom.as_str()
            }
        };
        let owned_rules;
        let rules = match &params.rules {
            Some(r) => r,
            None => {
                owned_rules = default_rules();
                &owned_rules
            }
        };
        let generations = params
            .generations
            .unwrap_or(DEFAULT_LSYSTEM_GENERATIONS)
            .min(8);
        let step = params.length.unwrap_or(DEFAULT_LSYSTEM_LENGTH);
        let angle = params.branching_angle.unwrap_or(DEFAULT_BRANCHING_ANGLE);

        let program = expand(axiom, rules, generations);
        let segments = interpret(&program, step, angle);

        let center_x = self.width() as f64 / 2.0;
        let center_y = self.height() as f64 / 2.0;
        let zoom = params.zoom;
        let thickness = 2.0 * zoom;

        for segment in &segments {
            let depth = segment.depth as f64;
            let mix = (depth * 0.1 + time * 0.5).rem_euclid(1.0);
            let blue = (255.0 * (time + depth * 0.3).sin()).max(0.0);
            let color = [
                (255.0 * (1.0 - mix)) as u8,
                (255.0 * mix) as u8,
                blue as u8,
            ];
            self.raster.draw_line_thick(
                center_x + zoom * (params.pan_x + segment.start.x),
                center_y + zoom * (params.pan_y + segment.start.y),
                center_x + zoom * (params.pan_x + segment.end.x),
                center_y + zoom * (params.pan_y + segment.end.y),
                thickness,
                color,
            );
        }
    }

    fn draw_koch(&mut self, params: &FractalParams, time: f64) {
        let generations = params.generations.unwrap_or(4).min(8);
        let side = params
            .base_segment_length
            .unwrap_or(DEFAULT_BASE_SEGMENT_LENGTH);
        let peak_angle = params.rotation_angle.unwrap_or(DEFAULT_ROTATION_ANGLE);
        let primary = parse_hex_or(&params.primary_color, [255, 255, 255]);
        let scheme = scheme_by_name(&params.color_scheme);

        let triangle = snowflake_triangle(
            self.width() as f64,
            self.height() as f64,
            side,
            params.zoom,
            params.pan_x,
            params.pan_y,
        );

        for i in 0..3 {
            let points = koch_curve(triangle[i], triangle[(i + 1) % 3], generations, peak_angle);
            for (j, pair) in points.windows(2).enumerate() {
                let color = if params.animation_effects {
                    let index = (j as f64 + time * 50.0).rem_euclid(8.0) as usize;
                    anchor_rgb(scheme, index)
                } else {
                    primary
                };
                self.raster.draw_line_thick(
                    pair[0].x,
                    pair[0].y,
                    pair[1].x,
                    pair[1].y,
                    2.0,
                    color,
                );
            }
        }
    }

    fn draw_cantor(&mut self, params: &FractalParams, time: f64) {
        let generations = params
            .generations
            .unwrap_or(DEFAULT_CANTOR_GENERATIONS)
            .min(12);
        let ratio = params.spacing_ratio.unwrap_or(DEFAULT_SPACING_RATIO);
        let thickness = params.line_thickness.unwrap_or(DEFAULT_LINE_THICKNESS);
        let scheme = scheme_by_name(&params.color_scheme);

        let bars = cantor_bars(
            self.width() as f64,
            params.zoom,
            params.pan_x,
            generations,
            ratio,
            thickness,
        );

        for bar in &bars {
            let index = if params.animation_effects {
                (bar.generation as f64 + time * 2.0).rem_euclid(8.0) as usize
            } else {
                (bar.generation % 8) as usize
            };
            let color = anchor_rgb(scheme, index);
            self.raster.fill_rect(bar.x, bar.y, bar.width, thickness, color);

            if params.grid_display {
                self.labels.push(Label {
                    text: format!("Gen {}", bar.generation),
                    x: bar.x as f32,
                    y: (bar.y - 5.0) as f32,
                    alpha: 0.7,
                });
            }
        }
    }

    fn draw_vicsek(&mut self, params: &FractalParams, time: f64) {
        let level = params
            .recursion_level
            .unwrap_or(DEFAULT_RECURSION_LEVEL)
            .min(8);
        let scale_factor = params.scale_factor.unwrap_or(DEFAULT_SCALE_FACTOR);
        let rotation = params.rotation_options.unwrap_or(0.0);
        let scheme = scheme_by_name(&params.color_scheme);

        let squares = vicsek_squares(
            self.width() as f64,
            self.height() as f64,
            params.zoom,
            params.pan_x,
            params.pan_y,
            level,
            scale_factor,
            rotation,
        );

        for (index, square) in squares.iter().enumerate() {
            let anchor = if params.animation_effects {
                (square.generation as f64 + time * 3.0 + index as f64 * 0.1).rem_euclid(8.0)
                    as usize
            } else {
                (square.generation % 8) as usize
            };
            let color = anchor_rgb(scheme, anchor);
            self.raster
                .fill_rect(square.x, square.y, square.size, square.size, color);
            self.raster
                .stroke_rect(square.x, square.y, square.size, [0, 0, 0], 0.3);

            if params.grid_display && square.size > 20.0 {
                self.labels.push(Label {
                    text: format!("{}", square.generation),
                    x: (square.x + 2.0) as f32,
                    y: (square.y + 12.0) as f32,
                    alpha: 0.8,
                });
            }
        }
    }

    fn draw_barnsley(&mut self, params: &FractalParams, time: f64) {
        let depth = params.iteration_depth.unwrap_or(DEFAULT_ITERATION_DEPTH);
        let seed = params.seed.unwrap_or(DEFAULT_SEED);
        let weights = params.transform_probabilities.as_deref();
        let primary = parse_hex_or(&params.primary_color, [255, 255, 255]);
        let scheme = scheme_by_name(&params.color_scheme);

        let width = self.width() as f64;
        let height = self.height() as f64;
        let zoom_scale = width.min(height) * 0.1 * params.zoom;
        let offset_x = width / 2.0 + params.pan_x * 100.0;
        let offset_y = (height - 50.0) + params.pan_y * 100.0;

        for point in barnsley::sample(depth, weights, seed) {
            let screen_x = offset_x + point.x * zoom_scale;
            let screen_y = offset_y - point.y * zoom_scale;
            let color = if params.animation_effects {
                let index = (point.step as f64 + time * 100.0).rem_euclid(8.0) as usize;
                anchor_rgb(scheme, index)
            } else {
                primary
            };
            self.raster
                .set_pixel(screen_x.floor() as i64, screen_y.floor() as i64, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fractal::default_params_for_type;

    fn count_non_background(renderer: &VectorRenderer, background: [u8; 3]) -> usize {
        renderer
            .pixels()
            .chunks_exact(3)
            .filter(|px| *px != background)
            .count()
    }

    #[test]
    fn test_background_fill() {
        let mut renderer = VectorRenderer::new(64, 64);
        let mut params = default_params_for_type(FractalType::Cantor);
        params.background_color = "#102030".to_string();
        params.generations = Some(0);
        renderer.render(FractalType::Cantor, &params, 0.0);
        assert_eq!(renderer.pixels()[0..3], [0x10, 0x20, 0x30]);
    }

    #[test]
    fn test_lsystem_draws_segments() {
        let mut renderer = VectorRenderer::new(256, 256);
        let params = default_params_for_type(FractalType::LSystem);
        renderer.render(FractalType::LSystem, &params, 0.0);
        assert!(count_non_background(&renderer, [0, 0, 0]) > 100);
    }

    #[test]
    fn test_koch_draws_primary_color() {
        let mut renderer = VectorRenderer::new(400, 300);
        let mut params = default_params_for_type(FractalType::Koch);
        params.primary_color = "#ff0000".to_string();
        renderer.render(FractalType::Koch, &params, 0.0);
        let reds = renderer
            .pixels()
            .chunks_exact(3)
            .filter(|px| *px == &[255, 0, 0])
            .count();
        assert!(reds > 100);
    }

    #[test]
    fn test_cantor_rows_and_labels() {
        let mut renderer = VectorRenderer::new(400, 300);
        let mut params = default_params_for_type(FractalType::Cantor);
        params.generations = Some(2);
        params.grid_display = true;
        renderer.render(FractalType::Cantor, &params, 0.0);
        // 1 + 2 + 4 barres, une étiquette par barre.
        assert_eq!(renderer.labels().len(), 7);
        assert!(renderer.labels()[0].text.starts_with("Gen"));
        // La barre racine est remplie à y = 50..60.
        let root_y = 52u32;
        let center = renderer.pixel_at(200, root_y);
        assert_ne!(center, [0, 0, 0]);
    }

    #[test]
    fn test_vicsek_labels_only_large_squares() {
        let mut renderer = VectorRenderer::new(400, 300);
        let mut params = default_params_for_type(FractalType::Vicsek);
        params.recursion_level = Some(4);
        params.grid_display = true;
        renderer.render(FractalType::Vicsek, &params, 0.0);
        let total = 1 + 5 + 25 + 125 + 625;
        assert!(renderer.labels().len() < total);
        assert!(!renderer.labels().is_empty());
    }

    #[test]
    fn test_barnsley_plots_points() {
        let mut renderer = VectorRenderer::new(300, 300);
        let mut params = default_params_for_type(FractalType::Barnsley);
        params.iteration_depth = Some(20_000);
        params.primary_color = "#00ff00".to_string();
        renderer.render(FractalType::Barnsley, &params, 0.0);
        let greens = renderer
            .pixels()
            .chunks_exact(3)
            .filter(|px| *px == &[0, 255, 0])
            .count();
        assert!(greens > 500);
    }

    #[test]
    fn test_barnsley_deterministic() {
        let params = default_params_for_type(FractalType::Barnsley);
        let mut a = VectorRenderer::new(200, 200);
        let mut b = VectorRenderer::new(200, 200);
        a.render(FractalType::Barnsley, &params, 0.0);
        b.render(FractalType::Barnsley, &params, 0.0);
        assert_eq!(a.pixels(), b.pixels());
    }

    #[test]
    fn test_grid_overlay_after_shapes() {
        let mut renderer = VectorRenderer::new(200, 200);
        let mut params = default_params_for_type(FractalType::Cantor);
        params.generations = Some(0);
        params.grid_display = true;
        renderer.render(FractalType::Cantor, &params, 0.0);
        // Ligne de grille visible sur le fond noir à x = 50.
        let px = renderer.pixel_at(50, 150);
        assert!(px[0] > 0 && px[0] < 60);
    }

    #[test]
    fn test_pattern_renders_on_dark_blue() {
        let mut renderer = VectorRenderer::new(300, 300);
        let params = GeneratorParams::default();
        renderer.render_pattern(&params);
        assert_eq!(renderer.pixels()[0..3], [0x1a, 0x22, 0x38]);
        assert!(count_non_background(&renderer, PATTERN_BACKGROUND) > 100);
    }

    #[test]
    fn test_pattern_empty_tree_is_background_only() {
        let mut renderer = VectorRenderer::new(100, 100);
        let params = GeneratorParams {
            iterations: 0,
            ..GeneratorParams::default()
        };
        renderer.render_pattern(&params);
        assert_eq!(count_non_background(&renderer, PATTERN_BACKGROUND), 0);
    }

    #[test]
    fn test_resize_reallocates() {
        let mut renderer = VectorRenderer::new(100, 100);
        renderer.resize(50, 40);
        assert_eq!(renderer.width(), 50);
        assert_eq!(renderer.pixels().len(), 50 * 40 * 3);
    }
}
