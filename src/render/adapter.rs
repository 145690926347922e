use crate::fractal::{FractalParams, FractalType, GeneratorParams};
use crate::gpu::GpuRenderer;
use crate::render::escape_time::{colorize, render_escape_time};
use crate::render::vector::{Label, VectorRenderer};
use crate::render::RenderError;

/// Moteur escape-time : calcule les matrices (GPU si disponible, CPU
/// sinon) puis les colorise en RGB8.
pub struct EscapeTimeRenderer {
    width: u32,
    height: u32,
    gpu: Option<GpuRenderer>,
    rgb: Vec<u8>,
}

impl EscapeTimeRenderer {
    fn new(width: u32, height: u32, prefer_gpu: bool) -> EscapeTimeRenderer {
        let gpu = if prefer_gpu {
            let gpu = GpuRenderer::new();
            if gpu.is_none() {
                log::warn!("aucun adaptateur GPU disponible, rendu CPU");
            }
            gpu
        } else {
            None
        };
        EscapeTimeRenderer {
            width,
            height,
            gpu,
            rgb: vec![0u8; width as usize * height as usize * 3],
        }
    }

    fn render(&mut self, fractal_type: FractalType, params: &FractalParams, time: f64) {
        let (iterations, zs) = match &self.gpu {
            Some(gpu) => {
                match gpu.render(params, fractal_type, self.width, self.height, time) {
                    Some(result) => result,
                    None => {
                        log::warn!("échec du calcul GPU, repli sur le CPU");
                        render_escape_time(params, fractal_type, self.width, self.height, time)
                    }
                }
            }
            None => render_escape_time(params, fractal_type, self.width, self.height, time),
        };
        self.rgb = colorize(params, &iterations, &zs, self.width);
    }
}

/// Moteur de rendu actif, construit pour la famille courante.
///
/// Changer de famille détruit le moteur en place et en construit un
/// nouveau ; les deux variantes exposent la même surface RGB8.
pub enum ActiveRenderer {
    EscapeTime(EscapeTimeRenderer),
    Vector(VectorRenderer),
}

impl ActiveRenderer {
    /// Construit le moteur adapté à la famille. Pour les familles
    /// escape-time, `prefer_gpu` tente d'abord l'adaptateur GPU et
    /// retombe sur le CPU en cas d'échec.
    pub fn for_type(
        fractal_type: FractalType,
        width: u32,
        height: u32,
        prefer_gpu: bool,
    ) -> ActiveRenderer {
        if fractal_type.uses_escape_time() {
            ActiveRenderer::EscapeTime(EscapeTimeRenderer::new(width, height, prefer_gpu))
        } else {
            ActiveRenderer::Vector(VectorRenderer::new(width, height))
        }
    }

    /// Variante stricte pour la ligne de commande : le GPU est exigé,
    /// son absence est une erreur au lieu d'un repli silencieux.
    pub fn try_gpu_for(
        fractal_type: FractalType,
        width: u32,
        height: u32,
    ) -> Result<ActiveRenderer, RenderError> {
        if !fractal_type.uses_escape_time() {
            return Err(RenderError::UnsupportedSurface);
        }
        let gpu = GpuRenderer::new().ok_or(RenderError::UnsupportedSurface)?;
        Ok(ActiveRenderer::EscapeTime(EscapeTimeRenderer {
            width,
            height,
            gpu: Some(gpu),
            rgb: vec![0u8; width as usize * height as usize * 3],
        }))
    }

    /// Détruit le moteur courant et en construit un pour la nouvelle
    /// famille, aux mêmes dimensions.
    pub fn switch_to(&mut self, fractal_type: FractalType, prefer_gpu: bool) {
        let (width, height) = (self.width(), self.height());
        self.destroy();
        *self = ActiveRenderer::for_type(fractal_type, width, height, prefer_gpu);
    }

    /// Rend une image complète de la famille demandée.
    pub fn render(&mut self, fractal_type: FractalType, params: &FractalParams, time: f64) {
        match self {
            ActiveRenderer::EscapeTime(renderer) => renderer.render(fractal_type, params, time),
            ActiveRenderer::Vector(renderer) => renderer.render(fractal_type, params, time),
        }
    }

    /// Rend un arbre du générateur de motifs (moteur vectoriel
    /// uniquement).
    pub fn render_pattern(&mut self, params: &GeneratorParams) {
        match self {
            ActiveRenderer::Vector(renderer) => renderer.render_pattern(params),
            ActiveRenderer::EscapeTime(_) => {
                log::warn!("générateur de motifs demandé sur le moteur escape-time");
            }
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        match self {
            ActiveRenderer::EscapeTime(renderer) => {
                renderer.width = width;
                renderer.height = height;
                renderer.rgb = vec![0u8; width as usize * height as usize * 3];
            }
            ActiveRenderer::Vector(renderer) => renderer.resize(width, height),
        }
    }

    /// Libère les ressources du moteur (buffers et contexte GPU).
    pub fn destroy(&mut self) {
        match self {
            ActiveRenderer::EscapeTime(renderer) => {
                renderer.gpu = None;
                renderer.rgb = Vec::new();
            }
            ActiveRenderer::Vector(renderer) => renderer.destroy(),
        }
    }

    pub fn width(&self) -> u32 {
        match self {
            ActiveRenderer::EscapeTime(renderer) => renderer.width,
            ActiveRenderer::Vector(renderer) => renderer.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            ActiveRenderer::EscapeTime(renderer) => renderer.height,
            ActiveRenderer::Vector(renderer) => renderer.height(),
        }
    }

    /// Surface RGB8 de la dernière image rendue.
    pub fn pixels(&self) -> &[u8] {
        match self {
            ActiveRenderer::EscapeTime(renderer) => &renderer.rgb,
            ActiveRenderer::Vector(renderer) => renderer.pixels(),
        }
    }

    /// Étiquettes textuelles à superposer (familles géométriques).
    pub fn labels(&self) -> &[Label] {
        match self {
            ActiveRenderer::EscapeTime(_) => &[],
            ActiveRenderer::Vector(renderer) => renderer.labels(),
        }
    }

    /// Vrai si le moteur escape-time calcule sur GPU.
    #[allow(dead_code)]
    pub fn uses_gpu(&self) -> bool {
        matches!(self, ActiveRenderer::EscapeTime(r) if r.gpu.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fractal::default_params_for_type;

    #[test]
    fn test_variant_follows_family() {
        let escape = ActiveRenderer::for_type(FractalType::Mandelbrot, 32, 32, false);
        assert!(matches!(escape, ActiveRenderer::EscapeTime(_)));
        let vector = ActiveRenderer::for_type(FractalType::Koch, 32, 32, false);
        assert!(matches!(vector, ActiveRenderer::Vector(_)));
    }

    #[test]
    fn test_switch_rebuilds_keeping_dimensions() {
        let mut renderer = ActiveRenderer::for_type(FractalType::Mandelbrot, 48, 40, false);
        renderer.switch_to(FractalType::Vicsek, false);
        assert!(matches!(renderer, ActiveRenderer::Vector(_)));
        assert_eq!(renderer.width(), 48);
        assert_eq!(renderer.height(), 40);
    }

    #[test]
    fn test_large_escape_surface_allocation() {
        // Dimensions acceptées par la ligne de commande dont le produit
        // déborde u32 : l'allocation doit passer par usize.
        let side = 37_838u32;
        let renderer = ActiveRenderer::for_type(FractalType::Mandelbrot, side, side, false);
        assert_eq!(renderer.pixels().len(), side as usize * side as usize * 3);
    }

    #[test]
    fn test_escape_render_fills_surface() {
        let mut renderer = ActiveRenderer::for_type(FractalType::Mandelbrot, 32, 24, false);
        let params = default_params_for_type(FractalType::Mandelbrot);
        renderer.render(FractalType::Mandelbrot, &params, 0.0);
        assert_eq!(renderer.pixels().len(), 32 * 24 * 3);
        // Des pixels colorés existent hors de l'ensemble.
        assert!(renderer.pixels().iter().any(|&c| c > 0));
    }

    #[test]
    fn test_vector_render_end_to_end() {
        let mut renderer = ActiveRenderer::for_type(FractalType::Cantor, 200, 150, false);
        let params = default_params_for_type(FractalType::Cantor);
        renderer.render(FractalType::Cantor, &params, 0.0);
        assert_eq!(renderer.pixels().len(), 200 * 150 * 3);
        assert!(renderer.pixels().iter().any(|&c| c > 0));
        assert!(renderer.labels().is_empty());
    }

    #[test]
    fn test_resize_then_render() {
        let mut renderer = ActiveRenderer::for_type(FractalType::Julia, 16, 16, false);
        renderer.resize(24, 20);
        let params = default_params_for_type(FractalType::Julia);
        renderer.render(FractalType::Julia, &params, 0.0);
        assert_eq!(renderer.pixels().len(), 24 * 20 * 3);
    }

    #[test]
    fn test_destroy_releases_buffers() {
        let mut renderer = ActiveRenderer::for_type(FractalType::Mandelbrot, 16, 16, false);
        renderer.destroy();
        assert!(renderer.pixels().is_empty());
    }
}
