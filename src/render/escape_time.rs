use num_complex::Complex64;
use rayon::prelude::*;

use crate::color::schemes::{color_for_escape, scheme_by_name};
use crate::fractal::escape::{evaluate, julia_constant, pixel_coord};
use crate::fractal::{FractalParams, FractalType};

/// Calcule la matrice d'itérations et la matrice des valeurs finales de z
/// pour une fractale escape-time.
///
/// Retourne un tuple (iterations, zs) où :
/// - `iterations.len() == width * height`
/// - `zs.len() == width * height`
///
/// Le calcul est parallélisé par lignes avec rayon.
pub fn render_escape_time(
    params: &FractalParams,
    fractal_type: FractalType,
    width: u32,
    height: u32,
    time: f64,
) -> (Vec<u32>, Vec<Complex64>) {
    let w = width as usize;
    let h = height as usize;
    let mut iterations = vec![0u32; w * h];
    let mut zs = vec![Complex64::new(0.0, 0.0); w * h];

    if w == 0 || h == 0 {
        return (iterations, zs);
    }

    // La constante de Julia (animée ou non) vaut pour toute l'image.
    let julia_c = julia_constant(params, time);

    iterations
        .par_chunks_mut(w)
        .zip(zs.par_chunks_mut(w))
        .enumerate()
        .for_each(|(j, (iter_row, z_row))| {
            for (i, (iter, z)) in iter_row.iter_mut().zip(z_row.iter_mut()).enumerate() {
                let coord = pixel_coord(
                    i as u32,
                    j as u32,
                    width,
                    height,
                    params.zoom,
                    params.pan_x,
                    params.pan_y,
                );
                let (count, z_final) = evaluate(fractal_type, coord, params, julia_c);
                *iter = count;
                *z = z_final;
            }
        });

    (iterations, zs)
}

/// Convertit les matrices d'itérations en buffer RGB8 avec la palette
/// des paramètres. Les points intérieurs restent noirs.
pub fn colorize(
    params: &FractalParams,
    iterations: &[u32],
    zs: &[Complex64],
    width: u32,
) -> Vec<u8> {
    let scheme = scheme_by_name(&params.color_scheme);
    let w = width as usize;

    iterations
        .par_chunks(w.max(1))
        .zip(zs.par_chunks(w.max(1)))
        .flat_map_iter(|(iter_row, z_row)| {
            iter_row
                .iter()
                .zip(z_row.iter())
                .flat_map(move |(&count, &z)| {
                    color_for_escape(
                        scheme,
                        count,
                        z,
                        params.max_iterations,
                        params.smooth_coloring,
                        params.color_intensity,
                    )
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_sizes() {
        let params = FractalParams::default();
        let (iterations, zs) = render_escape_time(&params, FractalType::Mandelbrot, 64, 48, 0.0);
        assert_eq!(iterations.len(), 64 * 48);
        assert_eq!(zs.len(), 64 * 48);
        let rgb = colorize(&params, &iterations, &zs, 64);
        assert_eq!(rgb.len(), 64 * 48 * 3);
    }

    #[test]
    fn test_zero_surface() {
        let params = FractalParams::default();
        let (iterations, zs) = render_escape_time(&params, FractalType::Mandelbrot, 0, 32, 0.0);
        assert!(iterations.is_empty());
        assert!(zs.is_empty());
    }

    #[test]
    fn test_mandelbrot_center_is_interior() {
        // Vue par défaut : le centre de l'image est c = 0, intérieur.
        let params = FractalParams::default();
        let (iterations, _) = render_escape_time(&params, FractalType::Mandelbrot, 65, 65, 0.0);
        let center = iterations[32 * 65 + 32];
        assert_eq!(center, params.max_iterations);
        // Le coin supérieur gauche est loin : échappé presque aussitôt.
        assert!(iterations[0] < 3);
    }

    #[test]
    fn test_interior_pixels_are_black() {
        let params = FractalParams::default();
        let (iterations, zs) = render_escape_time(&params, FractalType::Mandelbrot, 33, 33, 0.0);
        let rgb = colorize(&params, &iterations, &zs, 33);
        let center = 16 * 33 + 16;
        assert_eq!(iterations[center], params.max_iterations);
        assert_eq!(&rgb[center * 3..center * 3 + 3], &[0, 0, 0]);
    }

    #[test]
    fn test_julia_render_uses_constant() {
        let mut params = FractalParams::default();
        params.c_real = 10.0;
        params.c_imag = 0.0;
        // |c| énorme : tout point s'échappe en au plus deux pas.
        let (iterations, _) = render_escape_time(&params, FractalType::Julia, 16, 16, 0.0);
        assert!(iterations.iter().all(|&i| i <= 2));
    }

    #[test]
    fn test_animation_time_changes_julia_frame() {
        let mut params = FractalParams::default();
        params.julia_animation = true;
        let (a, _) = render_escape_time(&params, FractalType::Julia, 32, 32, 0.0);
        let (b, _) = render_escape_time(&params, FractalType::Julia, 32, 32, 2.0);
        assert_ne!(a, b);
    }
}
