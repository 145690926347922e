use num_complex::Complex64;

use crate::fractal::types::{FractalParams, FractalType};

/// Convertit un centre de pixel en point du plan complexe.
///
/// Le repère est celui d'une texture : u croît vers la droite, v vers le
/// haut (la ligne 0 de l'image est en haut de la surface). La fenêtre
/// par défaut couvre 4 unités, resserrée par le zoom et décalée du
/// panoramique, puis la coordonnée réelle est dilatée du rapport
/// largeur/hauteur.
#[inline]
pub fn pixel_coord(
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
) -> Complex64 {
    let u = (x as f64 + 0.5) / width as f64;
    let v = 1.0 - (y as f64 + 0.5) / height as f64;
    let mut re = (u - 0.5) * 4.0 / zoom + pan_x;
    let im = (v - 0.5) * 4.0 / zoom + pan_y;
    re *= width as f64 / height as f64;
    Complex64::new(re, im)
}

/// Constante c de Julia, éventuellement animée : l'animation fait
/// orbiter c autour de sa valeur de base au fil du temps.
#[inline]
pub fn julia_constant(params: &FractalParams, time: f64) -> Complex64 {
    let mut c = Complex64::new(params.c_real, params.c_imag);
    if params.julia_animation {
        c.re += (time * 0.5).sin() * 0.1;
        c.im += (time * 0.3).cos() * 0.1;
    }
    c
}

/// Itère z <- z^p + c jusqu'à l'échappement ou au plafond d'itérations.
///
/// Le test |z| > rayon précède chaque pas : le compte retourné est le
/// nombre de pas réellement effectués. Un compte égal au plafond marque
/// un point intérieur (aucun échappement observé). Pour p = 2 le carré
/// complexe est direct, sinon la puissance passe par la forme polaire.
pub fn iterate(
    z0: Complex64,
    c: Complex64,
    power: f64,
    max_iterations: u32,
    escape_radius: f64,
) -> (u32, Complex64) {
    let mut z = z0;
    let mut i = 0u32;
    while i < max_iterations {
        if z.norm() > escape_radius {
            break;
        }
        z = if power == 2.0 {
            z * z + c
        } else {
            complex_pow(z, power) + c
        };
        i += 1;
    }
    (i, z)
}

/// z^p par la forme polaire : r^p * e^(i * p * theta).
#[inline]
fn complex_pow(z: Complex64, power: f64) -> Complex64 {
    let r = z.norm();
    let theta = z.im.atan2(z.re);
    Complex64::from_polar(r.powf(power), theta * power)
}

/// Évalue un pixel Mandelbrot ou Julia.
///
/// Mandelbrot : z part de (z_real, z_imag) et c est le point du plan.
/// Julia : z part du point du plan et c est la constante (animée ou non).
pub fn evaluate(
    fractal_type: FractalType,
    coord: Complex64,
    params: &FractalParams,
    julia_c: Complex64,
) -> (u32, Complex64) {
    let (z0, c) = match fractal_type {
        FractalType::Julia => (coord, julia_c),
        _ => (Complex64::new(params.z_real, params.z_imag), coord),
    };
    iterate(z0, c, params.power, params.max_iterations, params.escape_radius)
}
