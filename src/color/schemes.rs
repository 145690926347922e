use num_complex::Complex64;

/// Palettes nommées : 8 couleurs ancres par palette, canaux dans [0, 1].
///
/// Le dégradé final est obtenu par interpolation cyclique sur les 8 ancres
/// (bandes de 0.125, la dernière bande reboucle sur la première ancre).
#[derive(Clone, Copy, Debug)]
pub struct ColorScheme {
    pub name: &'static str,
    pub anchors: [[f64; 3]; 8],
}

/// Table des palettes disponibles. Un nom inconnu retombe sur "rainbow".
pub const SCHEMES: [ColorScheme; 8] = [
    ColorScheme {
        name: "rainbow",
        anchors: [
            [1.0, 0.0, 0.0],
            [1.0, 0.5, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 1.0, 1.0],
            [0.0, 0.0, 1.0],
            [0.5, 0.0, 1.0],
            [1.0, 0.0, 1.0],
        ],
    },
    ColorScheme {
        name: "fire",
        anchors: [
            [0.0, 0.0, 0.0],
            [0.5, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 0.5, 0.0],
            [1.0, 1.0, 0.0],
            [1.0, 1.0, 0.5],
            [1.0, 1.0, 1.0],
            [0.8, 0.8, 1.0],
        ],
    },
    ColorScheme {
        name: "ocean",
        anchors: [
            [0.0, 0.0, 0.2],
            [0.0, 0.0, 0.5],
            [0.0, 0.3, 0.7],
            [0.0, 0.6, 1.0],
            [0.2, 0.8, 1.0],
            [0.5, 1.0, 1.0],
            [0.8, 1.0, 1.0],
            [1.0, 1.0, 1.0],
        ],
    },
    ColorScheme {
        name: "purple",
        anchors: [
            [0.0, 0.0, 0.0],
            [0.2, 0.0, 0.3],
            [0.5, 0.0, 0.5],
            [0.7, 0.0, 0.8],
            [1.0, 0.0, 1.0],
            [1.0, 0.5, 1.0],
            [1.0, 0.8, 1.0],
            [1.0, 1.0, 1.0],
        ],
    },
    ColorScheme {
        name: "dragon",
        anchors: [
            [0.0, 0.0, 0.0],
            [0.2, 0.0, 0.0],
            [0.5, 0.1, 0.0],
            [0.8, 0.2, 0.0],
            [1.0, 0.5, 0.0],
            [1.0, 0.8, 0.2],
            [1.0, 1.0, 0.5],
            [1.0, 1.0, 1.0],
        ],
    },
    ColorScheme {
        name: "spiral",
        anchors: [
            [0.0, 0.0, 0.3],
            [0.1, 0.0, 0.5],
            [0.3, 0.0, 0.7],
            [0.5, 0.2, 0.8],
            [0.7, 0.5, 1.0],
            [1.0, 0.8, 1.0],
            [1.0, 1.0, 0.8],
            [1.0, 1.0, 1.0],
        ],
    },
    ColorScheme {
        name: "tree",
        anchors: [
            [0.1, 0.05, 0.0],
            [0.2, 0.1, 0.0],
            [0.3, 0.2, 0.1],
            [0.1, 0.3, 0.1],
            [0.2, 0.5, 0.2],
            [0.4, 0.7, 0.3],
            [0.6, 0.8, 0.4],
            [0.8, 1.0, 0.6],
        ],
    },
    ColorScheme {
        name: "ice",
        anchors: [
            [0.0, 0.0, 0.2],
            [0.1, 0.1, 0.4],
            [0.2, 0.3, 0.6],
            [0.4, 0.5, 0.8],
            [0.6, 0.7, 1.0],
            [0.8, 0.9, 1.0],
            [0.9, 1.0, 1.0],
            [1.0, 1.0, 1.0],
        ],
    },
];

/// Recherche une palette par nom, insensible à la casse.
/// Retombe sur "rainbow" si le nom est inconnu.
pub fn scheme_by_name(name: &str) -> &'static ColorScheme {
    let wanted = name.trim().to_lowercase();
    SCHEMES
        .iter()
        .find(|s| s.name == wanted)
        .unwrap_or(&SCHEMES[0])
}

/// Ancre convertie en RGB 8 bits (troncature, comme floor(c * 255)).
pub fn anchor_rgb(scheme: &ColorScheme, index: usize) -> [u8; 3] {
    let a = scheme.anchors[index % scheme.anchors.len()];
    [
        (a[0] * 255.0) as u8,
        (a[1] * 255.0) as u8,
        (a[2] * 255.0) as u8,
    ]
}

/// Échantillonne le dégradé cyclique à 8 bandes.
///
/// `t` est d'abord multiplié par `intensity` puis ramené dans [0, 1) ;
/// la bande k interpole entre les ancres k et k+1 (modulo 8).
pub fn sample(scheme: &ColorScheme, t: f64, intensity: f64) -> [u8; 3] {
    let t = (t * intensity).rem_euclid(1.0);
    let scaled = t * 8.0;
    let band = (scaled as usize).min(7);
    let frac = scaled - band as f64;
    let a = scheme.anchors[band];
    let b = scheme.anchors[(band + 1) % 8];
    let mix = |i: usize| -> u8 {
        let v = a[i] + (b[i] - a[i]) * frac;
        (v.clamp(0.0, 1.0) * 255.0) as u8
    };
    [mix(0), mix(1), mix(2)]
}

/// Couleur d'un pixel escape-time à partir du compte d'itérations et du z final.
///
/// Les pixels qui n'ont jamais échappé sont noirs. Pour les autres,
/// t = i / max, remplacé par l'estimation lissée
/// (i + 1 - ln(ln|z|)/ln(2)) / max quand `smooth` est actif. L'estimation
/// retombe sur le compte entier si elle n'est pas finie (|z| <= 1).
pub fn color_for_escape(
    scheme: &ColorScheme,
    iterations: u32,
    z: Complex64,
    max_iterations: u32,
    smooth: bool,
    intensity: f64,
) -> [u8; 3] {
    if max_iterations == 0 || iterations >= max_iterations {
        return [0, 0, 0];
    }
    let max = max_iterations as f64;
    let mut t = iterations as f64 / max;
    if smooth {
        let nu = z.norm().ln().ln() / std::f64::consts::LN_2;
        let smoothed = (iterations as f64 + 1.0 - nu) / max;
        if smoothed.is_finite() {
            t = smoothed;
        }
    }
    sample(scheme, t, intensity)
}

/// Analyse une couleur hexadécimale "#rrggbb" (ou "rrggbb").
pub fn parse_hex(value: &str) -> Option<[u8; 3]> {
    let digits = value.trim().strip_prefix('#').unwrap_or(value.trim());
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// Comme `parse_hex`, avec repli sur une couleur par défaut.
pub fn parse_hex_or(value: &str, fallback: [u8; 3]) -> [u8; 3] {
    parse_hex(value).unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_lookup_fallback() {
        assert_eq!(scheme_by_name("ocean").name, "ocean");
        assert_eq!(scheme_by_name("OCEAN").name, "ocean");
        // Nom inconnu -> rainbow
        assert_eq!(scheme_by_name("plasma").name, "rainbow");
        assert_eq!(scheme_by_name("").name, "rainbow");
    }

    #[test]
    fn test_sample_band_boundaries() {
        let rainbow = scheme_by_name("rainbow");
        // t = 0 tombe exactement sur la première ancre (rouge)
        assert_eq!(sample(rainbow, 0.0, 1.0), [255, 0, 0]);
        // t = 0.125 tombe sur la deuxième ancre (orange)
        assert_eq!(sample(rainbow, 0.125, 1.0), [255, 127, 0]);
        // Milieu de la première bande : moitié rouge/orange
        let mid = sample(rainbow, 0.0625, 1.0);
        assert_eq!(mid[0], 255);
        assert!(mid[1] > 55 && mid[1] < 75);
    }

    #[test]
    fn test_sample_last_band_wraps() {
        let rainbow = scheme_by_name("rainbow");
        // Fin de la dernière bande : magenta -> rouge
        let near_end = sample(rainbow, 0.999, 1.0);
        assert_eq!(near_end[0], 255);
        assert!(near_end[2] < 8);
    }

    #[test]
    fn test_sample_intensity_cycles() {
        let rainbow = scheme_by_name("rainbow");
        // intensity 2 : t = 0.5 revient au début du cycle
        assert_eq!(sample(rainbow, 0.5, 2.0), sample(rainbow, 0.0, 1.0));
        // t négatif (lissage) reste dans [0, 1)
        let c = sample(rainbow, -0.1, 1.0);
        assert_eq!(c, sample(rainbow, 0.9, 1.0));
    }

    #[test]
    fn test_color_for_escape_interior_black() {
        let rainbow = scheme_by_name("rainbow");
        let z = Complex64::new(0.0, 0.0);
        assert_eq!(color_for_escape(rainbow, 100, z, 100, false, 1.0), [0, 0, 0]);
        assert_eq!(color_for_escape(rainbow, 250, z, 100, true, 1.0), [0, 0, 0]);
    }

    #[test]
    fn test_color_for_escape_smooth_guard() {
        let rainbow = scheme_by_name("rainbow");
        // |z| <= 1 rend ln(ln|z|) non fini : repli sur le compte entier
        let z = Complex64::new(0.5, 0.0);
        let plain = color_for_escape(rainbow, 10, z, 100, false, 1.0);
        let smooth = color_for_escape(rainbow, 10, z, 100, true, 1.0);
        assert_eq!(plain, smooth);
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#ff0000"), Some([255, 0, 0]));
        assert_eq!(parse_hex("1a2238"), Some([26, 34, 56]));
        assert_eq!(parse_hex("#fff"), None);
        assert_eq!(parse_hex("zzzzzz"), None);
        assert_eq!(parse_hex_or("invalide", [1, 2, 3]), [1, 2, 3]);
    }
}
