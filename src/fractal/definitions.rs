use std::collections::HashMap;

use crate::fractal::{FractalParams, FractalType};

/// Générations de réécriture par défaut d'un L-système.
pub const DEFAULT_LSYSTEM_GENERATIONS: u32 = 4;
/// Angle de branchement par défaut (degrés).
pub const DEFAULT_BRANCHING_ANGLE: f64 = 20.0;
/// Pas de tortue par défaut.
pub const DEFAULT_LSYSTEM_LENGTH: f64 = 10.0;
/// Nombre de points par défaut du jeu du chaos.
pub const DEFAULT_ITERATION_DEPTH: u32 = 50_000;
/// Graine par défaut du générateur pseudo-aléatoire.
pub const DEFAULT_SEED: u64 = 42;
/// Longueur de côté par défaut du flocon de Koch.
pub const DEFAULT_BASE_SEGMENT_LENGTH: f64 = 200.0;
/// Angle de pic par défaut du flocon de Koch (degrés).
pub const DEFAULT_ROTATION_ANGLE: f64 = 60.0;
/// Générations par défaut de l'ensemble de Cantor.
pub const DEFAULT_CANTOR_GENERATIONS: u32 = 6;
/// Fraction centrale retirée par défaut.
pub const DEFAULT_SPACING_RATIO: f64 = 0.33;
/// Épaisseur de barre par défaut (pixels).
pub const DEFAULT_LINE_THICKNESS: f64 = 10.0;
/// Profondeur de récursion par défaut de Vicsek.
pub const DEFAULT_RECURSION_LEVEL: u32 = 5;
/// Rapport de taille par défaut des enfants Vicsek.
pub const DEFAULT_SCALE_FACTOR: f64 = 0.33;

/// Axiome par défaut d'un L-système.
pub fn default_axiom() -> String {
    "F".to_string()
}

/// Règle de réécriture par défaut : la courbe carrée F+F-F-F+F.
pub fn default_rules() -> HashMap<char, String> {
    let mut rules = HashMap::new();
    rules.insert('F', "F+F-F-F+F".to_string());
    rules
}

/// Construit des paramètres avec les valeurs par défaut de la famille.
///
/// Les champs optionnels de la famille choisie sont remplis pour que
/// l'interface graphique dispose de valeurs concrètes à éditer ; les
/// générateurs appliquent de toute façon les mêmes valeurs quand les
/// champs restent absents (documents partiels).
pub fn default_params_for_type(fractal_type: FractalType) -> FractalParams {
    let mut params = FractalParams::default();

    match fractal_type {
        FractalType::Mandelbrot => {
            // z0 = 0, c parcourt le plan : rien à remplir.
        }
        FractalType::Julia => {
            // c fixe (-0.7, 0.27015), déjà dans les valeurs communes.
        }
        FractalType::LSystem => {
            params.axiom = Some(default_axiom());
            params.rules = Some(default_rules());
            params.branching_angle = Some(DEFAULT_BRANCHING_ANGLE);
            params.generations = Some(DEFAULT_LSYSTEM_GENERATIONS);
            params.length = Some(DEFAULT_LSYSTEM_LENGTH);
        }
        FractalType::Barnsley => {
            params.iteration_depth = Some(DEFAULT_ITERATION_DEPTH);
            params.seed = Some(DEFAULT_SEED);
        }
        FractalType::Koch => {
            params.generations = Some(4);
            params.base_segment_length = Some(DEFAULT_BASE_SEGMENT_LENGTH);
            params.rotation_angle = Some(DEFAULT_ROTATION_ANGLE);
        }
        FractalType::Cantor => {
            params.generations = Some(DEFAULT_CANTOR_GENERATIONS);
            params.spacing_ratio = Some(DEFAULT_SPACING_RATIO);
            params.line_thickness = Some(DEFAULT_LINE_THICKNESS);
        }
        FractalType::Vicsek => {
            params.recursion_level = Some(DEFAULT_RECURSION_LEVEL);
            params.scale_factor = Some(DEFAULT_SCALE_FACTOR);
            params.rotation_options = Some(0.0);
        }
    }

    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_seed_family_fields() {
        let p = default_params_for_type(FractalType::LSystem);
        assert_eq!(p.axiom.as_deref(), Some("F"));
        assert_eq!(p.generations, Some(4));
        assert_eq!(p.branching_angle, Some(20.0));
        // Les champs des autres familles restent absents.
        assert!(p.iteration_depth.is_none());
        assert!(p.recursion_level.is_none());

        let v = default_params_for_type(FractalType::Vicsek);
        assert_eq!(v.recursion_level, Some(5));
        assert_eq!(v.scale_factor, Some(0.33));
        assert!(v.axiom.is_none());
    }

    #[test]
    fn test_default_params_common_values_kept() {
        for t in FractalType::all() {
            let p = default_params_for_type(t);
            assert_eq!(p.max_iterations, 100);
            assert_eq!(p.zoom, 1.0);
            assert_eq!(p.color_scheme, "rainbow");
        }
    }

    #[test]
    fn test_default_rules_square_curve() {
        let rules = default_rules();
        assert_eq!(rules.get(&'F').map(String::as_str), Some("F+F-F-F+F"));
    }
}
