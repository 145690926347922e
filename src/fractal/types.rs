use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Familles de fractales prises en charge.
///
/// Les deux premières (Mandelbrot, Julia) sont rendues par itération
/// escape-time sur le plan complexe ; les cinq autres sont des familles
/// géométriques rendues par primitives vectorielles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FractalType {
    Mandelbrot,
    Julia,
    LSystem,
    Barnsley,
    Koch,
    Cantor,
    Vicsek,
}

impl FractalType {
    /// Convertit un identifiant numérique en type de fractale.
    #[allow(dead_code)]
    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            0 => Some(FractalType::Mandelbrot),
            1 => Some(FractalType::Julia),
            2 => Some(FractalType::LSystem),
            3 => Some(FractalType::Barnsley),
            4 => Some(FractalType::Koch),
            5 => Some(FractalType::Cantor),
            6 => Some(FractalType::Vicsek),
            _ => None,
        }
    }

    /// Identifiant numérique stable. Les valeurs 0 et 1 servent aussi
    /// de discriminant Mandelbrot/Julia dans le shader de calcul.
    pub fn id(self) -> u32 {
        match self {
            FractalType::Mandelbrot => 0,
            FractalType::Julia => 1,
            FractalType::LSystem => 2,
            FractalType::Barnsley => 3,
            FractalType::Koch => 4,
            FractalType::Cantor => 5,
            FractalType::Vicsek => 6,
        }
    }

    /// Nom d'affichage pour l'interface graphique.
    pub fn name(self) -> &'static str {
        match self {
            FractalType::Mandelbrot => "Mandelbrot",
            FractalType::Julia => "Julia",
            FractalType::LSystem => "L-Système",
            FractalType::Barnsley => "Fougère de Barnsley",
            FractalType::Koch => "Flocon de Koch",
            FractalType::Cantor => "Ensemble de Cantor",
            FractalType::Vicsek => "Fractale de Vicsek",
        }
    }

    /// Nom court pour la ligne de commande et les noms de fichiers.
    pub fn cli_name(self) -> &'static str {
        match self {
            FractalType::Mandelbrot => "mandelbrot",
            FractalType::Julia => "julia",
            FractalType::LSystem => "lsystem",
            FractalType::Barnsley => "barnsley",
            FractalType::Koch => "koch",
            FractalType::Cantor => "cantor",
            FractalType::Vicsek => "vicsek",
        }
    }

    /// Analyse un nom venu de la ligne de commande (avec quelques alias).
    pub fn from_cli_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "mandelbrot" | "mandel" => Some(FractalType::Mandelbrot),
            "julia" => Some(FractalType::Julia),
            "lsystem" | "l-system" | "lsysteme" => Some(FractalType::LSystem),
            "barnsley" | "fougere" | "fern" => Some(FractalType::Barnsley),
            "koch" | "flocon" => Some(FractalType::Koch),
            "cantor" => Some(FractalType::Cantor),
            "vicsek" => Some(FractalType::Vicsek),
            _ => None,
        }
    }

    /// Toutes les familles, dans l'ordre d'affichage.
    pub fn all() -> [FractalType; 7] {
        [
            FractalType::Mandelbrot,
            FractalType::Julia,
            FractalType::LSystem,
            FractalType::Barnsley,
            FractalType::Koch,
            FractalType::Cantor,
            FractalType::Vicsek,
        ]
    }

    /// Vrai pour les familles rendues par itération escape-time.
    pub fn uses_escape_time(self) -> bool {
        matches!(self, FractalType::Mandelbrot | FractalType::Julia)
    }
}

/// Mode de couleur déclaré dans les paramètres.
///
/// Purement consultatif : les palettes sont échantillonnées en RGB, le
/// champ est conservé pour la compatibilité des fichiers de paramètres.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColorMode {
    #[default]
    Rgb,
    Hsl,
}

impl ColorMode {
    #[allow(dead_code)]
    pub fn name(self) -> &'static str {
        match self {
            ColorMode::Rgb => "RGB",
            ColorMode::Hsl => "HSL",
        }
    }
}

/// Niveau de qualité demandé. Consultatif : conservé dans les fichiers
/// de paramètres, sans effet sur les algorithmes de rendu.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderQuality {
    Low,
    #[default]
    Medium,
    High,
}

impl RenderQuality {
    #[allow(dead_code)]
    pub fn name(self) -> &'static str {
        match self {
            RenderQuality::Low => "Basse",
            RenderQuality::Medium => "Moyenne",
            RenderQuality::High => "Haute",
        }
    }

    #[allow(dead_code)]
    pub fn all() -> [RenderQuality; 3] {
        [RenderQuality::Low, RenderQuality::Medium, RenderQuality::High]
    }
}

/// Paramètres d'une fractale d'exploration.
///
/// Document unique partagé par toutes les familles : les champs communs
/// s'appliquent partout, les champs optionnels ne concernent qu'une
/// famille et reçoivent une valeur locale par défaut quand ils sont
/// absents. Sérialisé en JSON avec des noms camelCase, ce qui permet de
/// recharger tel quel un fichier de paramètres exporté.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FractalParams {
    /// Nombre maximal d'itérations escape-time.
    pub max_iterations: u32,
    /// Rayon d'échappement (teste |z| > rayon avant chaque pas).
    pub escape_radius: f64,
    /// Exposant de l'itération z^p + c (p = 2 utilise la forme directe).
    pub power: f64,
    /// Partie réelle de la constante c (Julia).
    pub c_real: f64,
    /// Partie imaginaire de la constante c (Julia).
    pub c_imag: f64,
    /// Partie réelle du z initial (Mandelbrot, 0 par défaut).
    pub z_real: f64,
    /// Partie imaginaire du z initial (Mandelbrot, 0 par défaut).
    pub z_imag: f64,
    /// Facteur de zoom (1 = cadrage par défaut).
    pub zoom: f64,
    /// Décalage horizontal de la vue.
    pub pan_x: f64,
    /// Décalage vertical de la vue.
    pub pan_y: f64,
    /// Nom de la palette ("rainbow", "fire", ...).
    pub color_scheme: String,
    /// Multiplicateur appliqué au paramètre de dégradé avant repli cyclique.
    pub color_intensity: f64,
    /// Couleur de trait des familles géométriques ("#rrggbb").
    pub primary_color: String,
    /// Couleur de fond ("#rrggbb").
    pub background_color: String,
    /// Mode de couleur déclaré (consultatif).
    pub color_mode: ColorMode,

    // L-Système
    /// Axiome de départ.
    pub axiom: Option<String>,
    /// Règles de réécriture symbole -> remplacement.
    pub rules: Option<HashMap<char, String>>,
    /// Angle de rotation des symboles + et - (degrés).
    pub branching_angle: Option<f64>,
    /// Nombre de générations de réécriture.
    pub generations: Option<u32>,
    /// Longueur d'un pas de tortue.
    pub length: Option<f64>,

    // Fougère de Barnsley
    /// Nombre de points tirés par le jeu du chaos.
    pub iteration_depth: Option<u32>,
    /// Poids de sélection remplaçant les probabilités de la table affine.
    pub transform_probabilities: Option<Vec<f64>>,
    /// Graine du générateur pseudo-aléatoire (rendu reproductible).
    pub seed: Option<u64>,

    // Flocon de Koch
    /// Longueur de base d'un côté du triangle.
    pub base_segment_length: Option<f64>,
    /// Angle du pic inséré à chaque subdivision (degrés).
    pub rotation_angle: Option<f64>,

    // Ensemble de Cantor
    /// Fraction centrale retirée à chaque génération.
    pub spacing_ratio: Option<f64>,
    /// Épaisseur des barres (pixels).
    pub line_thickness: Option<f64>,

    // Fractale de Vicsek
    /// Profondeur de récursion.
    pub recursion_level: Option<u32>,
    /// Rapport de taille des enfants par rapport au parent.
    pub scale_factor: Option<f64>,
    /// Rotation appliquée aux positions des enfants (degrés, 0 = aucune).
    pub rotation_options: Option<f64>,

    // Affichage
    /// Lissage du dégradé escape-time (estimateur fractionnaire).
    pub smooth_coloring: bool,
    /// Fait orbiter la constante c de Julia dans le temps.
    pub julia_animation: bool,
    /// Active la boucle d'animation (le temps avance).
    pub animation_effects: bool,
    /// Superpose une grille de repérage (pas de 50 pixels).
    pub grid_display: bool,
    /// Qualité demandée (consultatif).
    pub render_quality: RenderQuality,
}

impl Default for FractalParams {
    fn default() -> Self {
        FractalParams {
            max_iterations: 100,
            escape_radius: 2.0,
            power: 2.0,
            c_real: -0.7,
            c_imag: 0.27015,
            z_real: 0.0,
            z_imag: 0.0,
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            color_scheme: "rainbow".to_string(),
            color_intensity: 1.0,
            primary_color: "#ffffff".to_string(),
            background_color: "#000000".to_string(),
            color_mode: ColorMode::Rgb,
            axiom: None,
            rules: None,
            branching_angle: None,
            generations: None,
            length: None,
            iteration_depth: None,
            transform_probabilities: None,
            seed: None,
            base_segment_length: None,
            rotation_angle: None,
            spacing_ratio: None,
            line_thickness: None,
            recursion_level: None,
            scale_factor: None,
            rotation_options: None,
            smooth_coloring: true,
            julia_animation: false,
            animation_effects: false,
            grid_display: false,
            render_quality: RenderQuality::Medium,
        }
    }
}

/// Paramètres du générateur d'arbres de ramification.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratorParams {
    /// Angle entre branches sœurs (degrés).
    pub angle1: f64,
    /// Torsion appliquée à chaque génération (degrés).
    pub angle2: f64,
    /// Nombre de générations.
    pub iterations: u32,
    /// Nombre de branches par nœud.
    pub branches: u32,
    /// Longueur de la branche initiale.
    pub start_length: f64,
    /// Facteur de longueur d'une génération à la suivante.
    pub length_multiplier: f64,
    /// Largeur de la branche initiale.
    pub start_width: f64,
    /// Facteur de largeur d'une génération à la suivante.
    pub width_multiplier: f64,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        GeneratorParams {
            angle1: 61.0,
            angle2: 30.0,
            iterations: 6,
            branches: 3,
            start_length: 2.9,
            length_multiplier: 0.58,
            start_width: 0.8,
            width_multiplier: 0.8,
        }
    }
}

impl GeneratorParams {
    /// Nombre de branches terminales : branches^iterations.
    #[allow(dead_code)]
    pub fn leaf_count(&self) -> u64 {
        (self.branches as u64).saturating_pow(self.iterations)
    }

    /// Nombre total de segments dessinés : somme des branches^g
    /// pour g de 1 à iterations.
    pub fn total_segments(&self) -> u64 {
        let b = self.branches as u64;
        let mut total: u64 = 0;
        let mut level: u64 = 1;
        for _ in 0..self.iterations {
            level = level.saturating_mul(b);
            total = total.saturating_add(level);
        }
        total
    }

    /// Indication de complexité affichée sous l'estimation. Le seuil
    /// porte sur l'estimation branches^iterations, pas sur le compte
    /// exact de segments tracés.
    #[allow(dead_code)]
    pub fn complexity_hint(&self) -> &'static str {
        if self.leaf_count() > 10_000 {
            "Complexité élevée (rendu lent possible)"
        } else {
            "Bonnes performances"
        }
    }
}

/// Point du plan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    /// Rotation autour d'un centre, angle en radians.
    pub fn rotated_around(self, center: Point, angle: f64) -> Point {
        let (sin, cos) = angle.sin_cos();
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        Point {
            x: center.x + dx * cos - dy * sin,
            y: center.y + dx * sin + dy * cos,
        }
    }
}

/// Segment produit par l'interprétation tortue d'un L-système.
/// La profondeur de pile au moment du tracé pilote la couleur.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurtleSegment {
    pub start: Point,
    pub end: Point,
    pub depth: u32,
}

/// Segment d'un arbre de ramification, en coordonnées du plan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BranchSegment {
    pub start: Point,
    pub end: Point,
    pub width: f64,
    pub generation: u32,
}

/// Barre horizontale de l'ensemble de Cantor, en coordonnées écran.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CantorBar {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub generation: u32,
}

/// Carré axis-aligné de la fractale de Vicsek, en coordonnées écran.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VicsekSquare {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub generation: u32,
}

/// Transformation affine (x', y') = (a x + b y + e, c x + d y + f)
/// avec sa probabilité de sélection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
    pub probability: f64,
}

impl AffineTransform {
    /// Applique la transformation à un point.
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.b * y + self.e,
            self.c * x + self.d * y + self.f,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fractal_type_ids_roundtrip() {
        for t in FractalType::all() {
            assert_eq!(FractalType::from_id(t.id()), Some(t));
        }
        assert_eq!(FractalType::from_id(99), None);
    }

    #[test]
    fn test_fractal_type_cli_names() {
        for t in FractalType::all() {
            assert_eq!(FractalType::from_cli_name(t.cli_name()), Some(t));
        }
        assert_eq!(
            FractalType::from_cli_name("  L-System "),
            Some(FractalType::LSystem)
        );
        assert_eq!(FractalType::from_cli_name("fern"), Some(FractalType::Barnsley));
        assert_eq!(FractalType::from_cli_name("inconnu"), None);
    }

    #[test]
    fn test_escape_time_split() {
        assert!(FractalType::Mandelbrot.uses_escape_time());
        assert!(FractalType::Julia.uses_escape_time());
        assert!(!FractalType::Koch.uses_escape_time());
        assert!(!FractalType::Barnsley.uses_escape_time());
    }

    #[test]
    fn test_params_defaults() {
        let p = FractalParams::default();
        assert_eq!(p.max_iterations, 100);
        assert_eq!(p.escape_radius, 2.0);
        assert_eq!(p.c_real, -0.7);
        assert_eq!(p.c_imag, 0.27015);
        assert_eq!(p.color_scheme, "rainbow");
        assert!(p.smooth_coloring);
        assert!(!p.animation_effects);
        assert_eq!(p.render_quality, RenderQuality::Medium);
        assert!(p.axiom.is_none());
    }

    #[test]
    fn test_params_partial_json() {
        // Un document partiel reçoit les valeurs par défaut pour le reste.
        let p: FractalParams =
            serde_json::from_str(r#"{"maxIterations": 250, "colorScheme": "fire"}"#)
                .expect("JSON partiel");
        assert_eq!(p.max_iterations, 250);
        assert_eq!(p.color_scheme, "fire");
        assert_eq!(p.escape_radius, 2.0);
        assert_eq!(p.zoom, 1.0);
    }

    #[test]
    fn test_params_camel_case_roundtrip() {
        let mut p = FractalParams::default();
        p.generations = Some(5);
        p.color_mode = ColorMode::Hsl;
        let json = serde_json::to_string(&p).expect("sérialisation");
        assert!(json.contains("\"maxIterations\""));
        assert!(json.contains("\"colorMode\":\"HSL\""));
        let back: FractalParams = serde_json::from_str(&json).expect("relecture");
        assert_eq!(back.generations, Some(5));
        assert_eq!(back.color_mode, ColorMode::Hsl);
    }

    #[test]
    fn test_params_lsystem_rules_json() {
        let p: FractalParams = serde_json::from_str(
            r#"{"axiom": "X", "rules": {"X": "F[+X]F[-X]+X", "F": "FF"}}"#,
        )
        .expect("règles");
        let rules = p.rules.expect("présentes");
        assert_eq!(rules.get(&'F').map(String::as_str), Some("FF"));
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn test_generator_defaults_and_counts() {
        let g = GeneratorParams::default();
        assert_eq!(g.angle1, 61.0);
        assert_eq!(g.branches, 3);
        assert_eq!(g.iterations, 6);
        // 3 + 9 + 27 + 81 + 243 + 729
        assert_eq!(g.total_segments(), 1092);
        assert_eq!(g.leaf_count(), 729);
        assert_eq!(g.complexity_hint(), "Bonnes performances");

        let heavy = GeneratorParams {
            branches: 10,
            iterations: 5,
            ..GeneratorParams::default()
        };
        assert!(heavy.leaf_count() > 10_000);
        assert_eq!(
            heavy.complexity_hint(),
            "Complexité élevée (rendu lent possible)"
        );
    }

    #[test]
    fn test_complexity_threshold_on_estimate() {
        // Le seuil s'applique à branches^iterations : 2^13 = 8192 reste
        // sous 10000 même si le compte exact de segments le dépasse.
        let g = GeneratorParams {
            branches: 2,
            iterations: 13,
            ..GeneratorParams::default()
        };
        assert_eq!(g.leaf_count(), 8192);
        assert!(g.total_segments() > 10_000);
        assert_eq!(g.complexity_hint(), "Bonnes performances");
    }

    #[test]
    fn test_point_rotation() {
        let p = Point::new(1.0, 0.0);
        let c = Point::new(0.0, 0.0);
        let r = p.rotated_around(c, std::f64::consts::FRAC_PI_2);
        assert!(r.x.abs() < 1e-12);
        assert!((r.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_affine_apply() {
        let t = AffineTransform {
            a: 0.85,
            b: 0.04,
            c: -0.04,
            d: 0.85,
            e: 0.0,
            f: 1.6,
            probability: 0.85,
        };
        let (x, y) = t.apply(1.0, 1.0);
        assert!((x - 0.89).abs() < 1e-12);
        assert!((y - 2.41).abs() < 1e-12);
    }
}
