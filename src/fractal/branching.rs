use serde::{Deserialize, Serialize};

use crate::fractal::types::{BranchSegment, GeneratorParams, Point};

/// Préréglages du générateur d'arbres.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeneratorPreset {
    ClassicTree,
    SpiralGrowth,
    DenseForest,
    Crystalline,
}

impl GeneratorPreset {
    pub fn all() -> [GeneratorPreset; 4] {
        [
            GeneratorPreset::ClassicTree,
            GeneratorPreset::SpiralGrowth,
            GeneratorPreset::DenseForest,
            GeneratorPreset::Crystalline,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            GeneratorPreset::ClassicTree => "Arbre classique",
            GeneratorPreset::SpiralGrowth => "Croissance en spirale",
            GeneratorPreset::DenseForest => "Forêt dense",
            GeneratorPreset::Crystalline => "Cristallin",
        }
    }

    #[allow(dead_code)]
    pub fn cli_name(self) -> &'static str {
        match self {
            GeneratorPreset::ClassicTree => "classic-tree",
            GeneratorPreset::SpiralGrowth => "spiral-growth",
            GeneratorPreset::DenseForest => "dense-forest",
            GeneratorPreset::Crystalline => "crystalline",
        }
    }

    #[allow(dead_code)]
    pub fn from_cli_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "classic-tree" | "classic" | "arbre" => Some(GeneratorPreset::ClassicTree),
            "spiral-growth" | "spiral" | "spirale" => Some(GeneratorPreset::SpiralGrowth),
            "dense-forest" | "forest" | "foret" => Some(GeneratorPreset::DenseForest),
            "crystalline" | "crystal" | "cristal" => Some(GeneratorPreset::Crystalline),
            _ => None,
        }
    }

    /// Paramètres complets du préréglage.
    pub fn params(self) -> GeneratorParams {
        match self {
            GeneratorPreset::ClassicTree => GeneratorParams {
                angle1: 30.0,
                angle2: 0.0,
                iterations: 8,
                branches: 2,
                start_length: 2.9,
                length_multiplier: 0.75,
                start_width: 1.29,
                width_multiplier: 0.8,
            },
            GeneratorPreset::SpiralGrowth => GeneratorParams {
                angle1: 60.0,
                angle2: 15.0,
                iterations: 7,
                branches: 3,
                start_length: 3.0,
                length_multiplier: 0.6,
                start_width: 0.72,
                width_multiplier: 0.6,
            },
            GeneratorPreset::DenseForest => GeneratorParams {
                angle1: 25.0,
                angle2: 5.0,
                iterations: 6,
                branches: 4,
                start_length: 3.0,
                length_multiplier: 0.65,
                start_width: 0.94,
                width_multiplier: 0.7,
            },
            GeneratorPreset::Crystalline => GeneratorParams {
                angle1: 90.0,
                angle2: 0.0,
                iterations: 5,
                branches: 4,
                start_length: 3.7,
                length_multiplier: 0.5,
                start_width: 2.01,
                width_multiplier: 0.6,
            },
        }
    }
}

/// Engendre l'arbre complet en coordonnées du plan.
///
/// La branche initiale part de (0, 0) orientée vers le haut. Les
/// segments sortent en profondeur d'abord : chaque branche est suivie
/// immédiatement de toute sa descendance.
pub fn generate_tree(params: &GeneratorParams) -> Vec<BranchSegment> {
    grow(
        params,
        Point::new(0.0, 0.0),
        -90.0,
        params.start_length,
        params.start_width,
        0,
    )
}

/// Pousse un niveau de branches depuis un nœud et retourne ses segments
/// suivis de toute leur descendance. Les angles circulent en degrés et
/// ne sont convertis qu'au calcul du point d'arrivée.
fn grow(
    params: &GeneratorParams,
    start: Point,
    heading_deg: f64,
    length: f64,
    width: f64,
    generation: u32,
) -> Vec<BranchSegment> {
    if generation >= params.iterations || length < 0.01 {
        return Vec::new();
    }

    let mut segments = Vec::new();
    for branch in 0..params.branches {
        // La torsion s'applique à toutes les branches du nœud ; les
        // branches sœurs s'écartent ensuite en alternant le signe :
        // i=1 -> +a1, i=2 -> -a1, i=3 -> +2*a1, i=4 -> -2*a1, ...
        let twisted = heading_deg + params.angle2;
        let branch_angle = if branch == 0 {
            twisted
        } else {
            let multiplier = ((branch + 1) / 2) as f64;
            let sign = if branch % 2 == 1 { 1.0 } else { -1.0 };
            twisted + sign * multiplier * params.angle1
        };

        let rad = branch_angle.to_radians();
        let end = Point::new(start.x + rad.cos() * length, start.y + rad.sin() * length);
        segments.push(BranchSegment {
            start,
            end,
            width: width.max(0.1),
            generation,
        });

        if generation + 1 < params.iterations {
            segments.extend(grow(
                params,
                end,
                branch_angle,
                length * params.length_multiplier,
                (width * params.width_multiplier).max(0.1),
                generation + 1,
            ));
        }
    }
    segments
}

/// Boîte englobante des extrémités de segments (min, max).
/// Vide si aucun segment n'a été engendré.
pub fn bounding_box(segments: &[BranchSegment]) -> Option<(Point, Point)> {
    let first = segments.first()?;
    let mut min = first.start;
    let mut max = first.start;
    for s in segments {
        for p in [s.start, s.end] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
    }
    Some((min, max))
}
