use crate::fractal::types::AffineTransform;

/// Générateur de nombres pseudo-aléatoires simple (LCG).
struct Rng {
    seed: u32,
}

impl Rng {
    fn new(seed: u32) -> Self {
        Self { seed }
    }

    fn next(&mut self) -> u32 {
        self.seed = self.seed.wrapping_mul(1103515245).wrapping_add(12345);
        self.seed
    }

    fn next_f64(&mut self) -> f64 {
        (self.next() & 0x7FFFFFFF) as f64 / 2147483647.0
    }
}

/// Table affine classique de la fougère de Barnsley.
///
/// Dans l'ordre : tige, copie principale, foliole gauche, foliole
/// droite. L'attracteur tient dans x en [-2.1820, 2.6558] et
/// y en [0, 9.9983].
pub const FERN_TRANSFORMS: [AffineTransform; 4] = [
    AffineTransform {
        a: 0.0,
        b: 0.0,
        c: 0.0,
        d: 0.16,
        e: 0.0,
        f: 0.0,
        probability: 0.01,
    },
    AffineTransform {
        a: 0.85,
        b: 0.04,
        c: -0.04,
        d: 0.85,
        e: 0.0,
        f: 1.6,
        probability: 0.85,
    },
    AffineTransform {
        a: 0.2,
        b: -0.26,
        c: 0.23,
        d: 0.22,
        e: 0.0,
        f: 1.6,
        probability: 0.07,
    },
    AffineTransform {
        a: -0.15,
        b: 0.28,
        c: 0.26,
        d: 0.24,
        e: 0.0,
        f: 0.44,
        probability: 0.07,
    },
];

/// Nombre de pas de stabilisation avant d'émettre des points.
const SETTLE_STEPS: u32 = 10;

/// Point du jeu du chaos, en coordonnées de l'attracteur.
/// `step` est l'indice du pas, utilisé pour la couleur animée.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FernPoint {
    pub step: u32,
    pub x: f64,
    pub y: f64,
}

/// Tire la fougère par le jeu du chaos.
///
/// À chaque pas, une transformation est choisie par tirage cumulatif sur
/// les probabilités de la table, remplacées une à une par `weights`
/// quand il est fourni. Si aucun seuil cumulatif n'est atteint (poids
/// dégénérés), la dernière transformation de la table sert de repli.
/// Les dix premiers pas stabilisent l'orbite et ne sont pas émis.
pub fn sample(iteration_depth: u32, weights: Option<&[f64]>, seed: u64) -> Vec<FernPoint> {
    // Le LCG est 32 bits : les deux moitiés de la graine sont repliées
    // pour que des graines ne différant que par le haut divergent.
    let mut rng = Rng::new((seed ^ (seed >> 32)) as u32);
    let mut points = Vec::with_capacity(iteration_depth.saturating_sub(SETTLE_STEPS) as usize);
    let mut x = 0.0_f64;
    let mut y = 0.0_f64;

    for step in 0..iteration_depth {
        let draw = rng.next_f64();
        let mut cumulative = 0.0;
        let mut selected = None;
        for (k, transform) in FERN_TRANSFORMS.iter().enumerate() {
            let probability = weights
                .and_then(|w| w.get(k))
                .copied()
                .unwrap_or(transform.probability);
            cumulative += probability;
            if draw <= cumulative {
                selected = Some(transform);
                break;
            }
        }
        let transform = selected.unwrap_or(&FERN_TRANSFORMS[FERN_TRANSFORMS.len() - 1]);

        let (nx, ny) = transform.apply(x, y);
        x = nx;
        y = ny;

        if step > SETTLE_STEPS {
            points.push(FernPoint { step, x, y });
        }
    }

    points
}
