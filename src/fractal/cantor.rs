use crate::fractal::types::CantorBar;

/// Ordonnée de départ de la barre racine (pixels).
const TOP_MARGIN: f64 = 50.0;
/// Espace vertical ajouté entre deux générations, en plus de
/// l'épaisseur de barre.
const ROW_GAP: f64 = 20.0;

/// Construit toutes les barres de l'ensemble de Cantor.
///
/// La barre racine occupe 80 % de la largeur de surface (fois le zoom),
/// centrée puis décalée du panoramique horizontal. Chaque barre engendre
/// deux enfants de largeur w*(1-ratio)/2 séparés par le trou central de
/// largeur w*ratio. Toutes les générations sont conservées et empilées
/// verticalement, chaque rangée étant posée par rapport à son parent.
pub fn cantor_bars(
    surface_width: f64,
    zoom: f64,
    pan_x: f64,
    generations: u32,
    spacing_ratio: f64,
    line_thickness: f64,
) -> Vec<CantorBar> {
    let initial_width = surface_width * 0.8 * zoom;
    let root = CantorBar {
        x: (surface_width - initial_width) / 2.0 + pan_x * 100.0,
        y: TOP_MARGIN,
        width: initial_width,
        generation: 0,
    };

    let mut bars = vec![root];
    let mut frontier = vec![root];

    for generation in 0..generations {
        let mut children = Vec::with_capacity(frontier.len() * 2);
        for parent in &frontier {
            let child_width = parent.width * (1.0 - spacing_ratio) / 2.0;
            let gap = parent.width * spacing_ratio;
            let child_y =
                parent.y + (generation + 1) as f64 * (line_thickness + ROW_GAP);

            children.push(CantorBar {
                x: parent.x,
                y: child_y,
                width: child_width,
                generation: generation + 1,
            });
            children.push(CantorBar {
                x: parent.x + child_width + gap,
                y: child_y,
                width: child_width,
                generation: generation + 1,
            });
        }
        bars.extend_from_slice(&children);
        frontier = children;
    }

    bars
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_count_all_generations_kept() {
        // 1 + 2 + 4 + ... + 2^g barres.
        let bars = cantor_bars(800.0, 1.0, 0.0, 4, 0.33, 10.0);
        assert_eq!(bars.len(), 31);
        for g in 0..=4u32 {
            let count = bars.iter().filter(|b| b.generation == g).count();
            assert_eq!(count, 2usize.pow(g));
        }
    }

    #[test]
    fn test_root_centered_and_scaled() {
        let bars = cantor_bars(800.0, 1.0, 0.0, 0, 0.33, 10.0);
        assert_eq!(bars.len(), 1);
        let root = bars[0];
        assert!((root.width - 640.0).abs() < 1e-9);
        assert!((root.x - 80.0).abs() < 1e-9);
        assert!((root.y - 50.0).abs() < 1e-9);

        // Le zoom dilate la racine, le pan la décale de 100 px par unité.
        let moved = cantor_bars(800.0, 0.5, 2.0, 0, 0.33, 10.0);
        assert!((moved[0].width - 320.0).abs() < 1e-9);
        assert!((moved[0].x - (240.0 + 200.0)).abs() < 1e-9);
    }

    #[test]
    fn test_children_conserve_width() {
        // Deux enfants plus le trou recouvrent exactement le parent.
        let bars = cantor_bars(1000.0, 1.0, 0.0, 3, 0.4, 8.0);
        for parent in bars.iter().filter(|b| b.generation < 3) {
            let children: Vec<_> = bars
                .iter()
                .filter(|b| {
                    b.generation == parent.generation + 1
                        && b.x >= parent.x - 1e-9
                        && b.x + b.width <= parent.x + parent.width + 1e-9
                })
                .collect();
            assert_eq!(children.len(), 2);
            let covered: f64 = children.iter().map(|c| c.width).sum();
            let gap = parent.width * 0.4;
            assert!((covered + gap - parent.width).abs() < 1e-9);
            // L'enfant droit finit au bord droit du parent.
            let right_edge = children
                .iter()
                .map(|c| c.x + c.width)
                .fold(f64::MIN, f64::max);
            assert!((right_edge - (parent.x + parent.width)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rows_stack_downward() {
        let bars = cantor_bars(800.0, 1.0, 0.0, 3, 0.33, 10.0);
        // Chaque génération est strictement plus basse que la précédente.
        let mut previous_y = f64::MIN;
        for g in 0..=3u32 {
            let y = bars
                .iter()
                .find(|b| b.generation == g)
                .map(|b| b.y)
                .expect("génération présente");
            assert!(y > previous_y);
            previous_y = y;
        }
        // Les rangées s'écartent de plus en plus (pose relative au parent).
        let y0 = bars.iter().find(|b| b.generation == 0).map(|b| b.y).expect("g0");
        let y1 = bars.iter().find(|b| b.generation == 1).map(|b| b.y).expect("g1");
        let y2 = bars.iter().find(|b| b.generation == 2).map(|b| b.y).expect("g2");
        assert!((y1 - y0 - 30.0).abs() < 1e-9);
        assert!((y2 - y1 - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_ratio_children_touch() {
        let bars = cantor_bars(800.0, 1.0, 0.0, 1, 0.0, 10.0);
        let g1: Vec<_> = bars.iter().filter(|b| b.generation == 1).collect();
        assert_eq!(g1.len(), 2);
        assert!((g1[0].x + g1[0].width - g1[1].x).abs() < 1e-9);
    }
}
