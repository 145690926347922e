use crate::fractal::types::{Point, VicsekSquare};

/// Construit tous les carrés de la fractale de Vicsek.
///
/// Le carré racine couvre 60 % du plus petit côté de la surface (fois le
/// zoom), centré puis décalé du panoramique (1 unité = 100 pixels).
/// Chaque carré engendre cinq enfants en croix : centre, gauche, droite,
/// haut, bas, aux positions multiples de taille/3, avec la taille réduite
/// du facteur d'échelle. Une rotation non nulle fait tourner la position
/// de chaque enfant autour du centre du parent ; les carrés eux-mêmes
/// restent alignés sur les axes. Toutes les générations sont conservées.
pub fn vicsek_squares(
    surface_width: f64,
    surface_height: f64,
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
    recursion_level: u32,
    scale_factor: f64,
    rotation_deg: f64,
) -> Vec<VicsekSquare> {
    let initial_size = surface_width.min(surface_height) * 0.6 * zoom;
    let center_x = surface_width / 2.0 + pan_x * 100.0;
    let center_y = surface_height / 2.0 + pan_y * 100.0;
    let root = VicsekSquare {
        x: center_x - initial_size / 2.0,
        y: center_y - initial_size / 2.0,
        size: initial_size,
        generation: 0,
    };

    let rotation = rotation_deg.to_radians();
    let mut squares = vec![root];
    let mut frontier = vec![root];

    for generation in 0..recursion_level {
        let mut children = Vec::with_capacity(frontier.len() * 5);
        for parent in &frontier {
            let child_size = parent.size * scale_factor;
            let offset = parent.size / 3.0;
            let positions = [
                Point::new(parent.x + offset, parent.y + offset),
                Point::new(parent.x, parent.y + offset),
                Point::new(parent.x + 2.0 * offset, parent.y + offset),
                Point::new(parent.x + offset, parent.y),
                Point::new(parent.x + offset, parent.y + 2.0 * offset),
            ];
            let parent_center =
                Point::new(parent.x + parent.size / 2.0, parent.y + parent.size / 2.0);

            for position in positions {
                let origin = if rotation_deg != 0.0 {
                    position.rotated_around(parent_center, rotation)
                } else {
                    position
                };
                children.push(VicsekSquare {
                    x: origin.x,
                    y: origin.y,
                    size: child_size,
                    generation: generation + 1,
                });
            }
        }
        squares.extend_from_slice(&children);
        frontier = children;
    }

    squares
}
