use crate::fractal::types::Point;

/// Subdivise récursivement un segment en courbe de Koch.
///
/// Chaque niveau remplace le segment par quatre sous-segments : les deux
/// tiers extrêmes sont conservés, le tiers central est remplacé par un
/// pic dont la hauteur vaut (longueur/3) * sin(angle). À 60° le pic est
/// un triangle équilatéral. Retourne la polyligne complète, soit
/// 4^itérations + 1 points.
pub fn koch_curve(start: Point, end: Point, iterations: u32, peak_angle_deg: f64) -> Vec<Point> {
    if iterations == 0 {
        return vec![start, end];
    }

    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length = (dx * dx + dy * dy).sqrt();
    if length == 0.0 {
        // Segment dégénéré : rien à subdiviser.
        return vec![start, end];
    }

    let p2 = Point::new(start.x + dx / 3.0, start.y + dy / 3.0);
    let p4 = Point::new(start.x + 2.0 * dx / 3.0, start.y + 2.0 * dy / 3.0);

    let mid = Point::new((p2.x + p4.x) / 2.0, (p2.y + p4.y) / 2.0);
    let peak_height = (length / 3.0) * peak_angle_deg.to_radians().sin();
    // Normale unitaire au segment, côté pic.
    let perp_x = -dy / length;
    let perp_y = dx / length;
    let p3 = Point::new(mid.x + perp_x * peak_height, mid.y + perp_y * peak_height);

    let mut points = Vec::new();
    for (a, b) in [(start, p2), (p2, p3), (p3, p4), (p4, end)] {
        let sub = koch_curve(a, b, iterations - 1, peak_angle_deg);
        // Le premier point de chaque sous-courbe répète le dernier de la
        // précédente : on ne garde la jointure qu'une fois.
        let skip = usize::from(!points.is_empty());
        points.extend_from_slice(&sub[skip..]);
    }
    points
}

/// Sommets du triangle de départ du flocon, en coordonnées écran.
///
/// Le triangle pointe vers le haut, centré sur le milieu de la surface
/// décalé du panoramique (1 unité de pan = 100 pixels).
pub fn snowflake_triangle(
    surface_width: f64,
    surface_height: f64,
    side: f64,
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
) -> [Point; 3] {
    let center_x = surface_width / 2.0 + pan_x * 100.0;
    let center_y = surface_height / 2.0 + pan_y * 100.0;
    let size = side * zoom;
    let tri_height = size * 3.0_f64.sqrt() / 2.0;

    [
        Point::new(center_x, center_y - tri_height / 2.0),
        Point::new(center_x - size / 2.0, center_y + tri_height / 2.0),
        Point::new(center_x + size / 2.0, center_y + tri_height / 2.0),
    ]
}
