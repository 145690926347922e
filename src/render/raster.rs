/// Surface de tracé RGB8.
///
/// Les familles géométriques dessinent ici leurs primitives ; le buffer
/// part directement vers l'export PNG ou la texture de l'interface.
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Raster {
    pub fn new(width: u32, height: u32) -> Raster {
        // Taille calculée en usize : le produit déborde u32 dès les
        // très grandes surfaces que la ligne de commande accepte.
        Raster {
            width,
            height,
            pixels: vec![0u8; width as usize * height as usize * 3],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Remplit toute la surface d'une couleur unie.
    pub fn fill(&mut self, color: [u8; 3]) {
        for pixel in self.pixels.chunks_exact_mut(3) {
            pixel.copy_from_slice(&color);
        }
    }

    /// Pose un pixel opaque. Hors limites : ignoré.
    #[inline]
    pub fn set_pixel(&mut self, x: i64, y: i64, color: [u8; 3]) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        self.pixels[idx..idx + 3].copy_from_slice(&color);
    }

    /// Mélange un pixel avec la couleur existante (alpha dans [0, 1]).
    #[inline]
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: [u8; 3], alpha: f64) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        for channel in 0..3 {
            let src = color[channel] as f64;
            let dst = self.pixels[idx + channel] as f64;
            self.pixels[idx + channel] = (src * alpha + dst * (1.0 - alpha)).round() as u8;
        }
    }

    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        [self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]]
    }

    /// Trace une ligne de 1 pixel par l'algorithme de Bresenham.
    pub fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: [u8; 3]) {
        let mut x0 = x1.round() as i64;
        let mut y0 = y1.round() as i64;
        let x1 = x2.round() as i64;
        let y1 = y2.round() as i64;

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.set_pixel(x0, y0, color);

            if x0 == x1 && y0 == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Trace une ligne épaisse à bouts ronds : chaque position de
    /// Bresenham est tamponnée d'un disque de rayon épaisseur/2.
    pub fn draw_line_thick(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        thickness: f64,
        color: [u8; 3],
    ) {
        if thickness <= 1.5 {
            self.draw_line(x1, y1, x2, y2, color);
            return;
        }

        let radius = thickness / 2.0;
        let r = radius.ceil() as i64;
        let r2 = radius * radius;

        let mut x0 = x1.round() as i64;
        let mut y0 = y1.round() as i64;
        let x1 = x2.round() as i64;
        let y1 = y2.round() as i64;

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            for oy in -r..=r {
                for ox in -r..=r {
                    if (ox * ox + oy * oy) as f64 <= r2 {
                        self.set_pixel(x0 + ox, y0 + oy, color);
                    }
                }
            }

            if x0 == x1 && y0 == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Remplit un rectangle donné en coordonnées flottantes,
    /// borné à la surface.
    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: [u8; 3]) {
        let x0 = x.round().max(0.0) as i64;
        let y0 = y.round().max(0.0) as i64;
        let x1 = ((x + w).round() as i64).min(self.width as i64);
        let y1 = ((y + h).round() as i64).min(self.height as i64);
        for py in y0..y1 {
            for px in x0..x1 {
                self.set_pixel(px, py, color);
            }
        }
    }

    /// Contour d'un carré, mélangé avec le fond.
    pub fn stroke_rect(&mut self, x: f64, y: f64, size: f64, color: [u8; 3], alpha: f64) {
        let x0 = x.round() as i64;
        let y0 = y.round() as i64;
        let x1 = (x + size).round() as i64;
        let y1 = (y + size).round() as i64;
        for px in x0..=x1 {
            self.blend_pixel(px, y0, color, alpha);
            self.blend_pixel(px, y1, color, alpha);
        }
        for py in (y0 + 1)..y1 {
            self.blend_pixel(x0, py, color, alpha);
            self.blend_pixel(x1, py, color, alpha);
        }
    }

    /// Superpose la grille de repérage : lignes blanches à 10 %
    /// d'opacité, tous les 50 pixels.
    pub fn draw_grid(&mut self) {
        const SPACING: u32 = 50;
        const GRID_ALPHA: f64 = 0.1;
        let white = [255, 255, 255];
        for x in (0..self.width).step_by(SPACING as usize) {
            for y in 0..self.height {
                self.blend_pixel(x as i64, y as i64, white, GRID_ALPHA);
            }
        }
        for y in (0..self.height).step_by(SPACING as usize) {
            for x in 0..self.width {
                self.blend_pixel(x as i64, y as i64, white, GRID_ALPHA);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_black() {
        let raster = Raster::new(4, 3);
        assert_eq!(raster.pixels().len(), 36);
        assert!(raster.pixels().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_large_surface_allocation() {
        // 37838² * 3 dépasse u32::MAX : la taille doit se calculer
        // en usize sans déborder ni sous-allouer.
        let side = 37_838u32;
        let mut raster = Raster::new(side, side);
        assert_eq!(
            raster.pixels().len(),
            side as usize * side as usize * 3
        );
        // L'index du dernier pixel passe lui aussi par usize.
        raster.set_pixel(side as i64 - 1, side as i64 - 1, [1, 2, 3]);
        assert_eq!(raster.pixel(side - 1, side - 1), [1, 2, 3]);
    }

    #[test]
    fn test_fill_and_set_pixel() {
        let mut raster = Raster::new(4, 4);
        raster.fill([10, 20, 30]);
        assert_eq!(raster.pixel(3, 3), [10, 20, 30]);
        raster.set_pixel(1, 2, [255, 0, 0]);
        assert_eq!(raster.pixel(1, 2), [255, 0, 0]);
        // Hors limites : silencieux.
        raster.set_pixel(-1, 0, [1, 1, 1]);
        raster.set_pixel(4, 0, [1, 1, 1]);
        assert_eq!(raster.pixel(0, 0), [10, 20, 30]);
    }

    #[test]
    fn test_blend_pixel_mixes() {
        let mut raster = Raster::new(2, 2);
        raster.fill([0, 0, 0]);
        raster.blend_pixel(0, 0, [255, 255, 255], 0.5);
        let px = raster.pixel(0, 0);
        assert!(px[0] >= 127 && px[0] <= 128);
        // Alpha 1 : remplacement complet.
        raster.blend_pixel(1, 1, [200, 100, 50], 1.0);
        assert_eq!(raster.pixel(1, 1), [200, 100, 50]);
    }

    #[test]
    fn test_draw_line_endpoints_and_span() {
        let mut raster = Raster::new(10, 10);
        raster.draw_line(0.0, 5.0, 9.0, 5.0, [255, 255, 255]);
        for x in 0..10 {
            assert_eq!(raster.pixel(x, 5), [255, 255, 255]);
        }
        assert_eq!(raster.pixel(0, 4), [0, 0, 0]);
    }

    #[test]
    fn test_draw_line_diagonal() {
        let mut raster = Raster::new(8, 8);
        raster.draw_line(0.0, 0.0, 7.0, 7.0, [0, 255, 0]);
        for i in 0..8 {
            assert_eq!(raster.pixel(i, i), [0, 255, 0]);
        }
    }

    #[test]
    fn test_draw_line_clipped_outside() {
        let mut raster = Raster::new(4, 4);
        // Entièrement hors cadre : aucune écriture, aucune panique.
        raster.draw_line(-10.0, -10.0, -2.0, -2.0, [255, 0, 0]);
        assert!(raster.pixels().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_thick_line_covers_width() {
        let mut raster = Raster::new(20, 20);
        raster.draw_line_thick(2.0, 10.0, 17.0, 10.0, 6.0, [255, 255, 255]);
        // Le disque de rayon 3 couvre les lignes 8 à 12 au centre.
        for y in 8..=12 {
            assert_eq!(raster.pixel(10, y), [255, 255, 255]);
        }
        assert_eq!(raster.pixel(10, 2), [0, 0, 0]);
    }

    #[test]
    fn test_fill_rect_clamped() {
        let mut raster = Raster::new(6, 6);
        raster.fill_rect(4.0, 4.0, 10.0, 10.0, [9, 9, 9]);
        assert_eq!(raster.pixel(5, 5), [9, 9, 9]);
        assert_eq!(raster.pixel(3, 3), [0, 0, 0]);
    }

    #[test]
    fn test_grid_lines_at_spacing() {
        let mut raster = Raster::new(120, 120);
        raster.draw_grid();
        // Lignes à x = 0, 50, 100 ; rien à x = 25.
        assert!(raster.pixel(50, 7)[0] > 0);
        assert!(raster.pixel(100, 7)[0] > 0);
        assert_eq!(raster.pixel(25, 7), [0, 0, 0]);
        assert!(raster.pixel(7, 50)[0] > 0);
    }
}
