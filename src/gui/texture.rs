use egui::ColorImage;

/// Convertit la surface RGB8 d'un moteur de rendu en ColorImage egui.
///
/// Le buffer vient de `ActiveRenderer::pixels()` : trois octets par
/// pixel, lignes de haut en bas. ColorImage attend du RGBA.
pub fn rgb_to_color_image(pixels: &[u8], width: u32, height: u32) -> ColorImage {
    let mut rgba = Vec::with_capacity(pixels.len() / 3 * 4);
    for chunk in pixels.chunks_exact(3) {
        rgba.push(chunk[0]);
        rgba.push(chunk[1]);
        rgba.push(chunk[2]);
        rgba.push(255);
    }
    ColorImage::from_rgba_unmultiplied([width as usize, height as usize], &rgba)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_to_rgba_opaque() {
        let pixels = [10u8, 20, 30, 40, 50, 60];
        let img = rgb_to_color_image(&pixels, 2, 1);
        assert_eq!(img.size, [2, 1]);
        assert_eq!(img.pixels[0].r(), 10);
        assert_eq!(img.pixels[0].a(), 255);
        assert_eq!(img.pixels[1].b(), 60);
    }
}
