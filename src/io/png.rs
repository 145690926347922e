use std::path::Path;

use image::{ImageError, RgbImage};

/// Enregistre la surface RGB8 d'un moteur de rendu au format PNG.
///
/// Le buffer doit contenir exactement width * height * 3 octets ; c'est
/// la surface telle que laissée par le dernier appel à `render`.
pub fn save_png(pixels: &[u8], width: u32, height: u32, output: &Path) -> Result<(), ImageError> {
    let img = RgbImage::from_raw(width, height, pixels.to_vec()).ok_or_else(|| {
        ImageError::from(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "taille du buffer incompatible avec les dimensions",
        ))
    })?;

    // Avec image 0.25, save() détecte le format depuis l'extension.
    img.save(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_reload() {
        let mut pixels = vec![0u8; 4 * 3 * 3];
        pixels[0] = 255; // pixel (0,0) rouge
        let path = std::env::temp_dir().join("fractaloom_test_save.png");
        save_png(&pixels, 4, 3, &path).expect("écriture PNG");

        let back = image::open(&path).expect("relecture").to_rgb8();
        assert_eq!(back.width(), 4);
        assert_eq!(back.height(), 3);
        assert_eq!(back.get_pixel(0, 0).0, [255, 0, 0]);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_mismatched_buffer_is_an_error() {
        let pixels = vec![0u8; 10];
        let path = std::env::temp_dir().join("fractaloom_test_invalid.png");
        assert!(save_png(&pixels, 4, 3, &path).is_err());
    }
}
