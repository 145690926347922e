pub mod png;
pub mod preset;

use std::time::{SystemTime, UNIX_EPOCH};

/// Nom de fichier d'export horodaté : fractal-{sujet}-{millis}.{ext}.
#[allow(dead_code)]
pub fn export_file_name(subject: &str, extension: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("fractal-{subject}-{millis}.{extension}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_file_name_shape() {
        let name = export_file_name("mandelbrot", "png");
        assert!(name.starts_with("fractal-mandelbrot-"));
        assert!(name.ends_with(".png"));
        let stamp = &name["fractal-mandelbrot-".len()..name.len() - ".png".len()];
        assert!(stamp.chars().all(|c| c.is_ascii_digit()));
    }
}
