pub mod adapter;
pub mod escape_time;
pub mod raster;
pub mod scheduler;
pub mod vector;

use thiserror::Error;

pub use adapter::ActiveRenderer;

#[allow(unused_imports)]
pub use escape_time::render_escape_time;
#[allow(unused_imports)]
pub use scheduler::{AnimationTicker, Clock, SystemClock};
#[allow(unused_imports)]
pub use vector::VectorRenderer;

/// Erreurs de la chaîne de rendu et d'export.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Adaptateur GPU exigé mais indisponible (ou famille sans
    /// chemin GPU).
    #[error("aucune surface de rendu GPU compatible n'est disponible")]
    UnsupportedSurface,

    /// Échec d'encodage ou d'écriture de l'image exportée.
    #[error("échec de l'export d'image: {0}")]
    Image(#[from] image::ImageError),

    /// Échec de lecture ou d'écriture d'un fichier de paramètres.
    #[error("fichier de paramètres invalide: {0}")]
    Preset(#[from] crate::io::preset::PresetError),
}
