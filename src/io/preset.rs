use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fractal::{FractalParams, GeneratorParams};

/// Erreurs de lecture ou d'écriture des fichiers de paramètres.
#[derive(Debug, Error)]
pub enum PresetError {
    #[error("accès au fichier impossible: {0}")]
    Io(#[from] std::io::Error),
    #[error("document JSON invalide: {0}")]
    Json(#[from] serde_json::Error),
}

/// Fichier de préréglage du générateur d'arbres, tel qu'exporté par
/// l'interface : { name, params, timestamp } en camelCase.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorPresetFile {
    pub name: String,
    pub params: GeneratorParams,
    /// Horodatage d'export, en millisecondes depuis l'époque Unix.
    pub timestamp: u64,
}

/// Écrit un préréglage du générateur en JSON indenté.
#[allow(dead_code)]
pub fn save_generator_preset(
    name: &str,
    params: &GeneratorParams,
    timestamp: u64,
    output: &Path,
) -> Result<(), PresetError> {
    let file = GeneratorPresetFile {
        name: name.to_string(),
        params: *params,
        timestamp,
    };
    let json = serde_json::to_string_pretty(&file)?;
    fs::write(output, json)?;
    Ok(())
}

/// Relit un fichier de préréglage du générateur.
#[allow(dead_code)]
pub fn load_generator_preset(path: &Path) -> Result<GeneratorPresetFile, PresetError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Relit des paramètres de générateur, en acceptant soit le document
/// complet { name, params, timestamp } soit les paramètres nus.
pub fn load_generator_params(path: &Path) -> Result<GeneratorParams, PresetError> {
    let text = fs::read_to_string(path)?;
    if let Ok(file) = serde_json::from_str::<GeneratorPresetFile>(&text) {
        return Ok(file.params);
    }
    Ok(serde_json::from_str(&text)?)
}

/// Relit des paramètres de fractale. Les documents partiels sont
/// complétés par les valeurs par défaut champ par champ.
#[allow(dead_code)]
pub fn load_fractal_params(path: &Path) -> Result<FractalParams, PresetError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("fractaloom_{name}_{}", std::process::id()))
    }

    #[test]
    fn test_generator_preset_roundtrip() {
        let path = temp_path("preset.json");
        let params = GeneratorParams {
            branches: 4,
            iterations: 5,
            ..GeneratorParams::default()
        };
        save_generator_preset("Essai", &params, 1_700_000_000_000, &path).expect("écriture");

        let back = load_generator_preset(&path).expect("relecture");
        assert_eq!(back.name, "Essai");
        assert_eq!(back.params, params);
        assert_eq!(back.timestamp, 1_700_000_000_000);

        // Le même fichier se relit aussi comme paramètres seuls.
        let bare = load_generator_params(&path).expect("paramètres");
        assert_eq!(bare, params);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_bare_generator_params_document() {
        let path = temp_path("bare.json");
        fs::write(&path, r#"{"angle1": 45.0, "branches": 2}"#).expect("écriture");
        let params = load_generator_params(&path).expect("relecture");
        assert_eq!(params.angle1, 45.0);
        assert_eq!(params.branches, 2);
        // Champs absents : valeurs par défaut.
        assert_eq!(params.iterations, 6);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_partial_fractal_params_document() {
        let path = temp_path("params.json");
        fs::write(&path, r#"{"maxIterations": 300, "colorScheme": "ocean"}"#).expect("écriture");
        let params = load_fractal_params(&path).expect("relecture");
        assert_eq!(params.max_iterations, 300);
        assert_eq!(params.color_scheme, "ocean");
        assert_eq!(params.zoom, 1.0);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let path = temp_path("broken.json");
        fs::write(&path, "{pas du json").expect("écriture");
        assert!(matches!(
            load_fractal_params(&path),
            Err(PresetError::Json(_))
        ));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_is_reported() {
        let path = temp_path("absent.json");
        assert!(matches!(
            load_generator_preset(&path),
            Err(PresetError::Io(_))
        ));
    }
}
