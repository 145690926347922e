use std::path::PathBuf;

use clap::Parser;

mod color;
mod fractal;
mod gpu;
mod io;
mod render;

use fractal::branching::GeneratorPreset;
use fractal::{default_params_for_type, FractalType, GeneratorParams};
use io::png::save_png;
use render::{ActiveRenderer, VectorRenderer};

/// Utilitaire CLI : rend une image de fractale et l'écrit en PNG.
///
/// Exemples :
///   fractaloom-cli --type mandelbrot --width 1920 --height 1080 --output mandelbrot.png
///   fractaloom-cli --type pattern --preset spiral-growth --output arbre.png
#[derive(Parser, Debug)]
#[command(
    name = "fractaloom-cli",
    about = "Générateur de fractales (Mandelbrot, Julia, L-système, IFS...) en ligne de commande",
    version
)]
struct Cli {
    /// Famille de fractale (mandelbrot, julia, lsystem, barnsley, koch,
    /// cantor, vicsek) ou "pattern" pour le générateur d'arbres
    #[arg(long = "type", default_value = "mandelbrot")]
    fractal_type: String,

    /// Largeur de l'image de sortie en pixels
    #[arg(long, default_value_t = 1920)]
    width: u32,

    /// Hauteur de l'image de sortie en pixels
    #[arg(long, default_value_t = 1080)]
    height: u32,

    /// Fichier JSON de paramètres (document partiel accepté)
    #[arg(long, value_name = "FICHIER")]
    params: Option<PathBuf>,

    /// Préréglage du générateur d'arbres (classic-tree, spiral-growth,
    /// dense-forest, crystalline), pour --type pattern
    #[arg(long)]
    preset: Option<String>,

    /// Nombre maximal d'itérations escape-time
    #[arg(long)]
    iterations: Option<u32>,

    /// Facteur de zoom
    #[arg(long)]
    zoom: Option<f64>,

    /// Décalage horizontal de la vue
    #[arg(long)]
    pan_x: Option<f64>,

    /// Décalage vertical de la vue
    #[arg(long)]
    pan_y: Option<f64>,

    /// Palette de couleurs (rainbow, fire, ocean, purple, dragon,
    /// spiral, tree, ice)
    #[arg(long)]
    scheme: Option<String>,

    /// Temps d'animation de la frame rendue, en secondes
    #[arg(long, default_value_t = 0.0)]
    time: f64,

    /// Graine du générateur pseudo-aléatoire (fougère de Barnsley)
    #[arg(long)]
    seed: Option<u64>,

    /// Exige le calcul GPU (échec si aucun adaptateur compatible)
    #[arg(long)]
    gpu: bool,

    /// Fichier de sortie PNG
    #[arg(long, value_name = "FICHIER")]
    output: PathBuf,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.fractal_type.trim().to_lowercase().as_str() {
        "pattern" | "generator" | "motif" => run_pattern(&cli),
        _ => run_fractal(&cli),
    }
}

/// Rend le générateur d'arbres de ramification.
fn run_pattern(cli: &Cli) {
    let params: GeneratorParams = if let Some(path) = &cli.params {
        match io::preset::load_generator_params(path) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Fichier de paramètres illisible: {e}");
                std::process::exit(1);
            }
        }
    } else if let Some(name) = &cli.preset {
        match GeneratorPreset::from_cli_name(name) {
            Some(preset) => preset.params(),
            None => {
                eprintln!(
                    "Préréglage invalide: '{name}'. Options: classic-tree, spiral-growth, dense-forest, crystalline"
                );
                std::process::exit(1);
            }
        }
    } else {
        GeneratorParams::default()
    };

    log::info!(
        "rendu du générateur: {} segments estimés",
        params.total_segments()
    );

    let mut renderer = VectorRenderer::new(cli.width, cli.height);
    renderer.render_pattern(&params);

    if let Err(e) = save_png(renderer.pixels(), cli.width, cli.height, &cli.output) {
        eprintln!("Erreur lors de l'écriture du PNG: {e}");
        std::process::exit(1);
    }
}

/// Rend l'une des familles de fractales de l'explorateur.
fn run_fractal(cli: &Cli) {
    let fractal_type = match FractalType::from_cli_name(&cli.fractal_type) {
        Some(t) => t,
        None => {
            eprintln!(
                "Type de fractale invalide: '{}'. Options: mandelbrot, julia, lsystem, barnsley, koch, cantor, vicsek, pattern",
                cli.fractal_type
            );
            std::process::exit(1);
        }
    };

    // Paramètres : fichier JSON (partiel accepté) ou valeurs par défaut
    // de la famille, puis surcharges de la ligne de commande.
    let mut params = if let Some(path) = &cli.params {
        match io::preset::load_fractal_params(path) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Fichier de paramètres illisible: {e}");
                std::process::exit(1);
            }
        }
    } else {
        default_params_for_type(fractal_type)
    };

    if let Some(iterations) = cli.iterations {
        if iterations > 0 {
            params.max_iterations = iterations;
        }
    }
    if let Some(zoom) = cli.zoom {
        if zoom > 0.0 {
            params.zoom = zoom;
        }
    }
    if let Some(pan_x) = cli.pan_x {
        params.pan_x = pan_x;
    }
    if let Some(pan_y) = cli.pan_y {
        params.pan_y = pan_y;
    }
    if let Some(scheme) = &cli.scheme {
        params.color_scheme = scheme.clone();
    }
    if let Some(seed) = cli.seed {
        params.seed = Some(seed);
    }

    let mut renderer = if cli.gpu {
        match ActiveRenderer::try_gpu_for(fractal_type, cli.width, cli.height) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Rendu GPU impossible: {e}");
                std::process::exit(1);
            }
        }
    } else {
        ActiveRenderer::for_type(fractal_type, cli.width, cli.height, false)
    };

    renderer.render(fractal_type, &params, cli.time);

    if let Err(e) = save_png(renderer.pixels(), cli.width, cli.height, &cli.output) {
        eprintln!("Erreur lors de l'écriture du PNG: {e}");
        std::process::exit(1);
    }
}
