mod color;
mod fractal;
mod gpu;
mod gui;
mod io;
mod render;

use gui::FractaloomApp;

fn main() {
    env_logger::init();

    // Hook de panique : message lisible plutôt qu'un backtrace brut
    // quand l'initialisation graphique échoue (session sans affichage).
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let msg = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panique inconnue".to_string());

        eprintln!("Erreur fatale lors de l'initialisation de l'interface:");
        eprintln!("   {msg}");
        if let Some(location) = panic_info.location() {
            eprintln!(
                "   Fichier: {}:{}:{}",
                location.file(),
                location.line(),
                location.column()
            );
        }
        if msg.contains("egl") || msg.contains("EGL") || msg.contains("wgpu") {
            eprintln!("Vérifiez qu'un affichage est disponible (echo $DISPLAY),");
            eprintln!("ou lancez via: xvfb-run -a fractaloom-gui");
        }
        default_hook(panic_info);
    }));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Fractaloom - Explorateur de fractales")
            .with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "Fractaloom",
        options,
        Box::new(|cc| Ok(Box::new(FractaloomApp::new(cc)))),
    ) {
        eprintln!("Erreur lors du lancement de l'application: {e}");
        std::process::exit(1);
    }
}
