mod app;
mod texture;

pub use app::FractaloomApp;
