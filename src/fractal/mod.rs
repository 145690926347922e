pub mod barnsley;
pub mod branching;
pub mod cantor;
pub mod definitions;
pub mod escape;
pub mod koch;
pub mod lsystem;
pub mod types;
pub mod vicsek;

pub use branching::{bounding_box, generate_tree, GeneratorPreset};
pub use definitions::default_params_for_type;
pub use types::{FractalParams, FractalType, GeneratorParams, Point};

#[allow(unused_imports)]
pub use types::{
    AffineTransform, BranchSegment, CantorBar, ColorMode, RenderQuality, TurtleSegment,
    VicsekSquare,
};
