pub mod schemes;

#[allow(unused_imports)]
pub use schemes::{
    anchor_rgb, color_for_escape, parse_hex, parse_hex_or, sample, scheme_by_name, ColorScheme,
    SCHEMES,
};
