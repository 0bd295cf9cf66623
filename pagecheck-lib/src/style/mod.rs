pub mod css_values;
pub mod owned_css;
pub mod style_block;
