//! Key and dial image rendering
//!
//! Images are small SVG documents handed to the host as base64 data URIs.
//! The host scales them to the physical key.

pub mod title;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use quick_xml::escape::escape;

pub use title::{clean_title, TitleCache};

/// Canvas size in pixels (matches the @2x key size)
pub const IMAGE_SIZE: u32 = 144;

const BACKGROUND: &str = "#1a1a1a";
const LEVEL_COLOR: &str = "#ffffff";
const LABEL_COLOR: &str = "#9a9a9a";

/// Render `"{level}dB"` centred on a dark square, with an optional label above
pub fn render_svg(label: &str, level: i32) -> String {
    let size = IMAGE_SIZE;
    let label = label.trim();

    let label_text = if label.is_empty() {
        String::new()
    } else {
        format!(
            r##"<text x="50%" y="30%" fill="{}" text-anchor="middle" dominant-baseline="middle" font-family="sans-serif" font-size="20">{}</text>"##,
            LABEL_COLOR,
            escape(label)
        )
    };

    format!(
        concat!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"##,
            r##"<rect width="100%" height="100%" fill="{bg}"/>"##,
            "{label}",
            r##"<text x="50%" y="50%" fill="{fg}" text-anchor="middle" dominant-baseline="middle" "##,
            r##"font-family="sans-serif" font-size="36" font-weight="bold">{level}dB</text>"##,
            r##"</svg>"##
        ),
        size = size,
        bg = BACKGROUND,
        label = label_text,
        fg = LEVEL_COLOR,
        level = level
    )
}

/// Render and wrap as a `data:image/svg+xml;base64,...` URI for the host
pub fn render_data_uri(label: &str, level: i32) -> String {
    let svg = render_svg(label, level);
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg.as_bytes()))
}
