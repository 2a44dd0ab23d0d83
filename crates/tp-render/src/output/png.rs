use crate::RenderError;

/// Rasterise an SVG document on a white background at the given DPI.
///
/// Text is shaped with the fonts installed on the system.
pub fn svg_to_pixmap(svg: &str, dpi: u32) -> crate::Result<tiny_skia::Pixmap> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt).map_err(|e| RenderError::Png(e.to_string()))?;

    let scale = dpi.max(1) as f32 / 72.0;
    let size = tree.size();
    let w = ((size.width() * scale).round() as u32).max(1);
    let h = ((size.height() * scale).round() as u32).max(1);

    let mut pixmap = tiny_skia::Pixmap::new(w, h)
        .ok_or_else(|| RenderError::Png(format!("failed to create {w}x{h} pixmap")))?;
    pixmap.fill(tiny_skia::Color::WHITE);

    resvg::render(&tree, tiny_skia::Transform::from_scale(scale, scale), &mut pixmap.as_mut());
    Ok(pixmap)
}

/// Convert an SVG string to PNG bytes at the given DPI.
pub fn svg_to_png(svg: &str, dpi: u32) -> crate::Result<Vec<u8>> {
    svg_to_pixmap(svg, dpi)?.encode_png().map_err(|e| RenderError::Png(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="70" height="50" viewBox="0 0 70 50"><rect x="10" y="10" width="20" height="20" fill="#ff0000" /></svg>"##;

    #[test]
    fn png_signature_and_size() {
        let bytes = svg_to_png(SVG, 144).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        let pixmap = svg_to_pixmap(SVG, 144).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (140, 100));
    }

    #[test]
    fn background_is_white() {
        let pixmap = svg_to_pixmap(SVG, 72).unwrap();
        let corner = pixmap.pixel(0, 0).unwrap();
        assert_eq!((corner.red(), corner.green(), corner.blue(), corner.alpha()), (255, 255, 255, 255));
        let inside = pixmap.pixel(20, 20).unwrap();
        assert_eq!((inside.red(), inside.green(), inside.blue()), (255, 0, 0));
    }

    #[test]
    fn invalid_svg_is_an_error() {
        assert!(matches!(svg_to_png("<svg", 72), Err(RenderError::Png(_))));
    }
}
