use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;

use crate::RenderError;

/// Convert an SVG string to baseline JPEG bytes.
///
/// The raster is opaque (white background), so dropping alpha keeps colors.
pub fn svg_to_jpeg(svg: &str, dpi: u32, quality: u8) -> crate::Result<Vec<u8>> {
    let pixmap = crate::output::png::svg_to_pixmap(svg, dpi)?;
    let rgb: Vec<u8> = pixmap.data().chunks_exact(4).flat_map(|px| [px[0], px[1], px[2]]).collect();

    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100))
        .encode(&rgb, pixmap.width(), pixmap.height(), ExtendedColorType::Rgb8)
        .map_err(|e| RenderError::Jpeg(e.to_string()))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="32" viewBox="0 0 64 32"><rect width="32" height="32" fill="#0000ff" /></svg>"##;

    #[test]
    fn jpeg_markers() {
        let bytes = svg_to_jpeg(SVG, 72, 90).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        assert_eq!(&bytes[bytes.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn quality_changes_size() {
        let low = svg_to_jpeg(SVG, 144, 10).unwrap();
        let high = svg_to_jpeg(SVG, 144, 100).unwrap();
        assert!(high.len() > low.len());
    }
}
