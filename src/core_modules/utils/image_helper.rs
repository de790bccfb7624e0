pub mod image_helper {
    use crate::core_modules::segmenter::Mask;
    use image::ImageEncoder;
    use std::path::Path;

    /// Writes a mask to disk as an 8-bit grayscale PNG: white for foreground.
    pub fn save_mask(path: impl AsRef<Path>, mask: &Mask) -> Result<(), image::error::ImageError> {
        let output = std::io::BufWriter::new(std::fs::File::create(path)?);
        let encoder = image::codecs::png::PngEncoder::new(output);
        let image = mask.as_image();

        encoder.write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::L8,
        )?;

        Ok(())
    }

    /// File name used when dumping the mask of the `index`th frame.
    pub fn mask_file_name(index: u64) -> String {
        format!("mask_{index:06}.png")
    }
}
