use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Write the RGB24 framebuffer to a timestamped PNG in the working
/// directory. Returns the path written.
pub fn save(framebuffer: &[u8], width: u32, height: u32) -> Result<PathBuf, String> {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| e.to_string())?
        .as_secs();
    let path = PathBuf::from(format!("cathode-{stamp}.png"));

    let file = File::create(&path).map_err(|e| e.to_string())?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header().map_err(|e| e.to_string())?;
    writer
        .write_image_data(framebuffer)
        .map_err(|e| e.to_string())?;

    log::info!("saved {}", path.display());
    Ok(path)
}
