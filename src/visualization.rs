use std::path::Path;

use image::{GrayImage, Luma};

use crate::mapper::GridSnapshot;
use crate::types::{GridError, NO_INFORMATION};

/// Render a published snapshot as a grayscale image.
///
/// - **Free** (0) becomes near white.
/// - **Occupied** (100) becomes black.
/// - **No information** (-1) becomes mid-gray.
///
/// The grid's \(y=0\) row (lowest in map coordinates) is written to the
/// **bottom** of the image, like typical map images.
pub fn snapshot_to_image(snapshot: &GridSnapshot) -> GrayImage {
    let width = snapshot.info.width;
    let height = snapshot.info.height;
    let mut img = GrayImage::new(width, height);

    for y_img in 0..height {
        let y_grid = height - 1 - y_img;
        let row = (y_grid as usize) * (width as usize);
        for x in 0..width {
            let value = snapshot
                .data
                .get(row + x as usize)
                .copied()
                .unwrap_or(NO_INFORMATION);
            img.put_pixel(x, y_img, Luma([occupancy_to_gray(value)]));
        }
    }

    img
}

/// Write `snapshot` to `path` as a PNG.
pub fn save_snapshot_png(snapshot: &GridSnapshot, path: impl AsRef<Path>) -> Result<(), GridError> {
    if snapshot.data.len() != snapshot.info.len() {
        return Err(GridError::DimensionMismatch(format!(
            "snapshot has {} values for a {}x{} map",
            snapshot.data.len(),
            snapshot.info.width,
            snapshot.info.height
        )));
    }
    snapshot_to_image(snapshot).save(path)?;
    Ok(())
}

pub fn occupancy_to_gray(value: i8) -> u8 {
    if value == NO_INFORMATION {
        return 205;
    }

    let v = (value as i16).clamp(0, 100);
    // 0 (free) -> 254, 100 (occupied) -> 0
    (254 - (v * 254) / 100) as u8
}
