//! Binarization and morphology on page crops.
//!
//! Binary images use `255` for foreground and `0` for background. Structuring
//! elements are squares of side `2 * radius + 1` (chessboard norm), the
//! counterpart of an all-ones kernel.
use image::{GrayImage, Luma, Rgba, RgbaImage};
use imageproc::contrast::otsu_level;
use imageproc::distance_transform::Norm;
use imageproc::morphology::{self, grayscale_erode, Mask};

/// Otsu threshold with inverted output: pixels at or below the level become
/// foreground, so dark ink on white paper ends up as `255`.
///
/// Returns the binary image and the level used.
pub fn binarize_otsu_inverted(gray: &GrayImage) -> (GrayImage, u8) {
    let level = otsu_level(gray);
    let mut out = GrayImage::new(gray.width(), gray.height());
    for (src, dst) in gray.pixels().zip(out.pixels_mut()) {
        *dst = if src[0] <= level { Luma([255]) } else { Luma([0]) };
    }
    (out, level)
}

pub fn erode_binary(binary: &GrayImage, radius: u8) -> GrayImage {
    if radius == 0 {
        return binary.clone();
    }
    morphology::erode(binary, Norm::LInf, radius)
}

pub fn dilate_binary(binary: &GrayImage, radius: u8) -> GrayImage {
    if radius == 0 {
        return binary.clone();
    }
    morphology::dilate(binary, Norm::LInf, radius)
}

/// Erosion by a `size × size` square anchored at `(size / 2, size / 2)`.
///
/// Odd sizes match [`erode_binary`] with radius `size / 2`; even sizes reach
/// one pixel further up and left than down and right.
pub fn erode_square(binary: &GrayImage, size: u8) -> GrayImage {
    if size <= 1 {
        return binary.clone();
    }
    let side = u32::from(size);
    let footprint = GrayImage::from_pixel(side, side, Luma([255]));
    let mask = Mask::from_image(&footprint, size / 2, size / 2);
    grayscale_erode(binary, &mask)
}

/// Morphological closing (dilate, then erode) bridging gaps narrower than
/// `2 * radius` pixels.
pub fn close_binary(binary: &GrayImage, radius: u8) -> GrayImage {
    let dilated = dilate_binary(binary, radius);
    erode_binary(&dilated, radius)
}

/// Per-channel 3×3 minimum filter; out-of-image neighbours are ignored.
pub fn erode_rgba3x3(src: &RgbaImage) -> RgbaImage {
    let (w, h) = src.dimensions();
    let mut out = RgbaImage::new(w, h);
    if w == 0 || h == 0 {
        return out;
    }

    for y in 0..h {
        let y_lo = y.saturating_sub(1);
        let y_hi = (y + 1).min(h - 1);
        for x in 0..w {
            let x_lo = x.saturating_sub(1);
            let x_hi = (x + 1).min(w - 1);
            let mut min = [u8::MAX; 4];
            for ny in y_lo..=y_hi {
                for nx in x_lo..=x_hi {
                    let px = src.get_pixel(nx, ny);
                    for (m, &c) in min.iter_mut().zip(px.0.iter()) {
                        *m = (*m).min(c);
                    }
                }
            }
            out.put_pixel(x, y, Rgba(min));
        }
    }

    out
}
