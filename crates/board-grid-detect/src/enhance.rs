//! Tile-grid contrast enhancement (CLAHE) with a fixed set of passes.
//!
//! Each pass runs a clip-limited adaptive histogram equalization a
//! fixed number of times, then closes small gaps with a 10x10 grayscale
//! morphological close. The no-op pass leaves the image untouched so
//! the detector also sees the unenhanced photograph.

use image::GrayImage;
use serde::{Deserialize, Serialize};

/// Window side of the morphological close applied after equalization.
const CLOSE_WINDOW: u32 = 10;

/// One contrast-enhancement configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClahePass {
    /// Histogram clip limit; 0 disables the pass entirely.
    pub clip_limit: u32,
    /// Tile grid as (columns, rows).
    pub grid: (u32, u32),
    /// How many times the equalization is applied.
    pub iterations: u32,
}

/// The four fixed passes the extractor runs, last one a no-op.
pub fn default_passes() -> [ClahePass; 4] {
    [
        ClahePass {
            clip_limit: 3,
            grid: (2, 6),
            iterations: 5,
        },
        ClahePass {
            clip_limit: 3,
            grid: (6, 2),
            iterations: 5,
        },
        ClahePass {
            clip_limit: 5,
            grid: (3, 3),
            iterations: 5,
        },
        ClahePass {
            clip_limit: 0,
            grid: (0, 0),
            iterations: 0,
        },
    ]
}

/// Apply one enhancement pass to a grayscale image.
pub fn enhance(gray: &GrayImage, pass: &ClahePass) -> GrayImage {
    if pass.clip_limit == 0 || pass.grid.0 == 0 || pass.grid.1 == 0 {
        return gray.clone();
    }

    let mut out = gray.clone();
    for _ in 0..pass.iterations {
        out = clahe(&out, pass.clip_limit, pass.grid);
    }
    morph_close(&out, CLOSE_WINDOW)
}

/// Clip-limited adaptive histogram equalization.
///
/// The image is divided into a `tiles_x` x `tiles_y` grid; each tile
/// gets a clipped-histogram CDF lookup table, and every pixel blends
/// the tables of its four surrounding tile centers bilinearly.
fn clahe(gray: &GrayImage, clip_limit: u32, (tiles_x, tiles_y): (u32, u32)) -> GrayImage {
    let (w, h) = gray.dimensions();
    if w == 0 || h == 0 {
        return gray.clone();
    }

    let luts = tile_luts(gray, clip_limit, tiles_x, tiles_y);

    let tile_w = w as f32 / tiles_x as f32;
    let tile_h = h as f32 / tiles_y as f32;

    let mut out = GrayImage::new(w, h);
    for (x, y, pixel) in gray.enumerate_pixels() {
        let v = pixel[0] as usize;

        // Position relative to tile centers.
        let fx = (x as f32 + 0.5) / tile_w - 0.5;
        let fy = (y as f32 + 0.5) / tile_h - 0.5;

        let tx0 = fx.floor();
        let ty0 = fy.floor();
        let wx = fx - tx0;
        let wy = fy - ty0;

        let clamp_x = |t: f32| (t.max(0.0) as u32).min(tiles_x - 1) as usize;
        let clamp_y = |t: f32| (t.max(0.0) as u32).min(tiles_y - 1) as usize;
        let (x0, x1) = (clamp_x(tx0), clamp_x(tx0 + 1.0));
        let (y0, y1) = (clamp_y(ty0), clamp_y(ty0 + 1.0));

        let tl = luts[y0 * tiles_x as usize + x0][v] as f32;
        let tr = luts[y0 * tiles_x as usize + x1][v] as f32;
        let bl = luts[y1 * tiles_x as usize + x0][v] as f32;
        let br = luts[y1 * tiles_x as usize + x1][v] as f32;

        let top = tl + wx * (tr - tl);
        let bottom = bl + wx * (br - bl);
        let blended = top + wy * (bottom - top);

        out.put_pixel(x, y, image::Luma([blended.round().clamp(0.0, 255.0) as u8]));
    }
    out
}

fn tile_luts(gray: &GrayImage, clip_limit: u32, tiles_x: u32, tiles_y: u32) -> Vec<[u8; 256]> {
    let (w, h) = gray.dimensions();
    let mut luts = Vec::with_capacity((tiles_x * tiles_y) as usize);

    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let x0 = tx * w / tiles_x;
            let x1 = (tx + 1) * w / tiles_x;
            let y0 = ty * h / tiles_y;
            let y1 = (ty + 1) * h / tiles_y;

            let mut hist = [0u32; 256];
            for y in y0..y1 {
                for x in x0..x1 {
                    hist[gray.get_pixel(x, y)[0] as usize] += 1;
                }
            }
            let area = ((x1 - x0) * (y1 - y0)).max(1);

            // Clip and redistribute the excess uniformly.
            let clip = (clip_limit * area / 256).max(1);
            let mut excess = 0u32;
            for bin in hist.iter_mut() {
                if *bin > clip {
                    excess += *bin - clip;
                    *bin = clip;
                }
            }
            let bonus = excess / 256;
            for bin in hist.iter_mut() {
                *bin += bonus;
            }

            let mut lut = [0u8; 256];
            let mut cumulative = 0u64;
            let total: u64 = hist.iter().map(|&b| b as u64).sum::<u64>().max(1);
            for (v, bin) in hist.iter().enumerate() {
                cumulative += *bin as u64;
                lut[v] = ((cumulative * 255) / total) as u8;
            }
            luts.push(lut);
        }
    }
    luts
}

/// Grayscale morphological close over a square window: dilate (window
/// max) followed by erode (window min).
fn morph_close(gray: &GrayImage, window: u32) -> GrayImage {
    let dilated = window_filter(gray, window, u8::max, 0);
    window_filter(&dilated, window, u8::min, u8::MAX)
}

fn window_filter(gray: &GrayImage, window: u32, fold: fn(u8, u8) -> u8, seed: u8) -> GrayImage {
    let (w, h) = gray.dimensions();
    let half = (window / 2) as i64;
    let reach = window as i64 - half - 1;

    let mut out = GrayImage::new(w, h);
    for y in 0..h as i64 {
        for x in 0..w as i64 {
            let mut value = seed;
            for dy in -half..=reach {
                for dx in -half..=reach {
                    let (nx, ny) = (x + dx, y + dy);
                    if nx < 0 || ny < 0 || nx >= w as i64 || ny >= h as i64 {
                        continue;
                    }
                    value = fold(value, gray.get_pixel(nx as u32, ny as u32)[0]);
                }
            }
            out.put_pixel(x as u32, y as u32, image::Luma([value]));
        }
    }
    out
}
