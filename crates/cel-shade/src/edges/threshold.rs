use image::GrayImage;

/// Median of all pixel intensities (lower median for even counts).
pub fn median_intensity(image: &GrayImage) -> u8 {
    let mut bins = [0u64; 256];
    for p in image.pixels() {
        bins[usize::from(p[0])] += 1;
    }
    let total: u64 = bins.iter().sum();
    if total == 0 {
        return 0;
    }

    let half = total.div_ceil(2);
    let mut running = 0u64;
    for (value, &count) in bins.iter().enumerate() {
        running += count;
        if running >= half {
            return value as u8;
        }
    }
    u8::MAX
}

/// Canny hysteresis thresholds at 67% and 133% of the median intensity.
///
/// The low threshold is at least 1 and the high threshold stays strictly
/// above it, so a dark image still gets a usable pair.
pub fn canny_thresholds(median: u8) -> (f32, f32) {
    let m = f32::from(median);
    let low = (0.67 * m).max(1.0);
    let high = (1.33 * m).min(255.0).max(low + 1.0);
    (low, high)
}

/// Mark pixels darker than their local mean minus `c`.
///
/// `block` is the full (odd) window size; borders shrink the window rather
/// than padding it. Marked pixels are 255, the rest 0.
pub fn adaptive_mean_threshold(image: &GrayImage, block: u32, c: i32) -> GrayImage {
    let (width, height) = image.dimensions();
    let (w, h) = (width as usize, height as usize);
    let half = (block / 2) as usize;
    let src = image.as_raw();

    let iw = w + 1;
    let mut integral = vec![0i64; iw * (h + 1)];
    for y in 0..h {
        let mut row_sum = 0i64;
        for x in 0..w {
            row_sum += i64::from(src[y * w + x]);
            integral[(y + 1) * iw + x + 1] = row_sum + integral[y * iw + x + 1];
        }
    }

    let mut out = GrayImage::new(width, height);
    let dst: &mut [u8] = &mut out;
    for y in 0..h {
        let y0 = y.saturating_sub(half);
        let y1 = (y + half + 1).min(h);
        for x in 0..w {
            let x0 = x.saturating_sub(half);
            let x1 = (x + half + 1).min(w);
            let area = ((y1 - y0) * (x1 - x0)) as i64;
            let sum = integral[y1 * iw + x1] - integral[y0 * iw + x1] - integral[y1 * iw + x0]
                + integral[y0 * iw + x0];
            // Compare in integers: v < sum/area - c  <=>  (v + c) * area < sum
            let v = i64::from(src[y * w + x]);
            if (v + i64::from(c)) * area < sum {
                dst[y * w + x] = 255;
            }
        }
    }
    out
}

/// Dilation radius for a line strength: 2 at 0.1, 0 at 1.0.
pub fn dilation_radius(line_strength: f32) -> u8 {
    let s = line_strength.clamp(0.1, 1.0);
    (2.0 * (1.0 - s) / 0.9).round() as u8
}
