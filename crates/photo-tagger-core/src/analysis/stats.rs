//! Pixel statistics shared by the analyzers.

use image::{GrayImage, RgbImage};

/// Variance of the 3x3 Laplacian response over the interior pixels.
///
/// The Laplacian highlights regions of rapid intensity change; a sharp
/// image has more high-frequency content and thus a higher variance.
/// Images smaller than 3x3 have no interior and score 0.0.
#[must_use]
pub fn laplacian_variance(gray: &GrayImage) -> f64 {
    let (width, height) = gray.dimensions();
    if width < 3 || height < 3 {
        return 0.0;
    }

    let mut responses = Vec::with_capacity(((width - 2) * (height - 2)) as usize);

    // [ 0  1  0 ]
    // [ 1 -4  1 ]
    // [ 0  1  0 ]
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let center = i32::from(gray.get_pixel(x, y)[0]);
            let top = i32::from(gray.get_pixel(x, y - 1)[0]);
            let bottom = i32::from(gray.get_pixel(x, y + 1)[0]);
            let left = i32::from(gray.get_pixel(x - 1, y)[0]);
            let right = i32::from(gray.get_pixel(x + 1, y)[0]);
            responses.push(f64::from(top + bottom + left + right - 4 * center));
        }
    }

    variance(&responses)
}

/// Variances of the horizontal and vertical 3x3 Sobel responses over the
/// interior pixels. Returns `(x_variance, y_variance)`; images smaller
/// than 3x3 yield `(0.0, 0.0)`.
#[must_use]
pub fn sobel_variances(gray: &GrayImage) -> (f64, f64) {
    let (width, height) = gray.dimensions();
    if width < 3 || height < 3 {
        return (0.0, 0.0);
    }

    let count = ((width - 2) * (height - 2)) as usize;
    let mut gx = Vec::with_capacity(count);
    let mut gy = Vec::with_capacity(count);

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let p = |dx: i32, dy: i32| {
                let px = (x as i32 + dx) as u32;
                let py = (y as i32 + dy) as u32;
                i32::from(gray.get_pixel(px, py)[0])
            };

            // [ -1 0 1 ]          [ -1 -2 -1 ]
            // [ -2 0 2 ]   and    [  0  0  0 ]
            // [ -1 0 1 ]          [  1  2  1 ]
            let sx = p(1, -1) + 2 * p(1, 0) + p(1, 1) - p(-1, -1) - 2 * p(-1, 0) - p(-1, 1);
            let sy = p(-1, 1) + 2 * p(0, 1) + p(1, 1) - p(-1, -1) - 2 * p(0, -1) - p(1, -1);
            gx.push(f64::from(sx));
            gy.push(f64::from(sy));
        }
    }

    (variance(&gx), variance(&gy))
}

/// Mean and standard deviation over every channel sample of an RGB image.
#[must_use]
pub fn sample_mean_stddev(rgb: &RgbImage) -> (f64, f64) {
    let samples = rgb.as_raw();
    if samples.is_empty() {
        return (0.0, 0.0);
    }

    let n = samples.len() as f64;
    let mean = samples.iter().map(|&v| f64::from(v)).sum::<f64>() / n;
    let var = samples
        .iter()
        .map(|&v| {
            let d = f64::from(v) - mean;
            d * d
        })
        .sum::<f64>()
        / n;

    (mean, var.sqrt())
}

/// Variance of a grayscale image's pixel values.
#[must_use]
pub fn luma_variance(gray: &GrayImage) -> f64 {
    let values: Vec<f64> = gray.as_raw().iter().map(|&v| f64::from(v)).collect();
    variance(&values)
}

/// Variance of the per-pixel mean across the three color channels.
///
/// Fallback texture measure for environments without derivative filters.
#[must_use]
pub fn channel_mean_variance(rgb: &RgbImage) -> f64 {
    let values: Vec<f64> = rgb
        .pixels()
        .map(|p| (f64::from(p[0]) + f64::from(p[1]) + f64::from(p[2])) / 3.0)
        .collect();
    variance(&values)
}

/// Population variance.
fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values
        .iter()
        .map(|v| {
            let d = v - mean;
            d * d
        })
        .sum::<f64>()
        / n
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    #[test]
    fn test_laplacian_variance_of_flat_image_is_zero() {
        let img = GrayImage::from_fn(32, 32, |_, _| Luma([80u8]));
        assert!(laplacian_variance(&img).abs() < f64::EPSILON);
    }

    #[test]
    fn test_laplacian_variance_increases_with_edges() {
        let flat = GrayImage::from_fn(32, 32, |_, _| Luma([128u8]));
        let checker = GrayImage::from_fn(32, 32, |x, y| {
            if (x + y) % 2 == 0 {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        });
        assert!(laplacian_variance(&checker) > laplacian_variance(&flat) + 1000.0);
    }

    #[test]
    fn test_laplacian_variance_tiny_image() {
        let img = GrayImage::from_fn(2, 2, |_, _| Luma([10u8]));
        assert!(laplacian_variance(&img).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sobel_vertical_edges_dominate_x_axis() {
        // Vertical bars: strong horizontal gradients, none vertically.
        let img = GrayImage::from_fn(32, 32, |x, _| {
            if (x / 4) % 2 == 0 {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        });
        let (x_var, y_var) = sobel_variances(&img);
        assert!(x_var > 100.0);
        assert!(y_var.abs() < f64::EPSILON);
    }

    #[test]
    fn test_sobel_flat_image_is_zero_both_axes() {
        let img = GrayImage::from_fn(16, 16, |_, _| Luma([55u8]));
        let (x_var, y_var) = sobel_variances(&img);
        assert!(x_var.abs() < f64::EPSILON);
        assert!(y_var.abs() < f64::EPSILON);
    }

    #[test]
    fn test_sample_mean_stddev_uniform_rgb() {
        let img = RgbImage::from_fn(10, 10, |_, _| Rgb([60u8, 120u8, 180u8]));
        let (mean, stddev) = sample_mean_stddev(&img);
        assert!((mean - 120.0).abs() < 0.001);
        // Channels 60/120/180 around mean 120 give stddev sqrt(2*60^2/3).
        assert!((stddev - (7200.0f64 / 3.0).sqrt()).abs() < 0.001);
    }

    #[test]
    fn test_channel_mean_variance_flat_color_is_zero() {
        let img = RgbImage::from_fn(8, 8, |_, _| Rgb([10u8, 200u8, 90u8]));
        assert!(channel_mean_variance(&img).abs() < f64::EPSILON);
    }

    #[test]
    fn test_luma_variance_half_and_half() {
        let img = GrayImage::from_fn(10, 10, |x, _| {
            if x < 5 {
                Luma([0u8])
            } else {
                Luma([200u8])
            }
        });
        // Half at 0, half at 200: variance = 100^2.
        assert!((luma_variance(&img) - 10000.0).abs() < 0.001);
    }
}
