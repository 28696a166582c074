//! Correlation-coefficient scoring (mean-subtracted cross-correlation).
//!
//! For a template `T` with mean `t̄` and the window `I` under it:
//! `R(x, y) = Σ (T - t̄) · I`, and the normalized form divides by
//! `sqrt(Σ (T - t̄)² · Σ (I - ī)²)`. Window sums come from integral images so
//! the normalizer costs O(1) per offset.

use image::{GrayImage, ImageBuffer, Luma};
use rayon::prelude::*;

/// Windows (or templates) with less variance than this score 0.
const MIN_VARIANCE: f64 = 1e-6;

/// Score map of size `(iw - tw + 1) x (ih - th + 1)`.
/// The template must fit inside the image.
pub fn coefficient_map(
    image: &GrayImage,
    template: &GrayImage,
    normalized: bool,
) -> ImageBuffer<Luma<f32>, Vec<f32>> {
    let (iw, ih) = image.dimensions();
    let (tw, th) = template.dimensions();
    let out_w = iw - tw + 1;
    let out_h = ih - th + 1;
    let (iw, tw, th) = (iw as usize, tw as usize, th as usize);

    let area = (tw * th) as f64;
    let t_mean = template.as_raw().iter().map(|&v| v as f64).sum::<f64>() / area;
    let t_prime: Vec<f32> = template
        .as_raw()
        .iter()
        .map(|&v| (v as f64 - t_mean) as f32)
        .collect();
    let t_var: f64 = t_prime.iter().map(|&v| (v as f64) * (v as f64)).sum();

    let integrals = normalized.then(|| Integrals::new(image));
    let pixels = image.as_raw();

    let mut scores: ImageBuffer<Luma<f32>, Vec<f32>> = ImageBuffer::new(out_w, out_h);
    scores
        .par_chunks_mut(out_w as usize)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, score) in row.iter_mut().enumerate() {
                let mut dot = 0.0f32;
                for ty in 0..th {
                    let img_row = &pixels[(y + ty) * iw + x..(y + ty) * iw + x + tw];
                    let tpl_row = &t_prime[ty * tw..(ty + 1) * tw];
                    for (&value, &weight) in img_row.iter().zip(tpl_row) {
                        dot += weight * value as f32;
                    }
                }

                *score = match &integrals {
                    None => dot,
                    Some(integrals) => {
                        let (sum, sum_sq) = integrals.window(x, y, tw, th);
                        let i_var = sum_sq - sum * sum / area;
                        if t_var <= MIN_VARIANCE || i_var <= MIN_VARIANCE {
                            0.0
                        } else {
                            ((dot as f64) / (t_var * i_var).sqrt()).clamp(-1.0, 1.0) as f32
                        }
                    }
                };
            }
        });
    scores
}

/// Summed-area tables of pixel values and squared pixel values.
struct Integrals {
    stride: usize,
    sum: Vec<f64>,
    sum_sq: Vec<f64>,
}

impl Integrals {
    fn new(image: &GrayImage) -> Self {
        let (w, h) = (image.width() as usize, image.height() as usize);
        let stride = w + 1;
        let mut sum = vec![0.0; stride * (h + 1)];
        let mut sum_sq = vec![0.0; stride * (h + 1)];
        let pixels = image.as_raw();

        for y in 0..h {
            let mut row_sum = 0.0;
            let mut row_sq = 0.0;
            for x in 0..w {
                let v = pixels[y * w + x] as f64;
                row_sum += v;
                row_sq += v * v;
                sum[(y + 1) * stride + x + 1] = sum[y * stride + x + 1] + row_sum;
                sum_sq[(y + 1) * stride + x + 1] = sum_sq[y * stride + x + 1] + row_sq;
            }
        }
        Self {
            stride,
            sum,
            sum_sq,
        }
    }

    fn window(&self, x: usize, y: usize, w: usize, h: usize) -> (f64, f64) {
        let s = self.stride;
        let (top, bottom) = (y * s, (y + h) * s);
        let pick = |t: &[f64]| t[bottom + x + w] - t[top + x + w] - t[bottom + x] + t[top + x];
        (pick(&self.sum), pick(&self.sum_sq))
    }
}
