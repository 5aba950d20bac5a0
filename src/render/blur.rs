use crate::foundation::error::{ShotframeError, ShotframeResult};

/// Gaussian sigma used for a shadow blur radius (half the radius).
pub(crate) fn shadow_sigma(blur_radius: u32) -> f32 {
    blur_radius as f32 / 2.0
}

/// Kernel for a shadow blur radius; support is `ceil(3 * sigma)` pixels on each side.
pub(crate) fn shadow_kernel_q16(blur_radius: u32) -> ShotframeResult<Vec<u32>> {
    if blur_radius == 0 {
        return Ok(vec![1 << 16]);
    }
    let sigma = shadow_sigma(blur_radius);
    let support = (3.0 * f64::from(sigma)).ceil() as u32;
    gaussian_kernel_q16(support.max(1), sigma)
}

pub(crate) fn gaussian_kernel_q16(radius: u32, sigma: f32) -> ShotframeResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(ShotframeError::validation("blur sigma must be finite and > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = f64::from(i);
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(ShotframeError::validation("gaussian kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let new_mid = (i64::from(weights[mid]) + delta).clamp(0, 65536);
        weights[mid] = new_mid as u32;
    }

    Ok(weights)
}

/// Half-open pixel rectangle inside a blur buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct BlurRegion {
    pub(crate) x0: usize,
    pub(crate) y0: usize,
    pub(crate) x1: usize,
    pub(crate) y1: usize,
}

impl BlurRegion {
    fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }
}

/// Separable blur of a single 8-bit channel that only computes `out`, given that `src` is zero
/// outside `content`. Samples outside the buffer count as zero.
///
/// Work is bounded by the two regions rather than by the kernel size. `tmp` and `dst` must match
/// `src` in length; pixels of `dst` outside `out` are left untouched.
pub(crate) fn blur_alpha_region_q16(
    src: &[u8],
    dst: &mut [u8],
    tmp: &mut [u8],
    width: usize,
    kernel_q16: &[u32],
    content: BlurRegion,
    out: BlurRegion,
) {
    if out.is_empty() {
        return;
    }
    if content.is_empty() {
        for y in out.y0..out.y1 {
            dst[y * width + out.x0..y * width + out.x1].fill(0);
        }
        return;
    }
    if kernel_q16.len() == 1 {
        for y in out.y0..out.y1 {
            let row = y * width;
            dst[row + out.x0..row + out.x1].copy_from_slice(&src[row + out.x0..row + out.x1]);
        }
        return;
    }
    horizontal(src, tmp, width, kernel_q16, content, out);
    vertical(tmp, dst, width, kernel_q16, content, out);
}

// Rows outside `content` stay zero after this pass, so only content rows are written.
fn horizontal(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    k: &[u32],
    content: BlurRegion,
    out: BlurRegion,
) {
    let radius = k.len() / 2;
    for y in content.y0..content.y1 {
        let row = &src[y * width..(y + 1) * width];
        for x in out.x0..out.x1 {
            let lo = x.saturating_sub(radius).max(content.x0);
            let hi = (x + radius + 1).min(content.x1);
            let mut acc = 0u64;
            for sx in lo..hi {
                let v = row[sx];
                if v != 0 {
                    acc += u64::from(k[sx + radius - x]) * u64::from(v);
                }
            }
            dst[y * width + x] = q16_to_u8(acc);
        }
    }
}

fn vertical(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    k: &[u32],
    content: BlurRegion,
    out: BlurRegion,
) {
    let radius = k.len() / 2;
    for y in out.y0..out.y1 {
        let lo = y.saturating_sub(radius).max(content.y0);
        let hi = (y + radius + 1).min(content.y1);
        for x in out.x0..out.x1 {
            let mut acc = 0u64;
            for sy in lo..hi {
                let v = src[sy * width + x];
                if v != 0 {
                    acc += u64::from(k[sy + radius - y]) * u64::from(v);
                }
            }
            dst[y * width + x] = q16_to_u8(acc);
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
