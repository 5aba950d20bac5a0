use super::*;

fn blur_full(src: &[u8], width: usize, height: usize, k: &[u32]) -> Vec<u8> {
    let full = BlurRegion {
        x0: 0,
        y0: 0,
        x1: width,
        y1: height,
    };
    let mut dst = vec![0u8; src.len()];
    let mut tmp = vec![0u8; src.len()];
    blur_alpha_region_q16(src, &mut dst, &mut tmp, width, k, full, full);
    dst
}

#[test]
fn zero_radius_is_identity() {
    let k = shadow_kernel_q16(0).unwrap();
    assert_eq!(k, vec![1 << 16]);
    let src = vec![0u8, 10, 200, 255];
    assert_eq!(blur_full(&src, 2, 2, &k), src);
}

#[test]
fn kernel_support_is_three_sigma_and_sums_to_one() {
    let k = shadow_kernel_q16(60).unwrap();
    assert_eq!(k.len(), 2 * 90 + 1);
    assert_eq!(k.iter().map(|&w| u64::from(w)).sum::<u64>(), 65536);
    assert!(k[90] >= k[89] && k[89] >= k[0]);
    assert!(gaussian_kernel_q16(3, 0.0).is_err());
}

#[test]
fn blur_spreads_a_point_and_keeps_its_mass() {
    let (w, h) = (9usize, 9usize);
    let mut src = vec![0u8; w * h];
    src[4 * w + 4] = 255;
    let k = shadow_kernel_q16(2).unwrap();
    let dst = blur_full(&src, w, h, &k);

    assert!(dst.iter().filter(|&&a| a != 0).count() > 1);
    assert_eq!(dst[4 * w + 4], *dst.iter().max().unwrap());
    let sum: i32 = dst.iter().map(|&a| i32::from(a)).sum();
    assert!((sum - 255).abs() <= 8, "{sum}");
}

#[test]
fn edges_fade_against_zero_instead_of_clamping() {
    let (w, h) = (5usize, 1usize);
    let src = vec![255u8; w];
    let k = shadow_kernel_q16(4).unwrap();
    let dst = blur_full(&src, w, h, &k);
    assert!(dst[0] < 255);
    assert!(dst[2] > dst[0]);
}

#[test]
fn region_blur_matches_full_blur_inside_the_output_region() {
    let (w, h) = (30usize, 24usize);
    let content = BlurRegion {
        x0: 4,
        y0: 6,
        x1: 12,
        y1: 10,
    };
    let mut src = vec![0u8; w * h];
    for y in content.y0..content.y1 {
        for x in content.x0..content.x1 {
            src[y * w + x] = (40 + 20 * ((x + y) % 4)) as u8;
        }
    }
    let k = shadow_kernel_q16(10).unwrap();
    let full = blur_full(&src, w, h, &k);

    let out = BlurRegion {
        x0: 10,
        y0: 2,
        x1: 27,
        y1: 20,
    };
    let mut part = vec![7u8; w * h];
    let mut tmp = vec![0u8; w * h];
    blur_alpha_region_q16(&src, &mut part, &mut tmp, w, &k, content, out);
    for y in 0..h {
        for x in 0..w {
            let inside = x >= out.x0 && x < out.x1 && y >= out.y0 && y < out.y1;
            if inside {
                assert_eq!(part[y * w + x], full[y * w + x], "({x}, {y})");
            } else {
                assert_eq!(part[y * w + x], 7, "({x}, {y}) outside the output region");
            }
        }
    }
}
