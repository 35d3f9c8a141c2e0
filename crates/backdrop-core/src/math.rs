//! Small scalar helpers shared by every renderer.

use glam::Vec2;

#[inline]
pub fn clamp01(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Hermite smoothstep between two edges. Degenerate edges act as a step.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if (edge1 - edge0).abs() < f32::EPSILON {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = clamp01((x - edge0) / (edge1 - edge0));
    t * t * (3.0 - 2.0 * t)
}

#[inline]
pub fn ease_out_cubic(p: f32) -> f32 {
    1.0 - (1.0 - p).powi(3)
}

/// Rotate a point about the origin.
#[inline]
pub fn rotate(p: Vec2, angle: f32) -> Vec2 {
    let (s, c) = angle.sin_cos();
    Vec2::new(p.x * c - p.y * s, p.x * s + p.y * c)
}

/// Tunnel perspective factor `1 / (z * a + b)`.
#[inline]
pub fn perspective(z: f32, a: f32, b: f32) -> f32 {
    1.0 / (z * a + b)
}

/// Sum of three phase-shifted sines; roughly in [-1, 1].
#[inline]
pub fn pseudo_noise(x: f32, y: f32, z: f32, t: f32) -> f32 {
    let a = (x * 1.3 + y * 1.7 + z * 0.35 + t * 0.6).sin();
    let b = (x * 0.7 - y * 1.1 + z * 0.9 - t * 0.4).sin();
    let c = ((x + y) * 0.5 - z * 0.6 + t * 0.2).sin();
    (a + b + c) / 3.0
}

// ---------------- Value noise ----------------

#[inline]
fn hash2(x: f32, y: f32) -> f32 {
    let s = (x * 127.1 + y * 311.7).sin() * 43_758.547;
    s - s.floor()
}

/// Lattice value noise with smoothstep interpolation, in [0, 1].
pub fn value_noise(x: f32, y: f32) -> f32 {
    let xi = x.floor();
    let yi = y.floor();
    let xf = x - xi;
    let yf = y - yi;

    let a = hash2(xi, yi);
    let b = hash2(xi + 1.0, yi);
    let c = hash2(xi, yi + 1.0);
    let d = hash2(xi + 1.0, yi + 1.0);

    let u = xf * xf * (3.0 - 2.0 * xf);
    let v = yf * yf * (3.0 - 2.0 * yf);
    lerp(lerp(a, b, u), lerp(c, d, u), v)
}

pub const FBM_OCTAVES: usize = 4;
const FBM_GAIN: f32 = 0.55;

/// Four-octave fractal Brownian motion over [`value_noise`].
///
/// Amplitudes start at 0.55 and decay by 0.55 per octave, so the result
/// stays within `[0, 0.55 + 0.3025 + 0.166 + 0.0915]`.
pub fn fbm(x: f32, y: f32) -> f32 {
    let mut v = 0.0;
    let mut a = FBM_GAIN;
    let mut f = 1.0;
    for _ in 0..FBM_OCTAVES {
        v += a * value_noise(x * f, y * f);
        f *= 2.0;
        a *= FBM_GAIN;
    }
    v
}
