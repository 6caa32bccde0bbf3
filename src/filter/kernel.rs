use crate::foundation::error::{ReelError, ReelResult};
use std::path::Path;

/// Square convolution kernel with scalar post-processing.
///
/// Output channel = `clamp(trunc(factor * sum + bias), 0, 255)`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Kernel {
    /// Kernel extent along x (also the row stride used to address `weights`).
    pub x: u32,
    /// Kernel extent along y.
    pub y: u32,
    pub weights: Vec<f64>,
    #[serde(default = "default_factor")]
    pub factor: f64,
    #[serde(default)]
    pub bias: f64,
}

fn default_factor() -> f64 {
    1.0
}

#[rustfmt::skip]
const EDGE_5X5: [f64; 25] = [
    0.0,  0.0,  0.0,  0.0, 0.0,
    0.0, -1.0, -1.0, -1.0, 0.0,
    0.0, -1.0,  8.0, -1.0, 0.0,
    0.0, -1.0, -1.0, -1.0, 0.0,
    0.0,  0.0,  0.0,  0.0, 0.0,
];

#[rustfmt::skip]
const EMBOSS_5X5: [f64; 25] = [
    0.0,  0.0,  0.0, 0.0, 0.0,
    0.0, -2.0, -1.0, 0.0, 0.0,
    0.0, -1.0,  1.0, 1.0, 0.0,
    0.0,  0.0,  1.0, 2.0, 0.0,
    0.0,  0.0,  0.0, 0.0, 0.0,
];

impl Kernel {
    /// Build a validated kernel with `weights.len() == x * y`.
    pub fn new(x: u32, y: u32, weights: Vec<f64>, factor: f64, bias: f64) -> ReelResult<Self> {
        let k = Self {
            x,
            y,
            weights,
            factor,
            bias,
        };
        k.validate()?;
        Ok(k)
    }

    pub fn validate(&self) -> ReelResult<()> {
        if self.x == 0 || self.y == 0 {
            return Err(ReelError::validation("kernel x/y must be non-zero"));
        }
        let expected = (self.x as usize)
            .checked_mul(self.y as usize)
            .ok_or_else(|| ReelError::validation("kernel size overflow"))?;
        if self.weights.len() != expected {
            return Err(ReelError::validation(format!(
                "kernel {}x{} needs {expected} weights, got {}",
                self.x,
                self.y,
                self.weights.len()
            )));
        }
        if !self.factor.is_finite() || !self.bias.is_finite() {
            return Err(ReelError::validation("kernel factor/bias must be finite"));
        }
        if self.weights.iter().any(|w| !w.is_finite()) {
            return Err(ReelError::validation("kernel weights must be finite"));
        }
        Ok(())
    }

    /// 1x1 pass-through kernel.
    pub fn identity() -> Self {
        Self {
            x: 1,
            y: 1,
            weights: vec![1.0],
            factor: 1.0,
            bias: 0.0,
        }
    }

    /// 5x5 edge detector (8 at the center, -1 on the surrounding ring).
    pub fn edge() -> Self {
        Self {
            x: 5,
            y: 5,
            weights: EDGE_5X5.to_vec(),
            factor: 1.0,
            bias: 0.0,
        }
    }

    pub fn emboss() -> Self {
        Self {
            x: 5,
            y: 5,
            weights: EMBOSS_5X5.to_vec(),
            factor: 1.0,
            bias: 0.0,
        }
    }

    /// Parse a kernel from its JSON form, e.g. `{"x":3,"y":3,"weights":[...],"factor":1.0}`.
    pub fn from_json_str(s: &str) -> ReelResult<Self> {
        let k: Self = serde_json::from_str(s)
            .map_err(|e| ReelError::validation(format!("invalid kernel JSON: {e}")))?;
        k.validate()?;
        Ok(k)
    }

    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        use anyhow::Context as _;
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read kernel '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Integer weight for tap `(fx, fy)`.
    ///
    /// Addressed as `fx * x + fy` and truncated toward zero. A tap whose index falls outside
    /// the weight list (only possible for non-square kernels) weighs zero.
    pub(crate) fn tap_weight(&self, fx: u32, fy: u32) -> i64 {
        let idx = fx as usize * self.x as usize + fy as usize;
        self.weights.get(idx).map_or(0, |w| *w as i64)
    }

    /// Apply factor and bias to an accumulated channel sum and clamp into `u8`.
    pub(crate) fn finish_channel(&self, acc: i64) -> u8 {
        let v = (self.factor * acc as f64 + self.bias) as i64;
        v.clamp(0, 255) as u8
    }
}
