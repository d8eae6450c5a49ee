//! Isotonic probability calibration.
//!
//! An [`IsotonicCalibrator`] holds the knots of a non-decreasing piecewise
//! function fitted offline against held-out data. At inference time it is a
//! pure lookup: clamp outside the fitted range, interpolate linearly between
//! knots. No fitting happens here.

/// Structural validation errors for fitted calibration knots.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalibrationValidationError {
    #[error("calibrator has no knots")]
    Empty,

    #[error("knot thresholds ({thresholds}) and values ({values}) differ in length")]
    LenMismatch { thresholds: usize, values: usize },

    #[error("knot thresholds must be strictly increasing (violated at index {index})")]
    NonIncreasingThresholds { index: usize },

    #[error("knot values must be non-decreasing (violated at index {index})")]
    DecreasingValues { index: usize },

    #[error("knot value at index {index} is outside [0, 1]: {value}")]
    ValueOutOfRange { index: usize, value: f32 },
}

/// Fitted isotonic calibration map.
#[derive(Debug, Clone)]
pub struct IsotonicCalibrator {
    thresholds: Vec<f32>,
    values: Vec<f32>,
}

impl IsotonicCalibrator {
    /// Build from fitted knots, validating monotonicity.
    ///
    /// `thresholds` are the raw-probability knot positions (strictly
    /// increasing); `values` the calibrated outputs at those knots
    /// (non-decreasing, each in `[0, 1]`).
    pub fn new(thresholds: Vec<f32>, values: Vec<f32>) -> Result<Self, CalibrationValidationError> {
        if thresholds.is_empty() {
            return Err(CalibrationValidationError::Empty);
        }
        if thresholds.len() != values.len() {
            return Err(CalibrationValidationError::LenMismatch {
                thresholds: thresholds.len(),
                values: values.len(),
            });
        }
        for i in 1..thresholds.len() {
            if !(thresholds[i] > thresholds[i - 1]) {
                return Err(CalibrationValidationError::NonIncreasingThresholds { index: i });
            }
            if values[i] < values[i - 1] {
                return Err(CalibrationValidationError::DecreasingValues { index: i });
            }
        }
        for (i, &v) in values.iter().enumerate() {
            if !(0.0..=1.0).contains(&v) || !v.is_finite() {
                return Err(CalibrationValidationError::ValueOutOfRange { index: i, value: v });
            }
        }
        Ok(Self { thresholds, values })
    }

    /// Number of fitted knots.
    #[inline]
    pub fn n_knots(&self) -> usize {
        self.thresholds.len()
    }

    /// Calibrate a raw probability.
    ///
    /// Pure lookup: inputs below the first knot clamp to its value, inputs
    /// above the last knot clamp to its value, anything between two knots
    /// interpolates linearly. Non-decreasing by construction.
    pub fn calibrate(&self, p_raw: f32) -> f32 {
        let n = self.thresholds.len();
        if p_raw <= self.thresholds[0] {
            return self.values[0];
        }
        if p_raw >= self.thresholds[n - 1] {
            return self.values[n - 1];
        }

        // partition_point: first knot with threshold > p_raw; the knot
        // before it is <= p_raw, so we interpolate between the two.
        let hi = self.thresholds.partition_point(|&t| t <= p_raw);
        let lo = hi - 1;

        let span = self.thresholds[hi] - self.thresholds[lo];
        let frac = (p_raw - self.thresholds[lo]) / span;
        self.values[lo] + frac * (self.values[hi] - self.values[lo])
    }
}
