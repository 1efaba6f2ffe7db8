//! # Coordinate Axes
//!
//! [`AxisVector`] holds the coordinate values of one grid dimension. The
//! constructor enforces the invariants the rest of the crate relies on: the
//! axis is non-empty, finite and strictly monotonic.

use crate::error::{RasterError, RasterResult};

/// Direction in which axis coordinates progress with increasing index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisDirection {
    Increasing,
    Decreasing,
}

/// Ordered coordinate values for a single spatial or temporal dimension.
///
/// # Examples
///
/// ```rust
/// use nc2raster::axis::{AxisDirection, AxisVector};
///
/// let lat = AxisVector::new("lat", vec![-10.0, 0.0, 10.0])?;
/// assert_eq!(lat.direction(), AxisDirection::Increasing);
/// assert_eq!(lat.nearest_index(4.0), 1);
/// # Ok::<(), nc2raster::RasterError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AxisVector {
    name: String,
    values: Vec<f64>,
}

impl AxisVector {
    /// Builds an axis, failing with `EmptyAxis` for zero coordinates and
    /// `NonMonotonicAxis` for duplicates, direction changes or non-finite values.
    pub fn new(name: &str, values: Vec<f64>) -> RasterResult<Self> {
        if values.is_empty() {
            return Err(RasterError::EmptyAxis(name.to_string()));
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(RasterError::NonMonotonicAxis {
                name: name.to_string(),
                index,
            });
        }

        if values.len() > 1 {
            let increasing = values[1] > values[0];
            for (i, pair) in values.windows(2).enumerate() {
                let ok = if increasing {
                    pair[1] > pair[0]
                } else {
                    pair[1] < pair[0]
                };
                if !ok {
                    return Err(RasterError::NonMonotonicAxis {
                        name: name.to_string(),
                        index: i + 1,
                    });
                }
            }
        }

        Ok(AxisVector {
            name: name.to_string(),
            values,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`: construction rejects empty axes.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// A single-coordinate axis counts as increasing.
    pub fn direction(&self) -> AxisDirection {
        if self.values.len() > 1 && self.values[1] < self.values[0] {
            AxisDirection::Decreasing
        } else {
            AxisDirection::Increasing
        }
    }

    pub fn is_increasing(&self) -> bool {
        self.direction() == AxisDirection::Increasing
    }

    pub fn min(&self) -> f64 {
        match self.direction() {
            AxisDirection::Increasing => self.values[0],
            AxisDirection::Decreasing => self.values[self.values.len() - 1],
        }
    }

    pub fn max(&self) -> f64 {
        match self.direction() {
            AxisDirection::Increasing => self.values[self.values.len() - 1],
            AxisDirection::Decreasing => self.values[0],
        }
    }

    /// Same coordinates in reverse index order.
    pub fn reversed(&self) -> Self {
        AxisVector {
            name: self.name.clone(),
            values: self.values.iter().rev().copied().collect(),
        }
    }

    /// Whether `coord` lies within `[min, max]`.
    pub fn contains(&self, coord: f64) -> bool {
        coord >= self.min() && coord <= self.max()
    }

    /// Index of the coordinate closest to `coord`. Ties go to the lower index.
    pub fn nearest_index(&self, coord: f64) -> usize {
        let mut best = 0;
        let mut best_distance = (self.values[0] - coord).abs();
        for (i, value) in self.values.iter().enumerate().skip(1) {
            let distance = (value - coord).abs();
            if distance < best_distance {
                best = i;
                best_distance = distance;
            }
        }
        best
    }

    /// Mean spacing between consecutive coordinates, `None` for a single value.
    pub fn mean_spacing(&self) -> Option<f64> {
        if self.values.len() < 2 {
            return None;
        }
        Some((self.max() - self.min()) / (self.values.len() - 1) as f64)
    }

    /// Whether every step deviates from the mean spacing by at most
    /// `tolerance`, relative to that spacing.
    pub fn is_regular(&self, tolerance: f64) -> bool {
        match self.mean_spacing() {
            None => true,
            Some(step) => self
                .values
                .windows(2)
                .all(|pair| ((pair[1] - pair[0]).abs() - step).abs() <= tolerance * step),
        }
    }
}
