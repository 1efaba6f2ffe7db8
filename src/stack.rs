//! # Raster Stacks
//!
//! A [`RasterStack`] is an ordered, keyed sequence of rasters sharing width,
//! height, bounding box and reference system. Keys keep the order in which
//! the slices were supplied (typically the time axis order).

use crate::adapter::{to_raster, AxisOrder};
use crate::axis::AxisVector;
use crate::diff::diff;
use crate::error::{RasterError, RasterResult};
use crate::grid::RawGrid;
use crate::raster::{BoundingBox, Raster};
use log::debug;
use ndarray::Array2;
use std::fmt;

#[derive(Debug, Clone)]
pub struct RasterStack<K> {
    layers: Vec<(K, Raster)>,
}

impl<K> RasterStack<K>
where
    K: Clone + PartialEq + fmt::Display,
{
    /// Adapts every slice with the same axes, order and reference system.
    ///
    /// # Errors
    ///
    /// - `ShapeMismatch` when a slice does not fit the axes or differs from
    ///   the first layer
    /// - `DuplicateKey` when two slices share a key
    /// - `EmptyAxis` when no slice is supplied
    pub fn build<I>(
        slices: I,
        x_axis: &AxisVector,
        y_axis: &AxisVector,
        order: AxisOrder,
        crs: &str,
    ) -> RasterResult<Self>
    where
        I: IntoIterator<Item = (K, Array2<f64>)>,
    {
        let layers = slices
            .into_iter()
            .map(|(key, slice)| {
                to_raster(slice.view(), x_axis, y_axis, order, crs).map(|raster| (key, raster))
            })
            .collect::<RasterResult<Vec<_>>>()?;
        Self::from_rasters(layers)
    }

    /// Stacks already adapted rasters, checking that they align and that keys
    /// are unique.
    pub fn from_rasters(layers: Vec<(K, Raster)>) -> RasterResult<Self> {
        let Some((_, first)) = layers.first() else {
            return Err(RasterError::EmptyAxis("stack layers".to_string()));
        };

        for (i, (key, raster)) in layers.iter().enumerate() {
            if !raster.is_aligned_with(first) {
                return Err(RasterError::ShapeMismatch(format!(
                    "layer '{}' is {}x{} with bbox {:?} and CRS '{}', first layer is {}x{} with bbox {:?} and CRS '{}'",
                    key,
                    raster.height(),
                    raster.width(),
                    raster.bbox(),
                    raster.crs(),
                    first.height(),
                    first.width(),
                    first.bbox(),
                    first.crs()
                )));
            }
            if layers[..i].iter().any(|(k, _)| k == key) {
                return Err(RasterError::DuplicateKey(key.to_string()));
            }
        }

        debug!(
            "Built raster stack with {} layers of {}x{}",
            layers.len(),
            first.height(),
            first.width()
        );
        Ok(RasterStack { layers })
    }

    /// Slices a 3D grid along `stack_dimension` and adapts each slice. The
    /// storage order of the remaining two dimensions is read from the grid's
    /// dimension names.
    pub fn from_raw_grid(
        grid: &RawGrid,
        stack_dimension: &str,
        keys: Vec<K>,
        x_axis: &AxisVector,
        y_axis: &AxisVector,
        crs: &str,
    ) -> RasterResult<Self> {
        let slices = grid.slices_along(stack_dimension)?;
        if slices.len() != keys.len() {
            return Err(RasterError::ShapeMismatch(format!(
                "{} keys supplied for {} slices along '{}'",
                keys.len(),
                slices.len(),
                stack_dimension
            )));
        }
        let remaining = grid.dimensions_without(stack_dimension);
        let order = AxisOrder::from_dimensions(&remaining, x_axis.name(), y_axis.name())?;
        Self::build(keys.into_iter().zip(slices), x_axis, y_axis, order, crs)
    }

    pub fn layer(&self, key: &K) -> RasterResult<&Raster> {
        self.layers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, raster)| raster)
            .ok_or_else(|| RasterError::KeyNotFound(key.to_string()))
    }

    /// Difference `to - from` between two layers.
    pub fn diff_layers(&self, from: &K, to: &K) -> RasterResult<Raster> {
        diff(self.layer(to)?, self.layer(from)?)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.layers.iter().map(|(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &Raster)> {
        self.layers.iter().map(|(k, r)| (k, r))
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Always `false`: construction rejects empty stacks.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn first(&self) -> &Raster {
        &self.layers[0].1
    }

    pub fn width(&self) -> usize {
        self.first().width()
    }

    pub fn height(&self) -> usize {
        self.first().height()
    }

    pub fn bbox(&self) -> &BoundingBox {
        self.first().bbox()
    }

    pub fn crs(&self) -> &str {
        self.first().crs()
    }
}
