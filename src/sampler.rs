//! # Point Sampling
//!
//! Nearest-cell lookup of a geographic point in a [`Raster`] or across all
//! layers of a [`RasterStack`]. Points outside the bounding box yield
//! [`NODATA`] rather than an error.

use crate::grid::{is_nodata, NODATA};
use crate::raster::Raster;
use crate::stack::RasterStack;
use std::fmt;

/// Values of one point across the layers of a stack, in stack key order.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledSeries<K> {
    lon: f64,
    lat: f64,
    points: Vec<(K, f64)>,
}

impl<K> SampledSeries<K> {
    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(K, f64)> {
        self.points.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.points.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|(_, v)| *v).collect()
    }

    pub fn valid_count(&self) -> usize {
        self.points.iter().filter(|(_, v)| !is_nodata(*v)).count()
    }
}

impl<K: PartialEq> SampledSeries<K> {
    pub fn get(&self, key: &K) -> Option<f64> {
        self.points.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }
}

/// Nearest-cell sampling at a `(lon, lat)` location.
pub trait SampleNearest {
    type Output;

    fn sample_nearest(&self, lon: f64, lat: f64) -> Self::Output;
}

impl SampleNearest for Raster {
    type Output = f64;

    /// Each axis is searched independently; ties go to the lower stored
    /// index, so on the descending y axis a tie resolves to the northern row.
    fn sample_nearest(&self, lon: f64, lat: f64) -> f64 {
        if !self.bbox().contains_point(lon, lat) {
            return NODATA;
        }
        let col = self.x_axis().nearest_index(lon);
        let row = self.y_axis().nearest_index(lat);
        self.data()[[row, col]]
    }
}

impl<K> SampleNearest for RasterStack<K>
where
    K: Clone + PartialEq + fmt::Display,
{
    type Output = SampledSeries<K>;

    fn sample_nearest(&self, lon: f64, lat: f64) -> SampledSeries<K> {
        let points = self
            .iter()
            .map(|(key, raster)| (key.clone(), raster.sample_nearest(lon, lat)))
            .collect();
        SampledSeries { lon, lat, points }
    }
}

/// Free-function form of [`SampleNearest::sample_nearest`].
///
/// # Examples
///
/// ```rust
/// use nc2raster::adapter::{to_raster, AxisOrder};
/// use nc2raster::axis::AxisVector;
/// use nc2raster::grid::is_nodata;
/// use nc2raster::sampler::sample_nearest;
/// use ndarray::array;
///
/// let x = AxisVector::new("lon", vec![10.0, 20.0, 30.0])?;
/// let y = AxisVector::new("lat", vec![0.0, 10.0])?;
/// let slice = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
/// let raster = to_raster(slice.view(), &x, &y, AxisOrder::XMajor, "EPSG:4326")?;
///
/// assert_eq!(sample_nearest(&raster, 20.0, 10.0), 5.0);
/// assert!(is_nodata(sample_nearest(&raster, 20.0, 15.0)));
/// # Ok::<(), nc2raster::RasterError>(())
/// ```
pub fn sample_nearest<T: SampleNearest>(target: &T, lon: f64, lat: f64) -> T::Output {
    target.sample_nearest(lon, lat)
}
