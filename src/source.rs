//! # Grid Sources
//!
//! [`GridSource`] is the boundary through which the crate receives array
//! data: named coordinate axes, named N-dimensional variables, fill
//! sentinels, packing attributes and a coordinate reference system.
//! [`NetCdfSource`] implements it on top of the `netcdf` crate.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use nc2raster::source::{GridSource, NetCdfSource};
//!
//! let source = NetCdfSource::open("precipitation.nc")?;
//! let lon = source.axis("lon")?;
//! let grid = source.variable("precip")?;
//! println!("{} longitudes, grid shape {:?}", lon.len(), grid.shape());
//! # Ok::<(), nc2raster::RasterError>(())
//! ```

use crate::axis::AxisVector;
use crate::error::{RasterError, RasterResult};
use crate::grid::RawGrid;
use log::{debug, warn};
use netcdf::AttributeValue;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Variables commonly used as CF grid mappings.
const GRID_MAPPING_VARIABLES: &[&str] = &["crs", "spatial_ref"];

/// Attributes holding a CRS descriptor, in lookup order.
const CRS_ATTRIBUTES: &[&str] = &["crs_wkt", "spatial_ref", "proj4", "proj4text", "epsg_code"];

/// Provider of gridded data, independent of the on-disk format
pub trait GridSource {
    /// Coordinate values of a dimension.
    fn axis(&self, name: &str) -> RasterResult<AxisVector>;

    /// A variable's values with its dimension names in storage order.
    fn variable(&self, name: &str) -> RasterResult<RawGrid>;

    /// Sentinels marking missing values of a variable.
    fn fill_values(&self, variable: &str) -> RasterResult<Vec<f64>>;

    /// `(scale_factor, add_offset)` applied to packed values; `(1, 0)` when
    /// the variable is not packed.
    fn packing(&self, _variable: &str) -> RasterResult<(f64, f64)> {
        Ok((1.0, 0.0))
    }

    /// A variable attribute rendered as text.
    fn attribute(&self, variable: &str, name: &str) -> RasterResult<Option<String>>;

    fn global_attributes(&self) -> HashMap<String, String>;

    /// CRS descriptor attached to a variable or to the dataset, if any.
    fn crs(&self, variable: &str) -> RasterResult<Option<String>>;
}

/// [`GridSource`] backed by an open NetCDF file.
pub struct NetCdfSource {
    path: PathBuf,
    file: netcdf::File,
}

impl NetCdfSource {
    pub fn open<P: AsRef<Path>>(path: P) -> RasterResult<Self> {
        let path = path.as_ref().to_path_buf();
        debug!("Opening NetCDF file: {}", path.display());
        let file = netcdf::open(&path)?;
        Ok(NetCdfSource { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn close(self) -> RasterResult<()> {
        self.file.close()?;
        Ok(())
    }

    fn nc_variable(&self, name: &str) -> RasterResult<netcdf::Variable<'_>> {
        self.file
            .variable(name)
            .ok_or_else(|| RasterError::MissingVariable(name.to_string()))
    }

    fn numeric_attribute(&self, variable: &str, name: &str) -> RasterResult<Option<f64>> {
        let var = self.nc_variable(variable)?;
        match var.attribute_value(name) {
            Some(value) => Ok(attribute_as_f64(&value?)),
            None => Ok(None),
        }
    }
}

impl GridSource for NetCdfSource {
    fn axis(&self, name: &str) -> RasterResult<AxisVector> {
        if let Some(var) = self.file.variable(name) {
            let values = var.get_values::<f64, _>(..)?;
            return AxisVector::new(name, values);
        }
        let dim = self
            .file
            .dimension(name)
            .ok_or_else(|| RasterError::MissingDimension(name.to_string()))?;
        warn!(
            "Dimension '{}' has no coordinate variable, using indices 0..{}",
            name,
            dim.len()
        );
        AxisVector::new(name, (0..dim.len()).map(|i| i as f64).collect())
    }

    fn variable(&self, name: &str) -> RasterResult<RawGrid> {
        let var = self.nc_variable(name)?;
        let dimensions: Vec<String> = var.dimensions().iter().map(|d| d.name().to_string()).collect();
        let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
        let values = var.get_values::<f64, _>(..)?;
        debug!("Read variable '{}' with dimensions {:?} and shape {:?}", name, dimensions, shape);
        RawGrid::from_shape_vec(dimensions, &shape, values)
    }

    fn fill_values(&self, variable: &str) -> RasterResult<Vec<f64>> {
        let mut fills = Vec::new();
        for name in ["_FillValue", "missing_value"] {
            if let Some(v) = self.numeric_attribute(variable, name)? {
                if !fills.iter().any(|f: &f64| f.to_bits() == v.to_bits()) {
                    fills.push(v);
                }
            }
        }
        Ok(fills)
    }

    fn packing(&self, variable: &str) -> RasterResult<(f64, f64)> {
        let scale = self.numeric_attribute(variable, "scale_factor")?.unwrap_or(1.0);
        let offset = self.numeric_attribute(variable, "add_offset")?.unwrap_or(0.0);
        Ok((scale, offset))
    }

    fn attribute(&self, variable: &str, name: &str) -> RasterResult<Option<String>> {
        let var = self.nc_variable(variable)?;
        match var.attribute_value(name) {
            Some(value) => Ok(Some(format_attribute_value(&value?))),
            None => Ok(None),
        }
    }

    fn global_attributes(&self) -> HashMap<String, String> {
        self.file
            .attributes()
            .filter_map(|attr| {
                attr.value()
                    .ok()
                    .map(|value| (attr.name().to_string(), format_attribute_value(&value)))
            })
            .collect()
    }

    fn crs(&self, variable: &str) -> RasterResult<Option<String>> {
        let mut candidates: Vec<String> = Vec::new();
        if let Some(mapping) = self.attribute(variable, "grid_mapping")? {
            candidates.push(mapping);
        }
        candidates.extend(GRID_MAPPING_VARIABLES.iter().map(|s| s.to_string()));

        for candidate in &candidates {
            if self.file.variable(candidate).is_none() {
                continue;
            }
            for attr in CRS_ATTRIBUTES {
                if let Some(crs) = self.attribute(candidate, attr)? {
                    debug!("CRS for '{}' read from {}:{}", variable, candidate, attr);
                    return Ok(Some(crs));
                }
            }
        }

        let globals = self.global_attributes();
        Ok(["crs", "spatial_ref", "crs_wkt"]
            .iter()
            .find_map(|name| globals.get(*name).cloned()))
    }
}

/// First numeric element of an attribute, if it has one
pub(crate) fn attribute_as_f64(value: &AttributeValue) -> Option<f64> {
    match value {
        AttributeValue::Uchar(v) => Some(*v as f64),
        AttributeValue::Schar(v) => Some(*v as f64),
        AttributeValue::Ushort(v) => Some(*v as f64),
        AttributeValue::Short(v) => Some(*v as f64),
        AttributeValue::Uint(v) => Some(*v as f64),
        AttributeValue::Int(v) => Some(*v as f64),
        AttributeValue::Ulonglong(v) => Some(*v as f64),
        AttributeValue::Longlong(v) => Some(*v as f64),
        AttributeValue::Float(v) => Some(*v as f64),
        AttributeValue::Double(v) => Some(*v),
        AttributeValue::Shorts(v) => v.first().map(|x| *x as f64),
        AttributeValue::Ints(v) => v.first().map(|x| *x as f64),
        AttributeValue::Floats(v) => v.first().map(|x| *x as f64),
        AttributeValue::Doubles(v) => v.first().copied(),
        _ => None,
    }
}

/// Strings verbatim, everything else in debug form
pub(crate) fn format_attribute_value(value: &AttributeValue) -> String {
    match value {
        AttributeValue::Str(s) => s.clone(),
        other => format!("{:?}", other),
    }
}
