//! Phantom dimensions in millimeters, defaulting to NEMA IEC 61675-1.

use std::collections::BTreeMap;
use std::path::Path;

use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use tracing::{debug, info};

use phantom_kernel::error::require_positive;
use phantom_kernel::geometry::point::Point2d;
use phantom_kernel::geometry::Resolution;
use phantom_kernel::operations::profile::ProfileDimensions;
use phantom_kernel::{GeometryError, MaterialTag};

use crate::error::{PhantomError, PhantomResult};

/// Opaque material tags attached to the finished solids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MaterialNames {
    /// Body, spheres, tubes, mounting plate and insert shell.
    pub phantom: String,
    /// Contents of the lung insert.
    pub insert_filling: String,
    /// Sphere fillings and background liquid.
    pub filling: String,
    pub screw: String,
}

impl Default for MaterialNames {
    fn default() -> Self {
        Self {
            phantom: "pmma".into(),
            insert_filling: "air".into(),
            filling: "water".into(),
            screw: "pe".into(),
        }
    }
}

impl MaterialNames {
    pub fn phantom(&self) -> MaterialTag {
        MaterialTag::new(self.phantom.as_str())
    }

    pub fn insert_filling(&self) -> MaterialTag {
        MaterialTag::new(self.insert_filling.as_str())
    }

    pub fn filling(&self) -> MaterialTag {
        MaterialTag::new(self.filling.as_str())
    }

    pub fn screw(&self) -> MaterialTag {
        MaterialTag::new(self.screw.as_str())
    }
}

/// Every dimension of the phantom. Missing keys keep their NEMA default,
/// unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhantomParams {
    pub body_height: f64,
    pub body_width: f64,
    /// Distance from the horizontal center line down to the bottom.
    pub body_bottom_depth: f64,
    pub body_length: f64,
    pub body_interior_length: f64,
    pub body_corner_radius: f64,
    pub body_top_radius: f64,
    pub body_wall_thickness: f64,

    pub sphere_diameters: Vec<f64>,
    /// Diameter of the circle the sphere centers lie on.
    pub sphere_circle_diameter: f64,
    /// Distance from the inside of the end cap to the sphere centers.
    pub sphere_center_depth: f64,
    pub sphere_y_offset: f64,
    pub sphere_wall_thickness: f64,

    pub tube_wall_thickness: f64,
    pub tube_inner_radius: f64,

    pub mounting_plate_thickness: f64,
    pub mounting_plate_inner_diameter: f64,
    pub mounting_plate_outer_diameter: f64,
    /// Radial clearance between the plate seat and the body.
    pub plate_to_body_tolerance: f64,
    pub mounting_screw_count: usize,

    pub insert_outside_diameter: f64,
    pub insert_inside_diameter: f64,
    pub insert_outside_height: f64,
    pub insert_inside_height: f64,

    pub screw_large_head_diameter: f64,
    pub screw_large_head_height: f64,
    pub screw_large_thread_diameter: f64,
    pub screw_small_head_diameter: f64,
    pub screw_small_head_height: f64,
    pub screw_small_thread_diameter: f64,

    pub filling_screw_x_offset: f64,
    /// Height of the side filling screws above the body bottom.
    pub filling_screw_bottom_rise: f64,
    /// Distance of the top filling screw below the apex.
    pub filling_screw_top_y_inset: f64,

    /// Largest angle spanned by one chord of a tessellated arc, in degrees.
    pub angular_resolution_deg: f64,

    pub materials: MaterialNames,
}

impl Default for PhantomParams {
    fn default() -> Self {
        Self {
            body_height: 230.0,
            body_width: 150.0,
            body_bottom_depth: 80.0,
            body_length: 217.0,
            body_interior_length: 193.0,
            body_corner_radius: 77.0,
            body_top_radius: 147.0,
            body_wall_thickness: 3.0,
            sphere_diameters: vec![10.0, 13.0, 17.0, 22.0, 28.0, 37.0],
            sphere_circle_diameter: 114.4,
            sphere_center_depth: 70.0,
            sphere_y_offset: 35.0,
            sphere_wall_thickness: 1.0,
            tube_wall_thickness: 1.5,
            tube_inner_radius: 1.0,
            mounting_plate_thickness: 3.0,
            mounting_plate_inner_diameter: 135.0,
            mounting_plate_outer_diameter: 155.0,
            plate_to_body_tolerance: 1.0,
            mounting_screw_count: 12,
            insert_outside_diameter: 51.0,
            insert_inside_diameter: 45.0,
            insert_outside_height: 203.0,
            insert_inside_height: 185.0,
            screw_large_head_diameter: 20.0,
            screw_large_head_height: 15.0,
            screw_large_thread_diameter: 10.0,
            screw_small_head_diameter: 5.0,
            screw_small_head_height: 5.0,
            screw_small_thread_diameter: 2.5,
            filling_screw_x_offset: 120.0,
            filling_screw_bottom_rise: 35.0,
            filling_screw_top_y_inset: 15.0,
            angular_resolution_deg: 10.0,
            materials: MaterialNames::default(),
        }
    }
}

impl PhantomParams {
    pub fn from_json(json: &str) -> PhantomResult<Self> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_file(path: &Path) -> PhantomResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| PhantomError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "loading phantom parameters");
        Self::from_json(&json)
    }

    /// Overlay a flat map of numeric constants on the defaults.
    ///
    /// Keys must name numeric fields; list and material fields are only
    /// settable through JSON.
    pub fn from_map(values: &BTreeMap<String, f64>) -> PhantomResult<Self> {
        let Value::Object(mut fields) = serde_json::to_value(Self::default())? else {
            return Err(serde_json::Error::custom("parameters must serialize as an object").into());
        };
        for (name, &value) in values {
            let slot = fields
                .get_mut(name)
                .filter(|v| v.is_number())
                .ok_or_else(|| PhantomError::UnknownParameter { name: name.clone() })?;
            *slot = if slot.is_u64() {
                if value < 0.0 || value.fract() != 0.0 {
                    return Err(GeometryError::out_of_range(name.as_str(), value, "must be a whole number").into());
                }
                Value::from(value as u64)
            } else {
                Number::from_f64(value)
                    .map(Value::Number)
                    .ok_or_else(|| GeometryError::out_of_range(name.as_str(), value, "must be finite"))?
            };
            debug!(name = %name, value, "parameter overridden");
        }
        let params: Self = serde_json::from_value(Value::Object(fields))?;
        params.validate()?;
        Ok(params)
    }

    /// Reject non-positive dimensions and combinations the construction
    /// cannot realize.
    pub fn validate(&self) -> Result<(), GeometryError> {
        self.profile().validate()?;
        require_positive("body_wall_thickness", self.body_wall_thickness)?;
        if self.body_wall_thickness >= self.body_corner_radius {
            return Err(GeometryError::out_of_range(
                "body_wall_thickness",
                self.body_wall_thickness,
                format!("must be below the corner radius {}", self.body_corner_radius),
            ));
        }
        require_positive("body_length", self.body_length)?;
        require_positive("body_interior_length", self.body_interior_length)?;
        below("body_interior_length", self.body_interior_length, "body_length", self.body_length)?;

        if self.sphere_diameters.is_empty() {
            return Err(GeometryError::out_of_range("sphere_diameters", 0.0, "at least one sphere is required"));
        }
        require_positive("sphere_wall_thickness", self.sphere_wall_thickness)?;
        for &d in &self.sphere_diameters {
            require_positive("sphere diameter", d)?;
            below("sphere_wall_thickness", self.sphere_wall_thickness, "sphere radius", d / 2.0)?;
        }
        require_positive("sphere_circle_diameter", self.sphere_circle_diameter)?;
        require_positive("sphere_center_depth", self.sphere_center_depth)?;
        let largest = self.sphere_diameters.iter().copied().fold(0.0, f64::max);
        below(
            "sphere top",
            self.sphere_center_z() + largest / 2.0,
            "body interior top",
            self.cap_thickness() + self.body_interior_length,
        )?;

        require_positive("tube_inner_radius", self.tube_inner_radius)?;
        require_positive("tube_wall_thickness", self.tube_wall_thickness)?;

        require_positive("mounting_plate_thickness", self.mounting_plate_thickness)?;
        require_positive("mounting_plate_inner_diameter", self.mounting_plate_inner_diameter)?;
        below(
            "mounting_plate_inner_diameter",
            self.mounting_plate_inner_diameter,
            "mounting_plate_outer_diameter",
            self.mounting_plate_outer_diameter,
        )?;
        require_positive("plate_to_body_tolerance", self.plate_to_body_tolerance)?;
        if self.mounting_screw_count == 0 {
            return Err(GeometryError::out_of_range("mounting_screw_count", 0.0, "must be at least 1"));
        }

        require_positive("insert_inside_diameter", self.insert_inside_diameter)?;
        require_positive("insert_inside_height", self.insert_inside_height)?;
        below(
            "insert_inside_diameter",
            self.insert_inside_diameter,
            "insert_outside_diameter",
            self.insert_outside_diameter,
        )?;
        below(
            "insert_inside_height",
            self.insert_inside_height,
            "insert_outside_height",
            self.insert_outside_height,
        )?;
        below("insert_outside_height", self.insert_outside_height, "body_length", self.body_length)?;

        for (name, value) in [
            ("screw_large_head_diameter", self.screw_large_head_diameter),
            ("screw_large_head_height", self.screw_large_head_height),
            ("screw_large_thread_diameter", self.screw_large_thread_diameter),
            ("screw_small_head_diameter", self.screw_small_head_diameter),
            ("screw_small_head_height", self.screw_small_head_height),
            ("screw_small_thread_diameter", self.screw_small_thread_diameter),
            ("filling_screw_x_offset", self.filling_screw_x_offset),
            ("filling_screw_bottom_rise", self.filling_screw_bottom_rise),
            ("filling_screw_top_y_inset", self.filling_screw_top_y_inset),
        ] {
            require_positive(name, value)?;
        }

        if !(self.angular_resolution_deg > 0.0 && self.angular_resolution_deg <= 90.0) {
            return Err(GeometryError::out_of_range(
                "angular_resolution_deg",
                self.angular_resolution_deg,
                "must be in (0, 90]",
            ));
        }
        Ok(())
    }

    pub fn profile(&self) -> ProfileDimensions {
        ProfileDimensions {
            height: self.body_height,
            width: self.body_width,
            bottom_depth: self.body_bottom_depth,
            corner_radius: self.body_corner_radius,
            top_radius: self.body_top_radius,
        }
    }

    pub fn resolution(&self) -> Resolution {
        Resolution::from_degrees(self.angular_resolution_deg)
    }

    /// Thickness of each solid end cap.
    pub fn cap_thickness(&self) -> f64 {
        (self.body_length - self.body_interior_length) / 2.0
    }

    /// Axis of the sphere ring, the mounting plate and the lung insert.
    pub fn sphere_axis(&self) -> Point2d {
        Point2d::new(0.0, self.sphere_y_offset)
    }

    pub fn sphere_center_z(&self) -> f64 {
        self.sphere_center_depth + self.cap_thickness()
    }

    pub fn tube_outer_radius(&self) -> f64 {
        self.tube_inner_radius + self.tube_wall_thickness
    }

    /// Radius of the mounting screw circle, halfway across the plate flange.
    pub fn mounting_screw_radius(&self) -> f64 {
        (self.mounting_plate_outer_diameter + self.mounting_plate_inner_diameter) / 4.0
    }

    pub fn filling_screw_y(&self) -> f64 {
        self.filling_screw_bottom_rise - self.body_bottom_depth
    }

    pub fn top_filling_screw_y(&self) -> f64 {
        self.profile().apex().y - self.filling_screw_top_y_inset
    }
}

fn below(name: &str, value: f64, limit_name: &str, limit: f64) -> Result<(), GeometryError> {
    if value >= limit {
        return Err(GeometryError::out_of_range(
            name,
            value,
            format!("must be below {limit_name} ({limit})"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults_are_valid_nema() {
        let params = PhantomParams::default();
        params.validate().unwrap();
        assert_eq!(params.profile(), ProfileDimensions::NEMA);
        assert_relative_eq!(params.cap_thickness(), 12.0);
        assert_relative_eq!(params.sphere_center_z(), 82.0);
        assert_relative_eq!(params.tube_outer_radius(), 2.5);
        assert_relative_eq!(params.mounting_screw_radius(), 72.5);
        assert_relative_eq!(params.filling_screw_y(), -45.0);
        assert_relative_eq!(params.top_filling_screw_y(), 135.0);
    }

    #[test]
    fn test_spheres_must_fit_inside_the_body() {
        let deep = PhantomParams {
            sphere_center_depth: 190.0,
            ..PhantomParams::default()
        };
        let err = deep.validate().unwrap_err();
        assert!(
            matches!(&err, GeometryError::ParameterOutOfRange { name, value, .. } if name == "sphere top" && (*value - 220.5).abs() < 1e-9),
            "{err}"
        );

        let shallow = PhantomParams {
            sphere_center_depth: 174.0,
            ..PhantomParams::default()
        };
        shallow.validate().unwrap();
    }

    #[test]
    fn test_json_overlays_defaults() {
        let params =
            PhantomParams::from_json(r#"{"body_wall_thickness": 4.0, "sphere_diameters": [10, 37]}"#).unwrap();
        assert_relative_eq!(params.body_wall_thickness, 4.0);
        assert_eq!(params.sphere_diameters, vec![10.0, 37.0]);
        assert_relative_eq!(params.body_length, 217.0);
        assert_eq!(params.materials.filling, "water");
    }

    #[test]
    fn test_json_rejects_unknown_keys() {
        let err = PhantomParams::from_json(r#"{"rod_horizontal_spacing": 70}"#).unwrap_err();
        assert!(matches!(err, PhantomError::Config(_)));
    }

    #[test]
    fn test_map_overlay() {
        let values = BTreeMap::from([
            ("mounting_screw_count".to_string(), 8.0),
            ("tube_inner_radius".to_string(), 0.8),
        ]);
        let params = PhantomParams::from_map(&values).unwrap();
        assert_eq!(params.mounting_screw_count, 8);
        assert_relative_eq!(params.tube_inner_radius, 0.8);
    }

    #[test]
    fn test_map_rejects_unknown_and_non_numeric_keys() {
        for key in ["no_such_key", "sphere_diameters", "materials"] {
            let values = BTreeMap::from([(key.to_string(), 1.0)]);
            assert!(
                matches!(PhantomParams::from_map(&values), Err(PhantomError::UnknownParameter { .. })),
                "{key} accepted"
            );
        }
        let fractional = BTreeMap::from([("mounting_screw_count".to_string(), 2.5)]);
        assert!(matches!(
            PhantomParams::from_map(&fractional),
            Err(PhantomError::Geometry(GeometryError::ParameterOutOfRange { .. }))
        ));
    }

    #[test]
    fn test_validation_rejects_bad_dimensions() {
        let cases: Vec<Box<dyn Fn(&mut PhantomParams)>> = vec![
            Box::new(|p| p.body_width = 0.0),
            Box::new(|p| p.body_wall_thickness = 77.0),
            Box::new(|p| p.body_interior_length = 217.0),
            Box::new(|p| p.sphere_wall_thickness = 5.0),
            Box::new(|p| p.sphere_diameters.clear()),
            Box::new(|p| p.insert_inside_diameter = 60.0),
            Box::new(|p| p.mounting_screw_count = 0),
            Box::new(|p| p.angular_resolution_deg = 0.0),
        ];
        for (i, mutate) in cases.iter().enumerate() {
            let mut params = PhantomParams::default();
            mutate(&mut params);
            assert!(
                matches!(params.validate(), Err(GeometryError::ParameterOutOfRange { .. })),
                "case {i} passed validation"
            );
        }
    }
}
