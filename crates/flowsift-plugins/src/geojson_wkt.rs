//! GeoJSON to WKT transform
//!
//! Adds a `wkt` field carrying the well-known-text form of each geometry,
//! reprojected from a source to a target coordinate reference system when
//! they differ. Feature collections are flattened into an array of objects
//! (geometry, properties at the root, `wkt`); a single feature or bare
//! geometry keeps its original document shape with `wkt` added.
//!
//! Unlike the duplicate checks, every failure here is caught, formatted as
//! diagnostic text, and routed to the `failure` channel.

use async_trait::async_trait;
use geojson::Geometry;
use proj4rs::proj::Proj;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use wkt::ToWkt;

use flowsift_core::{Channel, Error, FlowFile, FlowFileTransform, Result, TransformResult};

const TRANSFORM_NAME: &str = "geojson_wkt";
const DEFAULT_SOURCE_CRS: &str = "EPSG:4326";

/// Configuration for the GeoJSON transform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoJsonTransformConfig {
    /// Source coordinate system (e.g. `EPSG:25832`, `EPSG:4326`).
    ///
    /// When absent, the document's `crs.properties.name` member is used,
    /// falling back to `EPSG:4326`.
    #[serde(default)]
    pub source_crs: Option<String>,

    /// Target coordinate system (e.g. `EPSG:25832`, `EPSG:4326`)
    #[serde(default = "default_target_crs")]
    pub target_crs: String,
}

fn default_target_crs() -> String {
    "EPSG:25832".to_string()
}

impl Default for GeoJsonTransformConfig {
    fn default() -> Self {
        Self {
            source_crs: None,
            target_crs: default_target_crs(),
        }
    }
}

/// GeoJSON to WKT transform plugin
pub struct GeoJsonTransform {
    config: GeoJsonTransformConfig,
}

impl GeoJsonTransform {
    /// Create the plugin from its resolved configuration
    pub fn new(config: GeoJsonTransformConfig) -> Self {
        Self { config }
    }

    fn run(&self, flowfile: &FlowFile) -> Result<String> {
        let doc: Value = serde_json::from_str(flowfile.content_str()?)?;

        if doc.get("type").and_then(Value::as_str) == Some("FeatureCollection") {
            let source_crs = self.resolve_source_crs(&doc);
            let features = doc
                .get("features")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();

            let mut flattened = Vec::with_capacity(features.len());
            for feature in &features {
                let Some(geometry_json) = feature.get("geometry") else {
                    continue;
                };
                let wkt = self.geometry_to_wkt(geometry_json, &source_crs)?;

                let mut flat = Map::new();
                flat.insert("geometry".to_string(), geometry_json.clone());
                if let Some(properties) = feature.get("properties").and_then(Value::as_object) {
                    for (key, value) in properties {
                        flat.insert(key.clone(), value.clone());
                    }
                }
                flat.insert("wkt".to_string(), Value::String(wkt));
                flattened.push(Value::Object(flat));
            }

            Ok(serde_json::to_string(&flattened)?)
        } else {
            let source_crs = self.resolve_source_crs(&doc);
            let geometry_json = doc.get("geometry").unwrap_or(&doc).clone();
            let wkt = self.geometry_to_wkt(&geometry_json, &source_crs)?;

            let mut doc = doc
                .as_object()
                .cloned()
                .ok_or_else(|| transform_error("document is not a JSON object"))?;
            doc.insert("wkt".to_string(), Value::String(wkt));
            Ok(serde_json::to_string(&Value::Object(doc))?)
        }
    }

    /// Resolve the source CRS: configuration first, then the document's
    /// `crs.properties.name` member, then the default. Values not naming
    /// an EPSG code fall back to the default.
    fn resolve_source_crs(&self, doc: &Value) -> String {
        let source = self
            .config
            .source_crs
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .or_else(|| {
                doc.get("crs")
                    .and_then(|c| c.get("properties"))
                    .and_then(|p| p.get("name"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| DEFAULT_SOURCE_CRS.to_string());

        if source.to_uppercase().contains("EPSG") {
            source
        } else {
            DEFAULT_SOURCE_CRS.to_string()
        }
    }

    fn geometry_to_wkt(&self, geometry_json: &Value, source_crs: &str) -> Result<String> {
        let geometry =
            Geometry::from_json_value(geometry_json.clone()).map_err(transform_error)?;

        let value = if source_crs.eq_ignore_ascii_case(&self.config.target_crs) {
            geometry.value
        } else {
            let from = projection(source_crs)?;
            let to = projection(&self.config.target_crs)?;
            reproject_value(geometry.value, &from, &to)?
        };

        let geometry = geo_types::Geometry::<f64>::try_from(value).map_err(transform_error)?;
        Ok(geometry.wkt_string())
    }
}

#[async_trait]
impl FlowFileTransform for GeoJsonTransform {
    async fn transform(&self, flowfile: &FlowFile) -> Result<Option<TransformResult>> {
        match self.run(flowfile) {
            Ok(contents) => Ok(Some(TransformResult::new(Channel::Success, contents))),
            Err(err) => {
                let diagnostic = format!("error transforming GeoJSON to WKT: {}", err);
                tracing::error!("{}", diagnostic);
                Ok(Some(TransformResult::new(Channel::Failure, diagnostic)))
            }
        }
    }
}

fn transform_error(message: impl ToString) -> Error {
    Error::Transform {
        transform: TRANSFORM_NAME.to_string(),
        message: message.to_string(),
    }
}

fn projection(crs: &str) -> Result<Proj> {
    let code = crs
        .rsplit(':')
        .next()
        .and_then(|c| c.trim().parse::<u16>().ok())
        .ok_or_else(|| transform_error(format!("cannot parse EPSG code from '{}'", crs)))?;
    Proj::from_epsg_code(code)
        .map_err(|e| transform_error(format!("unsupported CRS '{}': {}", crs, e)))
}

fn reproject_value(value: geojson::Value, from: &Proj, to: &Proj) -> Result<geojson::Value> {
    use geojson::Value as GjValue;

    Ok(match value {
        GjValue::Point(position) => GjValue::Point(reproject_position(position, from, to)?),
        GjValue::MultiPoint(positions) => {
            GjValue::MultiPoint(reproject_line(positions, from, to)?)
        }
        GjValue::LineString(positions) => {
            GjValue::LineString(reproject_line(positions, from, to)?)
        }
        GjValue::MultiLineString(lines) => {
            GjValue::MultiLineString(reproject_rings(lines, from, to)?)
        }
        GjValue::Polygon(rings) => GjValue::Polygon(reproject_rings(rings, from, to)?),
        GjValue::MultiPolygon(polygons) => GjValue::MultiPolygon(
            polygons
                .into_iter()
                .map(|rings| reproject_rings(rings, from, to))
                .collect::<Result<_>>()?,
        ),
        GjValue::GeometryCollection(geometries) => GjValue::GeometryCollection(
            geometries
                .into_iter()
                .map(|g| Ok(Geometry::new(reproject_value(g.value, from, to)?)))
                .collect::<Result<_>>()?,
        ),
    })
}

fn reproject_rings(
    rings: Vec<Vec<Vec<f64>>>,
    from: &Proj,
    to: &Proj,
) -> Result<Vec<Vec<Vec<f64>>>> {
    rings
        .into_iter()
        .map(|ring| reproject_line(ring, from, to))
        .collect()
}

fn reproject_line(positions: Vec<Vec<f64>>, from: &Proj, to: &Proj) -> Result<Vec<Vec<f64>>> {
    positions
        .into_iter()
        .map(|position| reproject_position(position, from, to))
        .collect()
}

fn reproject_position(mut position: Vec<f64>, from: &Proj, to: &Proj) -> Result<Vec<f64>> {
    if position.len() < 2 {
        return Err(transform_error("position must have at least two coordinates"));
    }

    // proj expects geographic coordinates in radians.
    let mut point = (position[0], position[1], 0.0);
    if from.is_latlong() {
        point.0 = point.0.to_radians();
        point.1 = point.1.to_radians();
    }
    proj4rs::transform::transform(from, to, &mut point)
        .map_err(|e| transform_error(format!("projection failed: {}", e)))?;
    if to.is_latlong() {
        point.0 = point.0.to_degrees();
        point.1 = point.1.to_degrees();
    }

    position[0] = point.0;
    position[1] = point.1;
    Ok(position)
}
