use partview_core::{GridParams, LabelParams, ViewerConfig};
use partview_protocol::{Bounds, Matrix, Point, SegmentRecord, ViewBox};
use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

/// Bounds of a segment list, as `{minX, minY, maxX, maxY}` JSON.
///
/// `config_json` is an optional `ViewerConfig`; only its `bounds` part is used.
#[wasm_bindgen]
pub fn compute_bounds(segments_json: &str, config_json: Option<String>) -> Result<String, JsError> {
    bounds_json(segments_json, config_json.as_deref()).map_err(|e| JsError::new(&e))
}

/// Initial view box for `bounds_json` under an optional `[a, b, c, d, e, f]` matrix.
#[wasm_bindgen]
pub fn fit_view_box(bounds_json: &str, matrix_json: Option<String>) -> Result<String, JsError> {
    fit_json(bounds_json, matrix_json.as_deref()).map_err(|e| JsError::new(&e))
}

/// Grid step and ticks for a `GridParams` JSON object.
#[wasm_bindgen]
pub fn compute_graduations(params_json: &str, config_json: Option<String>) -> Result<String, JsError> {
    graduations_json(params_json, config_json.as_deref()).map_err(|e| JsError::new(&e))
}

/// Decimated axis labels for a `LabelParams` JSON object.
#[wasm_bindgen]
pub fn compute_labels(params_json: &str, config_json: Option<String>) -> Result<String, JsError> {
    labels_json(params_json, config_json.as_deref()).map_err(|e| JsError::new(&e))
}

/// View box after a wheel event at `(anchor_x, anchor_y)` pixels.
#[wasm_bindgen]
pub fn wheel_zoom(
    view_box_json: &str,
    anchor_x: f64,
    anchor_y: f64,
    width: f64,
    height: f64,
    delta_y: f64,
) -> Result<String, JsError> {
    let view_box: ViewBox = parse("view box", view_box_json).map_err(|e| JsError::new(&e))?;
    let zoomed = partview_core::zoom_about(
        view_box,
        Point::new(anchor_x, anchor_y),
        width,
        height,
        partview_core::wheel_zoom_factor(delta_y),
    );
    to_json(&zoomed).map_err(|e| JsError::new(&e))
}

/// View box after dragging by `(dx, dy)` pixels.
#[wasm_bindgen]
pub fn pan_view_box(
    view_box_json: &str,
    dx: f64,
    dy: f64,
    width: f64,
    height: f64,
) -> Result<String, JsError> {
    let view_box: ViewBox = parse("view box", view_box_json).map_err(|e| JsError::new(&e))?;
    to_json(&partview_core::pan_by_px(view_box, dx, dy, width, height))
        .map_err(|e| JsError::new(&e))
}

/// Closest point on one segment record to `(x, y)`, or `null` for a record
/// without points.
#[wasm_bindgen]
pub fn inspect_segment(segment_json: &str, x: f64, y: f64) -> Result<String, JsError> {
    inspect_json(segment_json, x, y).map_err(|e| JsError::new(&e))
}

fn bounds_json(segments_json: &str, config_json: Option<&str>) -> Result<String, String> {
    let segments: Vec<SegmentRecord> = parse("segments", segments_json)?;
    let config = config(config_json)?;
    let bounds =
        partview_core::compute_bounds(&segments, &config.bounds).map_err(|e| e.to_string())?;
    to_json(&bounds)
}

fn fit_json(bounds_json: &str, matrix_json: Option<&str>) -> Result<String, String> {
    let bounds: Bounds = parse("bounds", bounds_json)?;
    let matrix: Option<Matrix> = matrix_json.map(|m| parse("matrix", m)).transpose()?;
    to_json(&partview_core::fit_view_box(&bounds, matrix))
}

fn graduations_json(params_json: &str, config_json: Option<&str>) -> Result<String, String> {
    let params: GridParams = parse("grid params", params_json)?;
    let config = config(config_json)?;
    to_json(&partview_core::compute_graduations(&params, &config.grid))
}

fn labels_json(params_json: &str, config_json: Option<&str>) -> Result<String, String> {
    let params: LabelParams = parse("label params", params_json)?;
    let config = config(config_json)?;
    to_json(&partview_core::compute_labels(&params, &config.labels))
}

fn inspect_json(segment_json: &str, x: f64, y: f64) -> Result<String, String> {
    let record: SegmentRecord = parse("segment", segment_json)?;
    let found = partview_core::inspect(&record, Point::new(x, y)).map_err(|e| e.to_string())?;
    to_json(&found)
}

fn config(json: Option<&str>) -> Result<ViewerConfig, String> {
    match json {
        Some(json) => ViewerConfig::from_json(json.as_bytes()).map_err(|e| e.to_string()),
        None => Ok(ViewerConfig::default()),
    }
}

fn parse<T: DeserializeOwned>(what: &str, json: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("invalid {what}: {e}"))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn value(json: Result<String, String>) -> Value {
        serde_json::from_str(&json.expect("bridge call")).expect("valid json")
    }

    #[test]
    fn bounds_round_trip_through_json() {
        let v = value(bounds_json(
            r#"[{"shape_type": "lineto", "points": [[0, 0], [100, 50]]}]"#,
            None,
        ));
        assert_eq!(v["minX"], -5.0);
        assert_eq!(v["maxY"], 52.5);
    }

    #[test]
    fn bounds_honor_config() {
        let segments = r#"[{"shape_type": "ellipseto", "points": [[1, 1]]}]"#;
        let err = bounds_json(segments, Some(r#"{"bounds": {"unknown_segments": "reject"}}"#))
            .unwrap_err();
        assert!(err.contains("ellipseto"), "{err}");
        assert!(bounds_json(segments, Some("{}")).is_ok());
        assert!(bounds_json(segments, Some(r#"{"grid": {"min_px": -1}}"#)).is_err());
    }

    #[test]
    fn fit_accepts_optional_matrix() {
        let bounds = r#"{"minX": 0, "minY": 0, "maxX": 100, "maxY": 100}"#;
        let plain = value(fit_json(bounds, None));
        assert_eq!(plain["x"], -5.0);
        let flipped = value(fit_json(bounds, Some("[1, 0, 0, -1, 0, 0]")));
        assert_eq!(flipped["y"], -105.0);
        assert!(fit_json(bounds, Some("[1, 0]")).is_err());
    }

    #[test]
    fn graduations_and_labels_chain() {
        let grid = value(graduations_json(
            r#"{
                "bounds": {"minX": 0, "minY": 0, "maxX": 200, "maxY": 200},
                "viewBox": {"x": 50, "y": 50, "w": 100, "h": 100},
                "svgWidth": 600,
                "svgHeight": 600
            }"#,
            None,
        ));
        assert_eq!(grid["stepModel"], 10.0);
        assert_eq!(grid["majorXs"][0], 0.0);

        let params = serde_json::json!({
            "majors": {"xs": grid["majorXs"], "ys": grid["majorYs"]},
            "viewBox": {"x": 50, "y": 50, "w": 100, "h": 100},
            "svgWidth": 600,
            "svgHeight": 600,
            "stepHint": grid["stepModel"],
        });
        let labels = value(labels_json(&params.to_string(), None));
        let xs = labels["x"].as_array().expect("x labels");
        assert!(!xs.is_empty());
        assert!(xs.iter().all(|l| l["text"].is_string() && l["halfWidthPx"].is_number()));
    }

    #[test]
    fn inspects_segments() {
        let arc = r#"{"id": "s2", "shape_type": "arcto1", "points": [[10, 0], [0, 10], [0, 0]],
                     "sweep_angle": 1.5707963267948966, "sweep_flag": true}"#;
        let v = value(inspect_json(arc, 5.0, 5.0));
        assert_eq!(v["segmentId"], "s2");
        assert_eq!(v["shapeType"], "arcto1");
        assert!(v["t"].as_f64().is_some_and(|t| (t - 0.5).abs() < 1e-9));
        assert_eq!(v["detail"]["kind"], "arc");
        assert_eq!(v["detail"]["radius"], 10.0);

        let empty = r#"{"shape_type": "ellipseto", "points": []}"#;
        assert_eq!(inspect_json(empty, 0.0, 0.0), Ok("null".to_string()));
        let err = inspect_json("[]", 0.0, 0.0).unwrap_err();
        assert!(err.starts_with("invalid segment"), "{err}");
    }

    #[test]
    fn malformed_input_is_reported() {
        let err = graduations_json("{}", None).unwrap_err();
        assert!(err.starts_with("invalid grid params"), "{err}");
        let err = labels_json("not json", None).unwrap_err();
        assert!(err.starts_with("invalid label params"), "{err}");
    }
}
