//! Human and machine readable run summaries.

use std::path::Path;

use ixstats_sanitize_models::{DatelineAnomaly, LayerReport, RunReport};

use crate::SanitizeError;

const RULE_WIDTH: usize = 110;

/// Renders a fixed-width table with one row per layer, a totals line and
/// one line per failed layer or dateline anomaly.
#[must_use]
pub fn summary_lines(report: &RunReport) -> Vec<String> {
    let mut lines = vec![
        format!(
            "{:<12} {:<10} {:>9} {:>11} {:>8} {:>9} {:>9} {:>8} {:>8} {:>8} {:>7}",
            "LAYER",
            "STAGE",
            "FEATURES",
            "COORDS",
            "WRAPPED",
            "LNG-CLAMP",
            "LAT-CLAMP",
            "REMOVED",
            "CLOSED",
            "DEDUPED",
            "EMPTY"
        ),
        "-".repeat(RULE_WIDTH),
    ];
    lines.extend(report.layers.iter().map(layer_row));
    lines.push("-".repeat(RULE_WIDTH));

    let sanitization = report.total_sanitization();
    let dateline = report.total_dateline();
    lines.push(format!(
        "{} layer(s), {} feature(s), {} coordinate(s), {} fix(es)",
        report.layers.len(),
        sanitization.features + dateline.features,
        sanitization.coordinates,
        sanitization.total_fixes()
    ));
    if report.layers.iter().any(|l| l.dateline.is_some()) {
        lines.push(format!(
            "dateline: {} wide feature(s), {} shifted, {} reanchored, {} split, {} ambiguous",
            dateline.wide_features,
            dateline.polygons_shifted,
            dateline.polygons_reanchored,
            dateline.polygons_split,
            dateline.anomalies.len()
        ));
    }

    for layer in &report.layers {
        if let Some(error) = &layer.error {
            let tag = if layer.mandatory { " (mandatory)" } else { "" };
            lines.push(format!("  {}{tag}: {error}", layer.layer));
        }
        if let Some(dateline) = &layer.dateline {
            lines.extend(
                dateline
                    .anomalies
                    .iter()
                    .map(|anomaly| anomaly_line(&layer.layer, anomaly)),
            );
        }
    }

    lines
}

fn anomaly_line(layer: &str, anomaly: &DatelineAnomaly) -> String {
    let part = anomaly
        .polygon_index
        .map_or_else(|| "feature".to_string(), |index| format!("polygon {index}"));
    format!(
        "  {layer}: {} {part} spans [{:.1}, {:.1}], needs manual review",
        anomaly.feature_id, anomaly.min_lng, anomaly.max_lng
    )
}

fn layer_row(layer: &LayerReport) -> String {
    if let Some(dateline) = &layer.dateline {
        return format!(
            "{:<12} {:<10} {:>9} {:>11} wide {} shifted {} reanchored {} split {} crossing {} ambiguous {}",
            layer.layer,
            layer.stage,
            dateline.features,
            "-",
            dateline.wide_features,
            dateline.polygons_shifted,
            dateline.polygons_reanchored,
            dateline.polygons_split,
            dateline.crossing_polygons,
            dateline.anomalies.len()
        );
    }

    let stats = layer.sanitization.unwrap_or_default();
    format!(
        "{:<12} {:<10} {:>9} {:>11} {:>8} {:>9} {:>9} {:>8} {:>8} {:>8} {:>7}",
        layer.layer,
        layer.stage,
        stats.features,
        stats.coordinates,
        stats.longitudes_wrapped,
        stats.longitudes_clamped,
        stats.latitudes_clamped,
        stats.invalid_removed,
        stats.rings_closed,
        stats.duplicates_removed,
        stats.empty_geometries
    )
}

/// Logs one line per layer at `info`, or `warn` for layers needing review.
pub fn log_summary(report: &RunReport) {
    for layer in &report.layers {
        if layer.has_critical_issues() {
            log::warn!("{}: needs review (stage {})", layer.layer, layer.stage);
        } else {
            log::info!("{}: {}", layer.layer, layer.stage);
        }
    }
}

/// Writes the report as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`SanitizeError::Json`] if serialization fails or
/// [`SanitizeError::Io`] if the file cannot be written.
pub fn write_json_report(path: &Path, report: &RunReport) -> Result<(), SanitizeError> {
    let json = serde_json::to_string_pretty(report)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| SanitizeError::io(parent, e))?;
    }
    std::fs::write(path, json).map_err(|e| SanitizeError::io(path, e))?;
    log::info!("Wrote report to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use ixstats_sanitize_models::{
        DatelineAnomaly, DatelineStats, LayerStage, SanitizationStats,
    };

    use super::*;

    fn report() -> RunReport {
        RunReport {
            layers: vec![
                LayerReport {
                    layer: "political".to_string(),
                    mandatory: true,
                    stage: LayerStage::Written,
                    sanitization: Some(SanitizationStats {
                        features: 3,
                        coordinates: 120,
                        longitudes_wrapped: 2,
                        longitudes_clamped: 4,
                        latitudes_clamped: 7,
                        rings_closed: 1,
                        ..SanitizationStats::default()
                    }),
                    dateline: None,
                    emptied_features: Vec::new(),
                    error: None,
                },
                LayerReport {
                    layer: "lakes".to_string(),
                    mandatory: false,
                    stage: LayerStage::Pending,
                    sanitization: None,
                    dateline: None,
                    emptied_features: Vec::new(),
                    error: Some("I/O error on lakes.geojson: not found".to_string()),
                },
            ],
        }
    }

    #[test]
    fn table_has_a_row_per_layer_and_totals() {
        let lines = summary_lines(&report());
        let header: Vec<&str> = lines[0].split_whitespace().collect();
        assert_eq!(&header[4..7], ["WRAPPED", "LNG-CLAMP", "LAT-CLAMP"]);

        let political = lines.iter().find(|l| l.starts_with("political")).unwrap();
        let row: Vec<&str> = political.split_whitespace().collect();
        assert_eq!(&row[4..7], ["2", "4", "7"]);

        assert!(lines.iter().any(|l| l.starts_with("lakes")));
        assert!(lines.contains(
            &"2 layer(s), 3 feature(s), 120 coordinate(s), 14 fix(es)".to_string()
        ));
        assert!(lines.iter().any(|l| l.contains("lakes: I/O error")));
        assert!(!lines.iter().any(|l| l.starts_with("dateline:")));
    }

    #[test]
    fn table_lists_dateline_anomalies() {
        let mut report = report();
        report.layers[0].sanitization = None;
        report.layers[0].dateline = Some(DatelineStats {
            features: 3,
            wide_features: 2,
            anomalies: vec![
                DatelineAnomaly {
                    feature_id: "straddler".to_string(),
                    polygon_index: Some(2),
                    min_lng: -179.0,
                    max_lng: 179.0,
                },
                DatelineAnomaly {
                    feature_id: "scattered".to_string(),
                    polygon_index: None,
                    min_lng: -179.0,
                    max_lng: 179.0,
                },
            ],
            ..DatelineStats::default()
        });
        let lines = summary_lines(&report);

        let political = lines.iter().find(|l| l.starts_with("political")).unwrap();
        assert!(political.contains("wide 2"), "{political}");
        assert!(political.contains("ambiguous 2"), "{political}");
        assert!(lines.contains(
            &"2 layer(s), 3 feature(s), 0 coordinate(s), 0 fix(es)".to_string()
        ));
        assert!(lines.iter().any(|l| l.starts_with("dateline: 2 wide feature(s)")));
        assert!(
            lines
                .iter()
                .any(|l| l.contains("straddler polygon 2 spans [-179.0, 179.0]"))
        );
        assert!(
            lines
                .iter()
                .any(|l| l.contains("scattered feature spans [-179.0, 179.0]"))
        );
    }

    #[test]
    fn json_report_round_trips() {
        let path = std::env::temp_dir()
            .join(format!("ixstats-report-{}", uuid::Uuid::new_v4()))
            .join("report.json");
        write_json_report(&path, &report()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"longitudesWrapped\": 2"));
        let parsed: RunReport = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, report());

        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }
}
