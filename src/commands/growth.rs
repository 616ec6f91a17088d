//! Growth commands — chart data for the frontend and the PDF export path.

use std::sync::Arc;

use tauri::State;

use crate::app_state::AppState;
use crate::db::repository;
use crate::growth::reference::{anchor_table, Measure, PercentileBand, PercentilePoint};
use crate::growth::{build_series, GrowthSeries};

/// Everything the frontend chart needs: the child's measurements, the
/// reference curves, and where the latest measurement sits.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct GrowthChartData {
    pub series: GrowthSeries,
    pub reference: Vec<PercentilePoint>,
    pub latest_band: Option<PercentileBand>,
    pub latest_band_label: Option<String>,
}

/// Chart data for one child and measure.
#[tauri::command]
pub fn get_growth_chart(
    child_name: String,
    measure: Measure,
    state: State<'_, Arc<AppState>>,
) -> Result<GrowthChartData, String> {
    let conn = state.open_db().map_err(|e| e.to_string())?;
    let history = repository::snapshot_history(&conn, &child_name).map_err(|e| e.to_string())?;

    let series = build_series(&history, measure).map_err(|e| e.to_string())?;

    let reference = anchor_table(series.sex, measure)
        .iter()
        .map(|a| PercentilePoint {
            age_months: a.month as f64,
            p3: a.p3,
            p15: a.p15,
            p50: a.p50,
            p85: a.p85,
            p97: a.p97,
        })
        .collect();

    let latest_band = series.latest_band();
    Ok(GrowthChartData {
        latest_band_label: latest_band.map(|b| b.label().to_string()),
        latest_band,
        reference,
        series,
    })
}
