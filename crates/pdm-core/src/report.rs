//! Bridge from dashboard state into the HTML renderer.

use std::path::Path;

use pdm_common::Result;
use pdm_config::OverrideSchema;
use pdm_report::{DashboardRenderer, DashboardView, OverrideControl, OverrideReadout};

use crate::logging::event_names;
use crate::what_if::WhatIf;

const RUL_CONTROLS: [&str; 2] = [OverrideSchema::LIMIT, OverrideSchema::TREND_WINDOW];
const RF_CONTROLS: [&str; 2] = [OverrideSchema::RF_DEGRADING, OverrideSchema::RF_FAILURE];

/// Explain-mode readout for the current slider positions.
pub fn override_readout(what_if: &WhatIf) -> OverrideReadout {
    let controls = |names: &[&str]| -> Vec<OverrideControl> {
        names
            .iter()
            .filter_map(|name| {
                let param = what_if.schema().get(name)?;
                let value = what_if.values().get(name).unwrap_or(param.default);
                Some(OverrideControl::new(*name, param, value))
            })
            .collect()
    };

    OverrideReadout {
        rul_controls: controls(&RUL_CONTROLS),
        rf_controls: controls(&RF_CONTROLS),
        rul_days: what_if.rul_days(),
        rf_classification: what_if.rf_classification(),
        is_default: what_if.is_default(),
    }
}

/// Render `view`, optionally writing the page to `out`.
pub fn render_dashboard(
    renderer: &DashboardRenderer,
    view: &DashboardView<'_>,
    out: Option<&Path>,
) -> Result<String> {
    let html = renderer.render(view)?;
    if let Some(path) = out {
        std::fs::write(path, &html)?;
    }
    tracing::info!(
        target: event_names::REPORT_RENDERED,
        stage = "render",
        phase = view.state.phase(),
        explain = view.view.explain_mode,
        bytes = html.len(),
        path = out.map(|p| p.display().to_string()).unwrap_or_default(),
        "dashboard rendered"
    );
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisGenerator;
    use pdm_common::{DashboardState, HealthState, ImportMode, ImportTicket, ViewState};
    use pdm_config::ReferenceData;
    use std::sync::Arc;

    fn what_if() -> WhatIf {
        let result = AnalysisGenerator::builtin()
            .generate("99 P-02", ImportMode::Phd)
            .unwrap();
        WhatIf::from_result(&result, &OverrideSchema::builtin()).unwrap()
    }

    #[test]
    fn test_readout_at_defaults() {
        let w = what_if();
        let readout = override_readout(&w);
        assert!(readout.is_default);
        assert_eq!(readout.rul_days, w.displayed_rul_days());
        let names: Vec<_> = readout.rul_controls.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["limit_L_mm_s", "trend_window_h"]);
        assert_eq!(readout.rf_controls.len(), 2);
    }

    #[test]
    fn test_readout_tracks_moved_sliders() {
        let mut w = what_if();
        w.set_limit(9.0).unwrap();
        w.set_rf_thresholds(0.3, 0.6).unwrap();
        let readout = override_readout(&w);
        assert!(!readout.is_default);
        assert_eq!(readout.rul_controls[0].value, 9.0);
        assert_eq!(readout.rul_days, w.rul_days());
        assert_eq!(readout.rf_classification, w.rf_classification());
        assert_ne!(readout.rf_classification, HealthState::Healthy);
    }

    #[test]
    fn test_render_writes_file() {
        let result = AnalysisGenerator::builtin()
            .generate("99 P-02", ImportMode::Csv)
            .unwrap();
        let state = DashboardState::Ready(Arc::new(result));
        let view = DashboardView::new(&state, ViewState::default(), ReferenceData::builtin());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.html");

        let html =
            render_dashboard(&DashboardRenderer::default_config(), &view, Some(&path)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), html);
        assert!(html.contains("99 P-02"));
    }

    #[test]
    fn test_render_loading_page() {
        let state = DashboardState::Loading {
            ticket: ImportTicket(1),
            asset: pdm_common::AssetId::parse("99 C-01").unwrap(),
            mode: ImportMode::Phd,
        };
        let view = DashboardView::new(&state, ViewState::default(), ReferenceData::builtin());
        let html = render_dashboard(&DashboardRenderer::default_config(), &view, None).unwrap();
        assert!(html.contains("Analyzing Asset Data..."));
    }
}
