//! Dashboard renderer implementation.

use crate::config::ReportConfig;
use crate::error::Result;
use crate::sections::{DashboardView, OverrideControl, OverrideReadout};

use pdm_common::{
    AnalysisResult, AssetId, CurrentView, DashboardState, ExplainPanel, ExplainStep, ImportMode,
    ModelTab, TagSource,
};
use pdm_config::overrides::XGB_OVERRIDE_NOTE;
use pdm_math::gauge_fill_pct;
use tracing::{debug, info};

/// Gauge ring radius in SVG user units.
const GAUGE_RADIUS: f64 = 45.0;

/// Renders a [`DashboardView`] to a standalone HTML page.
pub struct DashboardRenderer {
    config: ReportConfig,
}

impl DashboardRenderer {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Create a renderer with default configuration.
    pub fn default_config() -> Self {
        Self::new(ReportConfig::default())
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Render the page.
    pub fn render(&self, view: &DashboardView<'_>) -> Result<String> {
        self.config.validate()?;
        debug!(
            phase = view.state.phase(),
            explain = view.view.explain_mode,
            "rendering dashboard"
        );

        let html = self.generate_html(view);
        let output = if self.config.minify {
            let cfg = minify_html::Cfg {
                minify_css: true,
                ..Default::default()
            };
            String::from_utf8(minify_html::minify(html.as_bytes(), &cfg)).unwrap_or(html)
        } else {
            html
        };

        info!(
            bytes = output.len(),
            phase = view.state.phase(),
            "dashboard rendered"
        );
        Ok(output)
    }

    fn generate_html(&self, view: &DashboardView<'_>) -> String {
        let title = html_escape(self.config.title());
        let page = match view.view.current_view {
            CurrentView::TagRegistry => self.generate_registry(view),
            CurrentView::Dashboard => self.generate_dashboard_page(view),
        };
        let import_modal = if view.view.import_modal_open {
            self.generate_import_modal(view)
        } else {
            String::new()
        };

        format!(
            r##"<!DOCTYPE html>
<html lang="en" class="{theme_class}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <meta name="generator" content="pdm-report {version}">
    <style>
        :root {{
            --bg-primary: #ffffff;
            --bg-secondary: #f3f4f6;
            --text-primary: #111827;
            --text-secondary: #6b7280;
            --border-color: #d1d5db;
            --accent-color: #0891b2;
        }}
        .dark {{
            --bg-primary: #111827;
            --bg-secondary: #1f2937;
            --text-primary: #f3f4f6;
            --text-secondary: #9ca3af;
            --border-color: #374151;
            --accent-color: #22d3ee;
        }}
        @media (prefers-color-scheme: dark) {{
            :root:not(.light) {{
                --bg-primary: #111827;
                --bg-secondary: #1f2937;
                --text-primary: #f3f4f6;
                --text-secondary: #9ca3af;
                --border-color: #374151;
                --accent-color: #22d3ee;
            }}
        }}
        body {{
            margin: 0;
            background-color: var(--bg-primary);
            color: var(--text-primary);
            font-family: ui-sans-serif, system-ui, sans-serif;
            line-height: 1.5;
        }}
        header.app-header {{
            display: flex;
            justify-content: space-between;
            align-items: center;
            padding: 1rem 2rem;
            border-bottom: 1px solid var(--border-color);
        }}
        main {{ max-width: 80rem; margin: 0 auto; padding: 2rem; }}
        .nav-btn {{ padding: 0.5rem 1rem; border-radius: 0.375rem; }}
        .nav-btn.active {{ background: var(--accent-color); color: var(--bg-primary); }}
        .grid {{ display: grid; gap: 1.5rem; }}
        .grid-main {{ grid-template-columns: 2fr 1fr; }}
        .grid-pair {{ grid-template-columns: 1fr 1fr; }}
        .card {{
            background-color: var(--bg-secondary);
            border: 1px solid var(--border-color);
            border-radius: 0.75rem;
            padding: 1.5rem;
        }}
        .panel {{ text-align: center; padding: 5rem 1.5rem; border-radius: 0.5rem; }}
        .panel.error {{ border: 1px solid #ef4444; color: #fca5a5; }}
        .muted {{ color: var(--text-secondary); }}
        .mono {{ font-family: ui-monospace, monospace; }}
        .badge {{ display: inline-flex; padding: 0.125rem 0.5rem; border-radius: 9999px; font-size: 0.75rem; }}
        .badge.manual {{ background: #14532d; color: #86efac; }}
        .badge.auto-fill {{ background: #713f12; color: #fde047; }}
        .step {{ padding: 0.5rem; margin-bottom: 0.5rem; border-radius: 0.25rem; background: var(--bg-primary); }}
        .narration {{ font-style: italic; font-size: 0.75rem; text-align: center; }}
        .vote-bar {{ height: 1.25rem; border-radius: 0 0.25rem 0.25rem 0; }}
        .slider {{ height: 0.5rem; background: var(--border-color); border-radius: 0.25rem; }}
        .slider-fill {{ height: 100%; background: var(--accent-color); border-radius: 0.25rem; }}
        .override.disabled {{ opacity: 0.5; }}
        .slow {{ background: #713f12; color: #fde047; }}
        .tab-btn {{ padding-bottom: 0.5rem; border-bottom: 2px solid transparent; }}
        .tab-btn.active {{ border-bottom-color: var(--accent-color); color: var(--accent-color); }}
        .modal {{
            position: fixed;
            inset: 0;
            background: rgba(0, 0, 0, 0.7);
            display: flex;
            align-items: center;
            justify-content: center;
        }}
        .modal-body {{ max-width: 56rem; width: 100%; max-height: 90vh; overflow-y: auto; }}
        table {{ width: 100%; border-collapse: collapse; font-size: 0.875rem; }}
        th, td {{ text-align: left; padding: 0.5rem 1rem; border-bottom: 1px solid var(--border-color); }}
        @media print {{
            .no-print {{ display: none !important; }}
            .card {{ page-break-inside: avoid; }}
        }}
    </style>
</head>
<body data-state="{phase}" data-view="{current_view}">
    {header}
    <main>
        {page}
    </main>
    {import_modal}
</body>
</html>"##,
            theme_class = self.config.theme.css_class(),
            title = title,
            version = env!("CARGO_PKG_VERSION"),
            phase = view.state.phase(),
            current_view = match view.view.current_view {
                CurrentView::Dashboard => "dashboard",
                CurrentView::TagRegistry => "tag_registry",
            },
            header = self.generate_header(view, &title),
            page = page,
            import_modal = import_modal,
        )
    }

    fn generate_header(&self, view: &DashboardView<'_>, title: &str) -> String {
        let nav = |label: &str, target: CurrentView| {
            let class = if view.view.current_view == target {
                "nav-btn active"
            } else {
                "nav-btn"
            };
            format!(r#"<button class="{class}">{label}</button>"#)
        };
        format!(
            r##"<header class="app-header">
        <h1>{title}</h1>
        <nav class="no-print">{dashboard}{registry}</nav>
        <button class="nav-btn no-print" id="import-btn">Import Data</button>
    </header>"##,
            dashboard = nav("Dashboard", CurrentView::Dashboard),
            registry = nav("Tag Registry", CurrentView::TagRegistry),
        )
    }

    fn generate_dashboard_page(&self, view: &DashboardView<'_>) -> String {
        match view.state {
            DashboardState::Empty => generate_welcome(),
            DashboardState::Loading { asset, mode, .. } => generate_loading(asset, *mode),
            DashboardState::Failed { message } => generate_error(message),
            DashboardState::Ready(result) => self.generate_dashboard(view, result),
        }
    }

    fn generate_dashboard(&self, view: &DashboardView<'_>, result: &AnalysisResult) -> String {
        let sections = &self.config.sections;
        let overrides = view.active_overrides();

        let mut pair = String::new();
        if sections.rul_gauge {
            pair.push_str(&self.generate_rul_card(view, result));
        }
        if sections.health {
            pair.push_str(&generate_health_card(result, overrides));
        }

        let mut left = vec![format!(r#"<div class="grid grid-pair">{pair}</div>"#)];
        if sections.explanation {
            left.push(generate_explanation_card(result));
        }
        if sections.model_internals {
            left.push(self.generate_model_internals(view, result));
        }
        if sections.shap {
            left.push(generate_shap_table(result));
        }

        let mut right = Vec::new();
        if sections.recommendation {
            right.push(format!(
                r#"<section class="card" id="recommendation"><h3>Recommendation</h3><p>{}</p></section>"#,
                html_escape(&result.recommendation)
            ));
        }
        if sections.import_info {
            right.push(generate_import_info(result));
        }
        if sections.tracked_tags {
            right.push(generate_tracked_tags(result));
        }
        right.push(format!(
            r#"<section class="card no-print" id="feedback" data-feedback-id="{}"><h3>Was this explanation clear?</h3></section>"#,
            html_escape(&result.feedback_id.0)
        ));
        if sections.performance {
            right.push(generate_performance(result));
        }

        let modal = if view.view.tag_summary_open {
            self.generate_tag_summary_modal(view, result)
        } else {
            String::new()
        };

        format!(
            r##"<div class="dashboard">
        <div class="dashboard-header">
            <h2>Asset: <span class="mono">{asset}</span></h2>
            <p class="muted">Analysis as of {timestamp}{unit}</p>
            <div class="no-print">
                <span>Explain &amp; Override Mode</span>
                <button id="explain-toggle" aria-pressed="{explain}">{explain_label}</button>
                <button id="tag-summary-btn">View Monitored Tags</button>
            </div>
        </div>
        <div class="grid grid-main">
            <div class="grid">{left}</div>
            <div class="grid">{right}</div>
        </div>
        {modal}
    </div>"##,
            asset = html_escape(result.asset_id.as_str()),
            timestamp = result.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            unit = result
                .refinery_unit
                .as_deref()
                .map(|u| format!(" · {}", html_escape(u)))
                .unwrap_or_default(),
            explain = view.view.explain_mode,
            explain_label = if view.view.explain_mode { "ON" } else { "OFF" },
            left = left.join("\n"),
            right = right.join("\n"),
            modal = modal,
        )
    }

    fn generate_rul_card(&self, view: &DashboardView<'_>, result: &AnalysisResult) -> String {
        let overrides = view.active_overrides();
        let days = overrides.map_or(result.rul_days, |o| o.rul_days);
        let pct = gauge_fill_pct(days, self.config.gauge_max_days);
        let circumference = 2.0 * std::f64::consts::PI * GAUGE_RADIUS;
        let offset = circumference - pct / 100.0 * circumference;
        let color = result.health_state.color();
        let [ci_low, ci_high] = result.rul_ci_days;

        let explain = if view.view.explain_mode {
            let controls = overrides
                .map(|o| generate_override_controls(&o.rul_controls))
                .unwrap_or_default();
            format!(
                r#"<div class="explain">
                <p class="narration">Fitting a robust trend to recent sensor data to project when the vibration limit (L) will be crossed.</p>
                {trace}
                <div class="overrides">{controls}</div>
            </div>"#,
                trace = generate_step_trace(&result.explain_panel),
            )
        } else {
            String::new()
        };

        format!(
            r##"<section class="card" id="rul-gauge">
            <h3>Remaining Useful Life</h3>
            <svg viewBox="0 0 100 100" width="160" height="160" role="img" aria-label="{days} days remaining">
                <circle cx="50" cy="50" r="{r}" stroke="#374151" stroke-width="10" fill="transparent" transform="rotate(-90 50 50)"/>
                <circle cx="50" cy="50" r="{r}" stroke="{color}" stroke-width="10" stroke-linecap="round" fill="transparent" stroke-dasharray="{circumference:.2}" stroke-dashoffset="{offset:.2}" transform="rotate(-90 50 50)" data-fill-pct="{pct:.1}"/>
                <text x="50" y="50" text-anchor="middle" dominant-baseline="middle" fill="{color}" font-size="20">{days}</text>
                <text x="50" y="66" text-anchor="middle" font-size="8">days</text>
            </svg>
            <p class="muted">95% CI: [{ci_low}, {ci_high}] days</p>
            {explain}
        </section>"##,
            r = GAUGE_RADIUS,
        )
    }

    fn generate_model_internals(&self, view: &DashboardView<'_>, result: &AnalysisResult) -> String {
        let tab = view.view.active_tab;
        let tab_button = |t: ModelTab| {
            let class = if t == tab { "tab-btn active" } else { "tab-btn" };
            format!(
                r#"<button class="{class}" data-tab="{t}">{}</button>"#,
                t.label()
            )
        };

        let panel = match tab {
            ModelTab::Rf => &result.rf_explain_panel,
            ModelTab::Xgb => &result.xgb_explain_panel,
        };
        let body = match tab {
            ModelTab::Rf => generate_rf_votes(panel),
            ModelTab::Xgb => format!(
                r#"<h4>Stepwise Risk Calculation</h4>{}"#,
                generate_step_trace(panel)
            ),
        };

        let explain = if view.view.explain_mode {
            let narration = panel
                .narration
                .as_deref()
                .unwrap_or("Each model uses different features to determine asset health.");
            let overrides = match tab {
                ModelTab::Rf => view
                    .active_overrides()
                    .map(|o| generate_override_controls(&o.rf_controls))
                    .unwrap_or_default(),
                ModelTab::Xgb => format!(r#"<p class="muted">{XGB_OVERRIDE_NOTE}</p>"#),
            };
            // The XGB body already shows its trace.
            let trace = match tab {
                ModelTab::Rf => generate_step_trace(panel),
                ModelTab::Xgb => String::new(),
            };
            format!(
                r#"<div class="explain"><p class="narration">{}</p>{trace}<div class="overrides">{overrides}</div></div>"#,
                html_escape(narration)
            )
        } else {
            String::new()
        };

        format!(
            r##"<section class="card" id="model-internals">
            <h3>Model Internals</h3>
            <nav class="tabs">{rf}{xgb}</nav>
            <div class="tab-body" data-active-tab="{tab}">{body}</div>
            {explain}
        </section>"##,
            rf = tab_button(ModelTab::Rf),
            xgb = tab_button(ModelTab::Xgb),
        )
    }

    fn generate_tag_summary_modal(
        &self,
        view: &DashboardView<'_>,
        result: &AnalysisResult,
    ) -> String {
        let summary = &result.asset_tag_summary;
        let registry = &view.reference.tag_registry;

        let rows = if summary.tags.is_empty() {
            r#"<tr><td colspan="6" class="muted">No monitored tags for this asset.</td></tr>"#
                .to_string()
        } else {
            summary
                .tags
                .iter()
                .map(|tag| {
                    let description = registry
                        .lookup(&tag.tag)
                        .map_or("No description available.", |t| t.description.as_str());
                    let badge = match tag.source {
                        TagSource::Manual => "manual",
                        TagSource::AutoFill => "auto-fill",
                    };
                    format!(
                        r#"<tr><td>{kind}</td><td class="mono" title="{description}">{code}</td><td>{location}</td><td>{unit}</td><td><span class="badge {badge}">{source}</span></td><td>Active</td></tr>"#,
                        kind = tag.kind.label(),
                        description = html_escape(description),
                        code = html_escape(&tag.tag),
                        location = html_escape(&tag.location),
                        unit = html_escape(&tag.unit),
                        source = tag.source.label(),
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        };

        format!(
            r##"<div class="modal" id="tag-summary">
        <div class="card modal-body">
            <h2>Asset Tag Summary</h2>
            <p class="mono">{asset}</p>
            <dl>
                <dt>Tag Source</dt><dd>{source}</dd>
                <dt>Total Tags</dt><dd>{total}</dd>
                <dt>Sensor Coverage</dt><dd>{coverage}%{incomplete}</dd>
            </dl>
            <table>
                <thead><tr><th>Parameter Type</th><th>Tag Code</th><th>Sensor Location</th><th>Unit</th><th>Source</th><th>Status</th></tr></thead>
                <tbody>{rows}</tbody>
            </table>
        </div>
    </div>"##,
            asset = html_escape(summary.asset_id.as_str()),
            source = if summary.auto_filled {
                "Auto-Filled from Import"
            } else {
                "Manual Registry"
            },
            total = summary.tags.len(),
            coverage = summary.coverage_pct,
            incomplete = if summary.coverage_pct < 100 {
                " (Incomplete)"
            } else {
                ""
            },
        )
    }

    fn generate_import_modal(&self, view: &DashboardView<'_>) -> String {
        let selected = match view.state {
            DashboardState::Loading { asset, .. } => Some(asset.as_str()),
            DashboardState::Ready(result) => Some(result.asset_id.as_str()),
            _ => None,
        };

        let mut groups = String::new();
        for unit in view.reference.refinery_units.iter() {
            let options: String = unit
                .assets
                .iter()
                .map(|asset| {
                    let sel = if Some(asset.as_str()) == selected {
                        " selected"
                    } else {
                        ""
                    };
                    format!(
                        r#"<option value="{a}"{sel}>{a}</option>"#,
                        a = html_escape(asset)
                    )
                })
                .collect();
            groups.push_str(&format!(
                r#"<optgroup label="{}">{options}</optgroup>"#,
                html_escape(&unit.name)
            ));
        }

        format!(
            r##"<div class="modal" id="import-modal">
        <div class="card modal-body">
            <h2>Import Sensor Data</h2>
            <label for="asset-select">Equipment Asset</label>
            <select id="asset-select">{groups}</select>
            <nav class="tabs">
                <button class="tab-btn active" data-mode="{phd}">{phd_label}</button>
                <button class="tab-btn" data-mode="{csv}">{csv_label}</button>
            </nav>
            <button id="run-analysis">Run Analysis</button>
        </div>
    </div>"##,
            phd = ImportMode::Phd,
            phd_label = ImportMode::Phd.label(),
            csv = ImportMode::Csv,
            csv_label = ImportMode::Csv.label(),
        )
    }

    fn generate_registry(&self, view: &DashboardView<'_>) -> String {
        let filter = view.registry_filter.as_deref().unwrap_or("");
        let matches = view.reference.tag_registry.search(filter);

        let rows = if matches.is_empty() {
            format!(
                r#"<tr><td colspan="6" class="muted">No tags found for "{}"</td></tr>"#,
                html_escape(filter)
            )
        } else {
            matches
                .iter()
                .map(|t| {
                    format!(
                        r#"<tr><td>{}</td><td>{}</td><td class="mono">{}</td><td>{}</td><td>{}</td><td title="{d}">{d}</td></tr>"#,
                        html_escape(&t.refinery_unit),
                        html_escape(&t.asset),
                        html_escape(&t.tag),
                        html_escape(&t.parameter),
                        html_escape(&t.unit),
                        d = html_escape(&t.description),
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        };

        format!(
            r##"<section class="card" id="tag-registry">
        <h2>Sensor Tag Registry</h2>
        <input type="search" placeholder="Search by tag, parameter, asset..." value="{filter}">
        <table>
            <thead><tr><th>Unit</th><th>Asset</th><th>Tag Code</th><th>Parameter</th><th>Unit</th><th>Description</th></tr></thead>
            <tbody>{rows}</tbody>
        </table>
    </section>"##,
            filter = html_escape(filter),
        )
    }
}

fn generate_welcome() -> String {
    r##"<div class="panel card" id="welcome">
        <h2>No Data Loaded</h2>
        <p class="muted">Please import data from a source like Honeywell PHD or a CSV file to begin an analysis.</p>
        <button class="nav-btn active">Import Data</button>
    </div>"##
        .to_string()
}

fn generate_loading(asset: &AssetId, mode: ImportMode) -> String {
    format!(
        r##"<div class="panel card" id="loading" role="status">
        <div class="spinner" aria-hidden="true"></div>
        <p>Analyzing Asset Data...</p>
        <p class="muted">{asset} via {mode}. This may take a moment.</p>
    </div>"##,
        asset = html_escape(asset.as_str()),
        mode = mode.label(),
    )
}

fn generate_error(message: &str) -> String {
    format!(
        r##"<div class="panel error" id="error" role="alert">
        <h2>Analysis Failed</h2>
        <p>{}</p>
    </div>"##,
        html_escape(message)
    )
}

fn generate_health_card(result: &AnalysisResult, overrides: Option<&OverrideReadout>) -> String {
    let state = result.health_state;
    let rf_line = overrides
        .map(|o| {
            format!(
                r#"<p class="muted">RF class at current thresholds: <span style="color: {}">{}</span></p>"#,
                o.rf_classification.color(),
                o.rf_classification
            )
        })
        .unwrap_or_default();
    format!(
        r##"<section class="card" id="health" data-health="{state}">
            <h3>Health Status</h3>
            <p style="color: {color}; font-size: 1.875rem; font-weight: 700">{state}</p>
            <p class="muted">Risk {risk:.2}</p>
            {rf_line}
        </section>"##,
        color = result.ui_color,
        risk = result.risk,
    )
}

fn generate_explanation_card(result: &AnalysisResult) -> String {
    let text = if result.explanation_text.is_empty() {
        &result.explanation.plain_text
    } else {
        &result.explanation_text
    };
    format!(
        r##"<section class="card" id="explanation">
            <h3>AI Interpretation</h3>
            <p>{}</p>
            <p class="mono muted">{}</p>
        </section>"##,
        html_escape(text),
        html_escape(&result.explanation.rul_equation)
    )
}

fn generate_rf_votes(panel: &ExplainPanel) -> String {
    let Some(votes) = panel.rf_votes else {
        return r#"<p class="muted">No explanation data available.</p>"#.to_string();
    };
    let bar = |label: &str, share: f64, color: &str| {
        let pct = share * 100.0;
        format!(
            r#"<div class="vote"><span>{label}</span><div class="vote-bar" style="width: {pct:.1}%; background: {color}"></div><span class="mono">{pct:.1}%</span></div>"#
        )
    };
    format!(
        "<h4>Tree Votes</h4>{}{}{}",
        bar("Healthy", votes.healthy, "#2ECC71"),
        bar("Degrading", votes.degrading, "#F1C40F"),
        bar("Failure", votes.failure, "#E74C3C"),
    )
}

fn generate_step_trace(panel: &ExplainPanel) -> String {
    if panel.steps.is_empty() {
        return r#"<p class="muted">No explanation data available.</p>"#.to_string();
    }
    let steps: String = panel.steps.iter().map(generate_step).collect();
    let narration = panel
        .narration
        .as_deref()
        .map(|n| format!(r#"<p class="narration">{}</p>"#, html_escape(n)))
        .unwrap_or_default();
    format!(
        r#"<ol class="trace" data-model="{}">{steps}</ol>{narration}"#,
        panel.model.title()
    )
}

fn generate_step(step: &ExplainStep) -> String {
    let mut html = format!(
        r#"<li class="step"><span>{}. {}</span>"#,
        step.step,
        html_escape(&step.desc)
    );
    if let Some(formula) = &step.formula {
        html.push_str(&format!(r#" <code>{}</code>"#, html_escape(formula)));
    }
    if let Some(values) = &step.values {
        let joined = values
            .iter()
            .map(|(k, v)| format!("{k}: {}", v.display()))
            .collect::<Vec<_>>()
            .join(", ");
        html.push_str(&format!(
            r#"<p class="mono muted">{}</p>"#,
            html_escape(&joined)
        ));
    }
    if let Some(result) = &step.result {
        let units = step.units.as_deref().unwrap_or("");
        html.push_str(&format!(
            r#"<p class="step-result">{} {}</p>"#,
            html_escape(&result.display()),
            html_escape(units)
        ));
    }
    if let Some(importance) = &step.importance {
        let joined = importance
            .iter()
            .map(|w| format!("{}: {:.2}", w.feature, w.weight))
            .collect::<Vec<_>>()
            .join(", ");
        html.push_str(&format!(
            r#"<p class="mono muted">{}</p>"#,
            html_escape(&joined)
        ));
    }
    html.push_str("</li>");
    html
}

fn generate_override_controls(controls: &[OverrideControl]) -> String {
    controls
        .iter()
        .map(|c| {
            let disabled = if c.param.enabled { "" } else { " disabled" };
            format!(
                r#"<div class="override{disabled}" data-name="{name}" title="{tooltip}"><label>{label}</label><span class="mono">{value}</span><div class="slider"><div class="slider-fill" style="width: {pos:.1}%"></div></div><span class="muted">{min} – {max}</span></div>"#,
                name = html_escape(&c.name),
                tooltip = html_escape(&c.param.tooltip),
                label = html_escape(&c.param.label),
                value = html_escape(&c.formatted()),
                pos = c.param.position_pct(c.value),
                min = c.param.min,
                max = c.param.max,
            )
        })
        .collect()
}

fn generate_shap_table(result: &AnalysisResult) -> String {
    let rows: String = result
        .shap_summary
        .iter()
        .enumerate()
        .map(|(i, f)| {
            let feature = match &f.unit {
                Some(unit) => format!("{} ({})", f.feature, unit),
                None => f.feature.clone(),
            };
            format!(
                r#"<tr><td>{rank}</td><td>{feature}</td><td class="mono">{phi:+.4}</td><td>{arrow}</td><td class="muted">{note}</td></tr>"#,
                rank = i + 1,
                feature = html_escape(&feature),
                phi = f.signed_phi(),
                arrow = f.direction.arrow(),
                note = html_escape(f.note.as_deref().unwrap_or("")),
            )
        })
        .collect();
    format!(
        r##"<section class="card" id="shap">
            <h3>Top Risk Contributors (SHAP)</h3>
            <table>
                <thead><tr><th>#</th><th>Feature</th><th>SHAP Value</th><th>Direction</th><th>Note</th></tr></thead>
                <tbody>{rows}</tbody>
            </table>
        </section>"##
    )
}

fn generate_import_info(result: &AnalysisResult) -> String {
    let status = &result.import_status;
    let quality = &result.data_quality;
    let telemetry = &result.telemetry;
    let auto_fill = result
        .auto_fill_source
        .as_deref()
        .map(|s| format!("<dt>Tags Auto-Filled From</dt><dd class=\"mono\">{}</dd>", html_escape(s)))
        .unwrap_or_default();
    format!(
        r##"<section class="card" id="import-info">
            <h3>Data Source &amp; Quality</h3>
            <dl>
                <dt>Source</dt><dd>{mode}</dd>
                <dt>File</dt><dd class="mono">{file}</dd>
                <dt>Rows</dt><dd>{valid} / {rows} valid ({quality_pct:.1}%)</dd>
                <dt>Missing</dt><dd>{missing:.1}%</dd>
                <dt>Unit Mismatch</dt><dd>{mismatch}</dd>
                <dt>Fetch / Parse / Map</dt><dd class="mono">{fetch} / {parse} / {map} ms</dd>
                {auto_fill}
            </dl>
        </section>"##,
        mode = html_escape(&result.import_mode),
        file = html_escape(&result.source_file),
        valid = status.valid_rows,
        rows = status.rows_read,
        quality_pct = status.quality_pct,
        missing = quality.missing_pct,
        mismatch = if quality.unit_mismatch { "Yes" } else { "No" },
        fetch = telemetry.fetch_ms,
        parse = telemetry.parse_ms,
        map = telemetry.map_ms,
    )
}

fn generate_tracked_tags(result: &AnalysisResult) -> String {
    let tags = &result.tags_tracked;
    let body = if tags.is_empty() {
        r#"<p class="muted">No registry tags matched this asset.</p>"#.to_string()
    } else {
        tags.iter()
            .map(|t| {
                format!(
                    r#"<div class="step" title="{desc}"><p class="mono">{tag}</p><p class="muted">{param} ({unit})</p></div>"#,
                    desc = html_escape(t.description.as_deref().unwrap_or("")),
                    tag = html_escape(&t.tag),
                    param = html_escape(&t.parameter),
                    unit = html_escape(&t.unit),
                )
            })
            .collect()
    };
    format!(
        r##"<section class="card" id="tracked-tags">
            <h3>Tracked Tags in Model</h3>
            {body}
            <p class="muted">{count} tags feed the model.</p>
        </section>"##,
        count = tags.len(),
    )
}

fn generate_performance(result: &AnalysisResult) -> String {
    let rows: String = result
        .metrics
        .stages()
        .into_iter()
        .map(|(stage, ms, limit)| {
            let label = match stage {
                "feature" => "Feature Extraction",
                "model" => "Model Inference",
                "shap" => "SHAP Calculation",
                _ => "UI Render",
            };
            let class = if ms > limit { " class=\"slow\"" } else { "" };
            format!(r#"<dt>{label}</dt><dd{class} data-stage="{stage}">{ms} ms</dd>"#)
        })
        .collect();
    format!(
        r##"<section class="card" id="performance">
            <h3>Performance SLOs</h3>
            <dl>{rows}</dl>
            <p class="muted">Total {total} ms</p>
        </section>"##,
        total = result.metrics.total_ms(),
    )
}

/// Escape HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdm_common::ViewState;
    use pdm_config::ReferenceData;

    fn render(state: &DashboardState, view: ViewState) -> String {
        let view = DashboardView::new(state, view, ReferenceData::builtin());
        DashboardRenderer::default_config().render(&view).unwrap()
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
        assert_eq!(html_escape(r#""quoted""#), "&quot;quoted&quot;");
    }

    #[test]
    fn test_empty_state_shows_welcome() {
        let html = render(&DashboardState::Empty, ViewState::default());
        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("No Data Loaded"));
        assert!(html.contains(r#"data-state="empty""#));
    }

    #[test]
    fn test_failed_state_escapes_message() {
        let state = DashboardState::Failed {
            message: "historian <down>".to_string(),
        };
        let html = render(&state, ViewState::default());
        assert!(html.contains("Analysis Failed"));
        assert!(html.contains("historian &lt;down&gt;"));
        assert!(!html.contains("<down>"));
    }

    #[test]
    fn test_loading_names_asset() {
        let state = DashboardState::Loading {
            ticket: pdm_common::ImportTicket(3),
            asset: AssetId::parse("99 P-02").unwrap(),
            mode: ImportMode::Csv,
        };
        let html = render(&state, ViewState::default());
        assert!(html.contains("Analyzing Asset Data..."));
        assert!(html.contains("99 P-02 via CSV Upload"));
    }

    #[test]
    fn test_registry_page_filters() {
        let state = DashboardState::Empty;
        let mut view = ViewState::default();
        view.show(CurrentView::TagRegistry);
        let page = DashboardView::new(&state, view, ReferenceData::builtin())
            .with_registry_filter("no-such-tag");
        let html = DashboardRenderer::default_config().render(&page).unwrap();
        assert!(html.contains("Sensor Tag Registry"));
        assert!(html.contains(r#"No tags found for "no-such-tag""#));
        assert!(!html.contains("No Data Loaded"));
    }

    #[test]
    fn test_zero_gauge_config_rejected() {
        let state = DashboardState::Empty;
        let view = DashboardView::new(&state, ViewState::default(), ReferenceData::builtin());
        let renderer = DashboardRenderer::new(ReportConfig::default().with_gauge_max_days(0));
        assert!(renderer.render(&view).is_err());
    }
}
