//! Where analyses come from.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use pdm_common::{AnalysisResult, AssetId, ImportMode, Result};
use pdm_config::ReferenceData;

use crate::analysis::AnalysisGenerator;
use crate::logging::event_names;

/// Asynchronous producer of complete analyses.
///
/// Resolves to a full [`AnalysisResult`] or an error, never a partial
/// result.
pub trait AnalysisSource {
    fn analyze(
        &self,
        asset: &AssetId,
        mode: ImportMode,
    ) -> impl Future<Output = Result<AnalysisResult>> + Send;
}

/// One progress message of a simulated import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPhase {
    pub message: String,
    pub duration: Duration,
}

/// Progress phases shown while an import runs.
pub fn import_phases(asset: &AssetId, mode: ImportMode) -> Vec<ImportPhase> {
    let phase = |message: String, ms: u64| ImportPhase {
        message,
        duration: Duration::from_millis(ms),
    };
    match mode {
        ImportMode::Phd => vec![
            phase("Connecting to historian...".to_string(), 700),
            phase(format!("Reading tags for {asset}..."), 1_000),
            phase("Validating timestamps...".to_string(), 500),
        ],
        ImportMode::Csv => vec![
            phase("Parsing CSV file...".to_string(), 700),
            phase("Auto-mapping columns...".to_string(), 800),
            phase("Checking data quality...".to_string(), 500),
        ],
    }
}

/// Generator behind simulated historian or upload latency.
#[derive(Debug, Clone)]
pub struct SimulatedSource {
    reference: Arc<ReferenceData>,
    latency: bool,
}

impl SimulatedSource {
    /// Source that sleeps through every import phase.
    pub fn new(reference: Arc<ReferenceData>) -> Self {
        SimulatedSource {
            reference,
            latency: true,
        }
    }

    /// Source that logs the phases without sleeping.
    pub fn instant(reference: Arc<ReferenceData>) -> Self {
        SimulatedSource {
            reference,
            latency: false,
        }
    }

    /// Total simulated latency for `mode`.
    pub fn latency_for(&self, asset: &AssetId, mode: ImportMode) -> Duration {
        if !self.latency {
            return Duration::ZERO;
        }
        import_phases(asset, mode).iter().map(|p| p.duration).sum()
    }
}

impl AnalysisSource for SimulatedSource {
    fn analyze(
        &self,
        asset: &AssetId,
        mode: ImportMode,
    ) -> impl Future<Output = Result<AnalysisResult>> + Send {
        let reference = Arc::clone(&self.reference);
        let latency = self.latency;
        let asset = asset.clone();

        async move {
            for (step, phase) in import_phases(&asset, mode).into_iter().enumerate() {
                tracing::info!(
                    target: event_names::IMPORT_PROGRESS,
                    stage = "import",
                    step = step + 1,
                    "{}",
                    phase.message
                );
                if latency {
                    tokio::time::sleep(phase.duration).await;
                }
            }
            AnalysisGenerator::new(&reference).generate(asset.as_str(), mode)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_messages() {
        let asset = AssetId::parse("99 P-02").unwrap();
        let phd: Vec<_> = import_phases(&asset, ImportMode::Phd)
            .into_iter()
            .map(|p| p.message)
            .collect();
        assert_eq!(phd[1], "Reading tags for 99 P-02...");
        let csv = import_phases(&asset, ImportMode::Csv);
        assert_eq!(csv[0].message, "Parsing CSV file...");
    }

    #[test]
    fn test_latency_totals() {
        let asset = AssetId::parse("99 P-02").unwrap();
        let source = SimulatedSource::new(Arc::new(ReferenceData::builtin().clone()));
        assert_eq!(
            source.latency_for(&asset, ImportMode::Phd),
            Duration::from_millis(2_200)
        );
        assert_eq!(
            source.latency_for(&asset, ImportMode::Csv),
            Duration::from_millis(2_000)
        );
        let instant = SimulatedSource::instant(Arc::new(ReferenceData::builtin().clone()));
        assert_eq!(instant.latency_for(&asset, ImportMode::Phd), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_source_waits_for_phases() {
        let source = SimulatedSource::new(Arc::new(ReferenceData::builtin().clone()));
        let asset = AssetId::parse("99 P-11").unwrap();
        let start = tokio::time::Instant::now();
        let result = source.analyze(&asset, ImportMode::Csv).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(2_000));
        assert_eq!(result.data_source, ImportMode::Csv);
        assert_eq!(result.asset_id, asset);
    }
}
