//! High-level pipeline: orchestrates ingest → analyze → advisory artifacts → export.
//!
//! This module owns the single mutable state record of the dashboard and is
//! the only writer to it. Hosts drive it with discrete events (an upload, an
//! analysis request, an advisory response) and read phase, busy flags, the
//! notification stream and the derived artifacts back out.
//!
//! # Major types
//! - [`Pipeline`]: the state record plus its transition methods
//! - [`AnalysisRun`]: ticket for an in-flight analysis; carries the epoch
//!   that makes stale completions discardable
//! - [`ExportArtifact`]: finished export (deterministic filename + bytes)
//!
//! # Responsibilities
//! - Guarded transitions: every rejected request leaves the record in its
//!   last good state and emits a single warning/error notification
//! - Atomic invalidation: replacing the dataset drops the analysis result,
//!   recommendations and clinical report in one step
//! - Invokes logging throughout for traceability (see tracing events)
//!
//! # Error handling
//! Every failure is local and user-retryable; there is no fatal class.
//! Advisory transport failures leave previously fetched artifacts untouched.

use std::time::Duration;

use time::OffsetDateTime;
use tracing::{debug, error, info, warn};

use crate::advisory::{AdvisoryClient, ClinicalSummary};
use crate::analysis::{self, Algorithm, AnalysisResult};
use crate::config::Config;
use crate::dataset::{self, DatasetDescriptor};
use crate::export;
use crate::notify::{NotificationLog, Severity};
use crate::report_pdf;

const RESULTS_STEM: &str = "oncodash-results";
const CLINICAL_STEM: &str = "oncodash-clinical-report";

/// Errors surfaced by pipeline operations. Every variant leaves the record
/// in its last good state.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("no dataset loaded")]
    EmptyInput,
    #[error("upload is not valid UTF-8 text")]
    ReadFailure(#[from] std::str::Utf8Error),
    #[error("missing prerequisite: {0}")]
    MissingPrerequisite(&'static str),
    #[error("{0} is already running")]
    AlreadyRunning(&'static str),
    #[error(transparent)]
    Transport(#[from] crate::advisory::TransportError),
}

/// Coarse pipeline phase derived from the state record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Ready,
    Analyzing,
    Analyzed,
}

/// Per-sub-flow busy flags for host UIs. Ingestion is synchronous, so it
/// has no pending flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Busy {
    pub analyzing: bool,
    pub recommending: bool,
    pub reporting: bool,
}

/// The active dataset: raw content plus its extracted descriptor.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub content: String,
    pub descriptor: DatasetDescriptor,
}

/// Ticket for an in-flight analysis run. Completing a ticket whose epoch no
/// longer matches the pipeline discards the result instead of committing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisRun {
    epoch: u64,
    algorithm: Algorithm,
}

impl AnalysisRun {
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}

/// Finished export artifact: deterministic filename plus raw bytes.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// The dashboard's single state record and the only writer to it.
#[derive(Debug)]
pub struct Pipeline {
    dataset: Option<LoadedDataset>,
    result: Option<AnalysisResult>,
    recommendations: Option<Vec<String>>,
    clinical_report: Option<String>,
    notifications: NotificationLog,
    epoch: u64,
    pending_analysis: Option<AnalysisRun>,
    busy: Busy,
    analysis_delay: Duration,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        Self {
            dataset: None,
            result: None,
            recommendations: None,
            clinical_report: None,
            notifications: NotificationLog::default(),
            epoch: 0,
            pending_analysis: None,
            busy: Busy::default(),
            analysis_delay: Duration::from_millis(config.analysis_delay_ms),
        }
    }

    pub fn phase(&self) -> Phase {
        if self.pending_analysis.is_some() {
            Phase::Analyzing
        } else if self.result.is_some() {
            Phase::Analyzed
        } else if self.dataset.is_some() {
            Phase::Ready
        } else {
            Phase::Idle
        }
    }

    pub fn busy(&self) -> Busy {
        self.busy
    }

    pub fn dataset(&self) -> Option<&LoadedDataset> {
        self.dataset.as_ref()
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn recommendations(&self) -> Option<&[String]> {
        self.recommendations.as_deref()
    }

    pub fn clinical_report(&self) -> Option<&str> {
        self.clinical_report.as_deref()
    }

    pub fn notifications(&self) -> &NotificationLog {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationLog {
        &mut self.notifications
    }

    /// Ingests an uploaded file. On success the previous dataset and every
    /// derived artifact are replaced in one step; on a decode failure the
    /// record is left untouched.
    pub fn load_dataset(
        &mut self,
        name: &str,
        mime: Option<&str>,
        raw: &[u8],
    ) -> Result<DatasetDescriptor, PipelineError> {
        let content = match std::str::from_utf8(raw) {
            Ok(text) => text.to_string(),
            Err(e) => {
                error!(error = %e, file = name, "Failed to decode upload as text");
                self.notifications
                    .push(Severity::Error, format!("Failed to read {name}"));
                return Err(PipelineError::ReadFailure(e));
            }
        };
        self.notifications
            .push(Severity::Info, format!("Loading dataset {name}"));

        let mut descriptor = dataset::extract(&content);
        descriptor.name = name.to_string();
        descriptor.size_bytes = raw.len() as u64;
        descriptor.format = dataset::format_of(name, mime);

        self.replace_dataset(Some(LoadedDataset {
            content,
            descriptor: descriptor.clone(),
        }));
        info!(
            file = name,
            rows = descriptor.row_count,
            columns = descriptor.column_count,
            "Dataset loaded"
        );
        self.notifications
            .push(Severity::Success, format!("Dataset {name} loaded"));
        Ok(descriptor)
    }

    /// Ingests dataset content pasted directly, without file metadata.
    pub fn load_text(&mut self, content: &str) -> DatasetDescriptor {
        let mut descriptor = dataset::extract(content);
        descriptor.name = "inline".to_string();
        descriptor.size_bytes = content.len() as u64;

        self.replace_dataset(Some(LoadedDataset {
            content: content.to_string(),
            descriptor: descriptor.clone(),
        }));
        info!(
            rows = descriptor.row_count,
            columns = descriptor.column_count,
            "Inline dataset loaded"
        );
        self.notifications.push(Severity::Success, "Dataset loaded");
        descriptor
    }

    /// Drops the dataset and everything derived from it.
    pub fn clear(&mut self) {
        self.replace_dataset(None);
        info!("Pipeline cleared");
        self.notifications.push(Severity::Info, "Data cleared");
    }

    /// Starts an analysis run. Rejected without a dataset, or while another
    /// run is pending (a duplicate request is a no-op, not a restart).
    pub fn begin_analysis(&mut self, algorithm: Algorithm) -> Result<AnalysisRun, PipelineError> {
        if self.dataset.is_none() {
            warn!("Analysis requested without a dataset");
            self.notifications
                .push(Severity::Warning, "Load a dataset first");
            return Err(PipelineError::EmptyInput);
        }
        if self.pending_analysis.is_some() {
            warn!("Analysis requested while a run is pending");
            self.notifications
                .push(Severity::Warning, "An analysis is already running");
            return Err(PipelineError::AlreadyRunning("analysis"));
        }

        let run = AnalysisRun {
            epoch: self.epoch,
            algorithm,
        };
        self.pending_analysis = Some(run);
        self.busy.analyzing = true;
        info!(algorithm = algorithm.label(), "Analysis started");
        self.notifications.push(Severity::Info, "Processing...");
        Ok(run)
    }

    /// Commits a finished run. A ticket whose epoch no longer matches (the
    /// dataset changed underneath it) is discarded and `None` is returned;
    /// nothing in the record changes.
    pub fn complete_analysis(&mut self, run: AnalysisRun) -> Option<&AnalysisResult> {
        if self.pending_analysis != Some(run) {
            debug!(
                run_epoch = run.epoch,
                current_epoch = self.epoch,
                "Discarding stale analysis completion"
            );
            return None;
        }
        self.pending_analysis = None;
        self.busy.analyzing = false;

        let result = analysis::synthesize(run.algorithm);
        info!(
            algorithm = %result.algorithm_label,
            accuracy = result.accuracy,
            "Analysis completed"
        );
        self.notifications
            .push(Severity::Success, "Analysis completed");
        self.result = Some(result);
        self.result.as_ref()
    }

    /// Runs a full analysis in place: start, wait out the synthetic
    /// model-fit delay, commit.
    pub async fn run_analysis(
        &mut self,
        algorithm: Algorithm,
    ) -> Result<&AnalysisResult, PipelineError> {
        let run = self.begin_analysis(algorithm)?;
        tokio::time::sleep(self.analysis_delay).await;
        self.complete_analysis(run)
            .ok_or(PipelineError::MissingPrerequisite("analysis run"))
    }

    /// Fetches tuning recommendations for the active dataset. A transport
    /// failure keeps whatever a previous successful fetch stored.
    pub async fn fetch_recommendations<C>(
        &mut self,
        client: &C,
    ) -> Result<&[String], PipelineError>
    where
        C: AdvisoryClient + ?Sized,
    {
        if self.dataset.is_none() {
            warn!("Recommendations requested without a dataset");
            self.notifications
                .push(Severity::Warning, "Load a dataset first");
            return Err(PipelineError::EmptyInput);
        }
        if self.busy.recommending {
            warn!("Recommendation fetch requested while one is outstanding");
            self.notifications
                .push(Severity::Warning, "A recommendation request is already running");
            return Err(PipelineError::AlreadyRunning("recommendation fetch"));
        }

        self.busy.recommending = true;
        self.notifications
            .push(Severity::Info, "Fetching recommendations...");
        let content = self
            .dataset
            .as_ref()
            .map(|dataset| dataset.content.as_str())
            .unwrap_or_default();
        let outcome = client.fetch_recommendations(content).await;
        self.busy.recommending = false;

        match outcome {
            Ok(recommendations) => {
                info!(count = recommendations.len(), "Recommendations stored");
                self.notifications
                    .push(Severity::Success, "Recommendations received");
                self.recommendations = Some(recommendations);
                Ok(self.recommendations.as_deref().unwrap_or_default())
            }
            Err(e) => {
                error!(error = %e, "Recommendation fetch failed");
                self.notifications
                    .push(Severity::Error, "Failed to fetch recommendations");
                Err(PipelineError::Transport(e))
            }
        }
    }

    /// Fetches the clinical narrative for the current analysis result. A
    /// transport failure keeps whatever a previous successful fetch stored.
    pub async fn fetch_clinical_report<C>(&mut self, client: &C) -> Result<&str, PipelineError>
    where
        C: AdvisoryClient + ?Sized,
    {
        let summary = match self.clinical_summary() {
            Some(summary) => summary,
            None => {
                warn!("Clinical report requested before an analysis run");
                self.notifications
                    .push(Severity::Warning, "Run the analysis first");
                return Err(PipelineError::MissingPrerequisite("analysis result"));
            }
        };
        if self.busy.reporting {
            warn!("Clinical report fetch requested while one is outstanding");
            self.notifications
                .push(Severity::Warning, "A clinical report request is already running");
            return Err(PipelineError::AlreadyRunning("clinical report fetch"));
        }

        self.busy.reporting = true;
        self.notifications
            .push(Severity::Info, "Generating clinical report...");
        let outcome = client.fetch_clinical_report(summary).await;
        self.busy.reporting = false;

        match outcome {
            Ok(report) => {
                info!(report_bytes = report.len(), "Clinical report stored");
                self.notifications
                    .push(Severity::Success, "Clinical report generated");
                self.clinical_report = Some(report);
                Ok(self.clinical_report.as_deref().unwrap_or_default())
            }
            Err(e) => {
                error!(error = %e, "Clinical report fetch failed");
                self.notifications
                    .push(Severity::Error, "Failed to generate clinical report");
                Err(PipelineError::Transport(e))
            }
        }
    }

    /// Encodes the results report as PDF.
    pub fn export_results_pdf(&mut self) -> Result<ExportArtifact, PipelineError> {
        let result = match self.result.as_ref() {
            Some(result) => result,
            None => return Err(self.refuse_export("analysis result")),
        };
        let dataset_name = self
            .dataset
            .as_ref()
            .map(|dataset| dataset.descriptor.name.as_str())
            .unwrap_or("(unnamed dataset)");
        let bytes = report_pdf::results_document(result, dataset_name);
        self.finish_export(RESULTS_STEM, "pdf", bytes)
    }

    /// Encodes the results report as CSV text.
    pub fn export_results_csv(&mut self) -> Result<ExportArtifact, PipelineError> {
        let result = match self.result.as_ref() {
            Some(result) => result,
            None => return Err(self.refuse_export("analysis result")),
        };
        let bytes = export::results_csv(result).into_bytes();
        self.finish_export(RESULTS_STEM, "csv", bytes)
    }

    /// Encodes the results report as ARFF text.
    pub fn export_results_arff(&mut self) -> Result<ExportArtifact, PipelineError> {
        let result = match self.result.as_ref() {
            Some(result) => result,
            None => return Err(self.refuse_export("analysis result")),
        };
        let bytes = export::results_arff(result).into_bytes();
        self.finish_export(RESULTS_STEM, "arff", bytes)
    }

    /// Encodes the fetched clinical narrative as PDF.
    pub fn export_clinical_pdf(&mut self) -> Result<ExportArtifact, PipelineError> {
        let report = match self.clinical_report.as_deref() {
            Some(report) => report,
            None => return Err(self.refuse_export("clinical report")),
        };
        let bytes = report_pdf::clinical_document(report);
        self.finish_export(CLINICAL_STEM, "pdf", bytes)
    }

    fn refuse_export(&mut self, missing: &'static str) -> PipelineError {
        warn!(missing, "Export requested before its prerequisite exists");
        self.notifications
            .push(Severity::Warning, "Nothing to export yet");
        PipelineError::MissingPrerequisite(missing)
    }

    fn finish_export(
        &mut self,
        stem: &str,
        extension: &str,
        bytes: Vec<u8>,
    ) -> Result<ExportArtifact, PipelineError> {
        let artifact = ExportArtifact {
            filename: export::artifact_filename(stem, today(), extension),
            bytes,
        };
        info!(
            filename = %artifact.filename,
            size = artifact.bytes.len(),
            "Export encoded"
        );
        self.notifications
            .push(Severity::Success, format!("{} exported", artifact.filename));
        Ok(artifact)
    }

    fn clinical_summary(&self) -> Option<ClinicalSummary> {
        let result = self.result.as_ref()?;
        let sample_count = self
            .dataset
            .as_ref()
            .map(|dataset| dataset.descriptor.row_count as u64)
            .filter(|rows| *rows > 0)
            .unwrap_or_else(|| result.confusion.total());
        Some(ClinicalSummary {
            sample_count,
            accuracy: result.accuracy,
            sensitivity: result.metrics.recall,
            specificity: result.metrics.specificity,
        })
    }

    /// The single point that swaps the dataset and invalidates every derived
    /// artifact; partial invalidation is not representable.
    fn replace_dataset(&mut self, dataset: Option<LoadedDataset>) {
        self.dataset = dataset;
        self.result = None;
        self.recommendations = None;
        self.clinical_report = None;
        self.pending_analysis = None;
        self.busy = Busy::default();
        self.epoch += 1;
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

fn today() -> time::Date {
    OffsetDateTime::now_utc().date()
}
