use oncodash::advisory::{ClinicalSummary, MockAdvisoryClient, TransportError};
use oncodash::analysis::Algorithm;
use oncodash::config::Config;
use oncodash::notify::Severity;
use oncodash::pipeline::{Phase, Pipeline, PipelineError};

const DATASET: &str = "a,b,target\n1,2,0\n3,4,1\n";

fn fast_pipeline() -> Pipeline {
    Pipeline::with_config(&Config {
        analysis_delay_ms: 0,
        ..Config::default()
    })
}

fn loaded_pipeline() -> Pipeline {
    let mut pipeline = fast_pipeline();
    pipeline
        .load_dataset("tumours.csv", None, DATASET.as_bytes())
        .expect("dataset should load");
    pipeline
}

fn latest_severity(pipeline: &Pipeline) -> Option<Severity> {
    pipeline
        .notifications()
        .latest()
        .map(|event| event.severity)
}

#[test]
fn load_moves_idle_to_ready_with_descriptor() {
    let mut pipeline = fast_pipeline();
    assert_eq!(pipeline.phase(), Phase::Idle);

    let descriptor = pipeline
        .load_dataset("tumours.csv", None, DATASET.as_bytes())
        .expect("dataset should load");
    assert_eq!(descriptor.row_count, 2);
    assert_eq!(descriptor.column_count, 3);
    assert_eq!(descriptor.feature_names, vec!["a", "b"]);
    assert_eq!(descriptor.target_name, "target");
    assert_eq!(descriptor.format, "CSV");

    assert_eq!(pipeline.phase(), Phase::Ready);
    let severities: Vec<Severity> = pipeline
        .notifications()
        .events()
        .iter()
        .map(|event| event.severity)
        .collect();
    assert_eq!(severities, vec![Severity::Info, Severity::Success]);

    let later = std::time::Instant::now() + oncodash::notify::NOTIFICATION_TTL;
    pipeline.notifications_mut().prune(later);
    assert!(pipeline.notifications().events().is_empty());
}

#[test]
fn invalid_utf8_upload_is_rejected_with_a_single_error() {
    let mut pipeline = fast_pipeline();
    let err = pipeline
        .load_dataset("blob.bin", None, &[0xff, 0xfe, 0x00])
        .unwrap_err();
    assert!(matches!(err, PipelineError::ReadFailure(_)));
    assert_eq!(pipeline.phase(), Phase::Idle);
    assert_eq!(pipeline.notifications().events().len(), 1);
    assert_eq!(latest_severity(&pipeline), Some(Severity::Error));
}

#[tokio::test]
async fn analysis_requires_a_dataset() {
    let mut pipeline = fast_pipeline();
    let err = pipeline
        .run_analysis(Algorithm::RandomForest)
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::EmptyInput));
    assert_eq!(pipeline.phase(), Phase::Idle);
    assert_eq!(latest_severity(&pipeline), Some(Severity::Warning));
}

#[tokio::test]
async fn analysis_produces_a_result_within_bounds() {
    let mut pipeline = loaded_pipeline();
    let result = pipeline
        .run_analysis(Algorithm::Svm)
        .await
        .expect("analysis should complete");
    assert!((0.0..=1.0).contains(&result.accuracy));
    assert_eq!(result.algorithm_label, "SVM (SMO)");
    assert_eq!(result.confusion.total(), 248);

    assert_eq!(pipeline.phase(), Phase::Analyzed);
    assert_eq!(latest_severity(&pipeline), Some(Severity::Success));
}

#[test]
fn begin_analysis_marks_the_pipeline_busy() {
    let mut pipeline = loaded_pipeline();
    let run = pipeline
        .begin_analysis(Algorithm::DecisionTree)
        .expect("analysis should start");
    assert_eq!(pipeline.phase(), Phase::Analyzing);
    assert!(pipeline.busy().analyzing);

    assert!(pipeline.complete_analysis(run).is_some());
    assert_eq!(pipeline.phase(), Phase::Analyzed);
    assert!(!pipeline.busy().analyzing);
}

#[test]
fn stale_analysis_ticket_is_discarded_after_a_new_upload() {
    let mut pipeline = loaded_pipeline();
    let run = pipeline
        .begin_analysis(Algorithm::DecisionTree)
        .expect("analysis should start");

    pipeline
        .load_dataset("second.csv", None, DATASET.as_bytes())
        .expect("second dataset should load");

    assert!(pipeline.complete_analysis(run).is_none());
    assert!(pipeline.result().is_none());
    assert_eq!(pipeline.phase(), Phase::Ready);
}

#[test]
fn duplicate_analysis_request_is_a_rejected_noop() {
    let mut pipeline = loaded_pipeline();
    let first = pipeline
        .begin_analysis(Algorithm::DecisionTree)
        .expect("analysis should start");

    let err = pipeline.begin_analysis(Algorithm::RandomForest).unwrap_err();
    assert!(matches!(err, PipelineError::AlreadyRunning(_)));
    assert_eq!(latest_severity(&pipeline), Some(Severity::Warning));

    assert!(pipeline.complete_analysis(first).is_some());
}

#[tokio::test]
async fn recommendations_flow_stores_the_fetched_list() {
    let mut pipeline = loaded_pipeline();
    let mut client = MockAdvisoryClient::new();
    client
        .expect_fetch_recommendations()
        .returning(|dataset: &str| {
            assert!(dataset.starts_with("a,b,target"));
            Ok(vec![
                "Apply SMOTE to balance the classes".to_string(),
                "Run k-fold cross-validation".to_string(),
            ])
        });

    let recommendations = pipeline
        .fetch_recommendations(&client)
        .await
        .expect("fetch should succeed");
    assert_eq!(recommendations.len(), 2);
    assert_eq!(latest_severity(&pipeline), Some(Severity::Success));
}

#[tokio::test]
async fn recommendations_require_a_dataset() {
    let mut pipeline = fast_pipeline();
    let client = MockAdvisoryClient::new();
    let err = pipeline.fetch_recommendations(&client).await.unwrap_err();
    assert!(matches!(err, PipelineError::EmptyInput));
    assert_eq!(latest_severity(&pipeline), Some(Severity::Warning));
}

#[tokio::test]
async fn failed_fetch_keeps_previously_stored_recommendations() {
    let mut pipeline = loaded_pipeline();

    let mut ok_client = MockAdvisoryClient::new();
    ok_client
        .expect_fetch_recommendations()
        .returning(|_| Ok(vec!["first advice".to_string()]));
    pipeline
        .fetch_recommendations(&ok_client)
        .await
        .expect("first fetch should succeed");

    let mut failing_client = MockAdvisoryClient::new();
    failing_client
        .expect_fetch_recommendations()
        .returning(|_| Err(TransportError::Status(502)));
    let err = pipeline
        .fetch_recommendations(&failing_client)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Transport(TransportError::Status(502))
    ));

    let kept = pipeline.recommendations().expect("prior fetch kept");
    assert_eq!(kept.to_vec(), vec!["first advice".to_string()]);
    assert_eq!(latest_severity(&pipeline), Some(Severity::Error));
}

#[tokio::test]
async fn failed_first_fetch_leaves_recommendations_absent() {
    let mut pipeline = loaded_pipeline();
    let mut failing_client = MockAdvisoryClient::new();
    failing_client
        .expect_fetch_recommendations()
        .returning(|_| Err(TransportError::Status(503)));

    pipeline
        .fetch_recommendations(&failing_client)
        .await
        .unwrap_err();
    assert!(pipeline.recommendations().is_none());
    assert_eq!(pipeline.phase(), Phase::Ready);
}

#[tokio::test]
async fn clinical_report_requires_an_analysis_result() {
    let mut pipeline = loaded_pipeline();
    let client = MockAdvisoryClient::new();
    let err = pipeline.fetch_clinical_report(&client).await.unwrap_err();
    assert!(matches!(err, PipelineError::MissingPrerequisite(_)));
    assert_eq!(latest_severity(&pipeline), Some(Severity::Warning));
}

#[tokio::test]
async fn clinical_report_posts_summary_statistics() {
    let mut pipeline = loaded_pipeline();
    pipeline
        .run_analysis(Algorithm::NaiveBayes)
        .await
        .expect("analysis should complete");

    let mut client = MockAdvisoryClient::new();
    client
        .expect_fetch_clinical_report()
        .returning(|summary: ClinicalSummary| {
            assert_eq!(summary.sample_count, 2);
            assert!((0.0..=1.0).contains(&summary.accuracy));
            assert!((summary.sensitivity - 0.89).abs() < 1e-9);
            assert!((summary.specificity - 0.97).abs() < 1e-9);
            Ok("AI ANALYSIS REPORT\n\nFollow-up in 3-6 months.".to_string())
        });

    let report = pipeline
        .fetch_clinical_report(&client)
        .await
        .expect("fetch should succeed");
    assert!(report.contains("Follow-up"));
    assert_eq!(latest_severity(&pipeline), Some(Severity::Success));
}

#[tokio::test]
async fn new_upload_clears_derived_artifacts_atomically() {
    let mut pipeline = loaded_pipeline();
    pipeline
        .run_analysis(Algorithm::DecisionTree)
        .await
        .expect("analysis should complete");

    let mut client = MockAdvisoryClient::new();
    client
        .expect_fetch_recommendations()
        .returning(|_| Ok(vec!["advice".to_string()]));
    client
        .expect_fetch_clinical_report()
        .returning(|_| Ok("narrative".to_string()));
    pipeline
        .fetch_recommendations(&client)
        .await
        .expect("fetch should succeed");
    pipeline
        .fetch_clinical_report(&client)
        .await
        .expect("fetch should succeed");

    assert!(pipeline.result().is_some());
    assert!(pipeline.recommendations().is_some());
    assert!(pipeline.clinical_report().is_some());

    pipeline
        .load_dataset("next.csv", None, DATASET.as_bytes())
        .expect("new dataset should load");
    assert!(pipeline.result().is_none());
    assert!(pipeline.recommendations().is_none());
    assert!(pipeline.clinical_report().is_none());
    assert_eq!(pipeline.phase(), Phase::Ready);
}

#[tokio::test]
async fn clear_returns_to_idle() {
    let mut pipeline = loaded_pipeline();
    pipeline
        .run_analysis(Algorithm::DecisionTree)
        .await
        .expect("analysis should complete");

    pipeline.clear();
    assert_eq!(pipeline.phase(), Phase::Idle);
    assert!(pipeline.dataset().is_none());
    assert!(pipeline.result().is_none());
    assert_eq!(latest_severity(&pipeline), Some(Severity::Info));
}

#[test]
fn exports_refuse_without_prerequisites() {
    let mut pipeline = loaded_pipeline();
    assert!(matches!(
        pipeline.export_results_pdf().unwrap_err(),
        PipelineError::MissingPrerequisite(_)
    ));
    assert!(matches!(
        pipeline.export_results_csv().unwrap_err(),
        PipelineError::MissingPrerequisite(_)
    ));
    assert!(matches!(
        pipeline.export_results_arff().unwrap_err(),
        PipelineError::MissingPrerequisite(_)
    ));
    assert!(matches!(
        pipeline.export_clinical_pdf().unwrap_err(),
        PipelineError::MissingPrerequisite(_)
    ));
    assert_eq!(latest_severity(&pipeline), Some(Severity::Warning));
}

#[tokio::test]
async fn exports_produce_dated_artifacts_once_analyzed() {
    let mut pipeline = loaded_pipeline();
    pipeline
        .run_analysis(Algorithm::LogisticRegression)
        .await
        .expect("analysis should complete");

    let csv = pipeline.export_results_csv().expect("CSV export");
    assert!(csv.filename.starts_with("oncodash-results-"));
    assert!(csv.filename.ends_with(".csv"));
    assert!(String::from_utf8(csv.bytes)
        .expect("CSV is UTF-8")
        .contains("Confusion Matrix"));

    let arff = pipeline.export_results_arff().expect("ARFF export");
    assert!(arff.filename.ends_with(".arff"));

    let pdf = pipeline.export_results_pdf().expect("PDF export");
    assert!(pdf.filename.ends_with(".pdf"));
    assert_eq!(&pdf.bytes[..5], b"%PDF-");

    let mut client = MockAdvisoryClient::new();
    client
        .expect_fetch_clinical_report()
        .returning(|_| Ok("AI ANALYSIS REPORT\nRoutine follow-up advised.".to_string()));
    pipeline
        .fetch_clinical_report(&client)
        .await
        .expect("fetch should succeed");

    let clinical = pipeline.export_clinical_pdf().expect("clinical export");
    assert!(clinical.filename.starts_with("oncodash-clinical-report-"));
    assert_eq!(&clinical.bytes[..5], b"%PDF-");
}

#[tokio::test]
async fn inline_text_ingestion_behaves_like_an_upload() {
    let mut pipeline = fast_pipeline();
    let descriptor = pipeline.load_text(DATASET);
    assert_eq!(descriptor.row_count, 2);
    assert_eq!(pipeline.phase(), Phase::Ready);

    pipeline
        .run_analysis(Algorithm::MultilayerPerceptron)
        .await
        .expect("analysis should complete");
    pipeline.load_text("x,y\n9,1\n");
    assert!(pipeline.result().is_none());
}
