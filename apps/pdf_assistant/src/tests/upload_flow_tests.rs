use std::{
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

use async_trait::async_trait;
use client_core::{DocumentUpload, ServiceError};
use shared::domain::{Answer, IngestStats};
use tokio::sync::Mutex;

use super::*;

/// Ingest outcome fixed at construction; records the uploaded file names.
struct FixedIngest {
    succeed: bool,
    uploads: Mutex<Vec<String>>,
}

impl FixedIngest {
    fn new(succeed: bool) -> Arc<Self> {
        Arc::new(Self {
            succeed,
            uploads: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl DocumentService for FixedIngest {
    async fn ingest_document(&self, upload: DocumentUpload) -> Result<IngestStats, ServiceError> {
        self.uploads.lock().await.push(upload.file_name);
        if self.succeed {
            Ok(IngestStats {
                pages_processed: 3,
                chunks_processed: 9,
            })
        } else {
            Err(ServiceError::Malformed("unreadable document".to_string()))
        }
    }

    async fn answer_query(&self, _query: &str) -> Result<Answer, ServiceError> {
        Err(ServiceError::Malformed("answers are not scripted".to_string()))
    }
}

fn temp_document(tag: &str, extension: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("pdf_assistant_{tag}_{suffix}.{extension}"));
    fs::write(&path, b"%PDF-1.7 test").expect("write document");
    path
}

async fn upload_with(service: &Arc<FixedIngest>, path: &Path) -> bool {
    let service: Arc<dyn DocumentService> = service.clone();
    let (mut session, mut settlements) = ClientSession::new(service);
    run_upload(&mut session, &mut settlements, path)
        .await
        .expect("upload flow")
}

#[tokio::test]
async fn processed_upload_reports_success() {
    let service = FixedIngest::new(true);
    let path = temp_document("processed", "pdf");

    assert!(upload_with(&service, &path).await);
    assert_eq!(service.uploads.lock().await.len(), 1);
    fs::remove_file(path).expect("cleanup");
}

#[tokio::test]
async fn failed_upload_reports_failure() {
    let service = FixedIngest::new(false);
    let path = temp_document("failed", "pdf");

    assert!(!upload_with(&service, &path).await);
    assert_eq!(service.uploads.lock().await.len(), 1);
    fs::remove_file(path).expect("cleanup");
}

#[tokio::test]
async fn non_pdf_file_is_refused_without_a_request() {
    let service = FixedIngest::new(true);
    let path = temp_document("not_a_pdf", "txt");

    assert!(!upload_with(&service, &path).await);
    assert!(service.uploads.lock().await.is_empty());
    fs::remove_file(path).expect("cleanup");
}
