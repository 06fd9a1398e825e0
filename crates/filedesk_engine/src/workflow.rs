use filedesk_core::{AcceptRule, ConvertedArtifact, FormatOptions, Job, PendingFile, ValidationError};
use filedesk_logging::{desk_debug, desk_info, desk_warn};
use reqwest::multipart::{Form, Part};

use crate::api::{decode, expect_json, ApiClient, ResponseBody, Stage};
use crate::object_url::ObjectUrl;
use crate::wire::{ChecklistResponse, ConvertWordResponse, ProcessResponse, SpeechRequest, UploadResponse};
use crate::WorkflowError;

/// Server operation a submit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    ConvertWord,
    FormatSpreadsheet,
    UploadVideoScript,
    GenerateChecklist,
    TextToSpeech,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::ConvertWord => "/api/convert-word",
            Endpoint::FormatSpreadsheet => "/api/format-excel",
            Endpoint::UploadVideoScript => "/upload",
            Endpoint::GenerateChecklist => "/api/process-checklist",
            Endpoint::TextToSpeech => "/api/tts",
        }
    }

    /// Multipart field name and accept rule for each expected file, in order.
    pub fn file_slots(self) -> Vec<(&'static str, AcceptRule)> {
        match self {
            Endpoint::ConvertWord => vec![("file", AcceptRule::word_document())],
            Endpoint::FormatSpreadsheet => vec![("file", AcceptRule::formatter_spreadsheet())],
            Endpoint::UploadVideoScript => {
                vec![("video", AcceptRule::video()), ("excel", AcceptRule::script())]
            }
            Endpoint::GenerateChecklist => vec![("file", AcceptRule::checklist_document())],
            Endpoint::TextToSpeech => Vec::new(),
        }
    }
}

/// One submit: the files for the endpoint's slots plus extra fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRequest {
    pub endpoint: Endpoint,
    pub files: Vec<PendingFile>,
    /// Extra multipart text fields.
    pub fields: Vec<(String, String)>,
    /// JSON body; used instead of multipart when present.
    pub json: Option<serde_json::Value>,
}

impl SubmitRequest {
    pub fn new(endpoint: Endpoint, files: Vec<PendingFile>) -> Self {
        Self {
            endpoint,
            files,
            fields: Vec::new(),
            json: None,
        }
    }

    pub fn convert_word(file: PendingFile) -> Self {
        Self::new(Endpoint::ConvertWord, vec![file])
    }

    pub fn format_spreadsheet(file: PendingFile, options: FormatOptions) -> Self {
        let mut request = Self::new(Endpoint::FormatSpreadsheet, vec![file]);
        request.fields = options
            .form_fields()
            .into_iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        request
    }

    pub fn upload_video_script(video: PendingFile, script: PendingFile) -> Self {
        Self::new(Endpoint::UploadVideoScript, vec![video, script])
    }

    pub fn generate_checklist(file: PendingFile) -> Self {
        Self::new(Endpoint::GenerateChecklist, vec![file])
    }

    pub fn text_to_speech(text: &str, voice_id: &str) -> Self {
        let mut request = Self::new(Endpoint::TextToSpeech, Vec::new());
        request.json = serde_json::to_value(SpeechRequest { text, voice_id }).ok();
        request
    }

    /// Checks every file against its slot before anything touches the network.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let slots = self.endpoint.file_slots();
        if self.files.len() != slots.len() {
            return Err(ValidationError {
                file_name: String::new(),
                message: format!(
                    "expected {} file(s) for {}, got {}",
                    slots.len(),
                    self.endpoint.path(),
                    self.files.len()
                ),
            });
        }
        for (file, (_, rule)) in self.files.iter().zip(slots) {
            rule.validate(&file.name, file.mime.as_deref())?;
        }
        Ok(())
    }
}

/// The server accepted a submit.
#[derive(Debug, Clone, PartialEq)]
pub struct Submitted {
    pub job: Job,
    pub body: ResponseBody,
}

impl Submitted {
    /// First artifact of a job that finished in one request.
    pub fn artifact(&self) -> Option<ConvertedArtifact> {
        self.job.artifacts().into_iter().next()
    }
}

/// How a finished job is handed to the user.
#[derive(Debug)]
pub struct Presentation {
    pub download_url: Option<String>,
    pub blob: Option<ObjectUrl>,
}

/// Upload, process, present, and clean up one server job.
#[async_trait::async_trait]
pub trait JobWorkflow: Send + Sync {
    async fn submit(&self, request: SubmitRequest) -> Result<Submitted, WorkflowError>;

    /// Second request of a two-stage job.
    async fn advance(&self, job: Job) -> Result<Job, WorkflowError>;

    fn present_result(&self, submitted: Submitted) -> Result<Presentation, WorkflowError>;

    /// Failures are reported, never fatal to the caller.
    async fn cleanup(&self, job_id: &str) -> Result<(), WorkflowError>;
}

#[derive(Debug, Clone)]
pub struct HttpWorkflow {
    api: ApiClient,
}

impl HttpWorkflow {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    async fn build_form(&self, request: &SubmitRequest) -> Result<Form, WorkflowError> {
        let mut form = Form::new();
        for (file, (field, _)) in request.files.iter().zip(request.endpoint.file_slots()) {
            let bytes = tokio::fs::read(&file.path).await.map_err(|err| {
                WorkflowError::Upload(format!("could not read {}: {err}", file.path.display()))
            })?;
            let mime = file.mime.clone().unwrap_or_else(|| {
                mime_guess::from_path(&file.name)
                    .first_or_octet_stream()
                    .essence_str()
                    .to_string()
            });
            let part = Part::bytes(bytes)
                .file_name(file.name.clone())
                .mime_str(&mime)
                .map_err(|err| WorkflowError::Upload(format!("bad MIME type {mime}: {err}")))?;
            form = form.part(field, part);
        }
        for (name, value) in &request.fields {
            form = form.text(name.clone(), value.clone());
        }
        Ok(form)
    }
}

#[async_trait::async_trait]
impl JobWorkflow for HttpWorkflow {
    async fn submit(&self, request: SubmitRequest) -> Result<Submitted, WorkflowError> {
        request.validate()?;
        let endpoint = request.endpoint;
        desk_info!(
            "Submitting {} file(s) to {}",
            request.files.len(),
            endpoint.path()
        );

        let body = match &request.json {
            Some(json) => {
                self.api
                    .post_json(endpoint.path(), json, Stage::Upload)
                    .await?
            }
            None => {
                let form = self.build_form(&request).await?;
                self.api
                    .post_multipart(endpoint.path(), form, Stage::Upload)
                    .await?
            }
        };

        let job = job_from_response(endpoint, &body)?;
        desk_debug!("{} produced job {:?}", endpoint.path(), job.id);
        Ok(Submitted { job, body })
    }

    async fn advance(&self, mut job: Job) -> Result<Job, WorkflowError> {
        let Some(job_id) = job.id.clone() else {
            return Err(WorkflowError::Processing(
                "job has no server id to process".to_string(),
            ));
        };
        job.mark_processing();
        let body = self
            .api
            .post_empty(&format!("/process/{job_id}"), Stage::Processing)
            .await?;
        let response: ProcessResponse =
            decode(expect_json(body, Stage::Processing)?, Stage::Processing)?;
        let output = response
            .download_url
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .map(str::to_string);
        job.download_path = Some(response.download_url);
        job.mark_done(output.into_iter().collect());
        desk_info!("Job {} processed", job_id);
        Ok(job)
    }

    fn present_result(&self, submitted: Submitted) -> Result<Presentation, WorkflowError> {
        match submitted.body {
            ResponseBody::Json(_) => Ok(Presentation {
                download_url: submitted.job.primary_download_path(),
                blob: None,
            }),
            ResponseBody::Binary {
                bytes,
                content_type,
            } => {
                let name = submitted
                    .job
                    .outputs
                    .first()
                    .cloned()
                    .unwrap_or_else(|| "download".to_string());
                let blob = ObjectUrl::create(&bytes, &name, content_type)?;
                Ok(Presentation {
                    download_url: None,
                    blob: Some(blob),
                })
            }
        }
    }

    async fn cleanup(&self, job_id: &str) -> Result<(), WorkflowError> {
        match self
            .api
            .post_empty(&format!("/cleanup/{job_id}"), Stage::Cleanup)
            .await
        {
            Ok(_) => {
                desk_info!("Cleaned up job {}", job_id);
                Ok(())
            }
            Err(err) => {
                desk_warn!("Cleanup of job {} failed: {}", job_id, err);
                Err(match err {
                    WorkflowError::Transport(message) => WorkflowError::Cleanup(message),
                    other => other,
                })
            }
        }
    }
}

fn job_from_response(endpoint: Endpoint, body: &ResponseBody) -> Result<Job, WorkflowError> {
    let json = match body {
        ResponseBody::Json(value) => value.clone(),
        ResponseBody::Binary { .. } => {
            let mut job = Job::pending();
            job.mark_done(Vec::new());
            return Ok(job);
        }
    };
    let job = match endpoint {
        Endpoint::ConvertWord => {
            let response: ConvertWordResponse = decode(json, Stage::Upload)?;
            let mut job = Job::uploaded(response.id);
            job.mark_done(vec![response.pdf_filename]);
            job
        }
        Endpoint::GenerateChecklist => {
            let response: ChecklistResponse = decode(json, Stage::Upload)?;
            let mut job = Job::uploaded(response.id);
            job.mark_done(vec![response.filename]);
            job
        }
        Endpoint::UploadVideoScript => {
            let response: UploadResponse = decode(json, Stage::Upload)?;
            Job::uploaded(response.job_id)
        }
        Endpoint::FormatSpreadsheet | Endpoint::TextToSpeech => {
            return Err(WorkflowError::Upload(format!(
                "{} returned JSON instead of a file",
                endpoint.path()
            )));
        }
    };
    Ok(job)
}
