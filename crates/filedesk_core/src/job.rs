#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobStatus {
    #[default]
    Pending,
    Uploaded,
    Processing,
    Done,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Failed)
    }
}

/// One unit of server work.
///
/// `id` is assigned by the server; single-stage features with a binary
/// response never receive one. Once `Done` or `Failed` the status is frozen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Job {
    pub id: Option<String>,
    pub outputs: Vec<String>,
    pub download_path: Option<String>,
    pub status: JobStatus,
    pub error: Option<String>,
}

impl Job {
    pub fn pending() -> Self {
        Self::default()
    }

    pub fn uploaded(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            status: JobStatus::Uploaded,
            ..Self::default()
        }
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn mark_processing(&mut self) {
        if !self.status.is_terminal() {
            self.status = JobStatus::Processing;
        }
    }

    pub fn mark_done(&mut self, outputs: Vec<String>) {
        if !self.status.is_terminal() {
            self.outputs = outputs;
            self.status = JobStatus::Done;
        }
    }

    pub fn mark_failed(&mut self, message: impl Into<String>) {
        if !self.status.is_terminal() {
            self.error = Some(message.into());
            self.status = JobStatus::Failed;
        }
    }

    /// Download path for the first output, preferring the server-built one.
    pub fn primary_download_path(&self) -> Option<String> {
        if let Some(path) = &self.download_path {
            return Some(path.clone());
        }
        let id = self.id.as_deref()?;
        self.outputs.first().map(|name| download_path(id, name))
    }

    /// One artifact per output; empty when the job has no server id.
    pub fn artifacts(&self) -> Vec<ConvertedArtifact> {
        match &self.id {
            Some(id) => self
                .outputs
                .iter()
                .map(|name| ConvertedArtifact::new(id.clone(), name.clone()))
                .collect(),
            None => Vec::new(),
        }
    }
}

/// A named output of a completed job.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConvertedArtifact {
    pub id: String,
    pub name: String,
}

impl ConvertedArtifact {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    pub fn download_path(&self) -> String {
        download_path(&self.id, &self.name)
    }
}

pub fn download_path(job_id: &str, filename: &str) -> String {
    format!("/download/{job_id}/{filename}")
}
