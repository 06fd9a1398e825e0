//! Filedesk engine: HTTP workflow, live channel, and effect execution.
mod api;
mod batch;
mod engine;
mod error;
mod filename;
mod live;
mod object_url;
mod persist;
mod sheet;
mod types;
mod wire;
mod workflow;

pub use api::{ApiClient, ApiSettings, ResponseBody};
pub use batch::{convert_batch, BatchReport};
pub use engine::{EngineHandle, EngineSettings};
pub use error::{error_message, WorkflowError};
pub use filename::safe_file_name;
pub use live::{run_live_session, LiveChannel, LiveCommand, LiveSignal, LiveSink};
pub use object_url::ObjectUrl;
pub use persist::{DownloadDir, PersistError};
pub use sheet::first_column_rows;
pub use types::{EngineCommand, EngineEvent};
pub use workflow::{Endpoint, HttpWorkflow, JobWorkflow, Presentation, SubmitRequest, Submitted};
