//! Test doubles shared by unit tests.

use crate::notify::UploadLogger;
use crate::plugin::{Compiler, DoneCallback};
use crate::types::{BuildResult, PublishError, UploadOutcome};
use crate::upload::{PublishRequest, SourcemapPublisher};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Records every request and answers with a fixed result.
pub struct MockPublisher {
    failure: Option<String>,
    /// Only fail requests whose URL contains this fragment.
    fail_url: Option<String>,
    requests: Mutex<Vec<PublishRequest>>,
}

impl MockPublisher {
    pub fn succeeding() -> Self {
        Self {
            failure: None,
            fail_url: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            fail_url: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_for(url_fragment: &str, message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            fail_url: Some(url_fragment.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<PublishRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SourcemapPublisher for MockPublisher {
    async fn publish(&self, request: &PublishRequest) -> Result<(), PublishError> {
        self.requests.lock().unwrap().push(request.clone());
        let applies = self
            .fail_url
            .as_deref()
            .map_or(true, |fragment| request.javascript_url.contains(fragment));

        match &self.failure {
            Some(message) if applies => Err(PublishError::Other(message.clone())),
            _ => Ok(()),
        }
    }
}

/// Keeps log lines in memory.
#[derive(Default)]
pub struct RecordingLogger {
    infos: Mutex<Vec<String>>,
    warnings: Mutex<Vec<String>>,
}

impl RecordingLogger {
    pub fn infos(&self) -> Vec<String> {
        self.infos.lock().unwrap().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }
}

impl UploadLogger for RecordingLogger {
    fn info(&self, message: &str) {
        self.infos.lock().unwrap().push(message.to_string());
    }

    fn warn(&self, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
    }
}

/// Build tool stand-in that keeps registered hooks and fires them on demand.
#[derive(Default)]
pub struct RecordingCompiler {
    pub hooks: Vec<(String, DoneCallback)>,
}

impl RecordingCompiler {
    pub fn events(&self) -> Vec<&str> {
        self.hooks.iter().map(|(event, _)| event.as_str()).collect()
    }

    /// Run every registered hook against `stats`, in registration order.
    pub async fn finish_build(&self, stats: BuildResult) -> Vec<Vec<UploadOutcome>> {
        let stats = Arc::new(stats);
        let mut results = Vec::new();
        for (_, callback) in &self.hooks {
            results.push(callback(Arc::clone(&stats)).await);
        }
        results
    }
}

impl Compiler for RecordingCompiler {
    fn plugin(&mut self, event: &str, callback: DoneCallback) {
        self.hooks.push((event.to_string(), callback));
    }
}
