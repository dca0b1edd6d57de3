// Local platform handler
//
// Implements the handler contract against the local filesystem and process
// table, delegating command execution to the local executor.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::MAIN_SEPARATOR;
use tokio::fs;

use crate::execution::{ExecutionOutput, ExecutionRequest, LocalExecutor};
use crate::platform::{
    error::HandlerResult,
    handler::PlatformHandler,
    os::OperatingSystem,
};

/// Handler for the machine this process runs on
pub struct LocalHandler {
    executor: LocalExecutor,
}

impl LocalHandler {
    pub fn new() -> Self {
        Self {
            executor: LocalExecutor::new(),
        }
    }

    /// Use a preconfigured executor (custom OS or binary directory)
    pub fn with_executor(executor: LocalExecutor) -> Self {
        Self { executor }
    }

    async fn path_metadata(path: &str) -> HandlerResult<Option<std::fs::Metadata>> {
        match fs::metadata(path).await {
            Ok(metadata) => Ok(Some(metadata)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl Default for LocalHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlatformHandler for LocalHandler {
    fn kind(&self) -> &'static str {
        "local"
    }

    async fn start_session(&mut self) -> HandlerResult<()> {
        Ok(())
    }

    async fn end_session(&mut self) -> HandlerResult<()> {
        Ok(())
    }

    async fn directory_exists(&self, path: &str) -> HandlerResult<bool> {
        Ok(Self::path_metadata(path)
            .await?
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn file_exists(&self, path: &str) -> HandlerResult<bool> {
        Ok(Self::path_metadata(path)
            .await?
            .map(|m| m.is_file())
            .unwrap_or(false))
    }

    async fn create_directory(&self, path: &str) -> HandlerResult<()> {
        fs::create_dir_all(path).await?;
        Ok(())
    }

    async fn upload_file(&self, src: &str, dst: &str) -> HandlerResult<()> {
        fs::copy(src, dst).await?;
        Ok(())
    }

    async fn download_file(&self, src: &str, dst: &str) -> HandlerResult<()> {
        fs::copy(src, dst).await?;
        Ok(())
    }

    async fn delete_file(&self, path: &str) -> HandlerResult<()> {
        if let Err(e) = fs::remove_file(path).await {
            log::warn!("failed to delete {}: {}", path, e);
        }
        Ok(())
    }

    async fn execute(&self, request: ExecutionRequest) -> HandlerResult<ExecutionOutput> {
        Ok(self.executor.execute(request).await?)
    }

    async fn env_value(&self, key: &str) -> HandlerResult<Option<String>> {
        Ok(std::env::var(key).ok())
    }

    async fn temp_dir(&self) -> HandlerResult<String> {
        let mut dir = std::env::temp_dir().to_string_lossy().to_string();
        if !dir.ends_with(MAIN_SEPARATOR) {
            dir.push(MAIN_SEPARATOR);
        }
        Ok(dir)
    }

    async fn os(&self) -> HandlerResult<OperatingSystem> {
        Ok(OperatingSystem::host())
    }
}
