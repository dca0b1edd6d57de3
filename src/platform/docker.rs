// Docker container handler
//
// Decorates another handler: every operation is translated into docker CLI
// invocations issued through the inner handler, so the same wrapper serves a
// container on this machine (inner = local handler) and a container on a
// remote host (inner = SSH handler). File transfer in the remote case stages
// through the inner target's temp directory.

use async_trait::async_trait;
use std::path::Path;

use crate::execution::{ExecutionOutput, ExecutionRequest};
use crate::platform::{
    error::{HandlerError, HandlerResult},
    handler::PlatformHandler,
    os::OperatingSystem,
};

/// Where the docker daemon lives relative to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locality {
    /// The container runs on this machine; `docker cp` sees local paths
    Local,
    /// The container runs on the inner handler's host; transfers stage
    /// through that host's temp directory
    Remote,
}

/// Handler that targets a named Docker container through an inner transport
pub struct DockerContainerHandler {
    inner: Box<dyn PlatformHandler>,
    container: String,
    locality: Locality,
}

impl DockerContainerHandler {
    pub fn new(
        inner: Box<dyn PlatformHandler>,
        container: impl Into<String>,
        locality: Locality,
    ) -> Self {
        Self {
            inner,
            container: container.into(),
            locality,
        }
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn locality(&self) -> Locality {
        self.locality
    }

    /// Run a command inside the container via `docker exec`
    async fn exec_in_container(&self, command: &str) -> HandlerResult<ExecutionOutput> {
        self.inner
            .execute_command(&format!("docker exec {} {}", self.container, command))
            .await
    }

    /// Stage path on the inner target for remote transfers
    async fn staging_path(&self, path: &str) -> HandlerResult<String> {
        let name = Path::new(path)
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                HandlerError::remote_operation(format!("no file name in path {:?}", path))
            })?;
        Ok(format!("{}{}", self.inner.temp_dir().await?, name))
    }

    fn check(operation: &str, output: &ExecutionOutput) -> HandlerResult<()> {
        if output.success() {
            Ok(())
        } else {
            Err(HandlerError::remote_operation(format!(
                "{} failed (exit {}): {}",
                operation,
                output.return_code(),
                output.stderr().trim()
            )))
        }
    }
}

#[async_trait]
impl PlatformHandler for DockerContainerHandler {
    fn kind(&self) -> &'static str {
        "docker"
    }

    async fn start_session(&mut self) -> HandlerResult<()> {
        self.inner.start_session().await
    }

    async fn end_session(&mut self) -> HandlerResult<()> {
        self.inner.end_session().await
    }

    async fn directory_exists(&self, path: &str) -> HandlerResult<bool> {
        let output = self
            .exec_in_container(&format!(r#"test -d "{}""#, path))
            .await?;
        Ok(output.success())
    }

    async fn file_exists(&self, path: &str) -> HandlerResult<bool> {
        let output = self
            .exec_in_container(&format!(r#"test -f "{}""#, path))
            .await?;
        Ok(output.success())
    }

    async fn create_directory(&self, path: &str) -> HandlerResult<()> {
        let output = self
            .exec_in_container(&format!(r#"mkdir -p "{}""#, path))
            .await?;
        Self::check("mkdir", &output)
    }

    async fn upload_file(&self, src: &str, dst: &str) -> HandlerResult<()> {
        match self.locality {
            Locality::Local => {
                let output = self
                    .inner
                    .execute_command(&format!(
                        r#"docker cp "{}" "{}:{}""#,
                        src, self.container, dst
                    ))
                    .await?;
                Self::check("docker cp", &output)
            }
            Locality::Remote => {
                let stage = self.staging_path(src).await?;
                self.inner.upload_file(src, &stage).await?;
                let output = self
                    .inner
                    .execute_command(&format!(
                        r#"docker cp "{}" "{}:{}""#,
                        stage, self.container, dst
                    ))
                    .await?;
                self.inner.delete_file(&stage).await?;
                Self::check("docker cp", &output)
            }
        }
    }

    async fn download_file(&self, src: &str, dst: &str) -> HandlerResult<()> {
        match self.locality {
            Locality::Local => {
                let output = self
                    .inner
                    .execute_command(&format!(
                        r#"docker cp "{}:{}" "{}""#,
                        self.container, src, dst
                    ))
                    .await?;
                Self::check("docker cp", &output)
            }
            Locality::Remote => {
                let stage = self.staging_path(src).await?;
                let output = self
                    .inner
                    .execute_command(&format!(
                        r#"docker cp "{}:{}" "{}""#,
                        self.container, src, stage
                    ))
                    .await?;
                Self::check("docker cp", &output)?;
                self.inner.download_file(&stage, dst).await?;
                self.inner.delete_file(&stage).await
            }
        }
    }

    async fn delete_file(&self, path: &str) -> HandlerResult<()> {
        let output = self
            .exec_in_container(&format!(r#"rm -f "{}""#, path))
            .await?;
        if !output.success() {
            log::warn!(
                "failed to delete {} in container {}: {}",
                path,
                self.container,
                output.stderr().trim()
            );
        }
        Ok(())
    }

    async fn execute(&self, mut request: ExecutionRequest) -> HandlerResult<ExecutionOutput> {
        request.command = format!("docker exec {} {}", self.container, request.command);
        self.inner.execute(request).await
    }

    async fn env_value(&self, key: &str) -> HandlerResult<Option<String>> {
        let output = self.exec_in_container(&format!("printenv {}", key)).await?;
        if output.success() && !output.stdout().trim().is_empty() {
            Ok(Some(output.stdout().trim().to_string()))
        } else {
            Ok(None)
        }
    }

    async fn temp_dir(&self) -> HandlerResult<String> {
        let mut dir = match self.env_value("TMPDIR").await? {
            Some(dir) if !dir.is_empty() => dir,
            _ => "/tmp".to_string(),
        };
        if !dir.ends_with('/') {
            dir.push('/');
        }
        Ok(dir)
    }

    async fn os(&self) -> HandlerResult<OperatingSystem> {
        let output = self.exec_in_container("uname -s").await?;
        let name = output.success().then(|| output.stdout().trim().to_string());
        Ok(OperatingSystem::detect(name.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Inner handler that records the commands it is asked to run
    struct RecordingHandler {
        commands: Arc<Mutex<Vec<String>>>,
        exit_code: i32,
    }

    impl RecordingHandler {
        fn new(exit_code: i32) -> Self {
            Self {
                commands: Arc::new(Mutex::new(Vec::new())),
                exit_code,
            }
        }

        fn log(&self) -> Arc<Mutex<Vec<String>>> {
            Arc::clone(&self.commands)
        }
    }

    #[async_trait]
    impl PlatformHandler for RecordingHandler {
        fn kind(&self) -> &'static str {
            "recording"
        }

        async fn start_session(&mut self) -> HandlerResult<()> {
            Ok(())
        }

        async fn end_session(&mut self) -> HandlerResult<()> {
            Ok(())
        }

        async fn directory_exists(&self, _path: &str) -> HandlerResult<bool> {
            Ok(false)
        }

        async fn file_exists(&self, _path: &str) -> HandlerResult<bool> {
            Ok(false)
        }

        async fn create_directory(&self, _path: &str) -> HandlerResult<()> {
            Ok(())
        }

        async fn upload_file(&self, _src: &str, _dst: &str) -> HandlerResult<()> {
            Ok(())
        }

        async fn download_file(&self, _src: &str, _dst: &str) -> HandlerResult<()> {
            Ok(())
        }

        async fn delete_file(&self, _path: &str) -> HandlerResult<()> {
            Ok(())
        }

        async fn execute(&self, request: ExecutionRequest) -> HandlerResult<ExecutionOutput> {
            self.commands.lock().unwrap().push(request.command.clone());
            Ok(ExecutionOutput::completed(
                self.exit_code,
                "",
                "",
                Duration::ZERO,
            ))
        }

        async fn env_value(&self, _key: &str) -> HandlerResult<Option<String>> {
            Ok(None)
        }

        async fn temp_dir(&self) -> HandlerResult<String> {
            Ok("/tmp/".to_string())
        }

        async fn os(&self) -> HandlerResult<OperatingSystem> {
            Ok(OperatingSystem::Linux)
        }
    }

    #[tokio::test]
    async fn test_execute_wraps_command_in_docker_exec() {
        let inner = RecordingHandler::new(0);
        let log = inner.log();
        let handler = DockerContainerHandler::new(Box::new(inner), "wlp", Locality::Local);
        assert_eq!(handler.container(), "wlp");
        assert_eq!(handler.locality(), Locality::Local);

        let output = handler.execute_command("server status").await.unwrap();
        assert!(output.success());

        let commands = log.lock().unwrap();
        assert_eq!(*commands, ["docker exec wlp server status"]);
    }

    #[tokio::test]
    async fn test_local_upload_issues_docker_cp() {
        let inner = RecordingHandler::new(0);
        let log = inner.log();
        let handler = DockerContainerHandler::new(Box::new(inner), "wlp", Locality::Local);

        handler
            .upload_file("/src/My App.war", "/opt/apps/app.war")
            .await
            .unwrap();

        let commands = log.lock().unwrap();
        assert_eq!(
            *commands,
            [r#"docker cp "/src/My App.war" "wlp:/opt/apps/app.war""#]
        );
    }

    #[tokio::test]
    async fn test_remote_upload_stages_through_inner_temp_dir() {
        let inner = RecordingHandler::new(0);
        let log = inner.log();
        let handler = DockerContainerHandler::new(Box::new(inner), "wlp", Locality::Remote);

        handler
            .upload_file("/src/app.war", "/opt/apps/app.war")
            .await
            .unwrap();

        let commands = log.lock().unwrap();
        assert_eq!(
            *commands,
            [r#"docker cp "/tmp/app.war" "wlp:/opt/apps/app.war""#]
        );
    }

    #[tokio::test]
    async fn test_existence_checks_map_exit_codes() {
        let found = DockerContainerHandler::new(
            Box::new(RecordingHandler::new(0)),
            "wlp",
            Locality::Local,
        );
        assert!(found.file_exists("/etc/hosts").await.unwrap());
        assert!(found.directory_exists("/etc").await.unwrap());

        let missing = DockerContainerHandler::new(
            Box::new(RecordingHandler::new(1)),
            "wlp",
            Locality::Local,
        );
        assert!(!missing.file_exists("/nope").await.unwrap());
        assert!(!missing.directory_exists("/nope").await.unwrap());
    }

    #[tokio::test]
    async fn test_failed_mkdir_is_an_error() {
        let handler = DockerContainerHandler::new(
            Box::new(RecordingHandler::new(1)),
            "wlp",
            Locality::Local,
        );
        let result = handler.create_directory("/opt/app").await;
        assert!(matches!(result, Err(HandlerError::RemoteOperation(_))));
    }

    #[tokio::test]
    async fn test_failed_delete_is_swallowed() {
        let handler = DockerContainerHandler::new(
            Box::new(RecordingHandler::new(1)),
            "wlp",
            Locality::Local,
        );
        handler.delete_file("/opt/app/x").await.unwrap();
    }

    #[tokio::test]
    async fn test_temp_dir_defaults_with_separator() {
        let handler = DockerContainerHandler::new(
            Box::new(RecordingHandler::new(1)),
            "wlp",
            Locality::Local,
        );
        assert_eq!(handler.temp_dir().await.unwrap(), "/tmp/");
    }
}
