// Platform handler selection
//
// Maps a target descriptor plus a requested platform type to a concrete
// handler. SSH handlers come from providers the embedding application
// registers at startup; the registry is read-mostly after that.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::platform::{
    descriptor::TargetDescriptor,
    docker::{DockerContainerHandler, Locality},
    error::{HandlerError, HandlerResult},
    handler::PlatformHandler,
    local::LocalHandler,
};

/// Handler categories a caller can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlatformType {
    /// Plain command execution; degrades to SSH when the target is not local
    Command,
    /// Keyless SSH to a remote host, served by a registered provider
    SshKeyless,
    /// A Docker container, wrapped around a Command handler
    Docker,
}

/// Constructs handlers for a platform type from a target descriptor
///
/// The SSH transport itself lives outside this crate; embedders register a
/// provider for [`PlatformType::SshKeyless`] before asking for handlers.
#[async_trait]
pub trait PlatformHandlerProvider: Send + Sync {
    async fn create(
        &self,
        descriptor: &TargetDescriptor,
    ) -> HandlerResult<Box<dyn PlatformHandler>>;
}

/// Factory selecting and constructing platform handlers
pub struct PlatformHandlerFactory {
    providers: RwLock<HashMap<PlatformType, Arc<dyn PlatformHandlerProvider>>>,
}

impl PlatformHandlerFactory {
    pub fn new() -> Self {
        Self {
            providers: RwLock::new(HashMap::new()),
        }
    }

    /// Register a provider for a platform type, replacing any previous one
    pub async fn register_provider(
        &self,
        platform: PlatformType,
        provider: Arc<dyn PlatformHandlerProvider>,
    ) {
        self.providers.write().await.insert(platform, provider);
    }

    /// Select and construct a handler for the descriptor
    pub async fn handler_for(
        &self,
        descriptor: &TargetDescriptor,
        requested: PlatformType,
    ) -> HandlerResult<Box<dyn PlatformHandler>> {
        match requested {
            PlatformType::Docker => self.docker_handler_for(descriptor).await,
            PlatformType::Command => self.command_handler_for(descriptor).await,
            PlatformType::SshKeyless => self.provider_handler_for(descriptor).await,
        }
    }

    /// A local handler when the target is this machine, otherwise the
    /// registered SSH provider (Command intentionally degrades to SSH)
    async fn command_handler_for(
        &self,
        descriptor: &TargetDescriptor,
    ) -> HandlerResult<Box<dyn PlatformHandler>> {
        if descriptor.is_localhost() {
            Ok(Box::new(LocalHandler::new()))
        } else {
            self.provider_handler_for(descriptor).await
        }
    }

    /// Wrap a Command handler in a container handler bound to the named
    /// container; locality follows the hostname
    async fn docker_handler_for(
        &self,
        descriptor: &TargetDescriptor,
    ) -> HandlerResult<Box<dyn PlatformHandler>> {
        let container = descriptor.docker_container().ok_or_else(|| {
            HandlerError::invalid_descriptor("docker handler requested without a container name")
        })?;
        let container = container.to_string();

        let transport = self.command_handler_for(descriptor).await?;
        let locality = if descriptor.is_localhost() {
            Locality::Local
        } else {
            Locality::Remote
        };

        log::debug!(
            "wrapping {} transport around container {} ({:?}, machine {:?}/{:?})",
            transport.kind(),
            container,
            locality,
            descriptor.docker_machine_type(),
            descriptor.docker_machine()
        );
        Ok(Box::new(DockerContainerHandler::new(
            transport, container, locality,
        )))
    }

    async fn provider_handler_for(
        &self,
        descriptor: &TargetDescriptor,
    ) -> HandlerResult<Box<dyn PlatformHandler>> {
        let provider = {
            let providers = self.providers.read().await;
            providers.get(&PlatformType::SshKeyless).cloned()
        };

        match provider {
            Some(provider) => provider.create(descriptor).await.map_err(|e| {
                HandlerError::unsupported_service(format!(
                    "ssh provider failed for {:?}: {}",
                    descriptor.hostname().unwrap_or_default(),
                    e
                ))
            }),
            None => Err(HandlerError::unsupported_service(
                "no provider registered for keyless ssh",
            )),
        }
    }
}

impl Default for PlatformHandlerFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::descriptor::keys;

    struct LocalProvider;

    #[async_trait]
    impl PlatformHandlerProvider for LocalProvider {
        async fn create(
            &self,
            _descriptor: &TargetDescriptor,
        ) -> HandlerResult<Box<dyn PlatformHandler>> {
            // Stands in for a real SSH transport in tests
            Ok(Box::new(LocalHandler::new()))
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl PlatformHandlerProvider for FailingProvider {
        async fn create(
            &self,
            _descriptor: &TargetDescriptor,
        ) -> HandlerResult<Box<dyn PlatformHandler>> {
            Err(HandlerError::session("connection refused"))
        }
    }

    #[tokio::test]
    async fn test_no_hostname_command_is_local() {
        let factory = PlatformHandlerFactory::new();
        let handler = factory
            .handler_for(&TargetDescriptor::new(), PlatformType::Command)
            .await
            .unwrap();
        assert_eq!(handler.kind(), "local");
    }

    #[tokio::test]
    async fn test_loopback_hostname_command_is_local() {
        let factory = PlatformHandlerFactory::new();
        let descriptor = TargetDescriptor::new().set(keys::HOSTNAME, "127.0.0.1");
        let handler = factory
            .handler_for(&descriptor, PlatformType::Command)
            .await
            .unwrap();
        assert_eq!(handler.kind(), "local");
    }

    #[tokio::test]
    async fn test_ssh_without_provider_is_unsupported() {
        let factory = PlatformHandlerFactory::new();
        let descriptor = TargetDescriptor::new().set(keys::HOSTNAME, "example.com");
        let result = factory
            .handler_for(&descriptor, PlatformType::SshKeyless)
            .await;
        assert!(matches!(result, Err(HandlerError::UnsupportedService(_))));
    }

    #[tokio::test]
    async fn test_remote_command_degrades_to_ssh() {
        let factory = PlatformHandlerFactory::new();
        let descriptor = TargetDescriptor::new().set(keys::HOSTNAME, "example.com");

        // Without a provider the degraded request fails the same way
        let result = factory.handler_for(&descriptor, PlatformType::Command).await;
        assert!(matches!(result, Err(HandlerError::UnsupportedService(_))));

        // With one registered it succeeds
        factory
            .register_provider(PlatformType::SshKeyless, Arc::new(LocalProvider))
            .await;
        let handler = factory
            .handler_for(&descriptor, PlatformType::Command)
            .await
            .unwrap();
        assert_eq!(handler.kind(), "local");
    }

    #[tokio::test]
    async fn test_provider_failure_surfaces_as_unsupported() {
        let factory = PlatformHandlerFactory::new();
        factory
            .register_provider(PlatformType::SshKeyless, Arc::new(FailingProvider))
            .await;
        let descriptor = TargetDescriptor::new().set(keys::HOSTNAME, "example.com");
        let result = factory
            .handler_for(&descriptor, PlatformType::SshKeyless)
            .await;
        assert!(matches!(result, Err(HandlerError::UnsupportedService(_))));
    }

    #[tokio::test]
    async fn test_local_docker_handler() {
        let factory = PlatformHandlerFactory::new();
        let descriptor = TargetDescriptor::new().set(keys::DOCKER_CONTAINER, "wlp");
        let handler = factory
            .handler_for(&descriptor, PlatformType::Docker)
            .await
            .unwrap();
        assert_eq!(handler.kind(), "docker");
    }

    #[tokio::test]
    async fn test_docker_without_container_is_invalid() {
        let factory = PlatformHandlerFactory::new();
        let result = factory
            .handler_for(&TargetDescriptor::new(), PlatformType::Docker)
            .await;
        assert!(matches!(result, Err(HandlerError::InvalidDescriptor(_))));
    }

    #[tokio::test]
    async fn test_remote_docker_needs_a_transport_provider() {
        let factory = PlatformHandlerFactory::new();
        let descriptor = TargetDescriptor::new()
            .set(keys::HOSTNAME, "example.com")
            .set(keys::DOCKER_CONTAINER, "wlp");

        let result = factory.handler_for(&descriptor, PlatformType::Docker).await;
        assert!(matches!(result, Err(HandlerError::UnsupportedService(_))));

        factory
            .register_provider(PlatformType::SshKeyless, Arc::new(LocalProvider))
            .await;
        let handler = factory
            .handler_for(&descriptor, PlatformType::Docker)
            .await
            .unwrap();
        assert_eq!(handler.kind(), "docker");
    }
}
