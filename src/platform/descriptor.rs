// Target descriptor: connection parameters consumed by the handler factory

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::IpAddr;

use crate::platform::error::HandlerResult;

/// Recognized descriptor keys
pub mod keys {
    pub const HOSTNAME: &str = "hostname";
    pub const OS_NAME: &str = "os.name";
    pub const LOGON_METHOD: &str = "logon.method";
    pub const SSH_KEY: &str = "ssh.key";
    pub const DEBUG_PORT: &str = "debug.port";

    pub const DOCKER_MACHINE_TYPE: &str = "docker.machine-type";
    pub const DOCKER_MACHINE: &str = "docker.machine";
    pub const DOCKER_CONTAINER: &str = "docker.container";
    pub const DOCKER_IMAGE: &str = "docker.image";

    pub const SERVER_NAME: &str = "server.name";
    pub const SERVER_USER_DIR: &str = "server.user-dir";
    pub const SERVER_CONFIG_PATH: &str = "server.config-path";
    pub const SERVER_INSTALL_PATH: &str = "server.install-path";
    pub const SERVER_USER: &str = "server.user";
    pub const SERVER_PASSWORD: &str = "server.password";
    pub const SERVER_HTTP_PORT: &str = "server.http-port";
    pub const SERVER_HTTPS_PORT: &str = "server.https-port";
}

/// Key-value connection parameters describing an execution target
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetDescriptor {
    values: HashMap<String, String>,
}

impl TargetDescriptor {
    /// Create an empty descriptor (a local target)
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a descriptor from a JSON object of string values
    pub fn from_json(json: &str) -> HandlerResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set a value, replacing any previous one
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Raw lookup of any key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn hostname(&self) -> Option<&str> {
        self.get(keys::HOSTNAME)
    }

    pub fn os_name(&self) -> Option<&str> {
        self.get(keys::OS_NAME)
    }

    pub fn logon_method(&self) -> Option<&str> {
        self.get(keys::LOGON_METHOD)
    }

    pub fn ssh_key(&self) -> Option<&str> {
        self.get(keys::SSH_KEY)
    }

    pub fn debug_port(&self) -> Option<u16> {
        self.get(keys::DEBUG_PORT).and_then(|p| p.parse().ok())
    }

    pub fn docker_machine_type(&self) -> Option<&str> {
        self.get(keys::DOCKER_MACHINE_TYPE)
    }

    pub fn docker_machine(&self) -> Option<&str> {
        self.get(keys::DOCKER_MACHINE)
    }

    pub fn docker_container(&self) -> Option<&str> {
        self.get(keys::DOCKER_CONTAINER)
    }

    pub fn docker_image(&self) -> Option<&str> {
        self.get(keys::DOCKER_IMAGE)
    }

    pub fn server_name(&self) -> Option<&str> {
        self.get(keys::SERVER_NAME)
    }

    pub fn server_user_dir(&self) -> Option<&str> {
        self.get(keys::SERVER_USER_DIR)
    }

    pub fn server_config_path(&self) -> Option<&str> {
        self.get(keys::SERVER_CONFIG_PATH)
    }

    pub fn server_install_path(&self) -> Option<&str> {
        self.get(keys::SERVER_INSTALL_PATH)
    }

    /// True when the target is this machine: hostname absent, "localhost",
    /// or a loopback address
    pub fn is_localhost(&self) -> bool {
        match self.hostname() {
            None => true,
            Some(host) if host.is_empty() || host.eq_ignore_ascii_case("localhost") => true,
            Some(host) => host
                .parse::<IpAddr>()
                .map(|ip| ip.is_loopback())
                .unwrap_or(false),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for TargetDescriptor
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
