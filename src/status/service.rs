//! Service supervisor collaborator
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

use crate::error::StatusLookupError;

/// Source of the `service list` answer for a named service
#[async_trait]
pub trait ServiceSupervisor: Send + Sync {
    /// Structured status shaped like
    /// `{ service: { "instances": { instance: { "running": bool } } } }`
    async fn list(&self, service: &str) -> Result<Value, StatusLookupError>;
}

/// Pull `running` out of a `service list` answer.
///
/// Any missing level or a non-boolean leaf is reported as an error naming
/// the path that could not be followed.
pub fn running_from(res: &Value, service: &str, instance: &str) -> Result<bool, StatusLookupError> {
    let path = [service, "instances", instance, "running"];
    let mut node = res;
    for (depth, segment) in path.iter().enumerate() {
        node = node
            .get(segment)
            .ok_or_else(|| StatusLookupError::Missing(path[..=depth].join(".")))?;
    }
    node.as_bool()
        .ok_or_else(|| StatusLookupError::Missing(format!("boolean at {}", path.join("."))))
}

/// Queries procd through the `ubus` command line client
#[derive(Debug, Clone)]
pub struct UbusSupervisor {
    program: String,
    timeout: Duration,
}

impl UbusSupervisor {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        UbusSupervisor {
            program: program.into(),
            timeout,
        }
    }
}

impl Default for UbusSupervisor {
    fn default() -> Self {
        UbusSupervisor::new("ubus", Duration::from_secs(5))
    }
}

#[async_trait]
impl ServiceSupervisor for UbusSupervisor {
    async fn list(&self, service: &str) -> Result<Value, StatusLookupError> {
        let params = serde_json::json!({ "name": service }).to_string();
        let call = Command::new(&self.program)
            .args(["call", "service", "list", params.as_str()])
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| StatusLookupError::Timeout(self.timeout))??;

        if !output.status.success() {
            return Err(StatusLookupError::Exit {
                code: output.status.code(),
            });
        }

        // ubus prints nothing when the service is unknown
        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() {
            debug!("Empty service list for {}", service);
            return Ok(Value::Object(Default::default()));
        }
        Ok(serde_json::from_str(&stdout)?)
    }
}
