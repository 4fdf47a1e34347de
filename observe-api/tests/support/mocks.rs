#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use observe_api::ocp::{OcpClient, OcpError, OcpTarget};
use observe_api::prom::{PromClient, PromError, PromTarget};
use serde_json::{Value, json};

/// Canned cluster API backend.
///
/// Each operation returns its canned list, or a status-500 error when the
/// field is `None`. Targets and event selectors are recorded so tests can
/// assert on the credentials and filters the routes resolved.
pub struct MockOcpClient {
    pub projects: Option<Value>,
    pub namespaces: Option<Value>,
    pub pods: Option<Value>,
    pub events: Option<Value>,
    pub seen_targets: Mutex<Vec<OcpTarget>>,
    pub seen_event_selectors: Mutex<Vec<Option<String>>>,
}

impl Default for MockOcpClient {
    fn default() -> Self {
        Self {
            projects: Some(project_list()),
            namespaces: Some(namespace_list()),
            pods: Some(pod_list()),
            events: Some(event_list()),
            seen_targets: Mutex::new(Vec::new()),
            seen_event_selectors: Mutex::new(Vec::new()),
        }
    }
}

impl MockOcpClient {
    fn respond(&self, target: &OcpTarget, canned: &Option<Value>) -> Result<Value, OcpError> {
        self.seen_targets.lock().unwrap().push(target.clone());
        match canned {
            Some(value) => Ok(value.clone()),
            None => Err(OcpError::Status { status: 500 }),
        }
    }
}

#[async_trait]
impl OcpClient for MockOcpClient {
    async fn list_projects(&self, target: &OcpTarget) -> Result<Value, OcpError> {
        self.respond(target, &self.projects)
    }

    async fn list_namespaces(&self, target: &OcpTarget) -> Result<Value, OcpError> {
        self.respond(target, &self.namespaces)
    }

    async fn list_pods(&self, target: &OcpTarget, _namespace: &str) -> Result<Value, OcpError> {
        self.respond(target, &self.pods)
    }

    async fn list_events(
        &self,
        target: &OcpTarget,
        _namespace: &str,
        field_selector: Option<&str>,
    ) -> Result<Value, OcpError> {
        self.seen_event_selectors
            .lock()
            .unwrap()
            .push(field_selector.map(str::to_string));
        self.respond(target, &self.events)
    }
}

/// One recorded Prometheus call.
pub struct PromCall {
    pub path: String,
    pub params: Vec<(String, String)>,
    pub target: PromTarget,
}

/// Canned Prometheus backend returning the same response for every call.
pub struct MockPromClient {
    pub response: Value,
    pub calls: Mutex<Vec<PromCall>>,
}

impl Default for MockPromClient {
    fn default() -> Self {
        Self::with_response(json!({"status": "success", "data": {"result": []}}))
    }
}

impl MockPromClient {
    pub fn with_response(response: Value) -> Self {
        Self {
            response,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PromClient for MockPromClient {
    async fn get(
        &self,
        target: &PromTarget,
        path: &str,
        params: &[(String, String)],
    ) -> Result<Value, PromError> {
        self.calls.lock().unwrap().push(PromCall {
            path: path.to_string(),
            params: params.to_vec(),
            target: target.clone(),
        });

        Ok(self.response.clone())
    }
}

/// OpenShift project list with names deliberately out of order.
pub fn project_list() -> Value {
    json!({
        "items": [
            {"metadata": {"name": "payments"}},
            {"metadata": {"name": "default"}},
            {"metadata": {"name": "logging"}},
        ]
    })
}

/// Core namespace list, distinct from the project list so tests can tell
/// which API answered.
pub fn namespace_list() -> Value {
    json!({
        "items": [
            {"metadata": {"name": "kube-system"}},
            {"metadata": {"name": "default"}},
        ]
    })
}

/// Pod list with one fully reported pod and one with no statuses yet.
pub fn pod_list() -> Value {
    json!({
        "items": [
            {
                "metadata": {
                    "name": "api-7d9c",
                    "namespace": "payments",
                    "creationTimestamp": "2025-05-01T10:00:00Z",
                    "labels": {"app": "api"},
                },
                "spec": {
                    "nodeName": "worker-1",
                    "containers": [
                        {"name": "api", "image": "registry.example.com/api:1.4.2"},
                        {"name": "sidecar", "image": "registry.example.com/sidecar:0.9"},
                    ],
                },
                "status": {
                    "phase": "Running",
                    "conditions": [
                        {"type": "PodScheduled", "status": "True"},
                        {"type": "Ready", "status": "True"},
                    ],
                    "containerStatuses": [
                        {"name": "api", "ready": true, "restartCount": 2},
                    ],
                },
            },
            {
                "metadata": {"name": "worker-0", "namespace": "payments"},
                "spec": {"containers": [{"name": "worker", "image": "registry.example.com/worker:2.0"}]},
                "status": {"phase": "Pending"},
            },
        ]
    })
}

/// Event list with timestamps deliberately out of order.
pub fn event_list() -> Value {
    json!({
        "items": [
            {
                "type": "Normal",
                "reason": "Scheduled",
                "message": "Successfully assigned payments/api-7d9c to worker-1",
                "count": 1,
                "firstTimestamp": "2025-05-01T10:00:00Z",
                "lastTimestamp": "2025-05-01T10:00:00Z",
                "involvedObject": {"name": "api-7d9c", "kind": "Pod"},
            },
            {
                "type": "Warning",
                "reason": "BackOff",
                "message": "Back-off restarting failed container",
                "count": 7,
                "firstTimestamp": "2025-05-01T11:00:00Z",
                "lastTimestamp": "2025-05-01T12:30:00Z",
                "involvedObject": {"name": "worker-0", "kind": "Pod"},
            },
            {
                "type": "Normal",
                "reason": "Pulled",
                "message": "Container image already present on machine",
                "count": 3,
                "firstTimestamp": "2025-05-01T10:30:00Z",
                "lastTimestamp": "2025-05-01T11:15:00Z",
                "involvedObject": {"name": "api-7d9c", "kind": "Pod"},
            },
        ]
    })
}
