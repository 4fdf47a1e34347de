use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::yaml::{value_to_string, value_truthy};
use crate::{ObserveContext, cluster_token_path, load_yaml_mapping};

/// Check types whose parameters identify a managed cluster.
const CLUSTER_CHECK_TYPES: &[&str] = &["ocp_pod_health", "ocp_cluster_snapshot"];

/// Resolved connection facts for one managed cluster.
///
/// Known fields are typed; keys from the override document that the builder
/// does not recognize are preserved in `extra` and flattened back when the
/// descriptor is serialized, so UI-only attributes like `prometheus_url`
/// pass through untouched.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterDescriptor {
    /// Unique cluster name; also the registry key.
    pub name: String,
    /// Base URL of the cluster's API server, empty when unconfigured.
    pub ocp_api: String,
    /// Skip TLS certificate verification against this cluster when true.
    pub insecure: bool,
    /// Path of the file holding this cluster's API token.
    pub token_file: String,
    /// Log-backend URL, empty when absent.
    pub loki_url: String,
    /// Free-form attributes carried over from the override document.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ClusterDescriptor {
    /// Builds a descriptor from the `params` of a recognized check entry.
    fn discovered(name: &str, params: &Mapping, ctx: &ObserveContext) -> Self {
        let ocp_api = params
            .get("ocp_api")
            .map(value_to_string)
            .unwrap_or_default();
        let insecure = params
            .get("ocp_insecure")
            .map(value_to_string)
            .unwrap_or_default()
            .eq_ignore_ascii_case("true");

        Self {
            name: name.to_string(),
            ocp_api: ocp_api.trim_end_matches('/').to_string(),
            insecure,
            token_file: cluster_token_path(ctx, name).display().to_string(),
            loki_url: String::new(),
            extra: BTreeMap::new(),
        }
    }

    /// Builds a descriptor for a cluster known only to the override document.
    ///
    /// Such clusters have no generated check, so there is no API URL and TLS
    /// verification is skipped until the override says otherwise.
    fn synthesized(name: &str, ctx: &ObserveContext) -> Self {
        Self {
            name: name.to_string(),
            ocp_api: String::new(),
            insecure: true,
            token_file: cluster_token_path(ctx, name).display().to_string(),
            loki_url: String::new(),
            extra: BTreeMap::new(),
        }
    }

    /// Shallow-merges override-document fields on top of this descriptor.
    ///
    /// Known keys replace the typed fields, everything else lands in
    /// `extra`. The `name` key is skipped so the registry key stays
    /// authoritative.
    fn apply_overrides(&mut self, overrides: &Mapping) {
        for (key, value) in overrides {
            let Some(key) = key.as_str() else { continue };
            match key {
                "name" => {}
                "ocp_api" => self.ocp_api = value_to_string(value),
                "insecure" => self.insecure = value_truthy(value),
                "token_file" => self.token_file = value_to_string(value),
                "loki_url" => self.loki_url = value_to_string(value),
                _ => {
                    self.extra.insert(key.to_string(), value.clone());
                }
            }
        }
    }

    /// URL of a cluster-scoped Prometheus when the override document supplies
    /// one; empty otherwise.
    pub fn prometheus_url(&self) -> String {
        self.extra
            .get("prometheus_url")
            .map(value_to_string)
            .unwrap_or_default()
    }
}

/// Builds the registry of managed clusters.
///
/// Cluster identities are discovered from the generated check-definition
/// files, then the override document is merged on top. The first file to
/// define a name wins its discovered fields; override entries always win
/// per key, and names only the override knows are synthesized with
/// defaults.
pub fn get_clusters(ctx: &ObserveContext) -> BTreeMap<String, ClusterDescriptor> {
    let mut clusters = BTreeMap::new();

    for path in generated_files(ctx) {
        let doc = load_yaml_mapping(&path);
        let Some(checks) = doc.get("checks").and_then(Value::as_sequence) else {
            continue;
        };

        for check in checks {
            let Some(check) = check.as_mapping() else {
                continue;
            };
            if !check.get("enabled").and_then(Value::as_bool).unwrap_or(true) {
                continue;
            }
            let check_type = check.get("type").and_then(Value::as_str).unwrap_or_default();
            if !CLUSTER_CHECK_TYPES.contains(&check_type) {
                continue;
            }

            let empty = Mapping::new();
            let params = check
                .get("params")
                .and_then(Value::as_mapping)
                .unwrap_or(&empty);
            let name = params
                .get("cluster")
                .map(value_to_string)
                .unwrap_or_default();
            if name.is_empty() || clusters.contains_key(&name) {
                continue;
            }

            clusters.insert(name.clone(), ClusterDescriptor::discovered(&name, params, ctx));
        }
    }

    let overrides = load_yaml_mapping(&ctx.override_doc_path());
    if let Some(entries) = overrides.get("clusters").and_then(Value::as_mapping) {
        for (name, fields) in entries {
            let Some(name) = name.as_str() else { continue };
            let Some(fields) = fields.as_mapping() else { continue };

            clusters
                .entry(name.to_string())
                .or_insert_with(|| ClusterDescriptor::synthesized(name, ctx))
                .apply_overrides(fields);
        }
    }

    clusters
}

/// Enumerates the generated check files, sorted so scans are deterministic.
fn generated_files(ctx: &ObserveContext) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(ctx.generated_dir()) else {
        return Vec::new();
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "yaml"))
        .collect();
    files.sort();
    files
}
