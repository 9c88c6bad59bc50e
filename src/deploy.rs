// src/deploy.rs
//! Deployment definition for the hosted site: a private bucket for the
//! frontend, a CDN in front of it, and the server binary running as a
//! container function behind an HTTP API.
//!
//! The definition lives in `deploy/stack.toml`. It is validated against the
//! runtime's retry budget and rendered to JSON for the provisioning tooling.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::errors::StackError;
use crate::upstream::RetryPolicy;

pub const DEFAULT_STACK_FILE: &str = "deploy/stack.toml";

/// Suffix of the catch-all API route; everything before it is the API prefix.
const PROXY_SUFFIX: &str = "/{proxy+}";

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RemovalPolicy {
    Retain,
    Destroy,
}

impl FromStr for RemovalPolicy {
    type Err = StackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "retain" => Ok(RemovalPolicy::Retain),
            "destroy" => Ok(RemovalPolicy::Destroy),
            other => Err(StackError::Invalid(format!("unknown removal policy {:?}", other))),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Encryption {
    S3Managed,
    KmsManaged,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Architecture {
    #[serde(rename = "x86_64")]
    X86_64,
    #[serde(rename = "arm64")]
    Arm64,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Origin {
    SiteBucket,
    HttpApi,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ViewerProtocolPolicy {
    AllowAll,
    HttpsOnly,
    RedirectToHttps,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AllowedMethods {
    GetHead,
    GetHeadOptions,
    All,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CachePolicy {
    CachingOptimized,
    CachingDisabled,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OriginRequestPolicy {
    AllViewer,
    AllViewerExceptHostHeader,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SiteBucket {
    pub id: String,
    pub block_public_access: bool,
    pub encryption: Encryption,
    /// Directory whose contents are uploaded as the site.
    pub asset_dir: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct FunctionSpec {
    pub id: String,
    pub dockerfile: String,
    pub build_context: String,
    #[serde(default)]
    pub build_excludes: Vec<String>,
    pub architecture: Architecture,
    pub timeout_secs: u64,
    pub log_retention_days: u32,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ApiSpec {
    pub id: String,
    pub route: String,
    pub methods: Vec<String>,
}

impl ApiSpec {
    /// `/api/{proxy+}` -> `/api`.
    pub fn prefix(&self) -> Option<&str> {
        self.route
            .strip_suffix(PROXY_SUFFIX)
            .filter(|p| p.starts_with('/') && p.len() > 1)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Behavior {
    pub origin: Origin,
    pub viewer_protocol_policy: ViewerProtocolPolicy,
    pub allowed_methods: AllowedMethods,
    pub cache_policy: CachePolicy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_request_policy: Option<OriginRequestPolicy>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PathBehavior {
    pub path_pattern: String,
    #[serde(flatten)]
    pub behavior: Behavior,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub http_status: u16,
    pub response_http_status: u16,
    pub response_page_path: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct DistributionSpec {
    pub id: String,
    pub default_root_object: String,
    pub default_behavior: Behavior,
    #[serde(default)]
    pub additional_behaviors: Vec<PathBehavior>,
    #[serde(default)]
    pub error_responses: Vec<ErrorResponse>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct DeploymentSpec {
    pub id: String,
    pub invalidation_paths: Vec<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Outputs {
    pub frontend_url: String,
    pub api_endpoint: String,
}

/// The whole deployment definition as written in `stack.toml`.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct StackSpec {
    pub name: String,
    pub default_region: String,
    pub removal_policy: RemovalPolicy,
    pub site_bucket: SiteBucket,
    pub function: FunctionSpec,
    pub api: ApiSpec,
    pub distribution: DistributionSpec,
    pub deployment: DeploymentSpec,
    pub outputs: Outputs,
}

/// Values supplied by the environment at render time.
#[derive(Debug, Clone, Default)]
pub struct RenderOverrides {
    pub region: Option<String>,
    pub removal_policy: Option<RemovalPolicy>,
}

impl RenderOverrides {
    /// Reads `CDK_DEFAULT_REGION` and `STACK_REMOVAL_POLICY`.
    pub fn from_env() -> Result<Self, StackError> {
        let region = std::env::var("CDK_DEFAULT_REGION").ok().filter(|r| !r.is_empty());
        let removal_policy = match std::env::var("STACK_REMOVAL_POLICY") {
            Ok(raw) if !raw.is_empty() => Some(raw.parse()?),
            _ => None,
        };
        Ok(Self { region, removal_policy })
    }
}

/// A validated stack with environment overrides applied.
#[derive(Serialize, Debug)]
pub struct RenderedStack<'a> {
    pub name: &'a str,
    pub region: String,
    pub removal_policy: RemovalPolicy,
    /// Objects are only auto-deleted when the bucket itself is destroyed.
    pub auto_delete_objects: bool,
    pub upstream_worst_case_ms: u64,
    pub site_bucket: &'a SiteBucket,
    pub function: &'a FunctionSpec,
    pub api: &'a ApiSpec,
    pub distribution: &'a DistributionSpec,
    pub deployment: &'a DeploymentSpec,
    pub outputs: &'a Outputs,
}

impl StackSpec {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StackError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, StackError> {
        Ok(toml::from_str(raw)?)
    }

    /// Checks the wiring between CDN, API and function.
    pub fn validate(&self, retry: &RetryPolicy) -> Result<(), StackError> {
        if self.name.trim().is_empty() {
            return Err(StackError::Invalid("stack name is empty".to_string()));
        }

        if !self.site_bucket.block_public_access {
            return Err(StackError::Invalid(
                "site bucket must block public access; it is served through the distribution".to_string(),
            ));
        }

        let prefix = self.api.prefix().ok_or_else(|| {
            StackError::Invalid(format!(
                "api route {:?} must look like /<prefix>{}",
                self.api.route, PROXY_SUFFIX
            ))
        })?;

        if self.distribution.default_behavior.origin != Origin::SiteBucket {
            return Err(StackError::Invalid(
                "default behavior must serve the site bucket".to_string(),
            ));
        }

        let api_pattern = format!("{}/*", prefix.trim_start_matches('/'));
        let api_behavior = self
            .distribution
            .additional_behaviors
            .iter()
            .find(|b| b.behavior.origin == Origin::HttpApi)
            .ok_or_else(|| StackError::Invalid("no distribution behavior routes to the http api".to_string()))?;
        if api_behavior.path_pattern != api_pattern {
            return Err(StackError::Invalid(format!(
                "api behavior path {:?} does not match api route prefix (expected {:?})",
                api_behavior.path_pattern, api_pattern
            )));
        }
        if api_behavior.behavior.cache_policy != CachePolicy::CachingDisabled {
            return Err(StackError::Invalid("api responses must not be cached by the distribution".to_string()));
        }

        let fallback_page = format!("/{}", self.distribution.default_root_object);
        for status in [403, 404] {
            let covered = self.distribution.error_responses.iter().any(|r| {
                r.http_status == status && r.response_http_status == 200 && r.response_page_path == fallback_page
            });
            if !covered {
                return Err(StackError::Invalid(format!(
                    "missing single-page fallback for {} -> {}",
                    status, fallback_page
                )));
            }
        }

        let worst_case = retry.worst_case_latency();
        if u128::from(self.function.timeout_secs) * 1000 <= worst_case.as_millis() {
            return Err(StackError::Invalid(format!(
                "function timeout {}s does not cover the upstream worst case of {}ms",
                self.function.timeout_secs,
                worst_case.as_millis()
            )));
        }

        if self.function.log_retention_days == 0 {
            return Err(StackError::Invalid("log retention must be at least one day".to_string()));
        }

        Ok(())
    }

    /// Validates and applies `overrides`.
    pub fn resolve(&self, overrides: &RenderOverrides, retry: &RetryPolicy) -> Result<RenderedStack<'_>, StackError> {
        self.validate(retry)?;

        let removal_policy = overrides.removal_policy.unwrap_or(self.removal_policy);
        Ok(RenderedStack {
            name: &self.name,
            region: overrides.region.clone().unwrap_or_else(|| self.default_region.clone()),
            removal_policy,
            auto_delete_objects: removal_policy == RemovalPolicy::Destroy,
            upstream_worst_case_ms: u64::try_from(retry.worst_case_latency().as_millis()).unwrap_or(u64::MAX),
            site_bucket: &self.site_bucket,
            function: &self.function,
            api: &self.api,
            distribution: &self.distribution,
            deployment: &self.deployment,
            outputs: &self.outputs,
        })
    }

    pub fn render_json(&self, overrides: &RenderOverrides, retry: &RetryPolicy) -> Result<String, StackError> {
        let rendered = self.resolve(overrides, retry)?;
        Ok(serde_json::to_string_pretty(&rendered)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const STACK: &str = include_str!("../deploy/stack.toml");

    fn stack() -> StackSpec {
        StackSpec::from_toml_str(STACK).unwrap()
    }

    #[test]
    fn test_checked_in_stack_is_valid() {
        let stack = stack();
        stack.validate(&RetryPolicy::default()).unwrap();

        assert_eq!(stack.api.prefix(), Some("/api"));
        assert_eq!(stack.function.architecture, Architecture::X86_64);
        assert_eq!(stack.distribution.error_responses.len(), 2);
    }

    #[test]
    fn test_resolve_applies_overrides() {
        let stack = stack();
        let retain = stack.resolve(&RenderOverrides::default(), &RetryPolicy::default()).unwrap();
        assert_eq!(retain.region, "eu-north-1");
        assert_eq!(retain.removal_policy, RemovalPolicy::Retain);
        assert!(!retain.auto_delete_objects);
        assert_eq!(retain.upstream_worst_case_ms, 4200);

        let overrides = RenderOverrides {
            region: Some("us-east-1".to_string()),
            removal_policy: Some(RemovalPolicy::Destroy),
        };
        let destroy = stack.resolve(&overrides, &RetryPolicy::default()).unwrap();
        assert_eq!(destroy.region, "us-east-1");
        assert!(destroy.auto_delete_objects);
    }

    #[test]
    fn test_rendered_json_keeps_wire_names() {
        let json = stack().render_json(&RenderOverrides::default(), &RetryPolicy::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["distribution"]["additional_behaviors"][0]["path_pattern"], "api/*");
        assert_eq!(value["distribution"]["additional_behaviors"][0]["cache_policy"], "caching-disabled");
        assert_eq!(value["function"]["architecture"], "x86_64");
        assert_eq!(value["auto_delete_objects"], false);
    }

    #[test]
    fn test_function_timeout_must_cover_retries() {
        let slow = RetryPolicy {
            max_attempts: 3,
            timeout: Duration::from_secs(2),
            retry_delay: Duration::from_millis(200),
        };
        let err = stack().validate(&slow).unwrap_err();
        assert!(err.to_string().contains("worst case"));
    }

    #[test]
    fn test_oversized_retry_budget_is_an_error() {
        let endless = RetryPolicy {
            max_attempts: 2,
            timeout: Duration::from_millis(u64::MAX),
            retry_delay: Duration::from_millis(200),
        };
        let err = stack().validate(&endless).unwrap_err();
        assert!(err.to_string().contains("worst case"));
    }

    #[test]
    fn test_missing_spa_fallback_is_rejected() {
        let mut stack = stack();
        stack.distribution.error_responses.retain(|r| r.http_status != 404);
        let err = stack.validate(&RetryPolicy::default()).unwrap_err();
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn test_api_behavior_must_match_route_and_skip_cache() {
        let mut cached = stack();
        cached.distribution.additional_behaviors[0].behavior.cache_policy = CachePolicy::CachingOptimized;
        assert!(cached.validate(&RetryPolicy::default()).is_err());

        let mut moved = stack();
        moved.api.route = "/backend/{proxy+}".to_string();
        assert!(moved.validate(&RetryPolicy::default()).is_err());

        let mut bare = stack();
        bare.api.route = "/{proxy+}".to_string();
        assert!(bare.validate(&RetryPolicy::default()).is_err());
    }

    #[test]
    fn test_removal_policy_parsing() {
        assert_eq!("DESTROY".parse::<RemovalPolicy>().unwrap(), RemovalPolicy::Destroy);
        assert_eq!("retain".parse::<RemovalPolicy>().unwrap(), RemovalPolicy::Retain);
        assert!("keep".parse::<RemovalPolicy>().is_err());
    }
}
