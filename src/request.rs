//! Request-level wrapping around the compiler: validation, tracking settings
//! and hand-off to an MJML renderer.

use crate::compiler::tree_to_mjml;
use crate::error::{CompileError, CompileResult};
use crate::node::{BlockKind, Node};
use crate::tracking::TrackingConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A compile request as received from the API layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileRequest {
    pub workspace_id: String,
    pub message_id: String,
    pub root_block: Node,
    /// Either a JSON object or a string holding JSON
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_data: Option<Value>,
    #[serde(default)]
    pub tracking_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_campaign: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_term: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_id: Option<String>,
}

impl CompileRequest {
    pub fn from_json(json: &str) -> CompileResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_yaml(yaml: &str) -> CompileResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn validate(&self) -> CompileResult<()> {
        if self.workspace_id.trim().is_empty() {
            return Err(CompileError::InvalidRequest(
                "workspaceId is required".to_string(),
            ));
        }
        if self.message_id.trim().is_empty() {
            return Err(CompileError::InvalidRequest(
                "messageId is required".to_string(),
            ));
        }
        if self.root_block.block_kind() != BlockKind::Root {
            return Err(CompileError::InvalidRequest(format!(
                "rootBlock must be of kind 'root', got '{}'",
                self.root_block.kind
            )));
        }
        if !self.root_block.data.get("styles").is_some_and(Value::is_object) {
            return Err(CompileError::InvalidRequest(
                "rootBlock is missing its styles".to_string(),
            ));
        }
        Ok(())
    }

    pub fn tracking_config(&self) -> TrackingConfig {
        TrackingConfig {
            enable_tracking: self.tracking_enabled,
            endpoint: self.tracking_endpoint.clone(),
            workspace_id: Some(self.workspace_id.clone()),
            message_id: Some(self.message_id.clone()),
            utm_source: self.utm_source.clone(),
            utm_medium: self.utm_medium.clone(),
            utm_campaign: self.utm_campaign.clone(),
            utm_content: self.utm_content.clone(),
            utm_term: self.utm_term.clone(),
            utm_id: self.utm_id.clone(),
        }
    }

    /// Template data as JSON text, the form the compiler consumes
    pub fn template_data_json(&self) -> Option<String> {
        match &self.template_data {
            None | Some(Value::Null) => None,
            Some(Value::String(json)) => Some(json.clone()),
            Some(other) => Some(other.to_string()),
        }
    }
}

/// Failure reported by the MJML renderer for otherwise valid input
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{message}")]
pub struct RenderFailure {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

/// Turns MJML into final HTML
pub trait MjmlRenderer {
    fn render(&self, mjml: &str) -> Result<String, RenderFailure>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileResponse {
    pub success: bool,
    pub mjml: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RenderFailure>,
}

/// Validate, compile and optionally render a request.
///
/// Compiler failures are returned as `Err`; a renderer rejecting the MJML is a
/// normal response with `success: false`.
pub fn compile_request(
    request: &CompileRequest,
    renderer: Option<&dyn MjmlRenderer>,
) -> CompileResult<CompileResponse> {
    request.validate()?;
    let template_data = request.template_data_json();
    let mjml = tree_to_mjml(
        &request.root_block,
        template_data.as_deref(),
        &request.tracking_config(),
    )?;

    let Some(renderer) = renderer else {
        return Ok(CompileResponse {
            success: true,
            mjml,
            html: None,
            error: None,
        });
    };

    match renderer.render(&mjml) {
        Ok(html) => Ok(CompileResponse {
            success: true,
            mjml,
            html: Some(html),
            error: None,
        }),
        Err(failure) => {
            log::debug!(
                "renderer rejected message {}: {}",
                request.message_id,
                failure
            );
            Ok(CompileResponse {
                success: false,
                mjml,
                html: None,
                error: Some(failure),
            })
        }
    }
}
