//! Tool descriptors — immutable registration metadata.
//!
//! Every operation exposed through the gateway registers a [`ToolDescriptor`]
//! at startup: its id, category, operation kind, write kind, rate-limit
//! charge class, and parameter definitions. Descriptors are created once and
//! never mutated; they are the only thing the gateway knows about a tool
//! beyond its callable handler.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::core::DomainError;

/// What a tool does to the managed system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Pure query — never restricted by global modes, never rate limited.
    Read,
    /// Mutation of content or configuration.
    Write,
    /// Administrative action (queue run, cache rebuild, index regeneration).
    Trigger,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Read => "read",
            OperationKind::Write => "write",
            OperationKind::Trigger => "trigger",
        }
    }
}

/// Classification of a mutating tool, consumed only by config-only mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteKind {
    /// Content-entity mutations (nodes, media, users, menu links).
    Content,
    /// Operational actions on runtime state (caches, queues, indexes).
    Ops,
    /// Configuration changes. The config-only allow-list default.
    Config,
}

impl WriteKind {
    pub const ALL: [WriteKind; 3] = [WriteKind::Content, WriteKind::Ops, WriteKind::Config];

    pub fn as_str(&self) -> &'static str {
        match self {
            WriteKind::Content => "content",
            WriteKind::Ops => "ops",
            WriteKind::Config => "config",
        }
    }
}

impl std::fmt::Display for WriteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WriteKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "content" => Ok(WriteKind::Content),
            "ops" => Ok(WriteKind::Ops),
            "config" => Ok(WriteKind::Config),
            other => Err(DomainError::InvalidWriteKind(other.to_string())),
        }
    }
}

/// Which rate-limit buckets a mutating call consumes.
///
/// Every chargeable call consumes the generic write buckets; deletes and
/// structure changes additionally consume their own hourly bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChargeClass {
    Write,
    Delete,
    Structure,
}

/// Parameter specification for a tool, used for input validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Whether this parameter is required
    pub required: bool,
    /// Parameter type hint (e.g., "string", "integer", "boolean")
    pub param_type: String,
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: "string".to_string(),
        }
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }
}

/// Immutable metadata for one registered operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Unique id (e.g. "content.create")
    pub id: String,
    /// Category tag gating the caller permission (e.g. "content", "cache")
    pub category: String,
    /// Human-readable description
    pub description: String,
    /// What this tool does to the managed system
    pub operation_kind: OperationKind,
    /// Explicit write kind; when absent, derived from the category
    pub write_kind: Option<WriteKind>,
    /// Rate-limit charge class for mutating calls
    pub charge_class: ChargeClass,
    /// Parameter specifications
    pub parameters: Vec<ToolParameter>,
}

impl ToolDescriptor {
    /// A read-only tool. Never restricted by modes, never charged.
    pub fn read(id: impl Into<String>, category: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            description: description.into(),
            operation_kind: OperationKind::Read,
            write_kind: None,
            charge_class: ChargeClass::Write,
            parameters: Vec::new(),
        }
    }

    /// A mutating tool, charged against the generic write buckets.
    pub fn write(id: impl Into<String>, category: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            description: description.into(),
            operation_kind: OperationKind::Write,
            write_kind: None,
            charge_class: ChargeClass::Write,
            parameters: Vec::new(),
        }
    }

    /// An administrative trigger. Requires admin scope and is charged as a
    /// structure change (the most restrictive bucket).
    pub fn trigger(id: impl Into<String>, category: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            description: description.into(),
            operation_kind: OperationKind::Trigger,
            write_kind: None,
            charge_class: ChargeClass::Structure,
            parameters: Vec::new(),
        }
    }

    pub fn with_write_kind(mut self, kind: WriteKind) -> Self {
        self.write_kind = Some(kind);
        self
    }

    pub fn with_charge_class(mut self, charge: ChargeClass) -> Self {
        self.charge_class = charge;
        self
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn is_mutating(&self) -> bool {
        self.operation_kind != OperationKind::Read
    }

    /// The write kind used by config-only mode: the explicit kind when set,
    /// otherwise the category default. `None` for read tools.
    pub fn effective_write_kind(&self) -> Option<WriteKind> {
        if !self.is_mutating() {
            return None;
        }
        Some(
            self.write_kind
                .unwrap_or_else(|| default_write_kind(&self.category)),
        )
    }
}

/// Default category → write-kind classification.
///
/// Categories not listed here are treated as configuration changes, which is
/// the conservative default under config-only mode (content stays untouched
/// unless a category is explicitly classified as content).
pub fn default_write_kind(category: &str) -> WriteKind {
    match category {
        // Content-entity mutations (nodes, media, users, etc.). Menus default
        // to content because menu links are content entities.
        "content" | "users" | "media" | "batch" | "migration" | "moderation" | "scheduler"
        | "redirect" | "entity_clone" | "menus" => WriteKind::Content,

        // Operational actions (runtime state, indexing, regeneration).
        "cache" | "cron" | "search" => WriteKind::Ops,

        _ => WriteKind::Config,
    }
}
