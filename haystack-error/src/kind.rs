//! Error kinds and their static defaults

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Documentation for the modeling module
pub const MODELING_DOCS: &str = "https://haystack.deepset.ai/";
/// Documentation for pipelines
pub const PIPELINE_DOCS: &str = "https://docs.haystack.deepset.ai/docs/pipelines";
/// Documentation for YAML pipeline definitions
pub const PIPELINE_CONFIG_DOCS: &str =
    "https://docs.haystack.deepset.ai/docs/pipelines#yaml-file-definitions";

/// HTTP status OpenAI answers with when rate limiting
pub const RATE_LIMIT_STATUS: u16 = 429;

/// The kind of error that occurred.
///
/// Kinds form a tree rooted at [`ErrorKind::Haystack`]. The tree is plain
/// data: see [`ErrorKind::spec`] for each kind's parent and defaults, and
/// [`ErrorKind::is_a`] to match a whole subtree.
///
/// Serialises as its name, e.g. `"FilterError"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum ErrorKind {
    /// Any error generated by haystack
    Haystack,

    /// Issues raised by the modeling module
    Modeling,

    // =========================================================================
    // Pipeline errors
    // =========================================================================
    /// Issues raised within a pipeline
    Pipeline,

    /// Reading or building the JSON schema of pipelines failed
    PipelineSchema,

    /// Issues in a pipeline's YAML config
    PipelineConfig,

    // =========================================================================
    // Document store errors (messages may carry document content)
    // =========================================================================
    /// Issues that occur in a document store
    DocumentStore,

    /// Building a complex filter failed
    Filter,

    /// Issues specific to the Pinecone document store
    PineconeDocumentStore,

    /// A document with the same id already exists
    DuplicateDocument,

    // =========================================================================
    // Node errors
    // =========================================================================
    /// Issues that occur in a node
    Node,

    /// Issues in a node of the audio module
    AudioNode,

    /// Failures reported by the OpenAI APIs
    OpenAI,

    /// OpenAI rate limiting (always status 429)
    OpenAIRateLimit,

    /// Failures reported by the Cohere APIs
    Cohere,

    /// Issues in the image-to-text node
    ImageToText,
}

/// Behaviour a kind opts into independently of its place in the tree.
///
/// A kind may carry several capabilities, which is how
/// [`ErrorKind::DuplicateDocument`] is at once a document store error and an
/// invalid-value error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Raised by the pipeline layer
    Pipeline,
    /// Raised by a document store
    DocumentStore,
    /// An invalid value was supplied by the caller
    InvalidValue,
    /// Raised by a node
    Node,
    /// A remote API answered with a failure; carries a status code
    RemoteApi,
}

/// Static defaults of one kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindSpec {
    pub parent: Option<ErrorKind>,
    pub docs_link: Option<&'static str>,
    pub report_message: bool,
    /// Status code forced on every error of this kind
    pub fixed_status_code: Option<u16>,
    pub capabilities: &'static [Capability],
}

impl KindSpec {
    /// Whether errors of this kind have a `status_code` field
    pub fn has_status_code(&self) -> bool {
        self.capabilities.contains(&Capability::RemoteApi)
    }
}

const HAYSTACK: KindSpec = KindSpec {
    parent: None,
    docs_link: None,
    report_message: true,
    fixed_status_code: None,
    capabilities: &[],
};

const MODELING: KindSpec = KindSpec {
    parent: Some(ErrorKind::Haystack),
    docs_link: Some(MODELING_DOCS),
    ..HAYSTACK
};

const PIPELINE: KindSpec = KindSpec {
    parent: Some(ErrorKind::Haystack),
    docs_link: Some(PIPELINE_DOCS),
    capabilities: &[Capability::Pipeline],
    ..HAYSTACK
};

const PIPELINE_SCHEMA: KindSpec = KindSpec {
    parent: Some(ErrorKind::Pipeline),
    ..PIPELINE
};

const PIPELINE_CONFIG: KindSpec = KindSpec {
    parent: Some(ErrorKind::Pipeline),
    docs_link: Some(PIPELINE_CONFIG_DOCS),
    ..PIPELINE
};

const DOCUMENT_STORE: KindSpec = KindSpec {
    parent: Some(ErrorKind::Haystack),
    report_message: false,
    capabilities: &[Capability::DocumentStore],
    ..HAYSTACK
};

const DOCUMENT_STORE_CHILD: KindSpec = KindSpec {
    parent: Some(ErrorKind::DocumentStore),
    ..DOCUMENT_STORE
};

const DUPLICATE_DOCUMENT: KindSpec = KindSpec {
    capabilities: &[Capability::DocumentStore, Capability::InvalidValue],
    ..DOCUMENT_STORE_CHILD
};

const NODE: KindSpec = KindSpec {
    parent: Some(ErrorKind::Haystack),
    capabilities: &[Capability::Node],
    ..HAYSTACK
};

const NODE_CHILD: KindSpec = KindSpec {
    parent: Some(ErrorKind::Node),
    ..NODE
};

const REMOTE_API: KindSpec = KindSpec {
    report_message: false,
    capabilities: &[Capability::Node, Capability::RemoteApi],
    ..NODE_CHILD
};

const OPENAI_RATE_LIMIT: KindSpec = KindSpec {
    parent: Some(ErrorKind::OpenAI),
    fixed_status_code: Some(RATE_LIMIT_STATUS),
    ..REMOTE_API
};

impl ErrorKind {
    /// Every kind, root first
    pub const ALL: [ErrorKind; 15] = [
        ErrorKind::Haystack,
        ErrorKind::Modeling,
        ErrorKind::Pipeline,
        ErrorKind::PipelineSchema,
        ErrorKind::PipelineConfig,
        ErrorKind::DocumentStore,
        ErrorKind::Filter,
        ErrorKind::PineconeDocumentStore,
        ErrorKind::DuplicateDocument,
        ErrorKind::Node,
        ErrorKind::AudioNode,
        ErrorKind::OpenAI,
        ErrorKind::OpenAIRateLimit,
        ErrorKind::Cohere,
        ErrorKind::ImageToText,
    ];

    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Haystack => "HaystackError",
            ErrorKind::Modeling => "ModelingError",

            // Pipeline
            ErrorKind::Pipeline => "PipelineError",
            ErrorKind::PipelineSchema => "PipelineSchemaError",
            ErrorKind::PipelineConfig => "PipelineConfigError",

            // Document store
            ErrorKind::DocumentStore => "DocumentStoreError",
            ErrorKind::Filter => "FilterError",
            ErrorKind::PineconeDocumentStore => "PineconeDocumentStoreError",
            ErrorKind::DuplicateDocument => "DuplicateDocumentError",

            // Node
            ErrorKind::Node => "NodeError",
            ErrorKind::AudioNode => "AudioNodeError",
            ErrorKind::OpenAI => "OpenAIError",
            ErrorKind::OpenAIRateLimit => "OpenAIRateLimitError",
            ErrorKind::Cohere => "CohereError",
            ErrorKind::ImageToText => "ImageToTextError",
        }
    }

    /// Parse a name as returned by [`ErrorKind::as_str`]
    pub fn from_name(name: &str) -> Option<ErrorKind> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// Static defaults for this kind
    pub fn spec(&self) -> &'static KindSpec {
        match self {
            ErrorKind::Haystack => &HAYSTACK,
            ErrorKind::Modeling => &MODELING,
            ErrorKind::Pipeline => &PIPELINE,
            ErrorKind::PipelineSchema => &PIPELINE_SCHEMA,
            ErrorKind::PipelineConfig => &PIPELINE_CONFIG,
            ErrorKind::DocumentStore => &DOCUMENT_STORE,
            ErrorKind::Filter | ErrorKind::PineconeDocumentStore => &DOCUMENT_STORE_CHILD,
            ErrorKind::DuplicateDocument => &DUPLICATE_DOCUMENT,
            ErrorKind::Node => &NODE,
            ErrorKind::AudioNode | ErrorKind::ImageToText => &NODE_CHILD,
            ErrorKind::OpenAI | ErrorKind::Cohere => &REMOTE_API,
            ErrorKind::OpenAIRateLimit => &OPENAI_RATE_LIMIT,
        }
    }

    pub fn parent(&self) -> Option<ErrorKind> {
        self.spec().parent
    }

    pub fn docs_link(&self) -> Option<&'static str> {
        self.spec().docs_link
    }

    /// Whether the message is sent with the telemetry event by default
    pub fn reports_message(&self) -> bool {
        self.spec().report_message
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        self.spec().capabilities.contains(&capability)
    }

    /// This kind followed by its parents up to [`ErrorKind::Haystack`]
    pub fn ancestors(&self) -> impl Iterator<Item = ErrorKind> {
        std::iter::successors(Some(*self), |kind| kind.parent())
    }

    /// Whether this kind is `other` or lies below it in the tree
    pub fn is_a(&self, other: ErrorKind) -> bool {
        self.ancestors().any(|kind| kind == other)
    }

    /// Name of the telemetry event sent when an error of this kind is built
    pub fn event_name(&self) -> String {
        format!("{} raised", self.as_str())
    }
}

/// A name that is not one of [`ErrorKind::ALL`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown error kind '{0}'")]
pub struct UnknownKind(pub String);

impl From<ErrorKind> for &'static str {
    fn from(kind: ErrorKind) -> Self {
        kind.as_str()
    }
}

impl TryFrom<String> for ErrorKind {
    type Error = UnknownKind;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        ErrorKind::from_name(&name).ok_or(UnknownKind(name))
    }
}

impl std::str::FromStr for ErrorKind {
    type Err = UnknownKind;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        ErrorKind::from_name(name).ok_or_else(|| UnknownKind(name.to_string()))
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
