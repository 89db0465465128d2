//! Error handling for component-deps
//!
//! Two layers, the same way the rest of the crate propagates failures:
//! - [`DepsError`] - strongly-typed failures raised while classifying and routing
//!   dependency notations, expanding bundles, and loading declaration files
//! - [`ErrorContext`] - wrapper adding a suggestion and details for CLI output
//!
//! Operations return [`anyhow::Result`] so that customizer failures travel back
//! to the caller untouched; typed errors can be recovered with
//! [`anyhow::Error::downcast_ref`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use component_deps::core::{DepsError, user_friendly_error};
//!
//! let error = DepsError::BucketAsDependency {
//!     bucket: "testRuntimeOnly".to_string(),
//!     target: "implementation".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for dependency declaration.
///
/// All variants carry owned strings so the enum stays `Clone`, which lets
/// [`user_friendly_error`] rebuild a context from a borrowed error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DepsError {
    /// A whole bucket was declared where a single dependency was expected.
    ///
    /// Raised eagerly for direct references and at deferred-resolution time
    /// when a provider turns out to yield a bucket.
    #[error(
        "Adding bucket '{bucket}' as a dependency of '{target}' is not supported, use {target}.extend_from({bucket}) instead"
    )]
    BucketAsDependency {
        /// Name of the bucket that was passed as a notation
        bucket: String,
        /// Name of the bucket receiving the declaration
        target: String,
    },

    /// Module coordinates could not be parsed or are incomplete
    #[error("Invalid module coordinates '{notation}': {reason}")]
    InvalidCoordinates {
        /// The offending notation as written
        notation: String,
        /// Why the coordinates were rejected
        reason: String,
    },

    /// An element of a bundle is missing required coordinates
    #[error("Invalid element #{position} in bundle '{bundle}': {reason}")]
    InvalidBundleElement {
        /// Alias of the bundle being expanded
        bundle: String,
        /// Zero-based position of the element inside the bundle
        position: usize,
        /// Why the element was rejected
        reason: String,
    },

    /// The notation cannot be turned into a dependency by this operation
    #[error("Unsupported dependency notation '{notation}': {reason}")]
    UnsupportedNotation {
        /// Description of the notation
        notation: String,
        /// Why it is unsupported
        reason: String,
    },

    /// A customizer swapped the dependency for one with a different target
    #[error("Customizer replaced dependency '{original}' with '{replacement}'")]
    CustomizerReplacedTarget {
        /// The dependency as created from the notation
        original: String,
        /// What the customizer turned it into
        replacement: String,
    },

    /// A bucket name did not match any known bucket role
    #[error("Unknown dependency bucket '{name}'")]
    UnknownBucket {
        /// The name that was looked up
        name: String,
    },

    /// A catalog accessor referenced an alias that is not defined
    #[error("No {kind} with alias '{alias}' in the version catalog")]
    CatalogEntryNotFound {
        /// "library" or "bundle"
        kind: String,
        /// Alias that was requested
        alias: String,
    },

    /// The declarations file does not exist
    #[error("Declarations file not found: {path}")]
    DeclarationsNotFound {
        /// Path that was searched
        path: String,
    },

    /// The declarations file is not valid TOML or has the wrong shape
    #[error("Invalid declarations file syntax in {file}")]
    DeclarationsParseError {
        /// File being parsed
        file: String,
        /// Parser message
        reason: String,
    },

    /// A single `[[declare]]` entry is inconsistent
    #[error("Invalid declaration #{index}: {reason}")]
    InvalidDeclaration {
        /// Zero-based index of the entry
        index: usize,
        /// What is wrong with it
        reason: String,
    },

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

/// Error wrapper carrying user-facing guidance.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: DepsError,
    /// Optional suggestion on how to fix it
    pub suggestion: Option<String>,
    /// Optional extra explanation
    pub details: Option<String>,
}

impl ErrorContext {
    /// Wrap an error with no suggestion or details.
    #[must_use]
    pub const fn new(error: DepsError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Attach a suggestion.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach details.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with a suggestion where one is known.
///
/// A [`DepsError`] anywhere in the chain is recognised; context layers added
/// above it are kept as details. Anything else becomes [`DepsError::Other`]
/// keeping the full context chain in the message.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let Some(deps_error) = error.downcast_ref::<DepsError>() else {
        return ErrorContext::new(DepsError::Other {
            message: format!("{error:#}"),
        });
    };

    let mut ctx = create_error_context(deps_error.clone());
    let context: Vec<String> = error
        .chain()
        .take_while(|cause| cause.downcast_ref::<DepsError>().is_none())
        .map(ToString::to_string)
        .collect();

    if !context.is_empty() {
        let context = context.join(": ");
        ctx.details = Some(match ctx.details.take() {
            Some(details) => format!("{context}\n{details}"),
            None => context,
        });
    }
    ctx
}

fn create_error_context(error: DepsError) -> ErrorContext {
    match &error {
        DepsError::BucketAsDependency { bucket, target } => {
            let suggestion = format!(
                "Make '{target}' inherit from '{bucket}' instead of declaring it as a dependency"
            );
            ErrorContext::new(error).with_suggestion(suggestion).with_details(
                "Buckets compose through inheritance; a dependency declaration must name a single module, project or file set",
            )
        }
        DepsError::InvalidCoordinates { .. } => ErrorContext::new(error)
            .with_suggestion("Use the 'group:name[:version]' form, e.g. 'org.junit:junit:4.13.2'"),
        DepsError::InvalidBundleElement { bundle, .. } => {
            let suggestion = format!(
                "Check that every library referenced by bundle '{bundle}' has a group and a name"
            );
            ErrorContext::new(error).with_suggestion(suggestion).with_details(
                "Bundles are expanded all-or-nothing; no element of this bundle was added",
            )
        }
        DepsError::UnsupportedNotation { .. } => ErrorContext::new(error).with_suggestion(
            "Declare a module coordinate, a project reference, a catalog accessor or a deferred value",
        ),
        DepsError::CustomizerReplacedTarget { .. } => ErrorContext::new(error).with_suggestion(
            "Customizers may change the reason, transitivity, excludes and capabilities, not the target",
        ),
        DepsError::UnknownBucket { .. } => ErrorContext::new(error).with_suggestion(
            "Valid buckets are: implementation, compileOnly, runtimeOnly, annotationProcessor",
        ),
        DepsError::CatalogEntryNotFound { kind, .. } => {
            let suggestion =
                format!("Define the {kind} under the [catalog] table of the declarations file");
            ErrorContext::new(error).with_suggestion(suggestion)
        }
        DepsError::DeclarationsNotFound { .. } => ErrorContext::new(error)
            .with_suggestion("Create a deps.toml file or pass its location with --file"),
        DepsError::DeclarationsParseError { reason, .. } => {
            let reason = reason.clone();
            ErrorContext::new(error)
                .with_suggestion("Check the TOML syntax of the declarations file")
                .with_details(reason)
        }
        DepsError::InvalidDeclaration { .. } => ErrorContext::new(error).with_suggestion(
            "Each [[declare]] entry needs a bucket and exactly one of: notation, project, library, bundle, lazy, builtin",
        ),
        DepsError::Other { .. } => ErrorContext::new(error),
    }
}
