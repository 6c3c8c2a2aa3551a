//! issueplan core library.
//!
//! Selects the issue definitions scheduled for a month, resolves their project
//! field values against live GitHub project schemas, and builds creation payloads.
//!
//! The field engine ([`schema`] and [`resolver`]) is pure and works on any
//! [`SchemaIndex`]; network access lives behind [`ProjectSchemaProvider`].

pub mod cache;
pub mod config;
pub mod errors;
pub mod filter;
pub mod github;
pub mod payload;
pub mod resolver;
pub mod schema;
pub mod title;
pub mod types;
pub mod validator;

pub use cache::SchemaCache;
pub use config::{Config, Defaults, Issue, Repo};
pub use errors::*;
pub use filter::{current_month, issues_for_month, parse_month};
pub use github::{GitHubClient, ProjectSchemaProvider};
pub use payload::{IssuePayload, build_payload, build_payloads};
pub use resolver::{
    DiagnosticSink, LogSink, NoopSink, ResolutionEvent, resolve_fields, resolve_issue_fields, validate_fields,
    validate_issue_fields,
};
pub use schema::SchemaIndex;
pub use title::{Clock, FixedClock, SystemClock};
pub use types::{FieldDataType, FieldDefinition, FieldOption, FieldValueRequest, ResolvedFieldUpdate, ResolvedValue};
pub use validator::{validate_config, validate_issue, validate_issue_with_project};
