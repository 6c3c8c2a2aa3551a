//! Field resolution and validation against a project schema.
//!
//! Both entry points run the same matching step per requested field, in request
//! order, and stop at the first field that does not match:
//!
//! 1. the field name must exist in the [`SchemaIndex`];
//! 2. single-select values must equal one option name exactly.
//!
//! [`validate_fields`] stops there. [`resolve_fields`] additionally maps the
//! match to a [`ResolvedFieldUpdate`] and rejects data types it cannot express.

use crate::config::Issue;
use crate::errors::ResolutionError;
use crate::schema::SchemaIndex;
use crate::types::{FieldDataType, FieldDefinition, FieldOption, FieldValueRequest, ResolvedFieldUpdate, ResolvedValue};

/// Structured diagnostics emitted while matching fields.
#[derive(Debug, Clone, Copy)]
pub enum ResolutionEvent<'a> {
    FieldMatched {
        field: &'a str,
        field_id: &'a str,
        data_type: &'a FieldDataType,
    },
    FieldRejected {
        field: &'a str,
        error: &'a ResolutionError,
    },
    /// Accepted by validation, but resolution will reject it.
    FieldUnsupported {
        field: &'a str,
        data_type: &'a FieldDataType,
    },
}

/// Receiver for [`ResolutionEvent`]s.
pub trait DiagnosticSink {
    fn record(&self, event: ResolutionEvent<'_>);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn record(&self, _event: ResolutionEvent<'_>) {}
}

/// Forwards events to the `log` facade: unsupported fields at warn level, the rest at debug.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn record(&self, event: ResolutionEvent<'_>) {
        match event {
            ResolutionEvent::FieldMatched {
                field,
                field_id,
                data_type,
            } => log::debug!("field '{field}' matched {field_id} ({data_type})"),
            ResolutionEvent::FieldRejected { field, error } => {
                log::debug!("field '{field}' rejected: {error}")
            }
            ResolutionEvent::FieldUnsupported { field, data_type } => {
                log::warn!("field '{field}' has unsupported type {data_type} and cannot be set when planning")
            }
        }
    }
}

impl<F> DiagnosticSink for F
where
    F: Fn(ResolutionEvent<'_>),
{
    fn record(&self, event: ResolutionEvent<'_>) {
        self(event)
    }
}

/// Outcome of matching one requested field, dispatched on the field's type.
enum FieldMatch<'s> {
    Text(&'s FieldDefinition),
    Number(&'s FieldDefinition),
    SingleSelect(&'s FieldDefinition, &'s FieldOption),
    Unsupported(&'s FieldDefinition),
}

impl<'s> FieldMatch<'s> {
    fn definition(&self) -> &'s FieldDefinition {
        match *self {
            Self::Text(definition)
            | Self::Number(definition)
            | Self::SingleSelect(definition, _)
            | Self::Unsupported(definition) => definition,
        }
    }
}

fn match_field<'s>(
    index: &'s SchemaIndex,
    name: &str,
    value: &str,
    project: Option<&str>,
) -> Result<FieldMatch<'s>, ResolutionError> {
    let definition = index.lookup(name).ok_or_else(|| ResolutionError::FieldNotFound {
        field: name.to_string(),
        project: project.map(str::to_string),
        available: index.field_names(),
    })?;

    let matched = match &definition.data_type {
        FieldDataType::Text => FieldMatch::Text(definition),
        FieldDataType::Number => FieldMatch::Number(definition),
        FieldDataType::SingleSelect => {
            let option = definition
                .option_named(value)
                .ok_or_else(|| ResolutionError::OptionNotFound {
                    field: name.to_string(),
                    value: value.to_string(),
                    valid_options: definition.option_names(),
                })?;
            FieldMatch::SingleSelect(definition, option)
        }
        FieldDataType::Unsupported(_) => FieldMatch::Unsupported(definition),
    };
    Ok(matched)
}

fn match_and_record<'s>(
    index: &'s SchemaIndex,
    name: &str,
    value: &str,
    project: Option<&str>,
    sink: &dyn DiagnosticSink,
) -> Result<FieldMatch<'s>, ResolutionError> {
    match match_field(index, name, value, project) {
        Ok(matched) => {
            let definition = matched.definition();
            sink.record(ResolutionEvent::FieldMatched {
                field: name,
                field_id: &definition.id,
                data_type: &definition.data_type,
            });
            Ok(matched)
        }
        Err(error) => {
            sink.record(ResolutionEvent::FieldRejected { field: name, error: &error });
            Err(error)
        }
    }
}

/// Checks that every requested field can be resolved, without building updates.
///
/// `project_display_name` only decorates [`ResolutionError::FieldNotFound`].
/// Fields of unsupported types pass here with a [`ResolutionEvent::FieldUnsupported`]
/// event; they are rejected by [`resolve_fields`].
pub fn validate_fields(
    request: &FieldValueRequest,
    index: &SchemaIndex,
    project_display_name: Option<&str>,
    sink: &dyn DiagnosticSink,
) -> Result<(), ResolutionError> {
    for (name, value) in request.iter() {
        if let FieldMatch::Unsupported(definition) = match_and_record(index, name, value, project_display_name, sink)? {
            sink.record(ResolutionEvent::FieldUnsupported {
                field: name,
                data_type: &definition.data_type,
            });
        }
    }
    Ok(())
}

/// Resolves every requested field to an update, in request order.
///
/// Returns one update per requested field or the first failure; never a partial list.
pub fn resolve_fields(
    request: &FieldValueRequest,
    index: &SchemaIndex,
    sink: &dyn DiagnosticSink,
) -> Result<Vec<ResolvedFieldUpdate>, ResolutionError> {
    request
        .iter()
        .map(|(name, value)| {
            let matched = match_and_record(index, name, value, None, sink)?;
            to_update(name, value, matched).inspect_err(|error| {
                sink.record(ResolutionEvent::FieldRejected { field: name, error });
            })
        })
        .collect()
}

fn to_update(name: &str, value: &str, matched: FieldMatch<'_>) -> Result<ResolvedFieldUpdate, ResolutionError> {
    let (definition, resolved) = match matched {
        FieldMatch::Text(definition) => (definition, ResolvedValue::Text(value.to_string())),
        FieldMatch::Number(definition) => (definition, ResolvedValue::Number(value.to_string())),
        FieldMatch::SingleSelect(definition, option) => (
            definition,
            ResolvedValue::SingleSelect {
                option_id: option.id.clone(),
            },
        ),
        FieldMatch::Unsupported(definition) => {
            return Err(ResolutionError::UnsupportedFieldType {
                field: name.to_string(),
                data_type: definition.data_type.to_string(),
            });
        }
    };
    Ok(ResolvedFieldUpdate {
        field_id: definition.id.clone(),
        value: resolved,
    })
}

/// Resolves an issue's declared fields. Pure; no diagnostics are emitted.
pub fn resolve_issue_fields(issue: &Issue, index: &SchemaIndex) -> Result<Vec<ResolvedFieldUpdate>, ResolutionError> {
    resolve_fields(&issue.fields, index, &NoopSink)
}

/// Validates an issue's declared fields. Pure; no diagnostics are emitted.
pub fn validate_issue_fields(
    issue: &Issue,
    index: &SchemaIndex,
    project_display_name: Option<&str>,
) -> Result<(), ResolutionError> {
    validate_fields(&issue.fields, index, project_display_name, &NoopSink)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    fn board() -> SchemaIndex {
        SchemaIndex::build([
            FieldDefinition::single_select("PVTSSF_status", "Status", [("OPT_1", "Ready"), ("OPT_2", "In Progress")]),
            FieldDefinition::new("PVTF_points", "Points", FieldDataType::Number),
            FieldDefinition::new("PVTF_notes", "Notes", FieldDataType::Text),
            FieldDefinition::new("PVTIF_sprint", "Sprint", FieldDataType::Unsupported("ITERATION".to_string())),
        ])
    }

    #[test]
    fn resolves_select_and_number_in_request_order() {
        let request = FieldValueRequest::new().with("Status", "Ready").with("Points", "5");
        let updates = resolve_fields(&request, &board(), &NoopSink).unwrap();
        assert_eq!(
            updates,
            vec![
                ResolvedFieldUpdate {
                    field_id: "PVTSSF_status".to_string(),
                    value: ResolvedValue::SingleSelect {
                        option_id: "OPT_1".to_string()
                    },
                },
                ResolvedFieldUpdate {
                    field_id: "PVTF_points".to_string(),
                    value: ResolvedValue::Number("5".to_string()),
                },
            ]
        );
    }

    #[test]
    fn unknown_option_lists_valid_options() {
        let request = FieldValueRequest::new().with("Status", "Blocked");
        let err = resolve_fields(&request, &board(), &NoopSink).unwrap_err();
        assert_eq!(
            err,
            ResolutionError::OptionNotFound {
                field: "Status".to_string(),
                value: "Blocked".to_string(),
                valid_options: vec!["Ready".to_string(), "In Progress".to_string()],
            }
        );
    }

    #[test]
    fn unknown_field_lists_available_names() {
        let index = SchemaIndex::build([FieldDefinition::single_select("S", "Status", [("O", "Ready")])]);
        let request = FieldValueRequest::new().with("Owner", "alice");
        let err = resolve_fields(&request, &index, &NoopSink).unwrap_err();
        assert_eq!(
            err,
            ResolutionError::FieldNotFound {
                field: "Owner".to_string(),
                project: None,
                available: vec!["Status".to_string()],
            }
        );
    }

    #[test]
    fn empty_request_resolves_to_nothing() {
        assert!(resolve_fields(&FieldValueRequest::new(), &board(), &NoopSink).unwrap().is_empty());
        assert!(resolve_fields(&FieldValueRequest::new(), &SchemaIndex::default(), &NoopSink).unwrap().is_empty());
        assert!(validate_fields(&FieldValueRequest::new(), &SchemaIndex::default(), None, &NoopSink).is_ok());
    }

    #[test]
    fn unsupported_type_fails_resolution_but_not_validation() {
        let request = FieldValueRequest::new().with("Sprint", "Sprint 4");
        let err = resolve_fields(&request, &board(), &NoopSink).unwrap_err();
        assert_eq!(
            err,
            ResolutionError::UnsupportedFieldType {
                field: "Sprint".to_string(),
                data_type: "ITERATION".to_string(),
            }
        );
        assert!(validate_fields(&request, &board(), None, &NoopSink).is_ok());
    }

    #[test]
    fn text_and_number_values_pass_through_unchanged() {
        let request = FieldValueRequest::new().with("Notes", "  spaced  ").with("Points", "not-a-number");
        let updates = resolve_fields(&request, &board(), &NoopSink).unwrap();
        assert_eq!(updates[0].value.value(), Some("  spaced  "));
        assert_eq!(updates[0].value.type_name(), "TEXT");
        assert_eq!(updates[1].value.value(), Some("not-a-number"));
        assert_eq!(updates[1].value.option_id(), None);
    }

    #[test]
    fn select_match_is_exact_and_case_sensitive() {
        for value in ["ready", "Ready ", "Read", "In"] {
            let request = FieldValueRequest::new().with("Status", value);
            assert!(matches!(
                resolve_fields(&request, &board(), &NoopSink),
                Err(ResolutionError::OptionNotFound { .. })
            ));
        }
    }

    #[test]
    fn first_failing_field_is_reported() {
        let request = FieldValueRequest::new()
            .with("Points", "3")
            .with("Missing", "x")
            .with("Status", "Nope");
        let err = resolve_fields(&request, &board(), &NoopSink).unwrap_err();
        assert_eq!(err.field(), "Missing");

        let request = FieldValueRequest::new().with("Status", "Nope").with("Missing", "x");
        let err = validate_fields(&request, &board(), None, &NoopSink).unwrap_err();
        assert_eq!(err.field(), "Status");
    }

    #[test]
    fn cardinality_matches_request() {
        let request = FieldValueRequest::new()
            .with("Notes", "a")
            .with("Points", "1")
            .with("Status", "In Progress");
        let updates = resolve_fields(&request, &board(), &NoopSink).unwrap();
        assert_eq!(updates.len(), request.len());
    }

    #[test]
    fn resolution_is_deterministic() {
        let request = FieldValueRequest::new().with("Status", "Ready").with("Notes", "n");
        let index = board();
        assert_eq!(
            resolve_fields(&request, &index, &NoopSink),
            resolve_fields(&request, &index, &NoopSink)
        );
        let missing = FieldValueRequest::new().with("Nope", "x");
        assert_eq!(
            resolve_fields(&missing, &index, &NoopSink),
            resolve_fields(&missing, &index, &NoopSink)
        );
    }

    #[test]
    fn unknown_field_fails_whatever_the_value() {
        for value in ["", "Ready", "5"] {
            let request = FieldValueRequest::new().with("Owner", value);
            assert!(matches!(
                validate_fields(&request, &board(), Some("Roadmap"), &NoopSink),
                Err(ResolutionError::FieldNotFound { ref project, .. }) if project.as_deref() == Some("Roadmap")
            ));
        }
    }

    #[test]
    fn validation_and_resolution_agree_on_supported_types() {
        let requests = [
            FieldValueRequest::new().with("Status", "Ready"),
            FieldValueRequest::new().with("Status", "Done"),
            FieldValueRequest::new().with("Points", "8").with("Owner", "x"),
            FieldValueRequest::new().with("Notes", ""),
        ];
        let index = board();
        for request in &requests {
            assert_eq!(
                validate_fields(request, &index, None, &NoopSink).is_ok(),
                resolve_fields(request, &index, &NoopSink).is_ok()
            );
        }
    }

    #[test]
    fn sink_receives_events_until_first_failure() {
        let events = RefCell::new(Vec::new());
        let sink = |event: ResolutionEvent<'_>| {
            let entry = match event {
                ResolutionEvent::FieldMatched { field, .. } => format!("matched {field}"),
                ResolutionEvent::FieldRejected { field, .. } => format!("rejected {field}"),
                ResolutionEvent::FieldUnsupported { field, .. } => format!("unsupported {field}"),
            };
            events.borrow_mut().push(entry);
        };
        let request = FieldValueRequest::new()
            .with("Points", "1")
            .with("Status", "Nope")
            .with("Notes", "never reached");
        assert!(resolve_fields(&request, &board(), &sink).is_err());
        assert_eq!(events.into_inner(), ["matched Points", "rejected Status"]);
    }

    #[test]
    fn validation_flags_unsupported_types() {
        let events = RefCell::new(Vec::new());
        let sink = |event: ResolutionEvent<'_>| {
            if let ResolutionEvent::FieldUnsupported { field, data_type } = event {
                events.borrow_mut().push(format!("{field}: {data_type}"));
            }
        };
        let request = FieldValueRequest::new().with("Sprint", "Sprint 4").with("Points", "3");

        assert!(validate_fields(&request, &board(), None, &sink).is_ok());
        assert_eq!(*events.borrow(), ["Sprint: ITERATION"]);

        events.borrow_mut().clear();
        assert!(resolve_fields(&request, &board(), &sink).is_err());
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn issue_wrappers_use_declared_fields() {
        let issue = Issue {
            name: "Planning".to_string(),
            fields: FieldValueRequest::new().with("Status", "In Progress"),
            ..Issue::default()
        };
        let updates = resolve_issue_fields(&issue, &board()).unwrap();
        assert_eq!(updates[0].value.option_id(), Some("OPT_2"));
        assert!(validate_issue_fields(&issue, &board(), Some("Roadmap")).is_ok());
    }
}
