use crate::{Error, ErrorKind};
use std::collections::BTreeMap;
use std::fmt;

/// Validation messages grouped by the path of the offending value
///
/// Messages for a path are kept in the order they were recorded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// Number of paths with at least one message
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Messages recorded for a path
    pub fn get(&self, path: &str) -> Option<&[String]> {
        self.errors.get(path).map(|x| x.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.errors
    }

    fn push(&mut self, path: String, message: String) {
        self.errors.entry(path).or_default().push(message);
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (path, messages) in &self.errors {
            for message in messages {
                writeln!(f, "{}: {}", path, message)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug)]
struct Deferral {
    path: String,
    pending: Vec<String>,
}

/// State shared by all scopes of one archive
///
/// Collects validation messages. The collection is append only: a message
/// once recorded stays until the context is dropped.
#[derive(Debug, Default)]
pub struct SerializationContext {
    errors: ValidationErrors,
    deferred: Vec<Deferral>,
}

impl SerializationContext {
    pub fn new() -> Self {
        SerializationContext::default()
    }

    /// Whether no validation message has been recorded
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn validation_errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Record a validation message for a path
    pub fn add_error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(path.into(), message.into());
    }

    /// Fail with the recorded messages if there are any
    pub fn into_result(self) -> Result<(), Error> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(Error::new(ErrorKind::FailedValidation(self.errors)))
        }
    }

    /// Record a message from a skip policy
    ///
    /// While a validated field at the same path is being loaded the message
    /// is held back until the field's validators have run.
    pub(crate) fn report_skip(&mut self, path: String, message: String) {
        tracing::trace!(path = %path, reason = %message, "skipped value");
        match self.deferred.last_mut() {
            Some(deferral) if deferral.path == path => deferral.pending.push(message),
            _ => self.errors.push(path, message),
        }
    }

    pub(crate) fn defer(&mut self, path: String) {
        self.deferred.push(Deferral {
            path,
            pending: Vec::new(),
        });
    }

    /// Finish the innermost deferral, recording its held messages if `keep`
    pub(crate) fn resolve(&mut self, keep: bool) {
        if let Some(deferral) = self.deferred.pop() {
            if keep {
                for message in deferral.pending {
                    self.errors.push(deferral.path.clone(), message);
                }
            }
        }
    }
}
