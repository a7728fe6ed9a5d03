use std::fmt;

use crate::path::{self, PathElem};

/// Error kind for conversion failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No descriptor in a lookup order has a usable handler chain.
    LookupFailure,
    /// The value's shape is not what the handler expects.
    ShapeMismatch,
    /// A required record field is absent. A special case of `ShapeMismatch`.
    MissingField,
    /// Several independent failures merged under one node.
    Aggregate,
}

/// Conversion error: a path-addressed tree of failures.
///
/// Built bottom-up. Each enclosing conversion collects the failures of its
/// nested calls, tags every one with a [`PathElem`] and wraps them into a new
/// parent node. Nodes are never modified after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionError {
    kind: ErrorKind,
    message: String,
    children: Vec<(PathElem, ConversionError)>,
}

impl ConversionError {
    pub fn lookup_failure(msg: impl Into<String>) -> Self {
        Self::leaf(ErrorKind::LookupFailure, msg)
    }

    pub fn shape_mismatch(msg: impl Into<String>) -> Self {
        Self::leaf(ErrorKind::ShapeMismatch, msg)
    }

    pub fn missing_field(msg: impl Into<String>) -> Self {
        Self::leaf(ErrorKind::MissingField, msg)
    }

    /// Parent node aggregating independent failures at one level.
    ///
    /// Children keep the given order, so rendering is deterministic.
    pub fn merge(
        msg: impl Into<String>,
        children: impl IntoIterator<Item = (PathElem, ConversionError)>,
    ) -> Self {
        Self {
            kind: ErrorKind::Aggregate,
            message: msg.into(),
            children: children.into_iter().collect(),
        }
    }

    /// Parent node with this error as its only child.
    pub fn wrap(self, segment: PathElem) -> Self {
        let msg = format!("Invalid value at `{segment}`");
        Self::merge(msg, [(segment, self)])
    }

    fn leaf(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            message: msg.into(),
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn children(&self) -> &[(PathElem, ConversionError)] {
        &self.children
    }

    /// Direct child recorded under `segment`.
    pub fn child(&self, segment: &PathElem) -> Option<&ConversionError> {
        self.children
            .iter()
            .find(|(elem, _)| elem == segment)
            .map(|(_, err)| err)
    }

    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self.kind, ErrorKind::ShapeMismatch | ErrorKind::MissingField)
    }

    fn collect_lines<'a>(
        &'a self,
        path: &mut Vec<&'a PathElem>,
        out: &mut Vec<(usize, String, &'a str)>,
    ) {
        for (elem, child) in &self.children {
            path.push(elem);
            out.push((path.len(), path::join(path.as_slice()), child.message.as_str()));
            child.collect_lines(path, out);
            path.pop();
        }
    }
}

/// Renders the whole tree, depth-first:
///
/// ```text
/// Failed to structure a mapping into Outer
///   x: The value must be an integer
///   y: Failed to structure a mapping into Inner
///     y.l: Cannot structure into list[int]
///       y.l[1]: The value must be an integer
/// ```
impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        let mut lines = Vec::new();
        self.collect_lines(&mut Vec::new(), &mut lines);
        for (depth, path, msg) in lines {
            write!(f, "\n{}{path}: {msg}", "  ".repeat(depth))?;
        }
        Ok(())
    }
}

impl std::error::Error for ConversionError {}

/// Gathers per-segment failures of nested conversions at one level.
#[derive(Debug, Default)]
pub struct ErrorCollector {
    children: Vec<(PathElem, ConversionError)>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the failure of `result` under `segment`, or pass its value through.
    pub fn collect<T>(
        &mut self,
        segment: PathElem,
        result: Result<T, ConversionError>,
    ) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.children.push((segment, err));
                None
            }
        }
    }

    pub fn push(&mut self, segment: PathElem, err: ConversionError) {
        self.children.push((segment, err));
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// `Ok(())` if nothing was collected, otherwise one aggregate error.
    pub fn finish(self, msg: impl FnOnce() -> String) -> Result<(), ConversionError> {
        if self.children.is_empty() {
            Ok(())
        } else {
            Err(ConversionError::merge(msg(), self.children))
        }
    }

    /// Aggregate error of everything collected so far, even if empty.
    pub fn into_error(self, msg: impl Into<String>) -> ConversionError {
        ConversionError::merge(msg, self.children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn render_nested_tree() {
        let inner = ConversionError::merge(
            "Cannot structure into list[int]",
            [(
                PathElem::Index(1),
                ConversionError::shape_mismatch("The value must be an integer"),
            )],
        );
        let err = ConversionError::merge(
            "Failed to structure a mapping into Outer",
            [
                (
                    PathElem::Field("x".into()),
                    ConversionError::shape_mismatch("The value must be an integer"),
                ),
                (
                    PathElem::Field("y".into()),
                    ConversionError::merge(
                        "Failed to structure a mapping into Inner",
                        [(PathElem::Field("l".into()), inner)],
                    ),
                ),
            ],
        );
        let expected = "Failed to structure a mapping into Outer
  x: The value must be an integer
  y: Failed to structure a mapping into Inner
    y.l: Cannot structure into list[int]
      y.l[1]: The value must be an integer";
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn wrap_adds_one_level() {
        let err = ConversionError::missing_field("Missing field").wrap(PathElem::Field("y".into()));
        assert_eq!(err.kind(), ErrorKind::Aggregate);
        assert_eq!(err.children().len(), 1);
        let child = err.child(&PathElem::Field("y".into())).unwrap();
        assert!(child.is_shape_mismatch());
        assert_eq!(child.kind(), ErrorKind::MissingField);
    }

    #[test]
    fn collector_keeps_insertion_order() {
        let mut errors = ErrorCollector::new();
        let ok: Option<i64> = errors.collect(PathElem::Index(0), Ok(1));
        assert_eq!(ok, Some(1));
        errors.push(
            PathElem::Entry(Value::from("b")),
            ConversionError::shape_mismatch("second"),
        );
        errors.push(
            PathElem::Entry(Value::from("a")),
            ConversionError::shape_mismatch("third"),
        );
        let err = errors.finish(|| "top".to_string()).unwrap_err();
        let order: Vec<String> = err.children().iter().map(|(p, _)| p.to_string()).collect();
        assert_eq!(order, ["b", "a"]);
    }

    #[test]
    fn empty_collector_finishes_ok() {
        assert!(ErrorCollector::new().finish(|| String::from("unused")).is_ok());
    }
}
