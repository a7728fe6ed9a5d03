use std::fmt;

use crate::descriptor::TypeDesc;
use crate::value::Value;

/// One step from a conversion root to a failure site.
#[derive(Debug, Clone, PartialEq)]
pub enum PathElem {
    /// Record field, by declared name.
    Field(String),
    /// Position in a sequence or tuple.
    Index(usize),
    /// The key of a mapping entry failed to convert.
    Key(Value),
    /// The value of a mapping entry failed to convert.
    Entry(Value),
    /// One attempted union variant.
    Variant(TypeDesc),
}

impl PathElem {
    /// Whether this segment attaches to its predecessor with a `.` separator.
    fn dotted(&self) -> bool {
        matches!(self, PathElem::Field(_) | PathElem::Key(_) | PathElem::Entry(_))
    }
}

impl fmt::Display for PathElem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathElem::Field(name) => write!(f, "{name}"),
            PathElem::Index(i) => write!(f, "[{i}]"),
            PathElem::Key(key) => write!(f, "key({key})"),
            PathElem::Entry(key) => write!(f, "{key}"),
            PathElem::Variant(desc) => write!(f, "<{desc}>"),
        }
    }
}

/// Render a sequence of segments as a single path, e.g. `y.d[1]` or `value<int>`.
pub fn join(path: &[&PathElem]) -> String {
    let mut out = String::new();
    for (i, elem) in path.iter().enumerate() {
        if i > 0 && elem.dotted() {
            out.push('.');
        }
        out.push_str(&elem.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_mixes_separators() {
        let y = PathElem::Field("y".into());
        let l = PathElem::Field("l".into());
        let one = PathElem::Index(1);
        let key = PathElem::Key(Value::from("a"));
        let variant = PathElem::Variant(TypeDesc::int());
        assert_eq!(join(&[&y, &l, &one]), "y.l[1]");
        assert_eq!(join(&[&y, &key]), "y.key(a)");
        assert_eq!(join(&[&one, &variant]), "[1]<int>");
        assert_eq!(join(&[&PathElem::Entry(Value::Int(3)), &y]), "3.y");
    }
}
