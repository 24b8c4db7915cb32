//! Indented tree rendering of result values for diagnostic logs

use crate::value::ResultValue;
use std::fmt::{self, Display, Formatter};

/// Default indentation width per nesting level
pub const DEFAULT_INDENT: usize = 2;

/// Renders a value as an indented tree under a label
///
/// ```text
/// direct is a record of type Partition
///   direct.values is a sequence
///     direct.values[0]: [2024]
///   direct.parameters is a map
///     direct.parameters{owner}: [etl]
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Dump<'a> {
    label: &'a str,
    value: &'a ResultValue,
    indent: usize,
}

impl<'a> Dump<'a> {
    /// Create a dump with the default indentation
    #[inline]
    #[must_use]
    pub fn new(label: &'a str, value: &'a ResultValue) -> Self {
        Self {
            label,
            value,
            indent: DEFAULT_INDENT,
        }
    }

    /// Override indentation width
    #[inline]
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    fn write_node(
        &self,
        f: &mut Formatter<'_>,
        name: &str,
        value: &ResultValue,
        level: usize,
    ) -> fmt::Result {
        let pad = " ".repeat(self.indent * level);
        match value {
            ResultValue::Scalar(s) => writeln!(f, "{pad}{name}: [{s}]"),
            ResultValue::Sequence(items) => {
                writeln!(f, "{pad}{name} is a sequence")?;
                for (i, item) in items.iter().enumerate() {
                    self.write_node(f, &format!("{name}[{i}]"), item, level + 1)?;
                }
                Ok(())
            }
            ResultValue::Mapping(entries) => {
                writeln!(f, "{pad}{name} is a map")?;
                for (key, item) in entries {
                    self.write_node(f, &format!("{name}{{{key}}}"), item, level + 1)?;
                }
                Ok(())
            }
            ResultValue::Record(record) => {
                writeln!(f, "{pad}{name} is a record of type {}", record.type_name())?;
                for (attr, item) in record.attributes() {
                    self.write_node(f, &format!("{name}.{attr}"), item, level + 1)?;
                }
                Ok(())
            }
        }
    }
}

impl Display for Dump<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.write_node(f, self.label, self.value, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Record;
    use pretty_assertions::assert_eq;

    #[test]
    fn scalar_renders_in_brackets() {
        let value = ResultValue::text("hello");
        assert_eq!(Dump::new("direct", &value).to_string(), "direct: [hello]\n");
    }

    #[test]
    fn nested_values_render_as_tree() {
        let value: ResultValue = Record::new("Partition")
            .with("values", vec!["2024"])
            .with(
                "parameters",
                ResultValue::mapping([("owner", "etl")]),
            )
            .into();

        let expected = "\
direct is a record of type Partition
  direct.values is a sequence
    direct.values[0]: [2024]
  direct.parameters is a map
    direct.parameters{owner}: [etl]
";
        assert_eq!(Dump::new("direct", &value).to_string(), expected);
    }

    #[test]
    fn indent_is_configurable() {
        let value = ResultValue::sequence([ResultValue::null()]);
        assert_eq!(
            Dump::new("v", &value).with_indent(4).to_string(),
            "v is a sequence\n    v[0]: [null]\n"
        );
    }
}
