//! Props to HTML attributes.

use regex::Regex;
use std::sync::LazyLock;

use super::escape::push_escaped;
use crate::tree::Props;

static ATTRIBUTE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_:][A-Za-z0-9_.:\-]*$").expect("valid regex"));

/// Props that never reach the markup.
const RESERVED_PROPS: [&str; 4] = ["key", "ref", "children", "dangerouslySetInnerHTML"];

/// Maps a prop name to its attribute name.
fn attribute_name(prop: &str) -> &str {
    match prop {
        "className" => "class",
        "htmlFor" => "for",
        other => other,
    }
}

/// Converts a camelCase style property to its CSS name.
fn css_property(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn style_declarations(style: &serde_json::Map<String, serde_json::Value>) -> String {
    style
        .iter()
        .filter_map(|(name, value)| {
            let value = match value {
                serde_json::Value::String(s) if !s.is_empty() => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                _ => return None,
            };
            Some(format!("{}:{}", css_property(name), value))
        })
        .collect::<Vec<_>>()
        .join(";")
}

/// Appends ` name="value"` pairs for `props` to `out`.
///
/// `false` and `null` props are omitted, `true` renders an empty value,
/// `style` objects render as declarations, other objects and arrays are
/// omitted. Props with names that are not valid attribute names are skipped.
pub fn write_attributes(out: &mut String, props: &Props) {
    for (prop, value) in props {
        if RESERVED_PROPS.contains(&prop.as_str()) {
            continue;
        }
        if !ATTRIBUTE_NAME.is_match(prop) {
            tracing::warn!(prop = %prop, "Skipping prop with invalid attribute name");
            continue;
        }

        let rendered = match value {
            serde_json::Value::Null | serde_json::Value::Bool(false) => continue,
            serde_json::Value::Bool(true) => String::new(),
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Object(style) if prop == "style" => {
                let declarations = style_declarations(style);
                if declarations.is_empty() {
                    continue;
                }
                declarations
            }
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => continue,
        };

        out.push(' ');
        out.push_str(attribute_name(prop));
        out.push_str("=\"");
        push_escaped(out, &rendered);
        out.push('"');
    }
}
