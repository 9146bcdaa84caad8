//! Value formatting for diagnostic output
//!
//! [`format`] renders any [`Value`] as a readable string. The non-detailed
//! form is a compact one-liner (`array[3]`, `Point`); the detailed form is used
//! for failed assertions and spells out contents, one entry per line, with two
//! spaces of indentation per nesting level.
//!
//! Formatting only reads; objects reachable from themselves are rendered as
//! `{TypeName}` where they recur.

use crate::fault::Fault;
use crate::value::Value;

/// Format a value for display
pub fn format(value: &Value, detailed: bool) -> String {
    ValueFormatter::default().value(value, "", detailed)
}

/// Format a fault, with its stack trace when `detailed`
pub fn format_fault(fault: &Fault, detailed: bool) -> String {
    ValueFormatter::default().fault(fault, "", detailed)
}

/// Indent every line of `text` by two spaces
pub fn indent(text: &str) -> String {
    text.trim_matches(|c| c == '\r' || c == '\n')
        .split('\n')
        .map(|line| format!("  {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// True if the rendering spans more than one line
pub fn is_multiline(text: &str) -> bool {
    text.contains('\n')
}

#[derive(Default)]
struct ValueFormatter {
    /// Objects currently being formatted (by address)
    stack: Vec<usize>,
}

impl ValueFormatter {
    fn value(&mut self, value: &Value, indent: &str, detailed: bool) -> String {
        match value {
            Value::Null => "null".to_string(),
            Value::Bool(true) => "TRUE".to_string(),
            Value::Bool(false) => "FALSE".to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(n) => format_float(*n),
            Value::String(s) => quote(s),
            Value::Array(items) => {
                if detailed {
                    let entries = items
                        .iter()
                        .enumerate()
                        .map(|(index, item)| (index.to_string(), item));
                    self.entries(entries, indent, " => ", ('[', ']'))
                } else {
                    format!("array[{}]", items.len())
                }
            }
            Value::Map(entries) => {
                if detailed {
                    let entries = entries.iter().map(|(key, item)| (quote(key), item));
                    self.entries(entries, indent, " => ", ('[', ']'))
                } else {
                    format!("array[{}]", entries.len())
                }
            }
            Value::Object(object) => {
                let type_name = object.type_name();

                if !detailed {
                    return type_name;
                }

                if self.stack.contains(&object.addr()) {
                    return format!("{{{}}}", type_name);
                }

                self.stack.push(object.addr());
                let fields = object.fields();
                let body = self.entries(
                    fields.iter().map(|(name, item)| (name.clone(), item)),
                    indent,
                    " = ",
                    ('{', '}'),
                );
                self.stack.pop();

                // "{" + type name + fields + "}"
                format!("{{{}{}", type_name, &body[1..])
            }
            Value::Error(fault) => self.fault(fault, indent, detailed),
            Value::Opaque(name) => format!("{{{}}}", name),
        }
    }

    fn entries<'v>(
        &mut self,
        entries: impl Iterator<Item = (String, &'v Value)>,
        indent: &str,
        separator: &str,
        (open, close): (char, char),
    ) -> String {
        let inner = format!("{}  ", indent);

        let lines: Vec<String> = entries
            .map(|(key, item)| {
                format!(
                    "\n{}{}{}{}",
                    inner,
                    key,
                    separator,
                    self.value(item, &inner, true)
                )
            })
            .collect();

        if lines.is_empty() {
            return format!("{}{}", open, close);
        }

        format!("{}{}\n{}{}", open, lines.join(","), indent, close)
    }

    fn fault(&mut self, fault: &Fault, indent: &str, detailed: bool) -> String {
        let mut out = format!("{}: {}", fault.kind(), fault.message());

        if !detailed {
            return out;
        }

        if !fault.trace().is_empty() {
            out.push_str("\n\nStacktrace:");
            for (index, frame) in fault.trace().iter().enumerate() {
                out.push_str(&format!("\n  {}. {}({})", index + 1, frame.file, frame.line));

                if let Some(call) = &frame.call {
                    let args: Vec<String> = frame
                        .args
                        .iter()
                        .map(|arg| self.value(arg, "", false))
                        .collect();
                    out.push_str(&format!(": {}({})", call, args.join(", ")));
                }
            }
        }

        if let Some(cause) = fault.cause() {
            out.push_str("\n\nCaused by: ");
            out.push_str(&self.fault(cause, "", detailed));
        }

        if indent.is_empty() {
            return out;
        }

        // continuation lines follow the enclosing entry
        out.split('\n')
            .enumerate()
            .map(|(index, line)| {
                if index == 0 || line.is_empty() {
                    line.to_string()
                } else {
                    format!("{}{}", indent, line)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Double-quote a string, escaping quotes, backslashes and control
/// characters other than newline
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');

    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push('\n'),
            c if c.is_control() => out.push_str(&format!("\\x{{{:02x}}}", c as u32)),
            c => out.push(c),
        }
    }

    out.push('"');
    out
}

/// Six significant digits, prefixed with `~` when that is not exact
fn format_float(n: f64) -> String {
    if n.is_nan() {
        return "NAN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "INF" } else { "-INF" }.to_string();
    }

    let short = significant(n, 6);
    let exact = short.parse::<f64>().map(|parsed| parsed == n).unwrap_or(false);

    if exact {
        short
    } else {
        format!("~{}", short)
    }
}

fn significant(n: f64, digits: usize) -> String {
    if n == 0.0 {
        return "0".to_string();
    }

    let scientific = format!("{:.*e}", digits - 1, n);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some(parts) => parts,
        None => return scientific,
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{}", trim_zeros(mantissa), sign, exponent.abs())
    } else {
        let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
        trim_zeros(&format!("{:.*}", decimals, n))
    }
}

fn trim_zeros(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s.to_string()
    }
}
