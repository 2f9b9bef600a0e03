use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Gauge,
    Counter,
}

impl MetricKind {
    fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Gauge => "gauge",
            MetricKind::Counter => "counter",
        }
    }
}

/// Builder for one exposition block (a sequence of metric families).
///
/// Guarantees consistent `# HELP`/`# TYPE` headers, label escaping, and
/// value sanitization regardless of which category is rendering.
#[derive(Debug, Default)]
pub struct Exposition {
    buf: String,
}

impl Exposition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a metric family; samples are added through the returned handle.
    pub fn family<'a>(&'a mut self, name: &str, help: &str, kind: MetricKind) -> Family<'a> {
        if !self.buf.is_empty() {
            self.buf.push('\n');
        }
        self.buf.push_str(&format!("# HELP {} {}\n", name, help));
        self.buf.push_str(&format!("# TYPE {} {}\n", name, kind.as_str()));
        Family {
            exposition: self,
            name: name.to_string(),
        }
    }

    pub fn finish(self) -> String {
        self.buf.trim_end().to_string()
    }
}

pub struct Family<'a> {
    exposition: &'a mut Exposition,
    name: String,
}

impl Family<'_> {
    /// Emit one sample line. Label values are escaped; the value is taken
    /// as-is and is expected to come from `sanitize_metric_value`.
    pub fn sample(&mut self, labels: &[(&str, &str)], value: &str) {
        let buf = &mut self.exposition.buf;
        buf.push_str(&self.name);
        if !labels.is_empty() {
            buf.push('{');
            for (i, (key, val)) in labels.iter().enumerate() {
                if i > 0 {
                    buf.push_str(", ");
                }
                buf.push_str(&format!("{}=\"{}\"", key, escape_label_value(val)));
            }
            buf.push('}');
        }
        buf.push(' ');
        buf.push_str(value);
        buf.push('\n');
    }
}

/// Escape a label value for embedding in exposition text.
///
/// Backslash, double-quote, and newline are the three characters the text
/// format reserves; upstream names are free text so all three can occur.
pub fn escape_label_value(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out
}

/// Normalize an upstream value to a valid decimal string.
///
/// Anything missing, null, or unparseable becomes the literal `0.0` rather
/// than propagating as NaN/empty into the exposition output.
pub fn sanitize_metric_value(raw: &Value) -> String {
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(v) if v.is_finite() => format!("{}", v),
        _ => "0.0".to_string(),
    }
}
