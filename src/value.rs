/// A dynamically-typed parameter value bound into a SQL template.
///
/// Values arrive from the caller (or from JSON via the CLI) and flow through
/// the template engine untouched until a `value` or `literal` directive
/// resolves them. Lists are ordered and may nest.
///
/// # Examples
///
/// ```
/// use sqlweave::Value;
///
/// let null = Value::Null;
/// let flag = Value::Boolean(true);
/// let id = Value::Integer(42);
/// let rate = Value::Float(0.25);
/// let name = Value::String("ACME".to_string());
/// let tags = Value::List(vec![Value::Integer(1), Value::Integer(2)]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent or explicitly-null parameter
    Null,

    /// Canonical engine boolean (produced by condition functions)
    Boolean(bool),

    /// Integer number
    Integer(i64),

    /// Floating-point number
    Float(f64),

    /// UTF-8 string
    String(String),

    /// Ordered list of values (homogeneous or heterogeneous)
    List(Vec<Value>),
}

impl Value {
    /// Truth test used when a function result serves as an `if` condition.
    ///
    /// Numbers test nonzero; strings test nonempty and, lower-cased, neither
    /// "0" nor "false"; null and lists test false.
    pub fn as_bool(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Integer(n) => *n != 0,
            Value::Float(n) => *n != 0.0,
            Value::String(s) => {
                let lower = s.to_lowercase();
                !lower.is_empty() && lower != "0" && lower != "false"
            }
            Value::List(_) => false,
        }
    }

    /// Integer coercion for loop positions and similar counters.
    pub fn as_int(&self) -> i64 {
        match self {
            Value::Boolean(b) => *b as i64,
            Value::Integer(n) => *n,
            Value::Float(n) => *n as i64,
            Value::String(s) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }

    /// String coercion used by the `literal` directive.
    ///
    /// Total over every variant; null and lists render as the empty string.
    pub fn as_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Boolean(b) => b.to_string(),
            Value::Integer(n) => n.to_string(),
            Value::Float(n) => n.to_string(),
            Value::String(s) => s.clone(),
            Value::List(_) => String::new(),
        }
    }

    /// Borrow the elements when this value is a list.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

/// An ordered name-to-value parameter environment.
///
/// Entries keep insertion order and duplicate names are tolerated; lookup
/// returns the first match. The evaluator derives per-iteration environments
/// from this one while expanding `foreach` blocks, shadowing the loop's
/// position entry.
///
/// # Examples
///
/// ```
/// use sqlweave::{ParamList, Value};
///
/// let mut params = ParamList::new();
/// params.append("id", Value::Integer(7));
/// params.append("tags", Value::List(vec![Value::String("a".into())]));
///
/// assert_eq!(params.value("id"), Some(&Value::Integer(7)));
/// assert!(params.value("missing").is_none());
/// assert_eq!(params.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamList {
    entries: Vec<(String, Value)>,
}

impl ParamList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry at the end of the list.
    pub fn append(&mut self, name: impl Into<String>, value: Value) {
        self.entries.push((name.into(), value));
    }

    /// Look up a value by name; the first matching entry wins.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Name of the entry at `index`, in insertion order.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|(n, _)| n.as_str())
    }

    /// Value of the entry at `index`, in insertion order.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.entries.get(index).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl FromIterator<(String, Value)> for ParamList {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        ParamList {
            entries: iter.into_iter().collect(),
        }
    }
}
