//! Receivers for decoded fields.

use std::fmt;

use smallvec::SmallVec;

/// A decoded field value.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Value {
    UInt(u64),
    SInt(i64),
    Bytes(Vec<u8>),
    Bitset { bits: u64, labels: Vec<String> },
    /// Fields in the order they were decoded.
    Struct(Vec<(String, Value)>),
}

impl Value {
    /// First field called `name`, for struct values.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Struct(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Value::UInt(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::UInt(v) => write!(f, "{v}"),
            Value::SInt(v) => write!(f, "{v}"),
            Value::Bytes(bytes) => {
                f.write_str("0x")?;
                for b in bytes {
                    write!(f, "{b:02x}")?;
                }
                Ok(())
            }
            Value::Bitset { labels, .. } => write!(f, "({})", labels.join("|")),
            Value::Struct(fields) => {
                f.write_str("{ ")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                f.write_str(" }")
            }
        }
    }
}

/// Receives fields as the engine decodes them.
///
/// Calls arrive in stream order. `enter`/`leave` bracket nested
/// structures; `end_message` follows each completed message.
pub trait FieldSink {
    fn enter(&mut self, name: &str);
    fn field(&mut self, name: &str, value: Value);
    fn leave(&mut self);
    fn end_message(&mut self) {}
}

/// A sink that discards everything.
impl FieldSink for () {
    fn enter(&mut self, _name: &str) {}
    fn field(&mut self, _name: &str, _value: Value) {}
    fn leave(&mut self) {}
}

type Frame = (String, Vec<(String, Value)>);

/// Builds a [`Value::Struct`] tree per message.
#[derive(Clone, Debug, Default)]
pub struct ValueBuilder {
    root: Vec<(String, Value)>,
    open: SmallVec<[Frame; 4]>,
    messages: Vec<Value>,
}

impl ValueBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn current(&mut self) -> &mut Vec<(String, Value)> {
        match self.open.last_mut() {
            Some((_, fields)) => fields,
            None => &mut self.root,
        }
    }

    /// Completed messages, oldest first.
    pub fn take_messages(&mut self) -> Vec<Value> {
        std::mem::take(&mut self.messages)
    }

    /// Drop any partially built message.
    pub fn clear_partial(&mut self) {
        self.root.clear();
        self.open.clear();
    }
}

impl FieldSink for ValueBuilder {
    fn enter(&mut self, name: &str) {
        self.open.push((name.to_owned(), Vec::new()));
    }

    fn field(&mut self, name: &str, value: Value) {
        self.current().push((name.to_owned(), value));
    }

    fn leave(&mut self) {
        match self.open.pop() {
            Some((name, fields)) => self.current().push((name, Value::Struct(fields))),
            None => tracing::debug!("leave without matching enter"),
        }
    }

    fn end_message(&mut self) {
        while !self.open.is_empty() {
            self.leave();
        }
        let fields = std::mem::take(&mut self.root);
        self.messages.push(Value::Struct(fields));
    }
}

#[cfg(test)]
mod tests;
