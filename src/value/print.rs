// License: MIT

use std::fmt;

use super::{MapValue, Pmt, Value, VectorValue};

/// Pending output, consumed last-in first-out.
enum Piece {
    Value(Pmt),
    Key(String),
    Text(&'static str),
}

/// Write the textual form of `value`.
///
/// Grammar: maps print as `{key: value, }`, vectors and uniform vectors as
/// `[value, ]`. Every entry is followed by `, `, including the last one.
pub(super) fn print_value<W: fmt::Write>(value: &Value, sink: &mut W) -> fmt::Result {
    let mut stack = Vec::new();
    open(value, &mut stack, sink)?;
    drain(&mut stack, sink)
}

fn drain<W: fmt::Write>(stack: &mut Vec<Piece>, sink: &mut W) -> fmt::Result {
    while let Some(piece) = stack.pop() {
        match piece {
            Piece::Text(text) => sink.write_str(text)?,
            Piece::Key(key) => {
                sink.write_str(&key)?;
                sink.write_str(": ")?;
            }
            Piece::Value(pmt) => open(&pmt.borrow(), stack, sink)?,
        }
    }
    Ok(())
}

/// Write what can be written now and queue the children.
fn open<W: fmt::Write>(value: &Value, stack: &mut Vec<Piece>, sink: &mut W) -> fmt::Result {
    match value {
        Value::Null => sink.write_str("null"),
        Value::Scalar(scalar) => write!(sink, "{}", scalar),
        Value::UniformVector(uniform) => write!(sink, "{}", uniform),
        Value::Vector(vector) => open_vector(vector, stack, sink),
        Value::Map(map) => open_map(map, stack, sink),
    }
}

fn open_vector<W: fmt::Write>(vector: &VectorValue, stack: &mut Vec<Piece>, sink: &mut W) -> fmt::Result {
    stack.push(Piece::Text("]"));
    for item in vector.iter().rev() {
        stack.push(Piece::Text(", "));
        stack.push(Piece::Value(item.clone()));
    }
    sink.write_str("[")
}

fn open_map<W: fmt::Write>(map: &MapValue, stack: &mut Vec<Piece>, sink: &mut W) -> fmt::Result {
    stack.push(Piece::Text("}"));
    for (key, item) in map.iter().rev() {
        stack.push(Piece::Text(", "));
        stack.push(Piece::Value(item.clone()));
        stack.push(Piece::Key(key.clone()));
    }
    sink.write_str("{")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        print_value(self, f)
    }
}

impl fmt::Display for Pmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        print_value(&self.borrow(), f)
    }
}

impl fmt::Display for MapValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = Vec::new();
        open_map(self, &mut stack, f)?;
        drain(&mut stack, f)
    }
}

impl fmt::Display for VectorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = Vec::new();
        open_vector(self, &mut stack, f)?;
        drain(&mut stack, f)
    }
}
