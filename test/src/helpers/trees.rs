use mirage_shared::{Step, Value};

/// `{pos: {x: <x>}}`, the canonical moving-leaf tree used across tests
pub fn x_delta(x: f64) -> Value {
    Value::from([("pos", Value::from([("x", Value::from(x))]))])
}

/// Reads `pos.x` back out of a tree
pub fn x_of(tree: &Value) -> Option<f64> {
    tree.select(&[Step::Key("pos".into()), Step::Key("x".into())])?
        .as_number()
}
