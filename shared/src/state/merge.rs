use super::error::StateError;
use super::value::{Path, Step, Value};

impl Value {
    /// Merge `src` into `self` in place.
    ///
    /// Containers merge recursively; when an existing destination value is
    /// not a container of the same kind it is replaced with a fresh empty
    /// container first. Scalars overwrite whatever was there, except `Null`,
    /// which is skipped entirely (it never creates, clears, or overwrites an
    /// entry). A scalar or `Null` source leaves `self` untouched; deltas are
    /// container-shaped.
    pub fn merge_from(&mut self, src: &Value) {
        match src {
            Value::Map(entries) => {
                if !matches!(self, Value::Map(_)) {
                    *self = Value::map();
                }
                let Value::Map(dest) = self else {
                    return;
                };
                for (key, value) in entries {
                    if matches!(value, Value::Null) {
                        continue;
                    }
                    let slot = dest.entry(key.clone()).or_insert(Value::Null);
                    merge_entry(slot, value);
                }
            }
            Value::List(entries) => {
                if !matches!(self, Value::List(_)) {
                    *self = Value::list();
                }
                let Value::List(dest) = self else {
                    return;
                };
                for (index, value) in entries.iter().enumerate() {
                    if matches!(value, Value::Null) {
                        continue;
                    }
                    if index >= dest.len() {
                        dest.resize(index + 1, Value::Null);
                    }
                    merge_entry(&mut dest[index], value);
                }
            }
            _ => {}
        }
    }

    /// Depth-first traversal invoking `visit` once per leaf (any non-container
    /// value, `Null` included) with the leaf and its full path from the root.
    /// Mapping keys visit in ascending order, sequence entries in index order.
    pub fn each<F>(&self, mut visit: F)
    where
        F: FnMut(&Value, &[Step]),
    {
        let mut path = Path::new();
        self.each_inner(&mut path, &mut visit);
    }

    fn each_inner<F>(&self, path: &mut Path, visit: &mut F)
    where
        F: FnMut(&Value, &[Step]),
    {
        match self {
            Value::Map(entries) => {
                for (key, value) in entries {
                    path.push(Step::Key(key.clone()));
                    value.each_inner(path, visit);
                    path.pop();
                }
            }
            Value::List(entries) => {
                for (index, value) in entries.iter().enumerate() {
                    path.push(Step::Index(index));
                    value.each_inner(path, visit);
                    path.pop();
                }
            }
            leaf => visit(leaf, path),
        }
    }

    /// Like [`Value::each`], but hands each leaf out mutably so callers can
    /// rewrite it in place
    pub fn each_mut<F>(&mut self, mut visit: F)
    where
        F: FnMut(&mut Value, &[Step]),
    {
        let mut path = Path::new();
        self.each_mut_inner(&mut path, &mut visit);
    }

    fn each_mut_inner<F>(&mut self, path: &mut Path, visit: &mut F)
    where
        F: FnMut(&mut Value, &[Step]),
    {
        match self {
            Value::Map(entries) => {
                for (key, value) in entries.iter_mut() {
                    path.push(Step::Key(key.clone()));
                    value.each_mut_inner(path, visit);
                    path.pop();
                }
            }
            Value::List(entries) => {
                for (index, value) in entries.iter_mut().enumerate() {
                    path.push(Step::Index(index));
                    value.each_mut_inner(path, visit);
                    path.pop();
                }
            }
            leaf => visit(leaf, path),
        }
    }

    /// Drop leaves that cannot participate in merge or interpolation
    /// (non-finite numbers). Offending leaves become `Null`, which the merge
    /// then swallows; the rest of the delta stays usable. Returns one error
    /// per discarded leaf.
    pub fn sanitize(&mut self) -> Vec<StateError> {
        let mut discarded = Vec::new();
        self.each_mut(|leaf, path| {
            if matches!(leaf, Value::Number(n) if !n.is_finite()) {
                *leaf = Value::Null;
                discarded.push(StateError::MalformedLeaf {
                    path: path.to_vec(),
                });
            }
        });
        discarded
    }
}

fn merge_entry(dest: &mut Value, src: &Value) {
    if src.is_container() {
        if !same_container_kind(dest, src) {
            *dest = match src {
                Value::Map(_) => Value::map(),
                _ => Value::list(),
            };
        }
        dest.merge_from(src);
    } else {
        // src is a non-null scalar here; nulls were skipped by the caller
        *dest = src.clone();
    }
}

fn same_container_kind(a: &Value, b: &Value) -> bool {
    matches!(
        (a, b),
        (Value::Map(_), Value::Map(_)) | (Value::List(_), Value::List(_))
    )
}
