use ahash::AHashMap;

use crate::value::Value;

/// The flat global name table. There are no nested scopes, every binding lives here for as long
/// as the interpreter that owns it.
#[derive(Debug, Default)]
pub(crate) struct Namespace {
    values: AHashMap<String, Value>,
}

#[derive(Debug, PartialEq)]
pub(crate) struct UndefinedVariable;

#[derive(Debug, PartialEq)]
pub(crate) struct DuplicateVariable;

impl Namespace {
    pub(crate) fn new() -> Self {
        Namespace {
            values: AHashMap::new(),
        }
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub(crate) fn define(&mut self, key: &str, value: Value) -> Result<(), DuplicateVariable> {
        if self.contains(key) {
            return Err(DuplicateVariable);
        }

        self.values.insert(String::from(key), value);
        Ok(())
    }

    pub(crate) fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    pub(crate) fn assign(&mut self, key: &str, value: Value) -> Result<(), UndefinedVariable> {
        if let Some(val) = self.values.get_mut(key) {
            *val = value;
            Ok(())
        } else {
            Err(UndefinedVariable)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::env::{DuplicateVariable, Namespace, UndefinedVariable};
    use crate::value::Value;

    #[test]
    fn test_define_and_get() {
        let mut env = Namespace::new();
        env.define("foo", Value::from(1)).unwrap();
        env.define("bar", Value::Nil).unwrap();

        assert_eq!(env.get("foo"), Some(Value::from(1)));
        assert_eq!(env.get("bar"), Some(Value::Nil));
        assert!(env.contains("foo"));
    }

    #[test]
    fn test_define_rejects_duplicate() {
        let mut env = Namespace::new();
        env.define("foo", Value::from(1)).unwrap();

        assert_eq!(Err(DuplicateVariable), env.define("foo", Value::from(2)));
        assert_eq!(env.get("foo"), Some(Value::from(1)));
    }

    #[test]
    fn test_throw_error_if_undefined() {
        let mut env = Namespace::new();
        assert_eq!(Err(UndefinedVariable), env.assign("foo", Value::from(1)));
        assert_eq!(None, env.get("foo"));
        assert!(!env.contains("foo"));
    }

    #[test]
    fn test_assign_shares_container() {
        let mut env = Namespace::new();
        let array = Value::array(vec![Value::from(1)]);
        env.define("a", Value::Nil).unwrap();
        env.assign("a", array.clone()).unwrap();

        if let Value::Array(elements) = &array {
            elements.borrow_mut().push(Value::from(2));
        }

        assert_eq!(
            env.get("a").map(|value| value.to_string()),
            Some(String::from("Array(Number(1), Number(2))"))
        );
    }
}
