use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt::{self, Debug, Display, Formatter};
use std::rc::Rc;

use crate::error::{EvalError, Result};

/// A runtime value. Arrays and maps are shared handles: cloning a `Value` never copies the
/// container, so every holder of the handle sees writes made through any other.
#[derive(Clone)]
pub enum Value {
    Nil,
    Number(i64),
    Array(Rc<RefCell<Vec<Value>>>),
    Map(Rc<RefCell<BTreeMap<String, Value>>>),
    Property(Rc<str>),
}

/// The key an accessor resolves to when reading or writing a container item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Index(i64),
    Name(String),
}

impl Value {
    pub fn array(elements: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(elements)))
    }

    pub fn map(entries: BTreeMap<String, Value>) -> Self {
        Value::Map(Rc::new(RefCell::new(entries)))
    }

    pub fn property(name: &str) -> Self {
        Value::Property(Rc::from(name))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "Nil",
            Value::Number(_) => "Number",
            Value::Array(_) => "Array",
            Value::Map(_) => "Map",
            Value::Property(_) => "Property",
        }
    }

    /// Converts a value used as an accessor into the key it denotes.
    pub fn identifier(&self) -> Result<Identifier> {
        match self {
            Value::Number(num) => Ok(Identifier::Index(*num)),
            Value::Property(name) => Ok(Identifier::Name(String::from(&**name))),
            _ => Err(EvalError::unsupported(format_args!(
                "{} cannot be used as an accessor",
                self.type_name()
            ))
            .into()),
        }
    }

    pub fn get_item(&self, identifier: &Identifier) -> Result<Value> {
        match (self, identifier) {
            (Value::Array(elements), Identifier::Index(index)) => {
                let elements = elements.borrow();
                let pos = Self::position(*index, elements.len())?;
                Ok(elements[pos].clone())
            }
            (Value::Map(entries), Identifier::Name(name)) => entries
                .borrow()
                .get(name)
                .cloned()
                .ok_or_else(|| EvalError::KeyNotFound(name.clone()).into()),
            _ => Err(self.unsupported_access("read", identifier)),
        }
    }

    /// Overwrites an existing item and returns the written value. Containers never grow through
    /// this, a missing key or index fails the same way `get_item` does.
    pub fn set_item(&self, identifier: &Identifier, value: Value) -> Result<Value> {
        match (self, identifier) {
            (Value::Array(elements), Identifier::Index(index)) => {
                let mut elements = elements.borrow_mut();
                let pos = Self::position(*index, elements.len())?;
                elements[pos] = value.clone();
                Ok(value)
            }
            (Value::Map(entries), Identifier::Name(name)) => {
                let mut entries = entries.borrow_mut();
                match entries.get_mut(name) {
                    Some(slot) => {
                        *slot = value.clone();
                        Ok(value)
                    }
                    None => Err(EvalError::KeyNotFound(name.clone()).into()),
                }
            }
            _ => Err(self.unsupported_access("write", identifier)),
        }
    }

    fn position(index: i64, len: usize) -> Result<usize> {
        usize::try_from(index)
            .ok()
            .filter(|pos| *pos < len)
            .ok_or_else(|| EvalError::IndexOutOfRange { index, len }.into())
    }

    fn unsupported_access(&self, op: &str, identifier: &Identifier) -> crate::error::Error {
        EvalError::unsupported(format_args!(
            "cannot {} item {} of {}",
            op,
            identifier,
            self.type_name()
        ))
        .into()
    }

    // Structural comparison. A pair of containers already being compared higher up the stack is
    // taken as equal, so two distinct self-referencing containers compare without looping.
    fn equals(&self, other: &Value, open: &mut Vec<(*const (), *const ())>) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Number(lhs), Value::Number(rhs)) => lhs == rhs,
            (Value::Property(lhs), Value::Property(rhs)) => lhs == rhs,
            (Value::Array(lhs), Value::Array(rhs)) => {
                let pair = (Rc::as_ptr(lhs) as *const (), Rc::as_ptr(rhs) as *const ());
                if Rc::ptr_eq(lhs, rhs) || open.contains(&pair) {
                    return true;
                }

                let (lhs, rhs) = (lhs.borrow(), rhs.borrow());
                open.push(pair);
                let equal = lhs.len() == rhs.len()
                    && lhs.iter().zip(rhs.iter()).all(|(l, r)| l.equals(r, open));
                open.pop();
                equal
            }
            (Value::Map(lhs), Value::Map(rhs)) => {
                let pair = (Rc::as_ptr(lhs) as *const (), Rc::as_ptr(rhs) as *const ());
                if Rc::ptr_eq(lhs, rhs) || open.contains(&pair) {
                    return true;
                }

                let (lhs, rhs) = (lhs.borrow(), rhs.borrow());
                open.push(pair);
                let equal = lhs.len() == rhs.len()
                    && lhs
                        .iter()
                        .zip(rhs.iter())
                        .all(|((lk, lv), (rk, rv))| lk == rk && lv.equals(rv, open));
                open.pop();
                equal
            }
            _ => false,
        }
    }

    // Containers can end up holding themselves (`a[0] = a`), so rendering keeps the stack of
    // containers currently being printed and cuts the recursion short on a revisit.
    fn render(&self, f: &mut Formatter<'_>, open: &mut Vec<*const ()>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "Nil()"),
            Value::Number(num) => write!(f, "Number({})", num),
            Value::Property(name) => write!(f, "Property({})", name),
            Value::Array(elements) => {
                let ptr = Rc::as_ptr(elements) as *const ();
                if open.contains(&ptr) {
                    return write!(f, "Array(...)");
                }

                open.push(ptr);
                write!(f, "Array(")?;
                for (idx, element) in elements.borrow().iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    element.render(f, open)?;
                }
                open.pop();
                write!(f, ")")
            }
            Value::Map(entries) => {
                let ptr = Rc::as_ptr(entries) as *const ();
                if open.contains(&ptr) {
                    return write!(f, "Map(...)");
                }

                open.push(ptr);
                write!(f, "Map(")?;
                for (idx, (key, value)) in entries.borrow().iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} = ", key)?;
                    value.render(f, open)?;
                }
                open.pop();
                write!(f, ")")
            }
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other, &mut Vec::new())
    }
}

macro_rules! impl_from_int_for_value {
    ( $( $t:ident )* ) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Value {
                    Value::Number(i64::from(n))
                }
            }
        )*
    }
}

impl_from_int_for_value!(u8 i8 u16 i16 u32 i32 i64);

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.render(f, &mut Vec::new())
    }
}

// Derived Debug would recurse forever on a self-referencing container.
impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Index(index) => write!(f, "[{}]", index),
            Identifier::Name(name) => write!(f, ".{}", name),
        }
    }
}
