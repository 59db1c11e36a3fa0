use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io::Write;
use std::rc::Rc;

use crate::ast::{EntryDefinition, Expr, ExprVisitor, Symbol, Variable};
use crate::env::Namespace;
use crate::error::{EvalError, Result};
use crate::value::Value;

/// Tree-walking evaluator. Each instance owns its own namespace, so separate sessions never see
/// each other's bindings.
pub struct Interpreter {
    globals: Namespace,

    // `print` writes here. It is shared so the caller can interleave its own output.
    stdout: Rc<RefCell<dyn Write>>,
}

impl Interpreter {
    pub fn new(stdout: Rc<RefCell<dyn Write>>) -> Self {
        Interpreter {
            globals: Namespace::new(),
            stdout,
        }
    }

    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value> {
        self.visit_expr(expr)
    }
}

impl ExprVisitor for Interpreter {
    type Item = Value;

    fn visit_number(&mut self, value: i64) -> Result<Value> {
        Ok(Value::Number(value))
    }

    fn visit_nil(&mut self) -> Result<Value> {
        Ok(Value::Nil)
    }

    fn visit_variable(&mut self, variable: &Variable) -> Result<Value> {
        self.globals
            .get(&variable.name)
            .ok_or_else(|| EvalError::UndefinedVariable(variable.name.clone()).into())
    }

    fn visit_symbol(&mut self, symbol: &Symbol) -> Result<Value> {
        Ok(Value::property(&symbol.name))
    }

    fn visit_declaration(&mut self, lhs: &Variable, rhs: &Expr) -> Result<Value> {
        if self.globals.contains(&lhs.name) {
            return Err(EvalError::DuplicateVariable(lhs.name.clone()).into());
        }

        let value = self.visit_expr(rhs)?;
        self.globals
            .define(&lhs.name, value)
            .map_err(|_| EvalError::DuplicateVariable(lhs.name.clone()))?;
        Ok(Value::Nil)
    }

    fn visit_assignment(&mut self, lhs: &Variable, rhs: &Expr) -> Result<Value> {
        if !self.globals.contains(&lhs.name) {
            return Err(EvalError::UndefinedVariable(lhs.name.clone()).into());
        }

        let value = self.visit_expr(rhs)?;
        self.globals
            .assign(&lhs.name, value.clone())
            .map_err(|_| EvalError::UndefinedVariable(lhs.name.clone()))?;
        Ok(value)
    }

    fn visit_array_definition(&mut self, elements: &[Expr]) -> Result<Value> {
        let elements = elements
            .iter()
            .map(|element| self.visit_expr(element))
            .collect::<Result<Vec<Value>>>()?;
        Ok(Value::array(elements))
    }

    fn visit_map_definition(&mut self, entries: &[EntryDefinition]) -> Result<Value> {
        // A repeated key replaces the earlier entry, no error is raised for it.
        let mut map = BTreeMap::new();
        for entry in entries {
            let value = self.visit_expr(&entry.value)?;
            map.insert(entry.key.name.clone(), value);
        }
        Ok(Value::map(map))
    }

    fn visit_getter(&mut self, instance: &Expr, accessor: &Expr) -> Result<Value> {
        let object = self.visit_expr(instance)?;
        let identifier = self.visit_expr(accessor)?.identifier()?;
        object.get_item(&identifier)
    }

    fn visit_setter(&mut self, instance: &Expr, accessor: &Expr, value: &Expr) -> Result<Value> {
        let object = self.visit_expr(instance)?;
        let identifier = self.visit_expr(accessor)?.identifier()?;
        let value = self.visit_expr(value)?;
        object.set_item(&identifier, value)
    }

    fn visit_print(&mut self, rhs: &Expr) -> Result<Value> {
        let value = self.visit_expr(rhs)?;
        writeln!(RefCell::borrow_mut(&self.stdout), "{}", value).map_err(EvalError::from)?;
        Ok(Value::Nil)
    }

    fn visit_empty(&mut self) -> Result<Value> {
        Ok(Value::Nil)
    }

    fn visit_this(&mut self) -> Result<Value> {
        Ok(Value::Nil)
    }
}
