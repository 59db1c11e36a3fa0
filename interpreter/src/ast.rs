use crate::error::Result;

// Nodes own their children, so a parsed line is a plain tree. Equality is structural and is what
// the parser tests compare against.

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    pub name: String,
}

/// One `key = value` pair of a map definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryDefinition {
    pub key: Symbol,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Number {
        value: i64,
    },
    Nil,
    Variable(Variable),
    Symbol(Symbol),
    Declaration {
        lhs: Variable,
        rhs: Box<Expr>,
    },
    Assignment {
        lhs: Variable,
        rhs: Box<Expr>,
    },
    ArrayDefinition {
        elements: Vec<Expr>,
    },
    MapDefinition {
        entries: Vec<EntryDefinition>,
    },
    Getter {
        instance: Box<Expr>,
        accessor: Box<Expr>,
    },
    Setter {
        instance: Box<Expr>,
        accessor: Box<Expr>,
        value: Box<Expr>,
    },
    Print {
        rhs: Box<Expr>,
    },
    Empty,
    // Reserved `self` reference. Nothing in the grammar produces it yet.
    This,
}

/// Every consumer of the tree implements this. `visit_expr` matches exhaustively, so a new node
/// kind fails to compile until each visitor grows a method for it.
pub trait ExprVisitor {
    type Item;

    fn visit_expr(&mut self, expr: &Expr) -> Result<Self::Item> {
        match expr {
            Expr::Number { value } => self.visit_number(*value),
            Expr::Nil => self.visit_nil(),
            Expr::Variable(variable) => self.visit_variable(variable),
            Expr::Symbol(symbol) => self.visit_symbol(symbol),
            Expr::Declaration { lhs, rhs } => self.visit_declaration(lhs, rhs),
            Expr::Assignment { lhs, rhs } => self.visit_assignment(lhs, rhs),
            Expr::ArrayDefinition { elements } => self.visit_array_definition(elements),
            Expr::MapDefinition { entries } => self.visit_map_definition(entries),
            Expr::Getter { instance, accessor } => self.visit_getter(instance, accessor),
            Expr::Setter {
                instance,
                accessor,
                value,
            } => self.visit_setter(instance, accessor, value),
            Expr::Print { rhs } => self.visit_print(rhs),
            Expr::Empty => self.visit_empty(),
            Expr::This => self.visit_this(),
        }
    }

    fn visit_number(&mut self, value: i64) -> Result<Self::Item>;
    fn visit_nil(&mut self) -> Result<Self::Item>;
    fn visit_variable(&mut self, variable: &Variable) -> Result<Self::Item>;
    fn visit_symbol(&mut self, symbol: &Symbol) -> Result<Self::Item>;
    fn visit_declaration(&mut self, lhs: &Variable, rhs: &Expr) -> Result<Self::Item>;
    fn visit_assignment(&mut self, lhs: &Variable, rhs: &Expr) -> Result<Self::Item>;
    fn visit_array_definition(&mut self, elements: &[Expr]) -> Result<Self::Item>;
    fn visit_map_definition(&mut self, entries: &[EntryDefinition]) -> Result<Self::Item>;
    fn visit_getter(&mut self, instance: &Expr, accessor: &Expr) -> Result<Self::Item>;
    fn visit_setter(
        &mut self,
        instance: &Expr,
        accessor: &Expr,
        value: &Expr,
    ) -> Result<Self::Item>;
    fn visit_print(&mut self, rhs: &Expr) -> Result<Self::Item>;
    fn visit_empty(&mut self) -> Result<Self::Item>;
    fn visit_this(&mut self) -> Result<Self::Item>;
}

impl Variable {
    pub fn new(name: &str) -> Self {
        Variable {
            name: String::from(name),
        }
    }
}

impl Symbol {
    pub fn new(name: &str) -> Self {
        Symbol {
            name: String::from(name),
        }
    }
}

impl EntryDefinition {
    pub fn new(key: &str, value: Expr) -> Self {
        EntryDefinition {
            key: Symbol::new(key),
            value,
        }
    }
}

// Creator methods, mostly so tests can spell out expected trees without boxing by hand.
impl Expr {
    pub fn number(value: i64) -> Self {
        Expr::Number { value }
    }

    pub fn variable(name: &str) -> Self {
        Expr::Variable(Variable::new(name))
    }

    pub fn symbol(name: &str) -> Self {
        Expr::Symbol(Symbol::new(name))
    }

    pub fn declaration(lhs: Variable, rhs: Expr) -> Self {
        Expr::Declaration {
            lhs,
            rhs: Box::new(rhs),
        }
    }

    pub fn assignment(lhs: Variable, rhs: Expr) -> Self {
        Expr::Assignment {
            lhs,
            rhs: Box::new(rhs),
        }
    }

    pub fn array(elements: Vec<Expr>) -> Self {
        Expr::ArrayDefinition { elements }
    }

    pub fn map(entries: Vec<EntryDefinition>) -> Self {
        Expr::MapDefinition { entries }
    }

    pub fn getter(instance: Expr, accessor: Expr) -> Self {
        Expr::Getter {
            instance: Box::new(instance),
            accessor: Box::new(accessor),
        }
    }

    pub fn setter(instance: Expr, accessor: Expr, value: Expr) -> Self {
        Expr::Setter {
            instance: Box::new(instance),
            accessor: Box::new(accessor),
            value: Box::new(value),
        }
    }

    pub fn print(rhs: Expr) -> Self {
        Expr::Print { rhs: Box::new(rhs) }
    }
}
