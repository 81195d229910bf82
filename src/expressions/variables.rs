use crate::variants::Variant;

/// A named value referenced by expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    pub value: Variant,
}

impl Variable {
    /// Creates a variable holding null.
    pub fn new(name: impl Into<String>) -> Self {
        Variable {
            name: name.into(),
            value: Variant::Null,
        }
    }

    pub fn with_value(name: impl Into<String>, value: impl Into<Variant>) -> Self {
        Variable {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Scope of variables an expression is evaluated against.
pub trait Variables {
    /// Finds a variable by name, ignoring case.
    fn find_by_name(&self, name: &str) -> Option<&Variable>;

    fn add(&mut self, variable: Variable);

    fn clear(&mut self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered list of variables with case-insensitive lookup.
///
/// # Examples
///
/// ```
/// use stamen::expressions::{Variable, VariableCollection, Variables};
/// use stamen::Variant;
///
/// let mut variables = VariableCollection::new();
/// variables.add(Variable::with_value("Price", 10));
/// assert_eq!(variables.find_by_name("price").map(|v| &v.value), Some(&Variant::Integer(10)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct VariableCollection {
    variables: Vec<Variable>,
}

impl VariableCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter()
    }

    pub fn find_by_name_mut(&mut self, name: &str) -> Option<&mut Variable> {
        self.variables
            .iter_mut()
            .find(|variable| variable.name.eq_ignore_ascii_case(name))
    }

    /// Sets the value of an existing variable, adding it when missing.
    pub fn set(&mut self, name: &str, value: impl Into<Variant>) {
        let value = value.into();
        match self.find_by_name_mut(name) {
            Some(variable) => variable.value = value,
            None => self.variables.push(Variable::with_value(name, value)),
        }
    }

    pub fn remove_by_name(&mut self, name: &str) {
        self.variables
            .retain(|variable| !variable.name.eq_ignore_ascii_case(name));
    }
}

impl Variables for VariableCollection {
    fn find_by_name(&self, name: &str) -> Option<&Variable> {
        self.variables
            .iter()
            .find(|variable| variable.name.eq_ignore_ascii_case(name))
    }

    fn add(&mut self, variable: Variable) {
        self.variables.push(variable);
    }

    fn clear(&mut self) {
        self.variables.clear();
    }

    fn len(&self) -> usize {
        self.variables.len()
    }
}
