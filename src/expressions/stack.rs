use crate::errors::{Error, ErrorCode, Result};
use crate::variants::Variant;

/// LIFO of intermediate values used while evaluating a postfix stream.
#[derive(Debug, Clone, Default)]
pub struct CalculationStack {
    values: Vec<Variant>,
}

impl CalculationStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: Variant) {
        self.values.push(value);
    }

    /// Pops the top value; an empty stack is an internal fault.
    pub fn pop(&mut self) -> Result<Variant> {
        self.values
            .pop()
            .ok_or_else(|| Error::new(ErrorCode::Internal, "Calculation stack is empty"))
    }

    pub fn peek(&self) -> Option<&Variant> {
        self.values.last()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_order() {
        let mut stack = CalculationStack::new();
        stack.push(Variant::Integer(1));
        stack.push(Variant::Integer(2));
        assert_eq!(stack.peek(), Some(&Variant::Integer(2)));
        assert_eq!(stack.pop().unwrap(), Variant::Integer(2));
        assert_eq!(stack.pop().unwrap(), Variant::Integer(1));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_pop_empty_is_internal_error() {
        let mut stack = CalculationStack::new();
        assert_eq!(stack.pop().unwrap_err().code, ErrorCode::Internal);
    }
}
