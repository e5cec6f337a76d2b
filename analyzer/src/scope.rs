//! Optional-context tracking.

/// Identifies one `OPTIONAL` block within a query.
pub type OptionalId = u32;

/// The chain of optional blocks enclosing a binding, outermost first.
/// Empty means the binding is unconditional.
pub type OptionalPath = Vec<OptionalId>;

/// Stack of the optional blocks currently being walked.
#[derive(Debug, Default)]
pub struct OptionalScope {
    stack: Vec<OptionalId>,
    next_id: OptionalId,
}

impl OptionalScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a new optional block. Every block gets a fresh id, so sibling
    /// blocks never share one.
    pub fn push(&mut self) -> OptionalId {
        self.next_id += 1;
        self.stack.push(self.next_id);
        self.next_id
    }

    /// Leave the innermost optional block.
    pub fn pop(&mut self) {
        self.stack.pop();
    }

    /// True when not inside any optional block.
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn path(&self) -> OptionalPath {
        self.stack.clone()
    }
}

/// True if one path is a prefix of the other (nested or identical blocks).
pub fn is_nested(a: &[OptionalId], b: &[OptionalId]) -> bool {
    let n = a.len().min(b.len());
    a[..n] == b[..n]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_paths() {
        let mut scope = OptionalScope::new();
        assert!(scope.is_empty());

        let outer = scope.push();
        let inner = scope.push();
        assert_eq!(scope.path(), vec![outer, inner]);

        scope.pop();
        scope.pop();
        let sibling = scope.push();
        assert_ne!(sibling, outer);
        assert_eq!(scope.path(), vec![sibling]);
    }

    #[test]
    fn test_is_nested() {
        assert!(is_nested(&[1], &[1, 2]));
        assert!(is_nested(&[1, 2], &[1, 2]));
        assert!(is_nested(&[], &[3]));
        assert!(!is_nested(&[1], &[2]));
        assert!(!is_nested(&[1, 2], &[1, 3]));
    }
}
