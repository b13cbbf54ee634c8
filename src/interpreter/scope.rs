use std::collections::HashMap;

/// A stack of name-to-value frames forming one scope chain.
///
/// The frame at index zero is the chain's outermost scope; every nested block
/// pushes a frame on entry and pops it on exit, so a frame's parent is simply
/// the frame below it. A function call does not push a frame here; it swaps
/// in a whole new `Environment`, which is what makes user-function bodies
/// blind to their defining scope.
///
/// The generic parameter is the bound value type: the interpreter binds AST
/// values, the compiler binds primitives.
pub struct Environment<T> {
    frames: Vec<HashMap<String, T>>,
}

impl<T> Default for Environment<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Environment<T> {
    /// Creates a chain holding a single empty frame.
    #[must_use]
    pub fn new() -> Self {
        Self { frames: vec![HashMap::new()] }
    }

    /// Enters a nested scope.
    pub fn push(&mut self) {
        self.frames.push(HashMap::new());
    }

    /// Leaves the innermost scope, discarding its bindings. The outermost
    /// frame is never popped.
    pub fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Declares `name` in the innermost scope.
    ///
    /// Returns `false` without binding when the innermost scope already
    /// declares `name`; shadowing an outer scope succeeds.
    ///
    /// # Example
    /// ```
    /// use numera::interpreter::scope::Environment;
    ///
    /// let mut env = Environment::new();
    /// assert!(env.define("x", 1));
    /// assert!(!env.define("x", 2));
    /// env.push();
    /// assert!(env.define("x", 3));
    /// ```
    pub fn define(&mut self, name: &str, value: T) -> bool {
        match self.frames.last_mut() {
            Some(frame) if frame.contains_key(name) => false,
            Some(frame) => {
                frame.insert(name.to_string(), value);
                true
            },
            None => false,
        }
    }

    /// Rebinds `name` in the nearest scope that declares it.
    ///
    /// Returns `false` when no scope in the chain declares `name`.
    pub fn assign(&mut self, name: &str, value: T) -> bool {
        for frame in self.frames.iter_mut().rev() {
            if let Some(slot) = frame.get_mut(name) {
                *slot = value;
                return true;
            }
        }
        false
    }

    /// Reads `name` from the nearest scope that declares it.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&T> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }
}
