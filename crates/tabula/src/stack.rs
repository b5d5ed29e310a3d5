//! Growable stacks used by the parser driver and the simulator.
//!
//! [`Stack`] is the single doubling stack abstraction; [`ParseStack`] pairs a
//! state stack with a symbol stack and keeps them the same length.

use crate::symbol::{Position, StateId, Symbol};

const INITIAL_CAPACITY: usize = 16;

/// Array-backed stack whose capacity doubles when it runs out of room.
#[derive(Debug, Clone)]
pub struct Stack<T> {
    items: Vec<T>,
}

impl<T> Stack<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity.max(1)),
        }
    }

    pub fn push(&mut self, item: T) {
        if self.items.len() == self.items.capacity() {
            self.items.reserve_exact(self.items.capacity().max(1));
        }
        self.items.push(item);
    }

    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    #[must_use]
    pub fn top(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut T> {
        self.items.last_mut()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Drop everything above `len`
    pub fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Entries from `from` to the top, mutable
    pub fn slice_from_mut(&mut self, from: usize) -> &mut [T] {
        &mut self.items[from..]
    }
}

impl<T: Clone> Stack<T> {
    /// Replace the contents with a copy of `items`
    pub fn copy_from(&mut self, items: &[T]) {
        self.items.clear();
        if self.items.capacity() < items.len() {
            let wanted = items.len().next_power_of_two();
            self.items.reserve_exact(wanted);
        }
        self.items.extend_from_slice(items);
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The automaton stack: states and the symbols matched to reach them.
///
/// The bottom entry is the start state paired with an empty sentinel symbol,
/// so the previous symbol's end position is always available.
#[derive(Debug)]
pub struct ParseStack<V> {
    states: Stack<StateId>,
    symbols: Stack<Symbol<V>>,
}

impl<V> ParseStack<V> {
    /// Stack holding only the start state
    #[must_use]
    pub fn new(start: StateId) -> Self {
        let mut states = Stack::new();
        let mut symbols = Stack::new();
        states.push(start);
        symbols.push(Symbol::empty(0, Position::ZERO, Position::ZERO));
        Self { states, symbols }
    }

    pub fn push(&mut self, state: StateId, symbol: Symbol<V>) {
        self.states.push(state);
        self.symbols.push(symbol);
        debug_assert_eq!(self.states.len(), self.symbols.len());
    }

    /// Remove the top entry. `None` once the stack is empty.
    pub fn pop(&mut self) -> Option<(StateId, Symbol<V>)> {
        let state = self.states.pop()?;
        let symbol = self.symbols.pop()?;
        Some((state, symbol))
    }

    /// Number of entries, including the bottom one
    #[must_use]
    pub fn depth(&self) -> usize {
        self.states.len()
    }

    /// # Panics
    ///
    /// Panics if the stack is empty.
    #[must_use]
    pub fn top_state(&self) -> StateId {
        *self.states.top().expect("automaton stack is empty")
    }

    /// # Panics
    ///
    /// Panics if the stack is empty.
    #[must_use]
    pub fn top_symbol(&self) -> &Symbol<V> {
        self.symbols.top().expect("automaton stack is empty")
    }

    /// # Panics
    ///
    /// Panics if the stack is empty.
    pub fn top_symbol_mut(&mut self) -> &mut Symbol<V> {
        self.symbols.top_mut().expect("automaton stack is empty")
    }

    #[must_use]
    pub fn symbol(&self, index: usize) -> &Symbol<V> {
        &self.symbols.as_slice()[index]
    }

    /// Symbols from `from` to the top, for handing to a reduction
    pub fn symbols_from_mut(&mut self, from: usize) -> &mut [Symbol<V>] {
        self.symbols.slice_from_mut(from)
    }

    pub fn truncate(&mut self, depth: usize) {
        self.states.truncate(depth);
        self.symbols.truncate(depth);
    }

    /// The state column only; symbols are never copied out of the stack
    #[must_use]
    pub fn states(&self) -> &[StateId] {
        self.states.as_slice()
    }
}
