//! # Reduction Actions
//!
//! When the parser reduces by a rule it hands the matched right-hand side to
//! an [`Actions`] implementation, which returns the value of the produced
//! nonterminal. Span and symbol id of the result are filled in by the parser.
//!
//! Any `FnMut(RuleId, RhsArgs<V>) -> Option<V>` closure is an [`Actions`];
//! [`RuleActions`] dispatches per rule and falls back to [`nothing`].

use crate::symbol::{Position, RuleId, Symbol};

/// Semantic actions run on reduction.
pub trait Actions<V> {
    /// Produce the value of the left-hand side of `rule`.
    fn reduce(&mut self, rule: RuleId, args: RhsArgs<'_, V>) -> Option<V>;
}

impl<V, F> Actions<V> for F
where
    F: FnMut(RuleId, RhsArgs<'_, V>) -> Option<V>,
{
    fn reduce(&mut self, rule: RuleId, args: RhsArgs<'_, V>) -> Option<V> {
        self(rule, args)
    }
}

/// The right-hand side symbols of a reduction, still on the parser stack.
///
/// Values can be moved out with [`take`](Self::take); whatever is left is
/// dropped with the stack entries after the action returns.
#[derive(Debug)]
pub struct RhsArgs<'a, V> {
    symbols: &'a mut [Symbol<V>],
    offset: usize,
}

impl<'a, V> RhsArgs<'a, V> {
    pub(crate) fn new(symbols: &'a mut [Symbol<V>], offset: usize) -> Self {
        Self { symbols, offset }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Stack index of the entry just below the first argument
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// # Panics
    ///
    /// Panics if `index` is not below [`len`](Self::len).
    #[must_use]
    pub fn symbol(&self, index: usize) -> &Symbol<V> {
        &self.symbols[index]
    }

    #[must_use]
    pub fn symbols(&self) -> &[Symbol<V>] {
        self.symbols
    }

    /// Value of argument `index`, if it has one and has not been taken
    #[must_use]
    pub fn value(&self, index: usize) -> Option<&V> {
        self.symbols.get(index)?.value.as_ref()
    }

    /// Move the value of argument `index` out
    pub fn take(&mut self, index: usize) -> Option<V> {
        self.symbols.get_mut(index)?.value.take()
    }

    /// Start of the first argument, if there is one
    #[must_use]
    pub fn start(&self) -> Option<Position> {
        self.symbols.first().map(|symbol| symbol.start)
    }

    /// End of the last argument, if there is one
    #[must_use]
    pub fn end(&self) -> Option<Position> {
        self.symbols.last().map(|symbol| symbol.end)
    }
}

/// Produces no value.
#[must_use]
pub fn nothing<V>(_args: RhsArgs<'_, V>) -> Option<V> {
    None
}

/// Passes the value of the first argument through.
#[must_use]
pub fn pass_through<V>(mut args: RhsArgs<'_, V>) -> Option<V> {
    args.take(0)
}

type ReduceFn<'f, V> = Box<dyn FnMut(RhsArgs<'_, V>) -> Option<V> + 'f>;

/// Per-rule table of reduction closures.
///
/// ```rust
/// use tabula::actions::{RhsArgs, RuleActions, pass_through};
///
/// let actions: RuleActions<'_, i64> = RuleActions::new()
///     .on(0, |mut args: RhsArgs<'_, i64>| Some(args.take(0)? + args.take(2)?))
///     .on(1, pass_through);
/// assert_eq!(actions.len(), 2);
/// ```
pub struct RuleActions<'f, V> {
    actions: Vec<Option<ReduceFn<'f, V>>>,
}

impl<'f, V> RuleActions<'f, V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    /// Run `action` when reducing by `rule`
    #[must_use]
    pub fn on<F>(mut self, rule: RuleId, action: F) -> Self
    where
        F: FnMut(RhsArgs<'_, V>) -> Option<V> + 'f,
    {
        self.set(rule, action);
        self
    }

    pub fn set<F>(&mut self, rule: RuleId, action: F)
    where
        F: FnMut(RhsArgs<'_, V>) -> Option<V> + 'f,
    {
        let index = usize::from(rule);
        if self.actions.len() <= index {
            self.actions.resize_with(index + 1, || None);
        }
        self.actions[index] = Some(Box::new(action));
    }

    /// One past the highest rule with an action
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.iter().all(Option::is_none)
    }
}

impl<V> Default for RuleActions<'_, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Actions<V> for RuleActions<'_, V> {
    fn reduce(&mut self, rule: RuleId, args: RhsArgs<'_, V>) -> Option<V> {
        match self.actions.get_mut(usize::from(rule)) {
            Some(Some(action)) => action(args),
            _ => nothing(args),
        }
    }
}

impl<V> std::fmt::Debug for RuleActions<'_, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rules: Vec<usize> = self
            .actions
            .iter()
            .enumerate()
            .filter_map(|(rule, action)| action.as_ref().map(|_| rule))
            .collect();
        f.debug_struct("RuleActions").field("rules", &rules).finish()
    }
}
