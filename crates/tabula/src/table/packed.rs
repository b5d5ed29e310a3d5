//! Row-displacement table storage.
//!
//! Action and goto rows share one pair of arrays. Row `r` of state `s` starts
//! at `offsets[s]`; the entry for symbol `x` lives at `offsets[s] + x` and is
//! valid only if the check array holds `x` at that index. Every row gets a
//! distinct offset, which keeps rows from reading each other's entries.

use super::{Action, ParseTables, RuleInfo};
use crate::error::TableError;
use crate::symbol::{RuleId, StateId, SymbolId};
use hashbrown::hash_map::Entry;
use hashbrown::{HashMap, HashSet};
use std::borrow::Cow;
use std::cmp::Reverse;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Offset of a state whose row has no entries.
pub const UNUSED_OFFSET: i32 = i32::MIN;

/// Check value of a free slot.
const EMPTY_SLOT: SymbolId = SymbolId::MAX;

type EntryMap = HashMap<(StateId, SymbolId), Action, ahash::RandomState>;

/// Raw arrays of a packed table, as emitted by a table generator.
///
/// Generated code can hand in `Cow::Borrowed` statics; [`TableBuilder`]
/// produces owned parts.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct TableParts {
    /// Action and goto codes, indexed by `offset + symbol`
    pub actions: Cow<'static, [i16]>,
    /// Check column: the symbol owning each slot of `actions`
    pub lookaheads: Cow<'static, [SymbolId]>,
    pub action_offsets: Cow<'static, [i32]>,
    pub goto_offsets: Cow<'static, [i32]>,
    /// Per-state fallback action; only consulted when `compressed` is set
    pub default_actions: Cow<'static, [i16]>,
    pub rule_infos: Cow<'static, [u32]>,
    pub terminal_count: u16,
    pub symbol_count: u16,
    pub error_symbol: Option<SymbolId>,
    pub compressed: bool,
}

/// Validated packed tables.
///
/// Lookups index the per-state arrays directly and panic for a state id the
/// tables do not define; states only ever come out of the tables themselves.
#[derive(Debug, Clone)]
pub struct PackedTables {
    parts: TableParts,
}

impl PackedTables {
    /// Validate raw parts.
    ///
    /// # Errors
    ///
    /// Returns a [`TableError`] if the arrays disagree in length, ids do not
    /// fit the encoding, or an entry names an undefined state or rule.
    pub fn new(parts: TableParts) -> Result<Self, TableError> {
        let states = parts.action_offsets.len();
        check_len("goto_offsets", states, parts.goto_offsets.len())?;
        check_len("lookaheads", parts.actions.len(), parts.lookaheads.len())?;
        if parts.compressed {
            check_len("default_actions", states, parts.default_actions.len())?;
        }
        if states == 0 || states > i16::MAX as usize + 1 {
            return Err(TableError::Overflow {
                what: "states",
                count: states,
            });
        }
        let rule_count = parts.rule_infos.len();
        if rule_count > i16::MAX as usize {
            return Err(TableError::Overflow {
                what: "rules",
                count: rule_count,
            });
        }
        if parts.terminal_count == 0 || parts.terminal_count > parts.symbol_count {
            return Err(TableError::Overflow {
                what: "terminals",
                count: usize::from(parts.terminal_count),
            });
        }
        let is_nonterminal =
            |symbol: SymbolId| (parts.terminal_count..parts.symbol_count).contains(&symbol);
        if let Some(symbol) = parts.error_symbol.filter(|&symbol| !is_nonterminal(symbol)) {
            return Err(TableError::InvalidErrorSymbol { symbol });
        }
        for (rule, &raw) in parts.rule_infos.iter().enumerate() {
            let lhs = RuleInfo::from_packed(raw).lhs();
            if !is_nonterminal(lhs) {
                return Err(TableError::InvalidLhs {
                    rule: rule as RuleId,
                    lhs,
                });
            }
        }

        let slots = parts.lookaheads.iter().zip(parts.actions.iter());
        let codes = slots
            .filter(|&(&check, _)| check != EMPTY_SLOT)
            .map(|(_, &code)| code)
            .chain(parts.default_actions.iter().copied());
        for code in codes {
            match Action::decode(code, rule_count) {
                Action::Shift(state) if usize::from(state) >= states => {
                    return Err(TableError::UnknownState { state });
                }
                Action::Reduce(rule) if usize::from(rule) >= rule_count => {
                    return Err(TableError::UnknownRule { rule });
                }
                _ => {}
            }
        }

        Ok(Self { parts })
    }

    #[must_use]
    pub fn state_count(&self) -> usize {
        self.parts.action_offsets.len()
    }

    #[must_use]
    pub const fn symbol_count(&self) -> usize {
        self.parts.symbol_count as usize
    }

    /// The underlying arrays, e.g. for emitting them as static data
    #[must_use]
    pub const fn parts(&self) -> &TableParts {
        &self.parts
    }

    #[must_use]
    pub fn into_parts(self) -> TableParts {
        self.parts
    }

    #[inline]
    fn lookup(&self, offset: i32, symbol: SymbolId) -> Option<i16> {
        if offset == UNUSED_OFFSET {
            return None;
        }
        let index = usize::try_from(offset.checked_add(i32::from(symbol))?).ok()?;
        (self.parts.lookaheads.get(index) == Some(&symbol)).then(|| self.parts.actions[index])
    }
}

fn check_len(part: &'static str, expected: usize, actual: usize) -> Result<(), TableError> {
    if expected == actual {
        Ok(())
    } else {
        Err(TableError::PartLength {
            part,
            expected,
            actual,
        })
    }
}

impl ParseTables for PackedTables {
    #[inline]
    fn action_code(&self, state: StateId, terminal: SymbolId) -> i16 {
        let state = usize::from(state);
        match self.lookup(self.parts.action_offsets[state], terminal) {
            Some(code) => code,
            None if self.parts.compressed => self.parts.default_actions[state],
            None => 0,
        }
    }

    #[inline]
    fn goto_code(&self, state: StateId, nonterminal: SymbolId) -> i16 {
        self.lookup(self.parts.goto_offsets[usize::from(state)], nonterminal)
            .unwrap_or(0)
    }

    fn rule_info(&self, rule: RuleId) -> RuleInfo {
        RuleInfo::from_packed(self.parts.rule_infos[usize::from(rule)])
    }

    fn rule_count(&self) -> usize {
        self.parts.rule_infos.len()
    }

    fn terminal_count(&self) -> usize {
        usize::from(self.parts.terminal_count)
    }

    fn error_symbol(&self) -> Option<SymbolId> {
        self.parts.error_symbol
    }

    fn is_compressed(&self) -> bool {
        self.parts.compressed
    }

    fn has_lookahead(&self, state: StateId, terminal: SymbolId) -> bool {
        self.lookup(self.parts.action_offsets[usize::from(state)], terminal)
            .is_some_and(|code| code != 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum RowKind {
    Action,
    Goto,
}

/// Assembles [`PackedTables`] from explicit entries.
///
/// Rules are numbered in the order they are declared. Entry methods never
/// fail; the first problem is remembered and returned by [`build`](Self::build).
///
/// ```rust
/// use tabula::{ParseTables, TableBuilder, Action, EOF};
///
/// // 0 EOF, 1 NUM | 2 expr
/// let tables = TableBuilder::new(2, 3)
///     .rule(2, 1) // expr := NUM
///     .shift(0, 1, 1)
///     .reduce(1, EOF, 0)
///     .goto(0, 2, 2)
///     .accept(2, EOF)
///     .build()
///     .unwrap();
///
/// assert_eq!(tables.action(0, 1), Action::Shift(1));
/// assert_eq!(tables.action(2, EOF), Action::Accept);
/// ```
#[derive(Debug, Clone)]
pub struct TableBuilder {
    terminal_count: u16,
    symbol_count: u16,
    rules: Vec<RuleInfo>,
    actions: EntryMap,
    gotos: EntryMap,
    state_count: usize,
    error_symbol: Option<SymbolId>,
    compressed: bool,
    fault: Option<TableError>,
}

impl TableBuilder {
    /// Terminals are `0..terminal_count` (with `0` as end of input),
    /// nonterminals `terminal_count..symbol_count`.
    #[must_use]
    pub fn new(terminal_count: u16, symbol_count: u16) -> Self {
        Self {
            terminal_count,
            symbol_count,
            rules: Vec::new(),
            actions: EntryMap::default(),
            gotos: EntryMap::default(),
            state_count: 1,
            error_symbol: None,
            compressed: false,
            fault: None,
        }
    }

    /// Declare the next rule: `lhs` produced from `rhs_len` symbols
    #[must_use]
    pub fn rule(mut self, lhs: SymbolId, rhs_len: u16) -> Self {
        self.rules.push(RuleInfo::new(lhs, rhs_len));
        self
    }

    #[must_use]
    pub fn shift(self, state: StateId, terminal: SymbolId, target: StateId) -> Self {
        if target == 0 {
            return self.fail(TableError::ShiftToStartState { state });
        }
        self.entry(RowKind::Action, state, terminal, Action::Shift(target))
    }

    #[must_use]
    pub fn reduce(self, state: StateId, terminal: SymbolId, rule: RuleId) -> Self {
        self.entry(RowKind::Action, state, terminal, Action::Reduce(rule))
    }

    /// Accept on `symbol`, which may be a terminal or a nonterminal
    #[must_use]
    pub fn accept(self, state: StateId, symbol: SymbolId) -> Self {
        let kind = if symbol < self.terminal_count {
            RowKind::Action
        } else {
            RowKind::Goto
        };
        self.entry(kind, state, symbol, Action::Accept)
    }

    #[must_use]
    pub fn goto(self, state: StateId, nonterminal: SymbolId, target: StateId) -> Self {
        if target == 0 {
            return self.fail(TableError::ShiftToStartState { state });
        }
        self.entry(RowKind::Goto, state, nonterminal, Action::Shift(target))
    }

    /// Nonterminal shifted by phrase-level recovery
    #[must_use]
    pub const fn error_symbol(mut self, symbol: SymbolId) -> Self {
        self.error_symbol = Some(symbol);
        self
    }

    /// Fold the most frequent reduction of each state into a default action.
    /// Compressed tables cannot enumerate lookaheads.
    #[must_use]
    pub const fn compressed(mut self, compressed: bool) -> Self {
        self.compressed = compressed;
        self
    }

    fn fail(mut self, fault: TableError) -> Self {
        self.fault.get_or_insert(fault);
        self
    }

    fn entry(mut self, kind: RowKind, state: StateId, symbol: SymbolId, action: Action) -> Self {
        let is_terminal = symbol < self.terminal_count;
        match kind {
            RowKind::Action if !is_terminal => {
                return self.fail(TableError::WrongSymbolKind {
                    state,
                    symbol,
                    expected: "terminal",
                });
            }
            RowKind::Goto if is_terminal || symbol >= self.symbol_count => {
                return self.fail(TableError::WrongSymbolKind {
                    state,
                    symbol,
                    expected: "nonterminal",
                });
            }
            _ => {}
        }

        let target = match action {
            Action::Shift(target) => usize::from(target),
            _ => 0,
        };
        self.state_count = self.state_count.max(usize::from(state) + 1).max(target + 1);

        let map = match kind {
            RowKind::Action => &mut self.actions,
            RowKind::Goto => &mut self.gotos,
        };
        let conflict = match map.entry((state, symbol)) {
            Entry::Occupied(existing) => *existing.get() != action,
            Entry::Vacant(slot) => {
                slot.insert(action);
                false
            }
        };
        if conflict {
            return self.fail(TableError::Conflict { state, symbol });
        }
        self
    }

    /// Validate, optionally compress and pack the collected entries.
    ///
    /// # Errors
    ///
    /// Returns the first [`TableError`] met while collecting entries, or one
    /// found while validating them.
    pub fn build(self) -> Result<PackedTables, TableError> {
        if let Some(fault) = self.fault {
            return Err(fault);
        }
        let rule_count = self.rules.len();
        if rule_count > i16::MAX as usize {
            return Err(TableError::Overflow {
                what: "rules",
                count: rule_count,
            });
        }
        if self.state_count > i16::MAX as usize + 1 {
            return Err(TableError::Overflow {
                what: "states",
                count: self.state_count,
            });
        }

        let mut action_rows = collect_rows(&self.actions, self.state_count);
        let goto_rows = collect_rows(&self.gotos, self.state_count);
        for &(_, action) in action_rows.iter().chain(&goto_rows).flatten() {
            if let Action::Reduce(rule) = action
                && usize::from(rule) >= rule_count
            {
                return Err(TableError::UnknownRule { rule });
            }
        }

        let default_actions: Vec<i16> = if self.compressed {
            action_rows
                .iter_mut()
                .map(|row| compress_row(row, rule_count))
                .collect()
        } else {
            Vec::new()
        };

        let mut rows: Vec<(RowKind, usize)> = action_rows
            .iter()
            .enumerate()
            .filter(|(_, row)| !row.is_empty())
            .map(|(state, _)| (RowKind::Action, state))
            .chain(
                goto_rows
                    .iter()
                    .enumerate()
                    .filter(|(_, row)| !row.is_empty())
                    .map(|(state, _)| (RowKind::Goto, state)),
            )
            .collect();
        let row_of = |(kind, state): (RowKind, usize)| match kind {
            RowKind::Action => &action_rows[state],
            RowKind::Goto => &goto_rows[state],
        };
        rows.sort_by_key(|&(kind, state)| (Reverse(row_of((kind, state)).len()), kind, state));

        let mut packer = Packer::default();
        let mut action_offsets = vec![UNUSED_OFFSET; self.state_count];
        let mut goto_offsets = vec![UNUSED_OFFSET; self.state_count];
        for (kind, state) in rows {
            let offset = packer.place(row_of((kind, state)), rule_count);
            match kind {
                RowKind::Action => action_offsets[state] = offset,
                RowKind::Goto => goto_offsets[state] = offset,
            }
        }

        PackedTables::new(TableParts {
            actions: Cow::Owned(packer.codes),
            lookaheads: Cow::Owned(packer.check),
            action_offsets: Cow::Owned(action_offsets),
            goto_offsets: Cow::Owned(goto_offsets),
            default_actions: Cow::Owned(default_actions),
            rule_infos: Cow::Owned(self.rules.iter().map(|info| info.packed()).collect()),
            terminal_count: self.terminal_count,
            symbol_count: self.symbol_count,
            error_symbol: self.error_symbol,
            compressed: self.compressed,
        })
    }
}

/// Per-state rows sorted by symbol.
fn collect_rows(entries: &EntryMap, state_count: usize) -> Vec<Vec<(SymbolId, Action)>> {
    let mut rows = vec![Vec::new(); state_count];
    for (&(state, symbol), &action) in entries {
        rows[usize::from(state)].push((symbol, action));
    }
    for row in &mut rows {
        row.sort_unstable_by_key(|&(symbol, _)| symbol);
    }
    rows
}

/// Remove the state's most frequent reduction (ties go to the lower rule)
/// and return it as the default code.
fn compress_row(row: &mut Vec<(SymbolId, Action)>, rule_count: usize) -> i16 {
    let mut counts: HashMap<RuleId, usize, ahash::RandomState> = HashMap::default();
    for &(_, action) in row.iter() {
        if let Action::Reduce(rule) = action {
            *counts.entry(rule).or_insert(0) += 1;
        }
    }
    let Some((rule, _)) = counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
    else {
        return 0;
    };
    let default = Action::Reduce(rule);
    row.retain(|&(_, action)| action != default);
    default.encode(rule_count)
}

/// First-fit row displacement.
#[derive(Default)]
struct Packer {
    codes: Vec<i16>,
    check: Vec<SymbolId>,
    used: HashSet<i32, ahash::RandomState>,
}

impl Packer {
    fn place(&mut self, row: &[(SymbolId, Action)], rule_count: usize) -> i32 {
        let mut offset = -i32::from(row[0].0);
        while self.used.contains(&offset) || !self.fits(row, offset) {
            offset += 1;
        }
        self.used.insert(offset);

        for &(symbol, action) in row {
            let index = (offset + i32::from(symbol)) as usize;
            if index >= self.check.len() {
                self.check.resize(index + 1, EMPTY_SLOT);
                self.codes.resize(index + 1, 0);
            }
            self.check[index] = symbol;
            self.codes[index] = action.encode(rule_count);
        }
        offset
    }

    fn fits(&self, row: &[(SymbolId, Action)], offset: i32) -> bool {
        row.iter().all(|&(symbol, _)| {
            let index = (offset + i32::from(symbol)) as usize;
            self.check
                .get(index)
                .is_none_or(|&slot| slot == EMPTY_SLOT)
        })
    }
}
