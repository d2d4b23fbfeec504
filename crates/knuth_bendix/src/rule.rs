use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;

use kbc_utilities::TagIndex;
use log::trace;

use crate::Letter;
use crate::Word;
use crate::format_word;

/// A unique type for the rule slots.
pub struct RuleTag;

/// A unique type for the creation order of rules.
pub struct RuleIdTag;

/// The index of the slot in which a rule is stored. Slots of inactive rules are reused.
pub type RuleIndex = TagIndex<usize, RuleTag>;

/// The identifier of a rule, every activation receives a fresh and larger identifier.
pub type RuleId = TagIndex<usize, RuleIdTag>;

/// An oriented rule `lhs -> rhs` where `lhs` is larger than `rhs` in the reduction order.
#[derive(Clone, Debug)]
pub struct Rule {
    lhs: Word,
    rhs: Word,
    id: RuleId,
    active: bool,
}

impl Rule {
    pub fn lhs(&self) -> &[Letter] {
        &self.lhs
    }

    pub fn rhs(&self) -> &[Letter] {
        &self.rhs
    }

    pub fn id(&self) -> RuleId {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", format_word(&self.lhs), format_word(&self.rhs))
    }
}

/// Stores the rules of a rewriting system in slots.
///
/// The active rules are kept ordered by their identifier. Deactivated rules
/// keep their slot, which is handed out again before any new slot is
/// allocated.
#[derive(Default)]
pub struct Rules {
    rules: Vec<Rule>,
    active: BTreeMap<RuleId, RuleIndex>,
    inactive: Vec<RuleIndex>,
    next_id: usize,
}

impl Rules {
    pub fn new() -> Rules {
        Rules::default()
    }

    /// Stores the rule `lhs -> rhs` as an active rule with a fresh identifier.
    pub fn activate(&mut self, lhs: Word, rhs: Word) -> RuleIndex {
        let id = RuleId::new(self.next_id);
        self.next_id += 1;

        let rule = Rule {
            lhs,
            rhs,
            id,
            active: true,
        };

        let index = if let Some(index) = self.inactive.pop() {
            self.rules[*index] = rule;
            index
        } else {
            self.rules.push(rule);
            RuleIndex::new(self.rules.len() - 1)
        };

        trace!("Activated rule {} ({id}): {}", index, self.rules[*index]);
        self.active.insert(id, index);
        index
    }

    /// Deactivates the rule in the given slot and returns its sides.
    pub fn deactivate(&mut self, index: RuleIndex) -> (Word, Word) {
        let rule = &mut self.rules[*index];
        debug_assert!(rule.active, "Rule {index} is already inactive");

        trace!("Deactivated rule {} ({}): {}", index, rule.id, rule);
        rule.active = false;
        self.active.remove(&rule.id);
        self.inactive.push(index);

        (std::mem::take(&mut rule.lhs), std::mem::take(&mut rule.rhs))
    }

    /// Replaces the right hand side of an active rule.
    pub fn set_rhs(&mut self, index: RuleIndex, rhs: Word) {
        debug_assert!(self.rules[*index].active, "Rule {index} is inactive");
        self.rules[*index].rhs = rhs;
    }

    /// Returns true iff the slot still holds the active rule with the given identifier.
    pub fn is_current(&self, index: RuleIndex, id: RuleId) -> bool {
        let rule = &self.rules[*index];
        rule.active && rule.id == id
    }

    /// Returns the active rule with the smallest identifier larger than `id`,
    /// or the first active rule when `id` is None.
    pub fn next_active(&self, id: Option<RuleId>) -> Option<(RuleId, RuleIndex)> {
        match id {
            Some(id) => self.active.range(RuleId::new(*id + 1)..).next(),
            None => self.active.iter().next(),
        }
        .map(|(id, index)| (*id, *index))
    }

    /// Returns the active rules with an identifier of at most `id`, newest first.
    pub fn active_up_to(&self, id: RuleId) -> Vec<(RuleId, RuleIndex)> {
        self.active
            .range(..=id)
            .rev()
            .map(|(id, index)| (*id, *index))
            .collect()
    }

    /// Iterates over the active rules in order of their identifier.
    pub fn iter_active(&self) -> impl Iterator<Item = (RuleIndex, &Rule)> + '_ {
        self.active.values().map(|index| (*index, &self.rules[**index]))
    }

    pub fn number_of_active(&self) -> usize {
        self.active.len()
    }

    pub fn number_of_inactive(&self) -> usize {
        self.inactive.len()
    }

    /// The number of slots that were ever allocated, this never decreases.
    pub fn total(&self) -> usize {
        self.rules.len()
    }
}

impl Index<RuleIndex> for Rules {
    type Output = Rule;

    fn index(&self, index: RuleIndex) -> &Rule {
        &self.rules[*index]
    }
}
