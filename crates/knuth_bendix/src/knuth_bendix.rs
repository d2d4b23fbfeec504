use std::cell::Cell;
use std::cell::OnceCell;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic;
use std::sync::atomic::AtomicBool;
use std::time::Duration;
use std::time::Instant;

use itertools::Itertools;
use log::debug;
use log::info;

use kbc_utilities::Cardinality;
use kbc_utilities::Limit;
use kbc_utilities::TimeProgress;
use kbc_wordgraph::number_of_paths_with;

use crate::GilmanGraph;
use crate::KnuthBendixError;
use crate::KnuthBendixOptions;
use crate::Letter;
use crate::OverlapPolicy;
use crate::Presentation;
use crate::RewriteTrie;
use crate::Rewriter;
use crate::RuleId;
use crate::RuleIndex;
use crate::Rules;
use crate::Word;
use crate::critical_pair;
use crate::format_word;
use crate::is_subword;
use crate::overlaps;
use crate::shortlex_compare;

/// The state of the completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompletionState {
    /// The completion has not been run since the last change of the rules.
    Idle,
    Running,
    /// The active rules form a confluent rewriting system.
    Confluent,
    /// The completion ended because of the maximum number of rules, or
    /// because overlaps longer than the maximum overlap length were skipped.
    LimitReached,
    /// The completion was interrupted by its stop handle or by a time limit.
    Stopped,
}

/// A boolean that can also be unknown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tril {
    True,
    False,
    Unknown,
}

/// A flag that can be used to stop a running completion from another thread.
#[derive(Clone, Debug, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    /// Requests the completion to stop, this is observed after the current pair of rules.
    pub fn stop(&self) {
        self.stopped.store(true, atomic::Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(atomic::Ordering::Relaxed)
    }

    fn reset(&self) {
        self.stopped.store(false, atomic::Ordering::Relaxed);
    }
}

/// The Knuth-Bendix completion procedure for the shortlex order on words.
///
/// The active rules are kept inter-reduced: no left hand side contains
/// another left hand side, and all right hand sides are irreducible.
pub struct KnuthBendix<R: Rewriter = RewriteTrie> {
    presentation: Presentation,
    options: KnuthBendixOptions,

    rules: Rules,
    rewriter: R,

    /// Unoriented pairs of words that still have to be added as rules.
    pending: Vec<(Word, Word)>,

    state: CompletionState,
    confluent: Cell<Option<bool>>,
    gilman: OnceCell<GilmanGraph>,
    stop: StopHandle,
}

impl<R: Rewriter> KnuthBendix<R> {
    /// Creates the completion for the given presentation with the default options.
    pub fn new(presentation: Presentation) -> Result<Self, KnuthBendixError> {
        Self::with_options(presentation, KnuthBendixOptions::default())
    }

    /// Creates the completion, the relations of the presentation are oriented
    /// and added as rules immediately.
    pub fn with_options(presentation: Presentation, options: KnuthBendixOptions) -> Result<Self, KnuthBendixError> {
        presentation.validate()?;
        options.validate()?;

        let mut result = KnuthBendix {
            pending: presentation.rules().to_vec(),
            presentation,
            options,
            rules: Rules::new(),
            rewriter: R::default(),
            state: CompletionState::Idle,
            confluent: Cell::new(None),
            gilman: OnceCell::new(),
            stop: StopHandle::default(),
        };

        result.flush_pending();
        Ok(result)
    }

    /// Adds the relation `u = v`, the completion has to be run again afterwards.
    pub fn add_generating_pair(&mut self, u: Word, v: Word) -> Result<&mut Self, KnuthBendixError> {
        self.presentation.add_rule(u.clone(), v.clone())?;

        self.pending.push((u, v));
        self.flush_pending();
        self.state = CompletionState::Idle;
        Ok(self)
    }

    /// Runs the completion until the rules are confluent, a limit is reached
    /// or it is stopped through its [StopHandle].
    pub fn run(&mut self) {
        self.run_until(None);
    }

    /// Runs the completion for at most the given duration.
    pub fn run_for(&mut self, duration: Duration) {
        self.run_until(Some(Instant::now() + duration));
    }

    fn run_until(&mut self, deadline: Option<Instant>) {
        if self.state == CompletionState::Confluent {
            return;
        }

        if self.confluent.get() == Some(true) {
            self.state = CompletionState::Confluent;
            return;
        }

        self.stop.reset();
        self.state = CompletionState::Running;
        info!(
            "Starting completion with {} active rules and overlap policy {}",
            self.rules.number_of_active(),
            self.options.overlap_policy
        );

        let mut progress = TimeProgress::new(
            |(active, inactive, pending): (usize, usize, usize)| {
                info!("Active rules: {active}, inactive rules: {inactive}, pending rules: {pending}");
            },
            1,
        );

        // The last rule for which all overlaps with older rules were considered.
        let mut cursor: Option<RuleId> = None;
        let mut skipped = false;
        let mut since_check = 0;

        let state = 'completion: loop {
            let Some((id, index)) = self.rules.next_active(cursor) else {
                if self.pending.is_empty() {
                    break if skipped {
                        CompletionState::LimitReached
                    } else {
                        CompletionState::Confluent
                    };
                }

                self.flush_pending();
                continue;
            };
            cursor = Some(id);

            for (other_id, other) in self.rules.active_up_to(id) {
                if !self.rules.is_current(index, id) {
                    break;
                }

                if !self.rules.is_current(other, other_id) {
                    continue;
                }

                skipped |= self.resolve_overlaps(index, other);
                if index != other {
                    skipped |= self.resolve_overlaps(other, index);
                }
                since_check += 1;

                if self.pending.len() >= self.options.max_pending_rules {
                    self.flush_pending();
                }

                if self.stop.is_stopped() || deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                    self.flush_pending();
                    break 'completion CompletionState::Stopped;
                }

                if self.options.max_rules.is_reached_by(self.rules.number_of_active()) {
                    self.flush_pending();
                    break 'completion CompletionState::LimitReached;
                }

                if self.options.check_confluence_interval.is_reached_by(since_check) {
                    since_check = 0;
                    self.flush_pending();

                    if self.confluent() {
                        break 'completion CompletionState::Confluent;
                    }
                }

                progress.print((
                    self.rules.number_of_active(),
                    self.rules.number_of_inactive(),
                    self.pending.len(),
                ));
            }
        };

        if state == CompletionState::Confluent {
            self.confluent.set(Some(true));
        }

        self.state = state;
        info!(
            "Completion ended {:?} with {} active rules, {} inactive rules and {} rules in total",
            state,
            self.rules.number_of_active(),
            self.rules.number_of_inactive(),
            self.rules.total()
        );
    }

    /// Adds the critical pairs of the overlaps of the second rule with the
    /// first rule that do not rewrite to the same word to the pending pairs.
    /// Returns true iff an overlap was skipped because of its length.
    fn resolve_overlaps(&mut self, first: RuleIndex, second: RuleIndex) -> bool {
        let mut skipped = false;
        let (first, second) = (&self.rules[first], &self.rules[second]);

        for overlap in overlaps(first.lhs(), second.lhs()) {
            let length = self.options.overlap_policy.measure(first.lhs(), second.lhs(), overlap);
            if self.options.max_overlap.is_exceeded_by(length) {
                skipped = true;
                continue;
            }

            let (mut left, mut right) = critical_pair(first, second, overlap);
            self.rewriter.rewrite(&self.rules, &mut left);
            self.rewriter.rewrite(&self.rules, &mut right);

            if left != right {
                self.pending.push((left, right));
            }
        }

        skipped
    }

    /// Adds the pending pairs as rules, shortest first.
    fn flush_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }

        debug!("Adding {} pending rules", self.pending.len());
        while let Some(position) = self
            .pending
            .iter()
            .position_min_by(|(u1, v1), (u2, v2)| shortlex_compare(larger(u1, v1), larger(u2, v2)))
        {
            let (mut lhs, mut rhs) = self.pending.swap_remove(position);
            self.rewriter.rewrite(&self.rules, &mut lhs);
            self.rewriter.rewrite(&self.rules, &mut rhs);

            match shortlex_compare(&lhs, &rhs) {
                Ordering::Equal => continue,
                Ordering::Less => std::mem::swap(&mut lhs, &mut rhs),
                Ordering::Greater => {}
            }

            self.add_rule(lhs, rhs);
        }
    }

    /// Activates the oriented rule, whose sides are both irreducible.
    fn add_rule(&mut self, lhs: Word, rhs: Word) {
        self.confluent.set(None);
        self.gilman.take();

        let mut retired = Vec::new();
        let mut reducible = Vec::new();
        for (index, rule) in self.rules.iter_active() {
            if is_subword(&lhs, rule.lhs()) {
                retired.push(index);
            } else if is_subword(&lhs, rule.rhs()) {
                reducible.push(index);
            }
        }

        // Rules whose left hand side became reducible are added again later.
        for index in retired {
            self.rewriter.remove_rule(self.rules[index].lhs(), index);
            let pair = self.rules.deactivate(index);
            self.pending.push(pair);
        }

        let index = self.rules.activate(lhs, rhs);
        self.rewriter.add_rule(self.rules[index].lhs(), index);

        for index in reducible {
            let mut rhs = self.rules[index].rhs().to_vec();
            self.rewriter.rewrite(&self.rules, &mut rhs);
            self.rules.set_rhs(index, rhs);
        }
    }

    /// Returns true iff the active rules are confluent, checking every overlap if this is not yet known.
    pub fn confluent(&self) -> bool {
        if let Some(confluent) = self.confluent.get() {
            return confluent;
        }

        if !self.pending.is_empty() {
            return false;
        }

        let confluent = self.check_all_overlaps();
        debug!("Confluence check: {confluent}");
        self.confluent.set(Some(confluent));
        confluent
    }

    /// Returns true iff it is known whether the active rules are confluent.
    pub fn confluent_known(&self) -> bool {
        self.confluent.get().is_some()
    }

    fn check_all_overlaps(&self) -> bool {
        for (_, first) in self.rules.iter_active() {
            for (_, second) in self.rules.iter_active() {
                for overlap in overlaps(first.lhs(), second.lhs()) {
                    let (mut left, mut right) = critical_pair(first, second, overlap);
                    self.rewrite(&mut left);
                    self.rewrite(&mut right);

                    if left != right {
                        debug!(
                            "Critical pair of {first} and {second} rewrites to {} and {}",
                            format_word(&left),
                            format_word(&right)
                        );
                        return false;
                    }
                }
            }
        }

        true
    }

    /// Rewrites the word with the active rules, without running the completion.
    pub fn rewrite(&self, word: &mut Word) {
        self.rewriter.rewrite(&self.rules, word);
    }

    /// Returns the word rewritten with the active rules, without running the completion.
    pub fn reduce_no_run(&self, word: &[Letter]) -> Result<Word, KnuthBendixError> {
        self.presentation.validate_word(word)?;

        let mut result = word.to_vec();
        self.rewrite(&mut result);
        Ok(result)
    }

    /// Runs the completion and returns the normal form of the word.
    pub fn reduce(&mut self, word: &[Letter]) -> Result<Word, KnuthBendixError> {
        self.presentation.validate_word(word)?;
        self.run();
        self.reduce_no_run(word)
    }

    /// Decides whether `u = v` with the current rules, which is only
    /// conclusive for distinct normal forms when the rules are confluent.
    pub fn currently_contains(&self, u: &[Letter], v: &[Letter]) -> Result<Tril, KnuthBendixError> {
        if self.reduce_no_run(u)? == self.reduce_no_run(v)? {
            Ok(Tril::True)
        } else if self.confluent.get() == Some(true) {
            Ok(Tril::False)
        } else {
            Ok(Tril::Unknown)
        }
    }

    /// Runs the completion and decides whether `u = v`.
    pub fn contains(&mut self, u: &[Letter], v: &[Letter]) -> Result<bool, KnuthBendixError> {
        self.presentation.validate_word(u)?;
        self.presentation.validate_word(v)?;
        self.run();

        Ok(self.reduce_no_run(u)? == self.reduce_no_run(v)?)
    }

    /// Runs the completion and counts the normal forms.
    pub fn number_of_classes(&mut self) -> Result<Cardinality, KnuthBendixError> {
        self.run();

        let gilman = self.gilman_graph()?;
        let min = if self.presentation.contains_empty_word() { 0 } else { 1 };
        Ok(number_of_paths_with(
            gilman.graph(),
            gilman.longest(),
            gilman.root(),
            min,
            Limit::Unbounded,
        ))
    }

    /// Returns the Gilman graph of the active rules, computed once for every set of rules.
    pub fn gilman_graph(&self) -> Result<&GilmanGraph, KnuthBendixError> {
        if let Some(gilman) = self.gilman.get() {
            return Ok(gilman);
        }

        let gilman = GilmanGraph::new(
            self.presentation.alphabet_size(),
            self.rules.iter_active().map(|(_, rule)| rule.lhs()),
        )?;
        Ok(self.gilman.get_or_init(|| gilman))
    }

    /// Returns the labels of the nodes of the Gilman graph.
    pub fn gilman_graph_node_labels(&self) -> Result<&[Word], KnuthBendixError> {
        Ok(self.gilman_graph()?.labels())
    }

    /// Returns the active rules ordered by their left hand side.
    pub fn active_rules(&self) -> Vec<(Word, Word)> {
        self.rules
            .iter_active()
            .map(|(_, rule)| (rule.lhs().to_vec(), rule.rhs().to_vec()))
            .sorted_by(|(u, _), (v, _)| shortlex_compare(u, v))
            .collect()
    }

    /// Returns the rules in their slots.
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn number_of_active_rules(&self) -> usize {
        self.rules.number_of_active()
    }

    pub fn number_of_inactive_rules(&self) -> usize {
        self.rules.number_of_inactive()
    }

    /// The number of rules that were ever stored, this never decreases.
    pub fn total_rules(&self) -> usize {
        self.rules.total()
    }

    pub fn number_of_pending_rules(&self) -> usize {
        self.pending.len()
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    pub fn options(&self) -> &KnuthBendixOptions {
        &self.options
    }

    pub fn state(&self) -> CompletionState {
        self.state
    }

    /// Returns true iff the completion ended with a confluent system.
    pub fn finished(&self) -> bool {
        self.state == CompletionState::Confluent
    }

    /// Returns true iff the last run ended before the system was confluent.
    pub fn stopped(&self) -> bool {
        matches!(self.state, CompletionState::Stopped | CompletionState::LimitReached)
    }

    /// Returns a handle that stops a running completion.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Replaces all options at once.
    pub fn set_options(&mut self, options: KnuthBendixOptions) -> Result<&mut Self, KnuthBendixError> {
        options.validate()?;
        self.options = options;
        Ok(self)
    }

    pub fn set_max_pending_rules(&mut self, value: usize) -> Result<&mut Self, KnuthBendixError> {
        self.set_options(KnuthBendixOptions {
            max_pending_rules: value,
            ..self.options.clone()
        })
    }

    pub fn set_check_confluence_interval(&mut self, value: Limit) -> Result<&mut Self, KnuthBendixError> {
        self.set_options(KnuthBendixOptions {
            check_confluence_interval: value,
            ..self.options.clone()
        })
    }

    pub fn set_max_overlap(&mut self, value: Limit) -> Result<&mut Self, KnuthBendixError> {
        self.set_options(KnuthBendixOptions {
            max_overlap: value,
            ..self.options.clone()
        })
    }

    pub fn set_max_rules(&mut self, value: Limit) -> Result<&mut Self, KnuthBendixError> {
        self.set_options(KnuthBendixOptions {
            max_rules: value,
            ..self.options.clone()
        })
    }

    pub fn set_overlap_policy(&mut self, value: OverlapPolicy) -> Result<&mut Self, KnuthBendixError> {
        self.set_options(KnuthBendixOptions {
            overlap_policy: value,
            ..self.options.clone()
        })
    }
}

impl<R: Rewriter> fmt::Display for KnuthBendix<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "State: {:?}", self.state)?;
        writeln!(f, "Number of active rules: {}", self.number_of_active_rules())?;
        writeln!(f, "Number of inactive rules: {}", self.number_of_inactive_rules())?;
        write!(f, "Total number of rules: {}", self.total_rules())
    }
}

/// Returns the larger of both words in the shortlex order.
fn larger<'a>(u: &'a [Letter], v: &'a [Letter]) -> &'a [Letter] {
    if shortlex_compare(u, v) == Ordering::Less { v } else { u }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::RewriteFromLeft;

    #[test]
    fn test_commutative_monoid() {
        let presentation = Presentation::from_strings("ab", &[("ab", "ba"), ("bb", "b")]).unwrap();
        let mut kb: KnuthBendix = KnuthBendix::new(presentation).unwrap();
        assert_eq!(kb.state(), CompletionState::Idle);

        kb.run();
        assert!(kb.finished());
        assert!(kb.confluent());
        assert_eq!(kb.active_rules(), vec![(vec![1, 0], vec![0, 1]), (vec![1, 1], vec![1])]);
        assert_eq!(kb.reduce(&[1, 0, 1, 0]).unwrap(), vec![0, 0, 1]);
        assert_eq!(kb.number_of_classes().unwrap(), Cardinality::Infinite);
    }

    #[test]
    fn test_group_of_order_two() {
        let presentation = Presentation::from_strings("a", &[("aa", "")]).unwrap();
        let mut kb: KnuthBendix<RewriteFromLeft> = KnuthBendix::new(presentation).unwrap();

        assert_eq!(kb.number_of_classes().unwrap(), Cardinality::Finite(2));
        assert_eq!(kb.currently_contains(&[0, 0, 0], &[0]).unwrap(), Tril::True);
        assert_eq!(kb.currently_contains(&[0], &[]).unwrap(), Tril::False);
    }

    #[test]
    fn test_dihedral_group() {
        // The dihedral group of order six.
        let presentation = Presentation::from_strings("ab", &[("aa", ""), ("bb", ""), ("ababab", "")]).unwrap();
        let mut kb: KnuthBendix = KnuthBendix::new(presentation).unwrap();

        assert!(!kb.confluent_known());
        assert_eq!(kb.number_of_pending_rules(), 0);
        assert!(kb.reduce_no_run(&[2]).is_err());

        kb.run();
        assert!(kb.confluent_known());
        assert!(kb.confluent());
        assert_eq!(kb.number_of_classes().unwrap(), Cardinality::Finite(6));
        assert!(kb.contains(&[1, 0, 1], &[0, 1, 0]).unwrap());
        assert!(!kb.contains(&[0], &[1]).unwrap());
        assert_eq!(kb.currently_contains(&[0, 1], &[1, 0]).unwrap(), Tril::False);
    }

    #[test]
    fn test_add_generating_pair_resets_state() {
        let presentation = Presentation::from_strings("ab", &[("ab", "ba")]).unwrap();
        let mut kb: KnuthBendix = KnuthBendix::new(presentation).unwrap();
        kb.run();
        assert!(kb.finished());
        assert_eq!(kb.number_of_classes().unwrap(), Cardinality::Infinite);

        kb.add_generating_pair(vec![0, 0], vec![]).unwrap();
        kb.add_generating_pair(vec![1, 1], vec![]).unwrap();
        assert_eq!(kb.state(), CompletionState::Idle);
        assert_eq!(kb.number_of_classes().unwrap(), Cardinality::Finite(4));
        assert!(kb.add_generating_pair(vec![3], vec![]).is_err());
    }

    #[test]
    fn test_invalid_options() {
        let presentation = Presentation::new(1);
        let mut kb: KnuthBendix = KnuthBendix::new(presentation).unwrap();

        assert!(kb.set_max_pending_rules(0).is_err());
        assert!(kb.set_check_confluence_interval(Limit::Bounded(0)).is_err());
        assert!(kb.set_check_confluence_interval(Limit::Unbounded).is_ok());
        assert_eq!(kb.options().max_pending_rules, 128);
    }

    #[test]
    fn test_stop_handle() {
        let presentation = Presentation::from_strings("ab", &[("ab", "ba")]).unwrap();
        let mut kb: KnuthBendix = KnuthBendix::new(presentation).unwrap();

        // Stopping before a run has no effect, the flag is reset when the run starts.
        kb.stop_handle().stop();
        kb.run_for(Duration::from_secs(10));
        assert!(kb.finished());
    }

    #[test]
    fn test_stop_from_other_thread() {
        // The completion of aba = bab does not terminate.
        let presentation = Presentation::from_strings("ab", &[("aba", "bab")]).unwrap();
        let mut kb: KnuthBendix = KnuthBendix::new(presentation).unwrap();

        let handle = kb.stop_handle();
        let stopper = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(200));
            handle.stop();
        });

        kb.run();
        stopper.join().unwrap();

        assert_eq!(kb.state(), CompletionState::Stopped);
        assert!(kb.stopped());
        assert!(!kb.finished());
        assert_eq!(kb.number_of_pending_rules(), 0);
        assert!(kb.number_of_active_rules() > 1);
    }

    #[test]
    fn test_run_for_deadline() {
        let presentation = Presentation::from_strings("ab", &[("aba", "bab")]).unwrap();
        let mut kb: KnuthBendix = KnuthBendix::new(presentation).unwrap();

        kb.run_for(Duration::from_millis(100));
        assert_eq!(kb.state(), CompletionState::Stopped);

        // Running again continues from the current rules.
        let total = kb.total_rules();
        kb.run_for(Duration::from_millis(100));
        assert_eq!(kb.state(), CompletionState::Stopped);
        assert!(kb.total_rules() >= total);
    }
}
