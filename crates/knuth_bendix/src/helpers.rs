use std::time::Duration;

use ahash::AHashMap;
use bitvec::bitvec;
use bitvec::order::Lsb0;
use log::debug;
use log::info;
use num::BigInt;
use num::BigRational;
use num::Zero;
use rustc_hash::FxHashMap;

use kbc_utilities::Limit;
use kbc_wordgraph::NodeIndex;
use kbc_wordgraph::Paths;
use kbc_wordgraph::WordGraph;
use kbc_wordgraph::induced_subgraph;
use kbc_wordgraph::longest_paths;

use crate::CompletionState;
use crate::KnuthBendix;
use crate::KnuthBendixError;
use crate::Presentation;
use crate::RewriteTrie;
use crate::Rewriter;
use crate::Word;
use crate::is_subword;

/// Runs the completion considering only overlaps of length one, then two,
/// and so on, until the rules are confluent or the completion stops for
/// another reason. The options are restored afterwards.
pub fn by_overlap_length<R: Rewriter>(kb: &mut KnuthBendix<R>) -> Result<(), KnuthBendixError> {
    let previous = kb.options().clone();
    kb.set_check_confluence_interval(Limit::Unbounded)?;

    let mut length = 1;
    loop {
        debug!("Running completion with maximum overlap length {length}");
        kb.set_max_overlap(Limit::Bounded(length))?;
        kb.run();

        if kb.state() != CompletionState::LimitReached
            || previous.max_rules.is_reached_by(kb.number_of_active_rules())
            || previous.max_overlap.is_reached_by(length)
        {
            break;
        }

        length += 1;
    }

    kb.set_options(previous)?;
    Ok(())
}

/// Returns true iff no left hand side of an active rule occurs in the left
/// or right hand side of another active rule.
pub fn is_reduced<R: Rewriter>(kb: &KnuthBendix<R>) -> bool {
    let rules = kb.rules();
    for (index, rule) in rules.iter_active() {
        for (other_index, other) in rules.iter_active() {
            if index != other_index && (is_subword(other.lhs(), rule.lhs()) || is_subword(other.lhs(), rule.rhs())) {
                return false;
            }
        }
    }

    true
}

/// Returns true if the presented structure is certainly infinite, a false
/// result is inconclusive.
///
/// When the rules are known to be confluent this decides whether the Gilman
/// graph has a cycle. Otherwise the presentation is checked for a letter that
/// occurs in no relation, and for a relation matrix whose rank is smaller
/// than the number of letters. The rows of this matrix count, for every
/// letter, the occurrences in the left hand side minus those in the right
/// hand side of a relation.
pub fn is_obviously_infinite<R: Rewriter>(kb: &KnuthBendix<R>) -> Result<bool, KnuthBendixError> {
    if kb.confluent_known() && kb.confluent() {
        return Ok(!kb.gilman_graph()?.is_finite());
    }

    let presentation = kb.presentation();
    let alphabet_size = presentation.alphabet_size();
    if alphabet_size == 0 {
        return Ok(false);
    }

    let mut occurs = vec![false; alphabet_size];
    for (lhs, rhs) in presentation.rules() {
        for letter in lhs.iter().chain(rhs.iter()) {
            occurs[*letter] = true;
        }
    }

    if occurs.contains(&false) {
        return Ok(true);
    }

    let rows: Vec<Vec<BigRational>> = presentation
        .rules()
        .iter()
        .map(|(lhs, rhs)| {
            let mut row = vec![0i64; alphabet_size];
            for letter in lhs {
                row[*letter] += 1;
            }
            for letter in rhs {
                row[*letter] -= 1;
            }
            row.into_iter()
                .map(|count| BigRational::from_integer(BigInt::from(count)))
                .collect()
        })
        .collect();

    Ok(rank(rows, alphabet_size) < alphabet_size)
}

/// Computes the rank of the matrix with the given rows by Gaussian
/// elimination. The entries grow quickly, so they are arbitrary precision.
fn rank(mut rows: Vec<Vec<BigRational>>, columns: usize) -> usize {
    let mut rank = 0;
    for column in 0..columns {
        let Some(pivot) = (rank..rows.len()).find(|row| !rows[*row][column].is_zero()) else {
            continue;
        };
        rows.swap(rank, pivot);

        for row in 0..rows.len() {
            if row != rank && !rows[row][column].is_zero() {
                let factor = &rows[row][column] / &rows[rank][column];
                for entry in column..columns {
                    let value = &rows[rank][entry] * &factor;
                    rows[row][entry] -= value;
                }
            }
        }

        rank += 1;
    }

    rank
}

/// Runs the completion and groups the words by their normal form. The
/// classes are ordered by their first word.
pub fn partition<R: Rewriter>(
    kb: &mut KnuthBendix<R>,
    words: impl IntoIterator<Item = Word>,
) -> Result<Vec<Vec<Word>>, KnuthBendixError> {
    kb.run();

    let mut classes: Vec<Vec<Word>> = Vec::new();
    let mut class_of: FxHashMap<Word, usize> = FxHashMap::default();
    for word in words {
        let normal_form = kb.reduce_no_run(&word)?;
        let class = *class_of.entry(normal_form).or_insert_with(|| {
            classes.push(Vec::new());
            classes.len() - 1
        });
        classes[class].push(word);
    }

    Ok(classes)
}

/// Returns the classes with at least two elements that the normal forms of
/// `kb1` form in `kb2`, where `kb2` is obtained from `kb1` by adding relations.
///
/// Every class consists of the normal forms of `kb1` that are reducible by
/// `kb2`, in shortlex order, followed by their common normal form in `kb2`.
/// Both completions are run first. This works whenever there are finitely
/// many such words, even if `kb1` or `kb2` has infinitely many classes.
pub fn non_trivial_classes<R1: Rewriter, R2: Rewriter>(
    kb1: &mut KnuthBendix<R1>,
    kb2: &mut KnuthBendix<R2>,
) -> Result<Vec<Vec<Word>>, KnuthBendixError> {
    let alphabet_size = kb1.presentation().alphabet_size();
    if alphabet_size != kb2.presentation().alphabet_size() {
        return Err(KnuthBendixError::AlphabetMismatch(
            alphabet_size,
            kb2.presentation().alphabet_size(),
        ));
    }

    kb1.run();
    kb2.run();
    let kb1: &KnuthBendix<R1> = kb1;
    let kb2: &KnuthBendix<R2> = kb2;

    let gilman1 = kb1.gilman_graph()?;
    let gilman2 = kb2.gilman_graph()?;
    if gilman1.num_of_nodes() < gilman2.num_of_nodes() {
        return Err(KnuthBendixError::GilmanGraphTooSmall(
            gilman1.num_of_nodes(),
            gilman2.num_of_nodes(),
        ));
    }

    // The product of both Gilman graphs, where None stands for the words that
    // are reducible by kb2 and is kept for all their extensions.
    let mut states: Vec<(NodeIndex, Option<NodeIndex>)> = vec![(gilman1.root(), Some(gilman2.root()))];
    let mut state_index: AHashMap<(NodeIndex, Option<NodeIndex>), usize> = AHashMap::new();
    state_index.insert(states[0], 0);

    let mut edges = Vec::new();
    let mut current = 0;
    while current < states.len() {
        let (node1, node2) = states[current];
        for (label, target1) in gilman1.graph().outgoing_edges(node1) {
            let state = (target1, node2.and_then(|node2| gilman2.graph().target(node2, label)));
            let target = *state_index.entry(state).or_insert_with(|| {
                states.push(state);
                states.len() - 1
            });
            edges.push((current, label, target));
        }
        current += 1;
    }

    let mut product = WordGraph::new(states.len(), alphabet_size);
    for (from, label, to) in &edges {
        product.set_target(NodeIndex::new(*from), *label, NodeIndex::new(*to))?;
    }

    // Only keep the states from which a reducible word can be reached.
    let mut useful = bitvec![usize, Lsb0; 0; states.len()];
    for (state, (_, node2)) in states.iter().enumerate() {
        useful.set(state, node2.is_none());
    }

    let mut changed = true;
    while changed {
        changed = false;
        for (from, _, to) in &edges {
            if useful[*to] && !useful[*from] {
                useful.set(*from, true);
                changed = true;
            }
        }
    }

    if !useful[0] {
        return Ok(Vec::new());
    }

    let (product, mapping) = induced_subgraph(&product, &useful)?;
    let mut reducible = vec![false; product.num_of_nodes()];
    for (state, node) in mapping.iter().enumerate() {
        if let Some(node) = node {
            reducible[**node] = states[state].1.is_none();
        }
    }

    let root = NodeIndex::new(0);
    let longest = longest_paths(&product);
    if longest[*root].is_none() {
        return Err(KnuthBendixError::InfiniteClasses);
    }

    let mut classes: Vec<(Word, Vec<Word>)> = Vec::new();
    let mut class_of: FxHashMap<Word, usize> = FxHashMap::default();
    for word in Paths::with_longest(&product, longest.into(), root) {
        if !product
            .follow_path(root, &word)
            .is_some_and(|node| reducible[*node])
        {
            continue;
        }

        let normal_form = kb2.reduce_no_run(&word)?;
        let class = *class_of.entry(normal_form.clone()).or_insert_with(|| {
            classes.push((normal_form, Vec::new()));
            classes.len() - 1
        });
        classes[class].1.push(word);
    }

    info!("Found {} non-trivial classes", classes.len());
    Ok(classes
        .into_iter()
        .map(|(normal_form, mut words)| {
            words.push(normal_form);
            words
        })
        .collect())
}

/// Searches for a relation of the presentation that follows from the other
/// relations, starting with the last relation.
///
/// For every relation the completion of the remaining relations is run for
/// at most the given duration, after which the relation is redundant if both
/// sides rewrite to the same word. Since the progress of a completion within
/// a duration varies, the result may differ between calls.
pub fn redundant_rule(
    presentation: &Presentation,
    duration: Duration,
) -> Result<Option<(Word, Word)>, KnuthBendixError> {
    for index in (0..presentation.rules().len()).rev() {
        let mut remaining = presentation.clone();
        let (lhs, rhs) = remaining.remove_rule(index);

        let mut kb: KnuthBendix<RewriteTrie> = KnuthBendix::new(remaining)?;
        kb.run_for(duration);

        if kb.reduce_no_run(&lhs)? == kb.reduce_no_run(&rhs)? {
            debug!("Relation {index} follows from the others");
            return Ok(Some((lhs, rhs)));
        }
    }

    Ok(None)
}
