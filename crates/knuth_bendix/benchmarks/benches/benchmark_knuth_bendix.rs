use std::hint::black_box;

use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;

use kbc_knuth_bendix::KnuthBendix;
use kbc_knuth_bendix::KnuthBendixOptions;
use kbc_knuth_bendix::OverlapPolicy;
use kbc_knuth_bendix::Presentation;
use kbc_knuth_bendix::RewriteFromLeft;
use kbc_knuth_bendix::RewriteTrie;
use kbc_knuth_bendix::normal_forms;
use kbc_utilities::Limit;

fn three_generator_monoid() -> Presentation {
    Presentation::from_strings(
        "abc",
        &[
            ("aaaa", "a"),
            ("bbbb", "b"),
            ("cccc", "c"),
            ("abab", "aaa"),
            ("bcbc", "bbb"),
        ],
    )
    .expect("The presentation is valid")
}

/// The Coxeter group of type B3, which has 48 elements.
fn coxeter_b3() -> Presentation {
    Presentation::from_strings(
        "abc",
        &[
            ("aa", ""),
            ("bb", ""),
            ("cc", ""),
            ("abab", "baba"),
            ("bcb", "cbc"),
            ("ac", "ca"),
        ],
    )
    .expect("The presentation is valid")
}

fn benchmark_completion(c: &mut Criterion) {
    let mut group = c.benchmark_group("completion");

    for policy in [OverlapPolicy::Abc, OverlapPolicy::AbBc, OverlapPolicy::MaxAbBc] {
        let options = KnuthBendixOptions {
            overlap_policy: policy,
            ..KnuthBendixOptions::default()
        };

        group.bench_with_input(BenchmarkId::new("trie", policy), &options, |bencher, options| {
            bencher.iter(|| {
                let mut kb: KnuthBendix<RewriteTrie> =
                    KnuthBendix::with_options(three_generator_monoid(), options.clone()).expect("Valid options");
                kb.run();
                black_box(kb.number_of_active_rules())
            })
        });

        group.bench_with_input(BenchmarkId::new("from_left", policy), &options, |bencher, options| {
            bencher.iter(|| {
                let mut kb: KnuthBendix<RewriteFromLeft> =
                    KnuthBendix::with_options(three_generator_monoid(), options.clone()).expect("Valid options");
                kb.run();
                black_box(kb.number_of_active_rules())
            })
        });
    }

    group.finish();
}

fn benchmark_normal_forms(c: &mut Criterion) {
    let mut kb: KnuthBendix = KnuthBendix::new(three_generator_monoid()).expect("Valid presentation");
    kb.run();

    c.bench_function("normal_forms_up_to_8", |bencher| {
        bencher.iter(|| {
            let range = normal_forms(&mut kb).expect("Gilman graph").max(Limit::Bounded(8));
            black_box(range.into_iter().count())
        })
    });

    let mut kb: KnuthBendix = KnuthBendix::new(coxeter_b3()).expect("Valid presentation");
    c.bench_function("number_of_classes_b3", |bencher| {
        bencher.iter(|| black_box(kb.number_of_classes().expect("Gilman graph")))
    });
}

criterion_group!(benches, benchmark_completion, benchmark_normal_forms);
criterion_main!(benches);
