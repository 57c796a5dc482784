use std::hint::black_box;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use esparse_core::{ParseOptions, Scanner, parse};

/// A script mixing the constructs the parser spends most time on.
const SCRIPT: &str = r#"
'use strict';
var counter = 0, [first, ...others] = list;
function fib(n) { return n < 2 ? n : fib(n - 1) + fib(n - 2); }
class Point extends Base {
  #x = 0;
  static origin = new Point(0, 0);
  constructor(x, y) { super(); this.#x = x; this.y = y; }
  get x() { return this.#x; }
  static { counter++; }
}
const add = (a, b = 1) => a + b;
const { left, right: [r1, r2] = [], ...rest } = tree;
for (const item of items) { if (item?.ok) continue; else break; }
label: for (let i = 0; i < 10; i += 1) { while (i--) continue label; }
try { JSON.parse(`{"x": ${counter}}`); } catch ({ message }) { throw new Error(message); }
async function load(url) { for await (const chunk of stream(url)) yield_(chunk); }
const re = /ab+c/giu, ratio = total / count / 2;
switch (kind) { case 'a': case 'b': counter ??= 1; break; default: counter ||= 2; }
"#;

const MODULE: &str = r#"
import def, { a as b, "c d" as e } from './dep.js';
import * as ns from './ns.js' with { type: 'json' };
export const value = await ns.load();
export default class extends def {}
export { b, e as f };
export * as all from './all.js';
"#;

// ─────────────────────────────────────────────────────────────────────────────
// Scanner throughput
// ─────────────────────────────────────────────────────────────────────────────

fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("scanner");
    group.throughput(Throughput::Bytes(SCRIPT.len() as u64));
    group.bench_function("tokenize_script", |b| {
        b.iter(|| Scanner::tokenize_all(black_box(SCRIPT)));
    });
    group.finish();
}

// ─────────────────────────────────────────────────────────────────────────────
// Full parse
// ─────────────────────────────────────────────────────────────────────────────

fn bench_parse(c: &mut Criterion) {
    let script = ParseOptions::default();
    let module = ParseOptions::module();
    let located = ParseOptions::default().with_ranges(true).with_locations(true);

    let mut group = c.benchmark_group("parser");
    group.throughput(Throughput::Bytes(SCRIPT.len() as u64));
    group.bench_function("parse_script", |b| {
        b.iter(|| parse(black_box(SCRIPT), &script));
    });
    group.bench_function("parse_script_with_locations", |b| {
        b.iter(|| parse(black_box(SCRIPT), &located));
    });
    group.bench_function("parse_module", |b| {
        b.iter(|| parse(black_box(MODULE), &module));
    });
    group.finish();
}

fn bench_parse_large_input(c: &mut Criterion) {
    // Each copy gets its own block so the lexical declarations don't clash.
    let source = format!("{{{}}}\n", SCRIPT.replace("'use strict';", "")).repeat(200);
    let options = ParseOptions::default();
    let mut group = c.benchmark_group("parser_large");
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.sample_size(20);
    group.bench_function("parse_repeated_script", |b| {
        b.iter(|| parse(black_box(&source), &options));
    });
    group.finish();
}

criterion_group!(benches, bench_tokenize, bench_parse, bench_parse_large_input);
criterion_main!(benches);
