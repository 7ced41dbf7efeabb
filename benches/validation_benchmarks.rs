use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use java_indent::core::SourceDocument;
use java_indent::{check_tree, parse_source, IndentationOptions};
use std::hint::black_box;

/// Generate a class whose method bodies are indented by `body_indent`
fn generate_class(methods: usize, body_indent: usize) -> String {
    let pad = " ".repeat(body_indent);
    let mut content = String::from("class Bench {\n");
    for i in 0..methods {
        content.push_str(&format!("    void method{i}() {{\n"));
        content.push_str(&format!("{pad}int a = {i};\n"));
        content.push_str(&format!("{pad}call(a,\n{pad}    a + 1);\n"));
        content.push_str(&format!("{pad}switch (a) {{\n"));
        content.push_str(&format!("{pad}    case 1:\n"));
        content.push_str(&format!("{pad}        a++;\n"));
        content.push_str(&format!("{pad}        break;\n"));
        content.push_str(&format!("{pad}    default:\n"));
        content.push_str(&format!("{pad}        a--;\n"));
        content.push_str(&format!("{pad}}}\n"));
        content.push_str("    }\n");
    }
    content.push_str("}\n");
    content
}

/// Checking cost with and without violations, excluding parsing
fn bench_violation_density(c: &mut Criterion) {
    let options = IndentationOptions::default();
    let mut group = c.benchmark_group("violation_density");

    for (name, indent) in [("clean", 8), ("misindented", 6)] {
        let content = generate_class(200, indent);
        let tree = parse_source(&content).unwrap();
        let document = SourceDocument::new(&content);
        group.bench_function(BenchmarkId::new("check_tree", name), |b| {
            b.iter(|| black_box(check_tree(&tree, &document, &options)))
        });
    }

    group.finish();
}

/// Checking cost as files grow
fn bench_check_scalability(c: &mut Criterion) {
    let options = IndentationOptions::default();
    let mut group = c.benchmark_group("check_scalability");

    for methods in [10, 100, 1_000] {
        let content = generate_class(methods, 8);
        let tree = parse_source(&content).unwrap();
        let document = SourceDocument::new(&content);
        group.throughput(Throughput::Elements(methods as u64));
        group.bench_with_input(BenchmarkId::new("methods", methods), &methods, |b, _| {
            b.iter(|| black_box(check_tree(&tree, &document, &options)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_violation_density, bench_check_scalability);
criterion_main!(benches);
