use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use java_indent::parse_source;
use std::hint::black_box;

/// Generate a Java class with `methods` methods of a given shape
fn generate_java_source(methods: usize, pattern: &str) -> String {
    let mut content = String::from("package bench;\n\nimport java.util.List;\n\npublic class Bench {\n");

    for i in 0..methods {
        match pattern {
            "statement_heavy" => {
                content.push_str(&format!("    int method{i}(int x) {{\n"));
                content.push_str("        int total = 0;\n");
                content.push_str("        for (int j = 0; j < x; j++) {\n");
                content.push_str("            if (j % 2 == 0) {\n");
                content.push_str("                total += j;\n");
                content.push_str("            } else {\n");
                content.push_str("                total -= 1;\n");
                content.push_str("            }\n");
                content.push_str("        }\n");
                content.push_str("        return total;\n");
                content.push_str("    }\n\n");
            }
            "expression_heavy" => {
                content.push_str(&format!("    String method{i}(List<String> items) {{\n"));
                content.push_str("        return items.stream()\n");
                content.push_str("            .filter(s -> s.length() > 2)\n");
                content.push_str("            .map(s -> new StringBuilder(s).reverse().toString())\n");
                content.push_str("            .findFirst()\n");
                content.push_str("            .orElse(\"none\");\n");
                content.push_str("    }\n\n");
            }
            _ => {
                content.push_str(&format!("    private int field{i} = {i};\n"));
            }
        }
    }

    content.push_str("}\n");
    content
}

/// Benchmark parsing files of different sizes
fn bench_file_parsing(c: &mut Criterion) {
    let method_counts = [10, 100, 1_000];
    let patterns = ["statement_heavy", "expression_heavy", "fields"];

    let mut group = c.benchmark_group("file_parsing");

    for pattern in patterns {
        for count in method_counts {
            let content = generate_java_source(count, pattern);
            group.throughput(Throughput::Bytes(content.len() as u64));
            group.bench_with_input(
                BenchmarkId::new(pattern, count),
                &content,
                |b, content| b.iter(|| black_box(parse_source(black_box(content)))),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_file_parsing);
criterion_main!(benches);
