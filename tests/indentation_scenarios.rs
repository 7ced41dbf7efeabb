//! End-to-end indentation checks over small Java sources
use java_indent::{check_source, IndentationOptions, Violation};

fn check(source: &str) -> Vec<Violation> {
    check_source(source, &IndentationOptions::default()).expect("source should parse")
}

fn check_with(source: &str, options: &IndentationOptions) -> Vec<Violation> {
    check_source(source, options).expect("source should parse")
}

fn lines(violations: &[Violation]) -> Vec<usize> {
    violations.iter().map(|v| v.line).collect()
}

fn strict() -> IndentationOptions {
    IndentationOptions {
        force_strict_condition: true,
        ..IndentationOptions::default()
    }
}

#[test]
fn test_statement_too_deep_in_method_body() {
    let source = "\
class A {
    void f() {
            int x = 1;
    }
}
";
    let found = check(source);
    assert_eq!(lines(&found), vec![3]);
    assert_eq!(found[0].actual, 12);
    assert!(
        found[0].message().ends_with("expected level should be 8."),
        "{}",
        found[0].message()
    );
}

#[test]
fn test_if_braces() {
    let source = "\
class A {
    void f(boolean x) {
        if (x) {
            g();
        }
        if (x)
          {
            g();
        }
    }
}
";
    let found = check(source);
    assert!(found.iter().all(|v| v.line >= 6), "{found:?}");
    let curly: Vec<&Violation> = found.iter().filter(|v| v.subject == "if lcurly").collect();
    assert_eq!(curly.len(), 1);
    assert_eq!(curly[0].line, 7);
    assert_eq!(curly[0].actual, 10);
}

const WRAPPED_CONDITIONS: &str = "\
class A {
    void f(boolean a, boolean b) {
        if (a
            && b) {
            g();
        }
        if (a
                && b) {
            g();
        }
    }
}
";

#[test]
fn test_strict_wrapped_condition_must_match() {
    let found = check_with(WRAPPED_CONDITIONS, &strict());
    assert_eq!(lines(&found), vec![8]);
    assert_eq!(found[0].actual, 16);
    assert!(found[0].message().contains("expected level should be 12"));
}

#[test]
fn test_lenient_wrapped_condition_accepts_deeper_lines() {
    assert!(check(WRAPPED_CONDITIONS).is_empty());
}

#[test]
fn test_one_line_array_initializer_is_not_checked_per_element() {
    let source = "\
class A {
    int[] a = {1,    2,3};
    void f() {
        int[][] b = {{1, 2}, {3,   4}};
    }
}
";
    assert!(check(source).is_empty());
}

#[test]
fn test_calls_chained_on_closing_paren_line() {
    let source = "\
class A {
    void f() {
        foo(a,
            b).bar(c);
        builder.append(1)
            .append(2);
    }
}
";
    assert!(check(source).is_empty(), "{:?}", check(source));
}

#[test]
fn test_text_block_closing_delimiter_leads_its_line() {
    let source = "\
class A {
    void f() {
        String t = \"\"\"
            hello
            \"\"\".strip();
    }
}
";
    let found = check_with(source, &strict());
    assert!(found.is_empty(), "{found:?}");
}

#[test]
fn test_shallow_text_block_closing_delimiter() {
    let source = "\
class A {
    void f() {
        String t = \"\"\"
            hello
    \"\"\";
    }
}
";
    let found = check(source);
    assert_eq!(lines(&found), vec![5]);
    assert_eq!(found[0].actual, 4);
}

#[test]
fn test_tabs_expand_to_tab_width() {
    let source = "class A {\n\tint x;\n}\n";
    let found = check(source);
    assert_eq!(lines(&found), vec![2]);
    assert_eq!(found[0].actual, 8);

    let narrow = IndentationOptions {
        tab_width: 4,
        ..IndentationOptions::default()
    };
    assert!(check_with(source, &narrow).is_empty());
}

#[test]
fn test_custom_basic_offset() {
    let source = "\
class A {
  void f() {
    int x = 1;
  }
}
";
    let two = IndentationOptions {
        basic_offset: 2,
        ..IndentationOptions::default()
    };
    assert!(check_with(source, &two).is_empty());
    assert!(!check(source).is_empty());
}

#[test]
fn test_multi_level_message() {
    let source = "\
class A {
    void f() {
      outer:
        for (;;) {
            break outer;
        }
    }
}
";
    let found = check(source);
    assert_eq!(lines(&found), vec![3]);
    assert!(
        found[0].message().contains("one of the following: 4, 8"),
        "{}",
        found[0].message()
    );
}

#[test]
fn test_clean_realistic_file() {
    let source = "\
package com.example;

import java.util.ArrayList;
import java.util.List;

/** Holds names. */
public class Names {
    private final List<String> names = new ArrayList<>();

    public Names(String... initial) {
        for (String name : initial) {
            add(name);
        }
    }

    public void add(String name) {
        if (name == null) {
            throw new IllegalArgumentException(\"name\");
        } else if (name.isEmpty()) {
            return;
        }
        names.add(name);
    }

    public int count(int limit) {
        int total = 0;
        while (total < limit) {
            total++;
        }
        do {
            total--;
        } while (total > limit);
        switch (total) {
            case 0:
                return 0;
            default:
                break;
        }
        try {
            return names.size();
        } catch (RuntimeException e) {
            return -1;
        } finally {
            total = 0;
        }
    }
}
";
    let found = check(source);
    assert!(found.is_empty(), "{found:?}");
}

#[test]
fn test_at_most_one_violation_per_line() {
    let source = "\
class A {
    void f() {
  int a = 1; int b = 2; g(a, b);
    }
}
";
    let found = check(source);
    assert_eq!(lines(&found), vec![3]);
}

#[test]
fn test_parse_error_is_reported() {
    let err = check_source("class A {\n    void f( {\n}\n", &IndentationOptions::default()).unwrap_err();
    assert!(err.line >= 1);
    assert!(!err.message.is_empty());
}
