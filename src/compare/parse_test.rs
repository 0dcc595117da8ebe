use super::*;

#[test]
fn jsinspect_sums_instance_spans() {
    let output = r#"[{"instances":[{"lines":[5,10]},{"lines":[20,20]}]}]"#;
    assert_eq!(jsinspect_duplicated_lines(output).unwrap(), 7);
}

#[test]
fn jsinspect_sums_across_groups_and_ignores_extra_fields() {
    let output = r#"[
        {"id": "a1", "instances": [
            {"path": "input/1.0/a.js", "lines": [1, 4], "code": "..."},
            {"path": "input/1.1/a.js", "lines": [3, 6], "code": "..."}
        ]},
        {"id": "b2", "instances": [{"path": "x.js", "lines": [10, 19]}]}
    ]"#;
    assert_eq!(jsinspect_duplicated_lines(output).unwrap(), 4 + 4 + 10);
}

#[test]
fn jsinspect_empty_report_is_zero() {
    assert_eq!(jsinspect_duplicated_lines("[]").unwrap(), 0);
}

#[test]
fn jsinspect_invalid_json_keeps_raw_output() {
    let err = jsinspect_duplicated_lines("Error: cannot find module").unwrap_err();
    assert_eq!(err.raw_output(), Some("Error: cannot find module"));
}

#[test]
fn phpcpd_rounds_percentage_of_total() {
    assert_eq!(
        phpcpd_duplicated_lines("42.5% duplicated lines ... 100").unwrap(),
        43
    );
}

#[test]
fn phpcpd_real_summary() {
    let output = "\
phpcpd 6.0.3 by Sebastian Bergmann.

Found 3 clones with 120 duplicated lines in 4 files:

  - input/1.0/src/Foo.php:10-50 (40 lines)
    input/1.1/src/Foo.php:10-50

2.50% duplicated lines out of 4000 total lines of code.
Average size of duplication is 40 lines, largest clone has 40 of lines

Time: 00:00.101, Memory: 6.00 MB
";
    assert_eq!(phpcpd_duplicated_lines(output).unwrap(), 100);
}

#[test]
fn phpcpd_no_clones() {
    let output = "No clones found.\n\n0.00% duplicated lines out of 1234 total lines of code.\n";
    assert_eq!(phpcpd_duplicated_lines(output).unwrap(), 0);
}

#[test]
fn phpcpd_missing_summary_is_unrecognized() {
    let err = phpcpd_duplicated_lines("PHP Fatal error: Allowed memory size exhausted").unwrap_err();
    assert!(matches!(err, CompareError::UnrecognizedOutput { .. }));
    assert_eq!(
        err.raw_output(),
        Some("PHP Fatal error: Allowed memory size exhausted")
    );
}

#[test]
fn phpcpd_locale_comma_is_unrecognized() {
    let err = phpcpd_duplicated_lines("2,50% duplicated lines out of 4000 total").unwrap_err();
    assert!(matches!(err, CompareError::UnrecognizedOutput { .. }));
}
