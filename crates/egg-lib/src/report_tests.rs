use egg_runtime::State;
use indoc::indoc;

use crate::parser;
use crate::report::failure_report;

fn report_for(src: &str) -> String {
    let mut bytes = src.as_bytes();
    let mut ps = State::new(&mut bytes);
    assert!(parser::parse(&mut ps).is_none(), "grammar should not parse");
    failure_report(&mut ps)
}

#[test]
fn failure_on_first_line() {
    insta::assert_snapshot!(report_for("S = 'a"), @r"
    Parse failure 6 bytes into the input:
    line 1: S = 'a
                  ^
    ");
}

#[test]
fn failure_reports_the_offending_line_number() {
    let src = indoc! {"
        a = 'a'
        b = 'b'
        c = 'c'
        d = 'd'
        e = 'e'
        f = 'f'
        g = )
    "};
    let report = report_for(src);
    assert!(report.contains("line 7:"), "report was:\n{}", report);
    assert!(report.contains("g = )"));
}

#[test]
fn empty_input_reports_line_one() {
    let report = report_for("");
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines[0], "Parse failure 0 bytes into the input:");
    assert_eq!(lines[1].trim_end(), "line 1:");
    assert_eq!(lines[2], "        ^");
}

#[test]
fn line_number_survives_a_discarded_prefix() {
    // The backward scan hits the retention floor mid-line; the discarded
    // newline count carried by the buffer keeps the line number right.
    let mut src: &[u8] = b"aa\nbb\ncc dd";
    let mut ps = State::new(&mut src);
    assert_eq!(ps.at(10), b'd');
    ps.forget_to(7);

    insta::assert_snapshot!(failure_report(&mut ps), @r"
    Parse failure 11 bytes into the input:
    line 3: c dd
                ^
    ");
}
