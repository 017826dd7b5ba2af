use std::io::Read;

use crate::state::State;

/// Reader that hands out one byte per `read` call, to exercise incremental
/// buffer fills the way a pipe would.
struct Dribble<'a>(&'a [u8]);

impl Read for Dribble<'_> {
    fn read(&mut self, out: &mut [u8]) -> std::io::Result<usize> {
        match self.0.split_first() {
            Some((&b, rest)) => {
                out[0] = b;
                self.0 = rest;
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[test]
fn at_reads_lazily_and_is_deterministic() {
    let mut src = Dribble(b"hello");
    let mut ps = State::new(&mut src);
    assert_eq!(ps.max_read(), 0);
    assert_eq!(ps.at(4), b'o');
    assert_eq!(ps.max_read(), 5);
    assert_eq!(ps.at(0), b'h');
    assert_eq!(ps.at(4), b'o');
}

#[test]
fn eof_is_nul_and_does_not_extend_buffer() {
    let mut src: &[u8] = b"ab";
    let mut ps = State::new(&mut src);
    assert_eq!(ps.at(2), 0);
    assert_eq!(ps.at(100), 0);
    assert_eq!(ps.max_read(), 2);
}

#[test]
fn range_clamps_to_available_input() {
    let mut src: &[u8] = b"abc";
    let mut ps = State::new(&mut src);
    let got: Vec<u8> = ps.range(1, 10).unwrap().collect();
    assert_eq!(got, b"bc");
    let empty: Vec<u8> = ps.range(3, 5).unwrap().collect();
    assert!(empty.is_empty());
}

#[test]
fn string_materializes_range() {
    let mut src: &[u8] = b"grammar = 'a'";
    let mut ps = State::new(&mut src);
    assert_eq!(ps.string(0, 7), "grammar");
    assert_eq!(ps.string(10, 3), "'a'");
}

#[test]
fn forget_to_reports_forgotten_access() {
    let mut src: &[u8] = b"one\ntwo\nthree\n";
    let mut ps = State::new(&mut src);
    assert_eq!(ps.at(13), b'\n');
    ps.forget_to(8);
    let err = ps.try_at(3).unwrap_err();
    assert_eq!(err.requested, 3);
    assert_eq!(err.available, 8);
    assert_eq!(err.newlines_discarded, 2);
}

#[test]
fn forget_to_is_idempotent_below_floor() {
    let mut src: &[u8] = b"a\nb\nc";
    let mut ps = State::new(&mut src);
    assert_eq!(ps.at(4), b'c');
    ps.forget_to(2);
    ps.forget_to(2);
    ps.forget_to(1);
    assert_eq!(ps.newlines_discarded(), 1);
    assert_eq!(ps.try_at(2).unwrap(), b'b');
}

#[test]
fn reads_survive_forgetting_earlier_input() {
    let mut src = Dribble(b"abcdef");
    let mut ps = State::new(&mut src);
    let before = ps.at(4);
    ps.forget_to(3);
    assert_eq!(ps.at(4), before);
    assert_eq!(ps.at(5), b'f');
}

#[test]
fn newline_accounting_sums_across_forgets() {
    let src_bytes = b"a\nbb\n\nccc\nd";
    let mut src: &[u8] = src_bytes;
    let mut ps = State::new(&mut src);
    ps.pos = 11;
    assert_eq!(ps.at(10), b'd');

    ps.forget_to(3);
    ps.forget_to(7);
    let retained: Vec<u8> = ps.range(7, ps.pos - 7).unwrap().collect();
    let in_buf = retained.iter().filter(|&&c| c == b'\n').count();
    let total = src_bytes[..ps.pos].iter().filter(|&&c| c == b'\n').count();
    assert_eq!(ps.newlines_discarded() + in_buf, total);
}

#[test]
fn forget_never_discards_past_read_input() {
    let mut src: &[u8] = b"abc";
    let mut ps = State::new(&mut src);
    assert_eq!(ps.at(1), b'b');
    assert_eq!(ps.max_read(), 2);
    ps.forget_to(1000);
    assert_eq!(ps.max_read(), 2);
    assert_eq!(ps.at(2), b'c');
    assert_eq!(ps.at(3), 0);
    assert_eq!(ps.max_read(), 3);
}

#[test]
fn max_read_tracks_exactly_what_was_examined() {
    let mut src: &[u8] = b"abcdefgh";
    let mut ps = State::new(&mut src);
    assert_eq!(ps.at(2), b'c');
    assert_eq!(ps.max_read(), 3);
    assert_eq!(ps.at(0), b'a');
    assert_eq!(ps.max_read(), 3);
}
