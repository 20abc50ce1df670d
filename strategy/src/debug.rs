//! Injectable sink for the `debug` combinators.
//!
//! A [`Sink`] is a shared writer receiving one `Rule / In / Out` record per
//! effectful rule application. The default sink is standard output; tests
//! typically pass an `Rc<RefCell<Vec<u8>>>`, which coerces to [`Sink`].

use std::cell::RefCell;
use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;

/// Shared writer used by [`rule::debug_to`](crate::rule::debug_to) and
/// [`branch::debug_to`](crate::branch::debug_to).
pub type Sink = Rc<RefCell<dyn Write>>;

/// Sink over standard output (the default).
pub fn stdout_sink() -> Sink {
    Rc::new(RefCell::new(io::stdout()))
}

/// Write one record. Write failures are swallowed: tracing must never abort
/// a rewrite.
pub(crate) fn write_record(sink: &Sink, rule: &str, input: &dyn fmt::Debug, output: &dyn fmt::Debug) {
    let mut writer = sink.borrow_mut();
    let _ = writeln!(writer, "Rule: {rule}");
    let _ = writeln!(writer, "In:  {input:?}");
    let _ = writeln!(writer, "Out: {output:?}");
    let _ = writeln!(writer);
}
