use crate::engine::Evaluation;
use std::io::{Result, Write};

/// Write `evaluation` as pretty-printed JSON followed by a newline.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn generate<W: Write>(evaluation: &Evaluation, writer: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, evaluation)?;
    writeln!(writer)
}
