use std::io::{self, Write};

use crate::record::OccurrenceRecord;

/// `word (count) l1 l2 ...`
pub fn format_record(record: &OccurrenceRecord) -> String {
    let mut out = format!("{} ({})", record.word(), record.count());
    for line in record.lines() {
        out.push(' ');
        out.push_str(&line.to_string());
    }
    out
}

/// Write one formatted line per record, in iteration order.
pub fn write_report<'a, W, I>(out: &mut W, records: I) -> io::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a OccurrenceRecord>,
{
    let mut written = 0;
    for record in records {
        writeln!(out, "{}", format_record(record))?;
        written += 1;
    }
    out.flush()?;
    Ok(written)
}
