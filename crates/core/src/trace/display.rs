use alloc::string::String;
use core::fmt::{Display, Write};

use crate::trace::types::ExecutionRecord;

/// Format records as the compact text trace format, one record per line.
///
/// The output always ends with a trailing newline (unless there are no
/// records) so that it round-trips through `parse_trace` unchanged.
#[must_use]
pub fn format_trace<Resource, Time>(records: &[ExecutionRecord<Resource, Time>]) -> String
where
    Resource: Display,
    Time: Display,
{
    let mut output = String::new();
    for record in records {
        let _ = writeln!(output, "{record}");
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_trace() {
        let records = vec![
            ExecutionRecord::write(1, 0, 10, vec!["f1", "f2"]),
            ExecutionRecord::read(1, 5, 15, vec!["f1"]),
            ExecutionRecord::idle(2, 7, 7, vec![]),
        ];
        let result = format_trace(&records);
        assert_eq!(result, "1 0..10 w {f1 f2}\n1 5..15 r {f1}\n2 7..7 n {}\n");
    }

    #[test]
    fn test_format_trace_empty() {
        let records: Vec<ExecutionRecord<&str, u64>> = vec![];
        assert_eq!(format_trace(&records), "");
    }
}
