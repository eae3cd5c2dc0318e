// src/csv.rs
use std::io::{self, Write};

/// Write one row joined by `sep`, newline-terminated.
///
/// No quoting or escaping: cells are expected to be free of `sep` once NBSP
/// padding is stripped. A cell that does contain it will shift columns.
pub fn write_row<W: Write, S: AsRef<str>>(mut w: W, row: &[S], sep: char) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first { write!(w, "{}", sep)?; } else { first = false; }
        write!(w, "{}", cell.as_ref())?;
    }
    writeln!(w)
}

/// One row as a `String`, without the trailing newline.
pub fn row_to_line<S: AsRef<str>>(row: &[S], sep: char) -> String {
    let mut out = s!();
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            out.push(sep);
        }
        out.push_str(cell.as_ref());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_comma_joined_without_quoting() {
        let mut buf = Vec::new();
        write_row(&mut buf, &["2017-06-01", "Oats, rolled", ""], ',').unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "2017-06-01,Oats, rolled,\n");
    }

    #[test]
    fn line_has_no_newline() {
        assert_eq!(row_to_line(&["a", "b"], ':'), "a:b");
        assert_eq!(row_to_line::<&str>(&[], ','), "");
    }
}
