//! Text pattern files: one tick per line, one 0/1 character per signal

use std::io::{BufRead, BufReader, Read, Write};

use crate::io::IoError;

/// Read input patterns, one tick per line
///
/// Characters 0 and 1 map to bits, whitespace is ignored, and anything after
/// a '#' is a comment. Blank lines are skipped.
pub fn read_patterns<R: Read>(r: R) -> Result<Vec<Vec<bool>>, IoError> {
    let mut patterns = Vec::new();
    for line in BufReader::new(r).lines() {
        let line = line?;
        let data = line.split('#').next().unwrap_or("");
        let mut bits = Vec::new();
        for c in data.chars() {
            match c {
                '0' => bits.push(false),
                '1' => bits.push(true),
                c if c.is_whitespace() => {}
                c => return Err(IoError::BadPattern(c)),
            }
        }
        if !bits.is_empty() {
            patterns.push(bits);
        }
    }
    Ok(patterns)
}

/// Write patterns, one tick per line
pub fn write_patterns<W: Write>(mut w: W, patterns: &[Vec<bool>]) -> Result<(), IoError> {
    for bits in patterns {
        for b in bits {
            write!(w, "{}", if *b { 1 } else { 0 })?;
        }
        writeln!(w)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read() {
        let text = "# two ticks\n10 1\n\n011  # trailing comment\n";
        let patterns = read_patterns(text.as_bytes()).unwrap();
        assert_eq!(
            patterns,
            vec![vec![true, false, true], vec![false, true, true]]
        );
    }

    #[test]
    fn test_bad_character() {
        match read_patterns("01x".as_bytes()) {
            Err(IoError::BadPattern('x')) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_write() {
        let patterns = vec![vec![true, false], vec![false, true]];
        let mut buf = Vec::new();
        write_patterns(&mut buf, &patterns).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "10\n01\n");
    }
}
