// pattern.rs - Plaintext pattern files made of `#P x y` blocks
//
//   #Life 1.05
//   #D any other `#` line is a comment
//   #P -1 0
//   .*.
//   ..*
//   ***

use std::fmt::Write as _;

use crate::error::{LifeError, Result};

pub const ALIVE: char = '*';
pub const DEAD: char = '.';
pub const BLOCK_HEADER: &str = "#P";
pub const FILE_HEADER: &str = "#Life 1.05";

/// One offset-tagged fragment of a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatternBlock {
    pub x: i64,
    pub y: i64,
    pub rows: Vec<String>,
}

impl PatternBlock {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y, rows: Vec::new() }
    }

    /// Absolute `(x, y)` of every live marker in the block.
    pub fn live_cells(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.rows.iter().enumerate().flat_map(move |(dy, line)| {
            line.chars()
                .enumerate()
                .filter(|&(_, ch)| ch == ALIVE)
                .map(move |(dx, _)| (self.x.saturating_add(dx as i64), self.y.saturating_add(dy as i64)))
        })
    }
}

/// Parse pattern text into its blocks.
///
/// Fails on rows that come before the first `#P` header and on headers whose
/// offsets are missing or not integers. Nothing is returned for partially
/// valid input.
pub fn parse(text: &str) -> Result<Vec<PatternBlock>> {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut blocks = Vec::new();
    let mut current: Option<PatternBlock> = None;

    for (index, raw) in text.split('\n').enumerate() {
        let line = raw.trim();
        let line_no = index + 1;

        if let Some(rest) = line.strip_prefix(BLOCK_HEADER) {
            let (x, y) = parse_offsets(rest).ok_or_else(|| LifeError::BadBlockHeader {
                line: line_no,
                text: line.to_string(),
            })?;
            if let Some(done) = current.replace(PatternBlock::new(x, y)) {
                blocks.push(done);
            }
        } else if line.starts_with('#') || line.is_empty() {
            continue;
        } else {
            match current.as_mut() {
                Some(block) => block.rows.push(line.to_string()),
                None => return Err(LifeError::RowBeforeHeader { line: line_no }),
            }
        }
    }

    blocks.extend(current);
    Ok(blocks)
}

/// Origins are limited to `i32` so coordinate math on them cannot overflow.
fn parse_offsets(rest: &str) -> Option<(i64, i64)> {
    let mut tokens = rest.split_whitespace();
    let x: i32 = tokens.next()?.parse().ok()?;
    let y: i32 = tokens.next()?.parse().ok()?;
    Some((x.into(), y.into()))
}

/// Render blocks back into pattern text that [`parse`] accepts.
pub fn encode(blocks: &[PatternBlock]) -> String {
    let mut out = String::new();
    out.push_str(FILE_HEADER);
    out.push('\n');
    for block in blocks {
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{BLOCK_HEADER} {} {}", block.x, block.y);
        for row in &block.rows {
            out.push_str(row);
            out.push('\n');
        }
    }
    out
}
