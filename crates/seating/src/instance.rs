//! Plaintext instance files.
//!
//! ```text
//! 3          <- height
//! 5          <- width
//! 11111      <- one digit per seat, 0 = no seat, 1 = free seat
//! 11011
//! 11111
//! 1 2 0 0 0 0 0 1
//! ```
//!
//! The last part is either eight counts for group sizes 1 to 8 (separated by
//! whitespace, or written as one 8-digit token such as `12000001`), or an
//! arrival list of group sizes ended by `0`.

use crate::{
    constants::{
        BLOCKED_DIGIT, EMPTY_DIGIT, MAX_GROUP_SIZE, MIN_GROUP_SIZE, STREAM_TERMINATOR,
    },
    demand::GroupDemand,
    error::{Result, SeatingError},
    grid::{Grid, Seat},
};
use std::{fmt, fs, io::Read, path::Path};
use strum_macros::{Display, EnumString};

/// How the part after the grid is encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum RequestFormat {
    /// Eight group counts, for the offline allocator
    Counts,
    /// Group sizes in arrival order, for the online allocator
    Stream,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requests {
    Batch(GroupDemand),
    Stream(Vec<usize>),
}

impl Requests {
    pub fn format(&self) -> RequestFormat {
        match self {
            Requests::Batch(_) => RequestFormat::Counts,
            Requests::Stream(_) => RequestFormat::Stream,
        }
    }

    /// Total people asked for
    pub fn requested_people(&self) -> usize {
        match self {
            Requests::Batch(demand) => demand.total_people(),
            Requests::Stream(arrivals) => arrivals.iter().sum(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub name: String,
    pub grid: Grid,
    pub requests: Requests,
}

/// Reads an instance file. The instance is named after the file stem.
pub fn read_instance(path: &Path, format: RequestFormat) -> Result<Instance> {
    let file = fs::File::open(path)?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    parse_instance(file, format, &name)
}

pub fn parse_instance<R: Read>(mut reader: R, format: RequestFormat, name: &str) -> Result<Instance> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;

    // (行番号, 内容)
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()));

    let height = parse_dimension(lines.next(), "height")?;
    let width = parse_dimension(lines.next(), "width")?;

    if width.checked_mul(height).is_none() {
        return Err(SeatingError::Parse {
            line: 2,
            message: format!("grid of {width}x{height} seats is too large"),
        });
    }

    // ヘッダの値だけで確保しない
    let mut cells = Vec::new();
    for row in 0..height {
        let (line_no, line) = lines.next().ok_or_else(|| SeatingError::Parse {
            line: 3 + row,
            message: format!("expected {height} seat rows, found {row}"),
        })?;
        cells.extend(parse_row(line_no, line, width)?);
    }
    let grid = Grid::new(width, height, cells)?;

    let tokens: Vec<(usize, &str)> = lines
        .flat_map(|(line_no, line)| line.split_whitespace().map(move |t| (line_no, t)))
        .collect();
    let last_line = 2 + height + 1;

    let requests = match format {
        RequestFormat::Counts => Requests::Batch(parse_counts(&tokens, last_line)?),
        RequestFormat::Stream => Requests::Stream(parse_stream(&tokens)?),
    };

    Ok(Instance {
        name: name.to_string(),
        grid,
        requests,
    })
}

fn parse_dimension(line: Option<(usize, &str)>, what: &str) -> Result<usize> {
    let (line_no, text) = line.ok_or_else(|| SeatingError::Parse {
        line: if what == "height" { 1 } else { 2 },
        message: format!("missing {what}"),
    })?;
    match text.parse::<usize>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(SeatingError::Parse {
            line: line_no,
            message: format!("{what} must be a positive integer, got '{text}'"),
        }),
    }
}

fn parse_row(line_no: usize, line: &str, width: usize) -> Result<Vec<Seat>> {
    if line.chars().count() != width {
        return Err(SeatingError::Parse {
            line: line_no,
            message: format!("expected {width} seats, found {}", line.chars().count()),
        });
    }
    line.chars()
        .map(|c| match c {
            BLOCKED_DIGIT => Ok(Seat::Blocked),
            EMPTY_DIGIT => Ok(Seat::Empty),
            _ => Err(SeatingError::Parse {
                line: line_no,
                message: format!("unexpected seat '{c}', expected {BLOCKED_DIGIT} or {EMPTY_DIGIT}"),
            }),
        })
        .collect()
}

fn parse_number(line_no: usize, token: &str) -> Result<usize> {
    token.parse().map_err(|_| SeatingError::Parse {
        line: line_no,
        message: format!("'{token}' is not a number"),
    })
}

fn parse_counts(tokens: &[(usize, &str)], last_line: usize) -> Result<GroupDemand> {
    let mut counts = [0usize; MAX_GROUP_SIZE];

    match tokens {
        // 固定幅形式: "12000001"
        [(line_no, token)]
            if token.len() == MAX_GROUP_SIZE && token.chars().all(|c| c.is_ascii_digit()) =>
        {
            for (count, c) in counts.iter_mut().zip(token.chars()) {
                *count = c.to_digit(10).map(|d| d as usize).ok_or_else(|| {
                    SeatingError::Parse {
                        line: *line_no,
                        message: format!("'{c}' is not a digit"),
                    }
                })?;
            }
        }
        _ if tokens.len() == MAX_GROUP_SIZE => {
            for (count, &(line_no, token)) in counts.iter_mut().zip(tokens) {
                *count = parse_number(line_no, token)?;
            }
        }
        _ => {
            let line = tokens.last().map(|&(l, _)| l).unwrap_or(last_line);
            return Err(SeatingError::Parse {
                line,
                message: format!(
                    "expected {MAX_GROUP_SIZE} group counts, found {}",
                    tokens.len()
                ),
            });
        }
    }

    Ok(GroupDemand::new(counts))
}

fn parse_stream(tokens: &[(usize, &str)]) -> Result<Vec<usize>> {
    let mut arrivals = Vec::new();
    for &(line_no, token) in tokens {
        let size = parse_number(line_no, token)?;
        if size == STREAM_TERMINATOR {
            break;
        }
        if !(MIN_GROUP_SIZE..=MAX_GROUP_SIZE).contains(&size) {
            return Err(SeatingError::Parse {
                line: line_no,
                message: format!("group size {size} is outside 1..={MAX_GROUP_SIZE}"),
            });
        }
        arrivals.push(size);
    }
    Ok(arrivals)
}

/// Writes the instance back in the format [`parse_instance`] reads
impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.grid)?;
        match &self.requests {
            Requests::Batch(demand) => writeln!(f, "{demand}"),
            Requests::Stream(arrivals) => {
                for size in arrivals {
                    write!(f, "{size} ")?;
                }
                writeln!(f, "{STREAM_TERMINATOR}")
            }
        }
    }
}
