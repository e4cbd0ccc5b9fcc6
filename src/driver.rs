//! Executes a stream of [`Command`]s against an [`AvlTree`] and renders the results.
//!
//! Output is line-oriented. Insertions and removals write one line per [`Event`]; the
//! analysis commands write a single `... Analysis Result: ...` line each. Weights are printed
//! with three decimals and a `.` separator regardless of locale, see [`ThreeDecimals`].

use std::{
    fmt, iter,
    io::{BufRead, Write},
};

use crate::{
    command::{Command, Member},
    AvlTree, Error, Event, ParseErrorKind, Weight,
};

/// Counters describing a [`Driver::run`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    /// Commands executed, including the founding line.
    pub commands: usize,
    /// Blank lines and lines with an unknown keyword.
    pub skipped: usize,
    /// Lines written to the output.
    pub lines_written: usize,
}

pub struct Driver<W> {
    tree: AvlTree,
    out: W,
    summary: Summary,
}

impl<W: Write> Driver<W> {
    /// Returns a driver with an empty tree, writing its results to `out`.
    pub fn new(out: W) -> Self {
        Driver {
            tree: AvlTree::new(),
            out,
            summary: Summary::default(),
        }
    }

    pub fn tree(&self) -> &AvlTree {
        &self.tree
    }

    pub fn summary(&self) -> Summary {
        self.summary
    }

    /// Consumes the driver, returning the tree and the output sink.
    pub fn into_parts(self) -> (AvlTree, W) {
        (self.tree, self.out)
    }

    /// Reads commands from `input` until it is exhausted, executing each in turn.
    ///
    /// The first non-blank line is the founding member. Lines with an unknown keyword are
    /// skipped and fields past the ones a command reads are ignored; any other malformed line
    /// aborts the run.
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<Summary, Error> {
        let mut founded = false;

        for (idx, line) in input.lines().enumerate() {
            let line = line?;
            let line_no = idx + 1;

            if line.trim().is_empty() {
                self.summary.skipped += 1;
                continue;
            }

            let founder = !founded;
            let parsed = if founder {
                founded = true;
                Command::founder(&line)
            } else {
                line.parse::<Command>()
            };

            let command = match parsed {
                Ok(command) => command,
                Err(ParseErrorKind::UnknownKeyword(keyword)) => {
                    log::warn!("line {line_no}: skipping unknown command `{keyword}`");
                    self.summary.skipped += 1;
                    continue;
                }
                Err(kind) => return Err(Error::parse(line_no, kind)),
            };

            // The founding line has no keyword.
            let expected = command.field_count() - usize::from(founder);
            let extra = line.split_whitespace().count().saturating_sub(expected);
            if extra > 0 {
                log::warn!("line {line_no}: ignoring {extra} trailing field(s)");
            }

            log::trace!("line {line_no}: {command:?}");
            self.execute(&command)?;
        }

        self.out.flush()?;
        Ok(self.summary)
    }

    /// Executes a single command, writing its results.
    pub fn execute(&mut self, command: &Command) -> Result<(), Error> {
        match command {
            Command::Insert(Member { label, weight }) => {
                let outcome = self.tree.insert(label.as_str(), *weight);
                self.write_events(&outcome.events)?;
            }

            Command::Delete(Member { label, weight }) => {
                let outcome = self.tree.delete(label, *weight);
                self.write_events(&outcome.events)?;
            }

            Command::Target(a, b) => match self.tree.target_query(a.weight, b.weight) {
                Ok(node) => {
                    writeln!(
                        self.out,
                        "Target Analysis Result: {} {}",
                        node.label(),
                        ThreeDecimals(node.weight())
                    )?;
                    self.summary.lines_written += 1;
                }
                Err(Error::EmptyTree) => {
                    log::warn!(
                        "no target for {} and {}: the tree is empty",
                        a.label,
                        b.label
                    );
                }
                Err(err) => return Err(err),
            },

            Command::Rank(Member { label, weight }) => {
                let group = self.tree.rank_group_query(*weight);
                if group.is_empty() {
                    log::debug!("no rank for {label}: {weight} is not present");
                } else {
                    write!(self.out, "Rank Analysis Result:")?;
                    for node in group {
                        write!(
                            self.out,
                            " {} {}",
                            node.label(),
                            ThreeDecimals(node.weight())
                        )?;
                    }
                    writeln!(self.out)?;
                    self.summary.lines_written += 1;
                }
            }

            Command::Divide => {
                writeln!(
                    self.out,
                    "Division Analysis Result: {}",
                    self.tree.max_weight_independent_set_size()
                )?;
                self.summary.lines_written += 1;
            }
        }

        self.summary.commands += 1;
        Ok(())
    }

    fn write_events(&mut self, events: &[Event]) -> Result<(), Error> {
        for event in events {
            writeln!(self.out, "{event}")?;
        }

        self.summary.lines_written += events.len();
        Ok(())
    }
}

/// Renders a weight with exactly three decimals.
///
/// Rounding is half away from zero, applied to the shortest decimal representation of the
/// weight rather than to its exact binary value. `2.3125` renders as `2.313` and `1.0005` as
/// `1.001`, where `{:.3}` would give `2.312` and `1.000`.
pub struct ThreeDecimals(pub Weight);

impl fmt::Display for ThreeDecimals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0.get();

        // `f64`'s `Display` is the shortest round-tripping form and never uses an exponent.
        let shortest = value.abs().to_string();
        let (int, frac) = shortest.split_once('.').unwrap_or((shortest.as_str(), ""));

        let kept = frac.bytes().chain(iter::repeat(b'0')).take(3);
        let mut digits: Vec<u8> = int.bytes().chain(kept).map(|b| b - b'0').collect();

        if frac.as_bytes().get(3).is_some_and(|&next| next >= b'5') {
            let mut carry = true;
            for digit in digits.iter_mut().rev() {
                if *digit == 9 {
                    *digit = 0;
                } else {
                    *digit += 1;
                    carry = false;
                    break;
                }
            }
            if carry {
                digits.insert(0, 1);
            }
        }

        if value.is_sign_negative() {
            f.write_str("-")?;
        }

        let (int, frac) = digits.split_at(digits.len() - 3);
        for digit in int {
            write!(f, "{digit}")?;
        }
        f.write_str(".")?;
        for digit in frac {
            write!(f, "{digit}")?;
        }

        Ok(())
    }
}
