//! Parsing of the line-oriented command format.
//!
//! The first line of an input names the founding member as `<label> <weight>`. Every line
//! after it starts with a keyword:
//!
//! ```text
//! MEMBER_IN <label> <weight>
//! MEMBER_OUT <label> <weight>
//! INTEL_TARGET <label> <weight> <label> <weight>
//! INTEL_RANK <label> <weight>
//! INTEL_DIVIDE
//! ```
//!
//! Fields past the ones a command reads are ignored.

use core::str::{FromStr, SplitWhitespace};

use crate::{ParseErrorKind, Weight};

/// A label paired with the weight it is known by.
#[derive(Clone, Debug, PartialEq)]
pub struct Member {
    pub label: String,
    pub weight: Weight,
}

impl Member {
    pub fn new(label: impl Into<String>, weight: Weight) -> Self {
        Member {
            label: label.into(),
            weight,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// `MEMBER_IN`, or the founding line.
    Insert(Member),
    /// `MEMBER_OUT`
    Delete(Member),
    /// `INTEL_TARGET`
    Target(Member, Member),
    /// `INTEL_RANK`
    Rank(Member),
    /// `INTEL_DIVIDE`
    Divide,
}

impl Command {
    /// Parses the first line of an input, which carries no keyword.
    pub fn founder(line: &str) -> Result<Command, ParseErrorKind> {
        let mut fields = Fields::new(line)?;
        let founder = fields.member()?;

        Ok(Command::Insert(founder))
    }

    /// Returns the number of fields this command is written with, keyword included.
    pub fn field_count(&self) -> usize {
        match self {
            Command::Insert(_) | Command::Delete(_) | Command::Rank(_) => 3,
            Command::Target(..) => 5,
            Command::Divide => 1,
        }
    }

    /// Returns the keyword this command is written with.
    pub fn keyword(&self) -> &'static str {
        match self {
            Command::Insert(_) => "MEMBER_IN",
            Command::Delete(_) => "MEMBER_OUT",
            Command::Target(..) => "INTEL_TARGET",
            Command::Rank(_) => "INTEL_RANK",
            Command::Divide => "INTEL_DIVIDE",
        }
    }
}

impl FromStr for Command {
    type Err = ParseErrorKind;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut fields = Fields::new(line)?;

        let command = match fields.next("keyword")? {
            "MEMBER_IN" => Command::Insert(fields.member()?),
            "MEMBER_OUT" => Command::Delete(fields.member()?),
            "INTEL_TARGET" => Command::Target(fields.member()?, fields.member()?),
            "INTEL_RANK" => Command::Rank(fields.member()?),
            "INTEL_DIVIDE" => Command::Divide,
            other => return Err(ParseErrorKind::UnknownKeyword(other.to_owned())),
        };

        Ok(command)
    }
}

struct Fields<'a> {
    inner: SplitWhitespace<'a>,
}

impl<'a> Fields<'a> {
    fn new(line: &'a str) -> Result<Self, ParseErrorKind> {
        if line.trim().is_empty() {
            return Err(ParseErrorKind::Empty);
        }

        Ok(Fields {
            inner: line.split_whitespace(),
        })
    }

    fn next(&mut self, what: &'static str) -> Result<&'a str, ParseErrorKind> {
        self.inner.next().ok_or(ParseErrorKind::MissingField(what))
    }

    fn member(&mut self) -> Result<Member, ParseErrorKind> {
        let label = self.next("label")?;
        let weight = self.next("weight")?;
        let weight = weight
            .parse::<Weight>()
            .map_err(|_| ParseErrorKind::InvalidWeight(weight.to_owned()))?;

        Ok(Member::new(label, weight))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(label: &str, weight: f64) -> Member {
        Member::new(label, Weight::new(weight).unwrap())
    }

    #[test]
    fn founder() {
        assert_eq!(
            Command::founder("Ada 61.5"),
            Ok(Command::Insert(member("Ada", 61.5)))
        );
        assert_eq!(
            Command::founder("Ada"),
            Err(ParseErrorKind::MissingField("weight"))
        );
        assert_eq!(
            Command::founder("Ada 50 extra"),
            Ok(Command::Insert(member("Ada", 50.0)))
        );
    }

    #[test]
    fn keywords() {
        assert_eq!(
            "MEMBER_IN Brook 42.125".parse::<Command>(),
            Ok(Command::Insert(member("Brook", 42.125)))
        );
        assert_eq!(
            "MEMBER_OUT Brook 42.125".parse::<Command>(),
            Ok(Command::Delete(member("Brook", 42.125)))
        );
        assert_eq!(
            "INTEL_TARGET Ada 61.5 Cole 12".parse::<Command>(),
            Ok(Command::Target(member("Ada", 61.5), member("Cole", 12.0)))
        );
        assert_eq!(
            "INTEL_RANK Cole 12".parse::<Command>(),
            Ok(Command::Rank(member("Cole", 12.0)))
        );
        assert_eq!("  INTEL_DIVIDE  ".parse::<Command>(), Ok(Command::Divide));
    }

    #[test]
    fn keyword_round_trips() {
        for line in ["MEMBER_IN a 1", "INTEL_TARGET a 1 b 2", "INTEL_DIVIDE"] {
            let command: Command = line.parse().unwrap();
            assert!(line.starts_with(command.keyword()));
            assert_eq!(command.field_count(), line.split_whitespace().count());
        }
    }

    #[test]
    fn extra_fields_are_ignored() {
        assert_eq!(
            "INTEL_DIVIDE now".parse::<Command>(),
            Ok(Command::Divide)
        );
        assert_eq!(
            "MEMBER_OUT Brook 42.125 quietly please".parse::<Command>(),
            Ok(Command::Delete(member("Brook", 42.125)))
        );
    }

    #[test]
    fn malformed() {
        assert_eq!("".parse::<Command>(), Err(ParseErrorKind::Empty));
        assert_eq!(
            "MEMBER_HUG a 1".parse::<Command>(),
            Err(ParseErrorKind::UnknownKeyword("MEMBER_HUG".to_owned()))
        );
        assert_eq!(
            "INTEL_TARGET a 1 b".parse::<Command>(),
            Err(ParseErrorKind::MissingField("weight"))
        );
        assert_eq!(
            "MEMBER_IN a heavy".parse::<Command>(),
            Err(ParseErrorKind::InvalidWeight("heavy".to_owned()))
        );
        assert_eq!(
            "MEMBER_IN a NaN".parse::<Command>(),
            Err(ParseErrorKind::InvalidWeight("NaN".to_owned()))
        );
    }
}
