use std::cmp::Ordering;
use std::fmt;

use crate::error::JournalError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Status {
    Pending,
    Done,
    Postponed,
    Erased,
}

/// Symbol and sort rank for every status. The symbol doubles as the on-disk
/// encoding, so entries must stay unique.
const STATUS_TABLE: [(Status, char, u8); 4] = [
    (Status::Pending, '•', 1),
    (Status::Postponed, '>', 2),
    (Status::Done, 'v', 3),
    (Status::Erased, 'x', 4),
];

impl Status {
    pub(crate) const ALL: [Status; 4] = [
        Status::Pending,
        Status::Postponed,
        Status::Done,
        Status::Erased,
    ];

    pub(crate) fn parse(symbol: char) -> Result<Self, JournalError> {
        STATUS_TABLE
            .iter()
            .find(|(_, candidate, _)| *candidate == symbol)
            .map(|(status, _, _)| *status)
            .ok_or(JournalError::InvalidStatusSymbol(symbol))
    }

    pub(crate) fn symbol(self) -> char {
        Self::entry(self).1
    }

    pub(crate) fn rank(self) -> u8 {
        Self::entry(self).2
    }

    pub(crate) fn is_symbol(c: char) -> bool {
        STATUS_TABLE.iter().any(|(_, symbol, _)| *symbol == c)
    }

    fn entry(status: Status) -> &'static (Status, char, u8) {
        // Every variant has a row; the fallback is unreachable.
        STATUS_TABLE
            .iter()
            .find(|(candidate, _, _)| *candidate == status)
            .unwrap_or(&STATUS_TABLE[0])
    }
}

impl PartialOrd for Status {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Status {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn parse_inverts_symbol() {
        for status in Status::ALL {
            assert_eq!(Status::parse(status.symbol()).unwrap(), status);
        }
    }

    #[test]
    fn symbols_are_distinct() {
        let symbols: HashSet<char> = Status::ALL.iter().map(|s| s.symbol()).collect();
        assert_eq!(symbols.len(), Status::ALL.len());
    }

    #[test]
    fn known_symbols() {
        assert_eq!(Status::Pending.symbol(), '•');
        assert_eq!(Status::Done.symbol(), 'v');
        assert_eq!(Status::Postponed.symbol(), '>');
        assert_eq!(Status::Erased.symbol(), 'x');
        assert_eq!(Status::Done.to_string(), "v");
    }

    #[test]
    fn unknown_symbol_is_rejected() {
        let err = Status::parse('?').expect_err("expected invalid symbol");
        assert!(matches!(err, JournalError::InvalidStatusSymbol('?')));
    }

    #[test]
    fn order_follows_rank() {
        let mut statuses = vec![
            Status::Erased,
            Status::Done,
            Status::Pending,
            Status::Postponed,
        ];
        statuses.sort();
        assert_eq!(statuses, Status::ALL.to_vec());
        assert!(Status::Pending < Status::Postponed);
        assert!(Status::Done < Status::Erased);
    }
}
