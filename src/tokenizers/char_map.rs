/// Maps ranges of characters to a reference value.
///
/// Intervals are kept sorted and non-overlapping so lookups are a binary
/// search. Adding an interval that overlaps existing ones overrides them for
/// the overlapping characters only.
#[derive(Debug, Clone, PartialEq)]
pub struct CharReferenceMap<T> {
    intervals: Vec<CharReferenceInterval<T>>,
}

#[derive(Debug, Clone, PartialEq)]
struct CharReferenceInterval<T> {
    start: u32,
    end: u32,
    reference: T,
}

impl<T> Default for CharReferenceMap<T> {
    fn default() -> Self {
        CharReferenceMap {
            intervals: Vec::new(),
        }
    }
}

impl<T: Clone> CharReferenceMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns `reference` to every character in `start..=end`.
    ///
    /// A reversed range is normalised.
    pub fn add_interval(&mut self, start: char, end: char, reference: T) {
        let (start, end) = if start <= end {
            (start as u32, end as u32)
        } else {
            (end as u32, start as u32)
        };

        let mut intervals = Vec::with_capacity(self.intervals.len() + 2);
        for interval in self.intervals.drain(..) {
            if interval.end < start || interval.start > end {
                intervals.push(interval);
                continue;
            }
            if interval.start < start {
                intervals.push(CharReferenceInterval {
                    start: interval.start,
                    end: start - 1,
                    reference: interval.reference.clone(),
                });
            }
            if interval.end > end {
                intervals.push(CharReferenceInterval {
                    start: end + 1,
                    end: interval.end,
                    reference: interval.reference,
                });
            }
        }
        intervals.push(CharReferenceInterval {
            start,
            end,
            reference,
        });
        intervals.sort_by_key(|interval| interval.start);

        self.intervals = intervals;
    }

    /// Finds the reference assigned to `symbol`.
    pub fn lookup(&self, symbol: char) -> Option<&T> {
        let code = symbol as u32;
        let index = self.intervals.partition_point(|interval| interval.end < code);
        self.intervals
            .get(index)
            .filter(|interval| interval.start <= code)
            .map(|interval| &interval.reference)
    }

    pub fn clear(&mut self) {
        self.intervals.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_in_intervals() {
        let mut map = CharReferenceMap::new();
        map.add_interval('a', 'z', 1);
        map.add_interval('0', '9', 2);

        assert_eq!(map.lookup('a'), Some(&1));
        assert_eq!(map.lookup('m'), Some(&1));
        assert_eq!(map.lookup('5'), Some(&2));
        assert_eq!(map.lookup('A'), None);
        assert_eq!(map.lookup('{'), None);
    }

    #[test]
    fn test_override_splits_existing_interval() {
        let mut map = CharReferenceMap::new();
        map.add_interval('\u{0}', '\u{fffe}', "symbol");
        map.add_interval('a', 'z', "word");
        map.add_interval('m', 'm', "special");

        assert_eq!(map.lookup('+'), Some(&"symbol"));
        assert_eq!(map.lookup('l'), Some(&"word"));
        assert_eq!(map.lookup('m'), Some(&"special"));
        assert_eq!(map.lookup('n'), Some(&"word"));
        assert_eq!(map.lookup('~'), Some(&"symbol"));
        assert_eq!(map.lookup('\u{ffff}'), None);

        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.lookup('a'), None);
    }
}
