use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};

lazy_static! {
    /// Short ids a generated name must never collide with: CSS keywords and
    /// units that are meaningful bare identifiers in value or selector
    /// positions (`animation: none 1s`, `@keyframes to`, media queries).
    static ref RESERVED_SHORT_IDS: HashSet<&'static str> = HashSet::from([
        "and", "ch", "cm", "deg", "em", "ex", "from", "grad", "in", "mm",
        "ms", "not", "of", "or", "pc", "pt", "px", "rad", "rem", "s", "to",
        "turn", "vh", "vw",
    ]);
}

/// Index of an interned name within one rename table. AST nodes hold this id
/// instead of the name text, so assigning a replacement is a single table
/// write observed by every site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NameId(usize);

/// One interned name: the original text, the shared replacement cell, how
/// often the name was referenced, and whether the stylesheet defined it.
#[derive(Debug, Clone)]
pub struct IdentInfo {
    pub original: String,
    pub replacement: String,
    pub count: u32,
    pub defined: bool,
}

/// A rename table for one identifier namespace (ids, classes, custom
/// properties or animation names). Each original name appears exactly once.
#[derive(Debug, Default)]
pub struct RenameTable {
    entries: Vec<IdentInfo>,
    index: HashMap<String, usize>,
}

impl RenameTable {
    /// Interns a name. A repeated intern bumps the usage count; `defined`
    /// sticks once set.
    pub fn intern(&mut self, name: &str, defined: bool) -> NameId {
        if let Some(&idx) = self.index.get(name) {
            let entry = &mut self.entries[idx];
            entry.count += 1;
            entry.defined |= defined;
            return NameId(idx);
        }

        let idx = self.entries.len();
        self.entries.push(IdentInfo {
            original: name.to_string(),
            replacement: String::new(),
            count: 1,
            defined,
        });
        self.index.insert(name.to_string(), idx);

        NameId(idx)
    }

    /// The name a site should render: the replacement once generated,
    /// otherwise the original.
    #[must_use]
    pub fn resolve(&self, id: NameId) -> &str {
        let entry = &self.entries[id.0];
        if entry.replacement.is_empty() {
            &entry.original
        } else {
            &entry.replacement
        }
    }

    #[must_use]
    pub fn original(&self, id: NameId) -> &str {
        &self.entries[id.0].original
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IdentInfo> {
        self.entries.iter()
    }

    /// Assigns short ids to every entry. Tables holding more than 52 entries
    /// are ordered by decreasing `original length × usage count` first, so
    /// the shortest ids go to the names whose renaming saves the most bytes.
    pub fn generate(&mut self, counter: &mut ShortIdCounter) {
        if self.entries.len() > 52 {
            let mut order: Vec<usize> = (0..self.entries.len()).collect();
            order.sort_by(|&a, &b| {
                let wa = self.entries[a].original.len() as u64 * u64::from(self.entries[a].count);
                let wb = self.entries[b].original.len() as u64 * u64::from(self.entries[b].count);
                wb.cmp(&wa)
            });

            for idx in order {
                self.entries[idx].replacement = counter.next_id();
            }

            return;
        }

        for entry in &mut self.entries {
            entry.replacement = counter.next_id();
        }
    }

    /// Entries that were referenced but never defined, with their assigned
    /// replacements. Only meaningful for the custom-property and animation
    /// tables where definitions are observable.
    pub fn undeclared(&self) -> impl Iterator<Item = &IdentInfo> {
        self.entries.iter().filter(|entry| !entry.defined)
    }
}

/// The four process-wide rename tables of one run. They accumulate across
/// inlined imports so identifiers rename consistently over file boundaries.
#[derive(Debug, Default)]
pub struct RenameTables {
    pub ids: RenameTable,
    pub classes: RenameTable,
    pub custom_properties: RenameTable,
    pub animations: RenameTable,
}

/// Short-id generator. The state is a string counter over the alphabet
/// `a..z A..Z 0..9`; incrementing the leftmost column past `Z` grows the
/// string instead of carrying into the digits, so no id starts with a digit.
#[derive(Debug, Default)]
pub struct ShortIdCounter {
    state: String,
}

impl ShortIdCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Produces the next short id, skipping reserved CSS keywords and units.
    pub fn next_id(&mut self) -> String {
        loop {
            self.increment();
            if !RESERVED_SHORT_IDS.contains(self.state.as_str()) {
                return self.state.clone();
            }
        }
    }

    fn increment(&mut self) {
        if self.state.is_empty() {
            self.state.push('a');
            return;
        }

        let mut chars: Vec<char> = self.state.chars().collect();
        let mut i = chars.len() - 1;

        loop {
            match chars[i] {
                'z' => {
                    chars[i] = 'A';
                    break;
                }
                'Z' => {
                    if i == 0 {
                        chars[i] = 'a';
                        chars.insert(0, 'a');
                    } else {
                        chars[i] = '0';
                    }
                    break;
                }
                '9' => {
                    chars[i] = 'a';
                    if i == 0 {
                        chars.insert(0, 'a');
                        break;
                    }
                    i -= 1;
                }
                c => {
                    chars[i] = (c as u8 + 1) as char;
                    break;
                }
            }
        }

        self.state = chars.into_iter().collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn take(counter: &mut ShortIdCounter, n: usize) -> Vec<String> {
        (0..n).map(|_| counter.next_id()).collect()
    }

    #[test]
    fn counter_runs_a_to_z_then_uppercase() {
        let mut counter = ShortIdCounter::new();
        let ids = take(&mut counter, 52);

        assert_eq!(ids[0], "a");
        assert_eq!(ids[25], "z");
        assert_eq!(ids[26], "A");
        assert_eq!(ids[51], "Z");
    }

    #[test]
    fn counter_grows_after_single_uppercase_z() {
        let mut counter = ShortIdCounter::new();
        take(&mut counter, 52);

        // Single-character ids never continue into the digits
        assert_eq!(counter.next_id(), "aa");
        assert_eq!(counter.next_id(), "ab");
    }

    #[test]
    fn second_column_cycles_through_digits() {
        let mut counter = ShortIdCounter::new();
        take(&mut counter, 52); // a..Z
        let ids = take(&mut counter, 62);

        assert_eq!(ids[0], "aa");
        assert_eq!(ids[25], "az");
        assert_eq!(ids[26], "aA");
        assert_eq!(ids[51], "aZ");
        assert_eq!(ids[52], "a0");
        assert_eq!(ids[61], "a9");
        assert_eq!(counter.next_id(), "ba");
    }

    #[test]
    fn no_id_begins_with_a_digit_and_none_is_reserved() {
        let mut counter = ShortIdCounter::new();
        for _ in 0..5000 {
            let id = counter.next_id();
            assert!(!id.starts_with(|c: char| c.is_ascii_digit()), "{id}");
            assert!(!RESERVED_SHORT_IDS.contains(id.as_str()), "{id}");
        }
    }

    #[test]
    fn reserved_two_letter_ids_are_skipped() {
        let mut counter = ShortIdCounter::new();
        let mut seen = Vec::new();
        for _ in 0..4000 {
            seen.push(counter.next_id());
        }

        assert!(seen.contains(&"ce".to_string()));
        assert!(!seen.contains(&"ch".to_string()));
        assert!(!seen.contains(&"to".to_string()));
        assert!(!seen.contains(&"in".to_string()));
    }

    #[test]
    fn intern_counts_and_defined_flag() {
        let mut table = RenameTable::default();
        let a = table.intern("header", false);
        let b = table.intern("header", true);
        let c = table.intern("footer", false);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(table.len(), 2);

        let entry = table.iter().next().unwrap();
        assert_eq!(entry.count, 2);
        assert!(entry.defined);
    }

    #[test]
    fn resolve_prefers_replacement_after_generation() {
        let mut table = RenameTable::default();
        let id = table.intern("navigation", true);
        assert_eq!(table.resolve(id), "navigation");

        let mut counter = ShortIdCounter::new();
        table.generate(&mut counter);
        assert_eq!(table.resolve(id), "a");
        assert_eq!(table.original(id), "navigation");
    }

    #[test]
    fn shared_cell_renames_all_sites() {
        let mut table = RenameTable::default();
        let first = table.intern("button", false);
        let second = table.intern("button", false);

        let mut counter = ShortIdCounter::new();
        table.generate(&mut counter);

        assert_eq!(table.resolve(first), table.resolve(second));
    }

    #[test]
    fn large_tables_are_usage_weighted() {
        let mut table = RenameTable::default();

        // 53 entries forces the weighted ordering; make one entry dominant
        let heavy = table.intern("very-long-and-popular-name", false);
        for _ in 0..99 {
            table.intern("very-long-and-popular-name", false);
        }
        for i in 0..52 {
            table.intern(&format!("x{i}"), false);
        }

        let mut counter = ShortIdCounter::new();
        table.generate(&mut counter);

        assert_eq!(table.resolve(heavy), "a");
    }

    #[test]
    fn undeclared_entries_are_reported() {
        let mut table = RenameTable::default();
        table.intern("defined-one", true);
        table.intern("missing-one", false);

        let undeclared: Vec<_> = table.undeclared().map(|e| e.original.clone()).collect();
        assert_eq!(undeclared, vec!["missing-one".to_string()]);
    }
}
