//! Sibling ordering for files.
//!
//! Names are compared only over their common length, so a name and any of its
//! prefixes compare equal. Positions of same-prefix names therefore depend on
//! insertion order, not on a full lexicographic sort.

use std::cmp::Ordering;

/// Compare two names over `[0, min(len(a), len(b)))` characters.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let len = a.chars().count().min(b.chars().count());
    a.chars().take(len).cmp(b.chars().take(len))
}

/// Index at which `name` goes in a list kept in descending order: before the
/// first element it compares strictly greater than, otherwise at the end.
/// Equal names land after the ones already present.
pub fn descending_index<'a, I>(existing: I, name: &str) -> usize
where
    I: IntoIterator<Item = &'a str>,
{
    let mut count = 0;
    for (index, other) in existing.into_iter().enumerate() {
        if compare_names(name, other) == Ordering::Greater {
            return index;
        }
        count = index + 1;
    }
    count
}

/// Descending insertion into an already ordered list.
pub fn insert_descending<T, F>(list: &mut Vec<T>, item: T, name_of: F)
where
    F: Fn(&T) -> &str,
{
    let index = descending_index(list.iter().map(&name_of), name_of(&item));
    list.insert(index, item);
}
