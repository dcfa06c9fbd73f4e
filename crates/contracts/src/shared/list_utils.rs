/// Search and sort helpers for record lists
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

/// Types that can be matched against a search term
pub trait Searchable {
    /// `filter` is already lower-cased and non-empty
    fn matches_filter(&self, filter: &str) -> bool;
}

/// Types that can be ordered by a named field
pub trait Sortable {
    type Field: Copy;

    fn compare_by_field(&self, other: &Self, field: Self::Field) -> Ordering;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Compares two strings so that embedded numbers order by value.
///
/// "LDAR-2" sorts before "LDAR-10". Letters compare case-insensitively and
/// digit runs that differ only in leading zeros compare equal.
pub fn natural_compare(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let l_run = take_digits(&mut left);
                let r_run = take_digits(&mut right);
                let ord = compare_digit_runs(&l_run, &r_run);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(l), Some(r)) => {
                left.next();
                right.next();
                let ord = l.to_lowercase().cmp(r.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    // Without leading zeros a longer run is a larger number
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Sorts the list by the given field.
///
/// Relative order of items with equal keys is not part of the contract.
pub fn sort_list<T: Sortable>(items: &mut [T], field: T::Field, direction: SortDirection) {
    items.sort_by(|a, b| direction.apply(a.compare_by_field(b, field)));
}

/// Keeps the items matching the search term (case-insensitive).
/// The term is used as typed, whitespace included; an empty term keeps everything.
pub fn filter_list<T: Searchable + Clone>(items: &[T], filter: &str) -> Vec<T> {
    let filter = filter.to_lowercase();
    if filter.is_empty() {
        return items.to_vec();
    }

    items
        .iter()
        .filter(|item| item.matches_filter(&filter))
        .cloned()
        .collect()
}
