//! Patterns used to select which request filters apply to an attempt.

/// A pattern over one component of a filter triple.
///
/// A pattern matches a candidate either by membership (when the pattern is
/// a collection of acceptable values) or by equality. Candidates are
/// optional because a plain request dispatch has no target state; `Any`
/// matches even that absence, `NotNil` matches everything except it, and
/// `Absent` matches only it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Matcher<T> {
    /// Matches every candidate, present or absent.
    Any,
    /// Matches every present candidate; "on any real transition".
    NotNil,
    /// Matches only the absence of a candidate; "on a mere request that
    /// doesn't change state".
    Absent,
    /// Matches a present candidate equal to the given value.
    Equal(T),
    /// Matches a present candidate that is a member of the given set.
    OneOf(Vec<T>),
}

impl<T: PartialEq> Matcher<T> {
    pub fn matches(&self, candidate: Option<&T>) -> bool {
        match self {
            Matcher::Any => true,
            Matcher::NotNil => candidate.is_some(),
            Matcher::Absent => candidate.is_none(),
            Matcher::Equal(value) => candidate == Some(value),
            Matcher::OneOf(values) => candidate.is_some_and(|c| values.contains(c)),
        }
    }
}
