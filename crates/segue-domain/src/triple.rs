//! Triple - the unit of training data

use std::fmt;

/// A transition together with the paragraph before and after it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    /// Context before the transition
    pub paragraph_a: String,

    /// The transition phrase, verbatim
    pub transition: String,

    /// Context after the transition
    pub paragraph_b: String,
}

impl Triple {
    /// Create a new triple
    pub fn new(
        paragraph_a: impl Into<String>,
        transition: impl Into<String>,
        paragraph_b: impl Into<String>,
    ) -> Self {
        Self {
            paragraph_a: paragraph_a.into(),
            transition: transition.into(),
            paragraph_b: paragraph_b.into(),
        }
    }

    /// Whether the transition text appears verbatim inside either context
    ///
    /// Containment is exact and case-sensitive.
    ///
    /// # Examples
    ///
    /// ```
    /// use segue_domain::Triple;
    ///
    /// let triple = Triple::new("Enfin, la météo.", "Enfin,", "Demain il pleut.");
    /// assert!(triple.transition_in_context());
    /// ```
    pub fn transition_in_context(&self) -> bool {
        self.paragraph_a.contains(&self.transition) || self.paragraph_b.contains(&self.transition)
    }
}

/// A normalized candidate seen more than once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateEntry {
    /// Normalized text of the candidate
    pub text: String,

    /// Number of occurrences (always greater than one)
    pub count: usize,
}

impl DuplicateEntry {
    /// Create a new duplicate entry
    pub fn new(text: impl Into<String>, count: usize) -> Self {
        Self {
            text: text.into(),
            count,
        }
    }
}

impl fmt::Display for DuplicateEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}x)", self.text, self.count)
    }
}
