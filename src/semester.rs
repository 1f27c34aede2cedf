// src/semester.rs
use chrono::{Datelike, Local, NaiveDate};
use std::fmt;

/// Academic term. The first half of the calendar year is spring, the rest is fall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term {
    Spring,
    Fall,
}

impl Term {
    fn letter(self) -> char {
        match self {
            Term::Spring => 's',
            Term::Fall => 'f',
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Spring => write!(f, "Spring"),
            Term::Fall => write!(f, "Fall"),
        }
    }
}

/// A semester as the grading platform names it in course URLs (`s26`, `f26`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Semester {
    pub term: Term,
    pub year: i32,
}

impl Semester {
    pub fn containing(date: NaiveDate) -> Self {
        let term = if date.month() < 7 { Term::Spring } else { Term::Fall };
        Self { term, year: date.year() }
    }

    pub fn current() -> Self {
        Self::containing(Local::now().date_naive())
    }

    /// Short form used in API paths, e.g. `f26`.
    pub fn short(&self) -> String {
        format!("{}{:02}", self.term.letter(), self.year.rem_euclid(100))
    }

    /// Human-readable form, e.g. `Fall 2026`.
    pub fn long(&self) -> String {
        format!("{} {}", self.term, self.year)
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_first_half_of_year_is_spring() {
        let s = Semester::containing(date(2026, 6, 30));
        assert_eq!(s.term, Term::Spring);
        assert_eq!(s.short(), "s26");
        assert_eq!(s.long(), "Spring 2026");
    }

    #[test]
    fn test_second_half_of_year_is_fall() {
        let s = Semester::containing(date(2026, 7, 1));
        assert_eq!(s.term, Term::Fall);
        assert_eq!(s.to_string(), "f26");
        assert_eq!(s.long(), "Fall 2026");
    }

    #[test]
    fn test_short_form_pads_year() {
        assert_eq!(Semester::containing(date(2005, 1, 15)).short(), "s05");
    }
}
