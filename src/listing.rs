//! Search, sort and paging over lists the client has already fetched.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::models::{Course, CourseRegistration, RegistrationStatus};

/// Text a list row can be matched against.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;

    /// Case-insensitive substring match on any field. An empty term matches.
    fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&term))
    }
}

impl Searchable for CourseRegistration {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.course_code.as_str(),
            self.course_title.as_str(),
            self.department.as_str(),
            self.student_number.as_str(),
        ]
    }
}

impl Searchable for Course {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.code.as_str(), self.name.as_str(), self.department.as_str()]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    CourseCode,
    Title,
    Department,
    /// Highest first.
    Credits,
    /// Newest first.
    RegisteredAt,
}

impl SortKey {
    fn compare(&self, a: &CourseRegistration, b: &CourseRegistration) -> Ordering {
        match self {
            SortKey::CourseCode => a.course_code.cmp(&b.course_code),
            SortKey::Title => a.course_title.cmp(&b.course_title),
            SortKey::Department => a.department.cmp(&b.department),
            SortKey::Credits => b.credits.cmp(&a.credits),
            SortKey::RegisteredAt => b.registered_at.cmp(&a.registered_at),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegistrationQuery {
    pub search: String,
    /// `None` shows every status.
    pub status: Option<RegistrationStatus>,
    pub sort: SortKey,
}

impl RegistrationQuery {
    pub fn apply(&self, registrations: &[CourseRegistration]) -> Vec<CourseRegistration> {
        let mut rows: Vec<CourseRegistration> = registrations
            .iter()
            .filter(|r| r.matches(&self.search))
            .filter(|r| self.status.is_none_or(|s| r.status == s))
            .cloned()
            .collect();
        rows.sort_by(|a, b| self.sort.compare(a, b));
        rows
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageSlice<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

/// Cuts page `page` (zero based) out of `items`. A page past the end is empty.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> PageSlice<T> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size);
    let start = page.saturating_mul(page_size).min(total_items);
    let end = start.saturating_add(page_size).min(total_items);

    PageSlice {
        items: items[start..end].to_vec(),
        page,
        page_size,
        total_items,
        total_pages,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub active: usize,
    pub inactive: usize,
    pub dropped: usize,
}

pub fn status_counts(registrations: &[CourseRegistration]) -> StatusCounts {
    registrations
        .iter()
        .fold(StatusCounts::default(), |mut counts, r| {
            match r.status {
                RegistrationStatus::Active => counts.active += 1,
                RegistrationStatus::Inactive => counts.inactive += 1,
                RegistrationStatus::Dropped => counts.dropped += 1,
            }
            counts
        })
}

pub fn active_credits(registrations: &[CourseRegistration]) -> u32 {
    registrations
        .iter()
        .filter(|r| r.status == RegistrationStatus::Active)
        .map(|r| r.credits)
        .sum()
}

/// Distinct non-empty departments, sorted.
pub fn departments(courses: &[Course]) -> Vec<String> {
    courses
        .iter()
        .map(|c| c.department.trim())
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
