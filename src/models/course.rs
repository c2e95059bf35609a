use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub credits: u32,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub max_enrollments: u32,
    #[serde(default)]
    pub current_enrollments: u32,
    #[serde(default)]
    pub prerequisites: Vec<Prerequisite>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Course {
    pub fn seats_left(&self) -> u32 {
        self.max_enrollments.saturating_sub(self.current_enrollments)
    }

    pub fn is_full(&self) -> bool {
        self.max_enrollments > 0 && self.current_enrollments >= self.max_enrollments
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prerequisite {
    pub code: String,
}

/// Body sent on course create and update.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRequest {
    pub name: String,
    pub code: String,
    pub description: String,
    pub credits: u32,
    pub department: String,
    pub max_enrollments: u32,
    pub prerequisites: Vec<Prerequisite>,
}

/// Spring-style pagination envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
}

/// List endpoints answer with either a page envelope or a bare array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Paged(Page<T>),
    Plain(Vec<T>),
}

impl<T> Listing<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Listing::Paged(page) => page.content,
            Listing::Plain(items) => items,
        }
    }

    pub fn into_page(self) -> Page<T> {
        match self {
            Listing::Paged(page) => page,
            Listing::Plain(items) => Page {
                total_elements: items.len() as u64,
                total_pages: 1,
                number: 0,
                size: items.len() as u32,
                content: items,
            },
        }
    }
}
