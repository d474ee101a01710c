use crate::error::ScrapeError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Input to one crawl run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub search_term: String,
    pub filter_category: String,
    pub excluded_links: Vec<String>,
}

impl SearchRequest {
    pub fn new(search_term: impl Into<String>, filter_category: impl Into<String>) -> Self {
        Self {
            search_term: search_term.into(),
            filter_category: filter_category.into(),
            excluded_links: Vec::new(),
        }
    }

    /// Links to skip entirely, e.g. the `visited` list of an earlier run
    pub fn with_excluded_links<I, S>(mut self, links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_links.extend(links.into_iter().map(Into::into));
        self
    }

    /// Checks caller input before anything touches the browser
    pub fn validate(&self) -> Result<(), ScrapeError> {
        if self.search_term.trim().is_empty() {
            return Err(ScrapeError::Validation(
                "search_term must be a non-empty string".to_string(),
            ));
        }
        if self.filter_category.trim().is_empty() {
            return Err(ScrapeError::Validation(
                "filter_category must be a non-empty string".to_string(),
            ));
        }
        Ok(())
    }
}

/// Course links already processed or excluded, in the order they were seen
#[derive(Debug, Clone, Default)]
pub struct VisitedSet {
    seen: HashSet<String>,
    order: Vec<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the link was already present
    pub fn insert(&mut self, link: &str) -> bool {
        if self.seen.contains(link) {
            return false;
        }
        self.seen.insert(link.to_string());
        self.order.push(link.to_string());
        true
    }

    pub fn contains(&self, link: &str) -> bool {
        self.seen.contains(link)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.order
    }
}

/// The four headline numbers shown next to an instructor, as displayed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructorStats {
    pub rating: String,
    pub reviews: String,
    pub students: String,
    pub courses: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructor {
    pub name: String,
    pub stats: InstructorStats,
}

/// A course is taught by one instructor or by a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "instructors")]
pub enum Instructors {
    Single(Instructor),
    Group(Vec<Instructor>),
}

/// Per-stat columns of a group, aligned by instructor position
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupColumns {
    pub ratings: Vec<String>,
    pub reviews: Vec<String>,
    pub students: Vec<String>,
    pub courses: Vec<String>,
}

impl Instructors {
    /// Builds the right variant for a page's instructor names and its flat
    /// stats list, which holds four values per instructor.
    ///
    /// Returns `None` when the stats do not line up with the names.
    pub fn from_flat_stats(names: Vec<String>, stats: &[String]) -> Option<Self> {
        if names.is_empty() || stats.len() != names.len() * 4 {
            return None;
        }
        let mut instructors: Vec<Instructor> = names
            .into_iter()
            .zip(stats.chunks_exact(4))
            .map(|(name, s)| Instructor {
                name,
                stats: InstructorStats {
                    rating: s[0].clone(),
                    reviews: s[1].clone(),
                    students: s[2].clone(),
                    courses: s[3].clone(),
                },
            })
            .collect();

        if instructors.len() == 1 {
            instructors.pop().map(Instructors::Single)
        } else {
            Some(Instructors::Group(instructors))
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Instructors::Single(_) => 1,
            Instructors::Group(group) => group.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names joined the way the site lists co-instructors
    pub fn joined_names(&self) -> String {
        match self {
            Instructors::Single(one) => one.name.clone(),
            Instructors::Group(group) => group
                .iter()
                .map(|i| i.name.as_str())
                .collect::<Vec<_>>()
                .join(" -&- "),
        }
    }

    /// The stats of a group as four parallel columns; `None` for a single
    /// instructor.
    pub fn group_columns(&self) -> Option<GroupColumns> {
        let Instructors::Group(group) = self else {
            return None;
        };
        let mut columns = GroupColumns::default();
        for instructor in group {
            columns.ratings.push(instructor.stats.rating.clone());
            columns.reviews.push(instructor.stats.reviews.clone());
            columns.students.push(instructor.stats.students.clone());
            columns.courses.push(instructor.stats.courses.clone());
        }
        Some(columns)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lecture {
    pub title: String,
    pub duration: String,
}

/// Everything extracted from one eligible course page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub link: String,
    pub title: String,
    /// "What you'll learn" items, comma separated
    pub topics: String,
    pub summary: String,
    pub lecture_count: String,
    pub total_duration: String,
    pub price: Option<String>,
    pub instructor_bio: String,
    pub instructors: Instructors,
    pub lectures: Vec<Lecture>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub course_link: String,
    pub customer_name: String,
    pub time_posted: String,
    pub review: String,
    pub rating: String,
}

/// Where the next listing page is, if anywhere
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageCursor {
    Next(String),
    End,
}

/// Append-only accumulator threaded through the crawl by value
#[derive(Debug, Clone, Default)]
pub struct Harvest {
    courses: Vec<CourseRecord>,
    reviews: Vec<ReviewRecord>,
}

impl Harvest {
    pub fn with_course(mut self, course: CourseRecord, reviews: Vec<ReviewRecord>) -> Self {
        self.courses.push(course);
        self.reviews.extend(reviews);
        self
    }

    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    pub fn review_count(&self) -> usize {
        self.reviews.len()
    }

    pub fn finish(self, visited: VisitedSet) -> CrawlOutput {
        CrawlOutput {
            courses: self.courses,
            reviews: self.reviews,
            visited: visited.into_vec(),
        }
    }
}

/// What a crawl hands back to the caller
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlOutput {
    pub courses: Vec<CourseRecord>,
    pub reviews: Vec<ReviewRecord>,
    /// Every link processed or excluded; pass back as `excluded_links` to resume
    pub visited: Vec<String>,
}
