//! Saved-page builders for crawling a fake course site with `SnapshotClient`.

use crate::client::SnapshotClient;
use crate::config::{RetryConfig, ScraperConfig};
use crate::crawlers::query;

pub const TERM: &str = "python machine learning";
pub const CATEGORY: &str = "Machine Learning";

pub fn config() -> ScraperConfig {
    ScraperConfig {
        wait_timeout_ms: 10,
        toggle_timeout_ms: 10,
        settle_delay_ms: 0,
        retry: RetryConfig {
            max_attempts: 2,
            backoff_ms: 0,
        },
        review_expand_attempts: 2,
        ..ScraperConfig::default()
    }
}

pub fn search_url() -> String {
    query::search_url(&config(), TERM).unwrap().to_string()
}

/// Listing page `n`; the first one is the search page itself
pub fn page_url(n: usize) -> String {
    if n == 1 {
        search_url()
    } else {
        format!("{}&p={}", search_url(), n)
    }
}

pub fn course_url(slug: &str) -> String {
    format!("https://www.udemy.com/course/{slug}/")
}

fn filter_group(name: &str, options: &[&str]) -> String {
    let options: String = options
        .iter()
        .map(|option| {
            format!(
                r#"<label><input type="checkbox"><span class="filter-option--checkbox-content--4HaUs">{option} (1,024)</span></label>"#
            )
        })
        .collect();
    format!(
        r#"<fieldset name="{name}">
            <label class="js-panel-toggler" aria-expanded="false">{name}</label>
            {options}
            <label role="button">Show more</label>
        </fieldset>"#
    )
}

/// A results page listing `slugs`, optionally with a pager
#[derive(Debug, Default)]
pub struct Listing<'a> {
    pub slugs: &'a [&'a str],
    /// Page number the "Next" link points at
    pub next: Option<usize>,
    /// Render the pager's last item as disabled
    pub exhausted: bool,
    /// Only the search page carries the filter panel
    pub with_filters: bool,
}

impl Listing<'_> {
    pub fn html(&self) -> String {
        let filters = if self.with_filters {
            format!(
                r#"<div class="filter-panel--sidebar--L2lAU"><div class="panel--content-wrapper--1yFBX">{}{}</div></div>"#,
                filter_group("Topic", &["Data Science", CATEGORY, "Deep Learning"]),
                filter_group("Language", &["English", "Español"]),
            )
        } else {
            String::new()
        };

        let cards: String = self
            .slugs
            .iter()
            .map(|slug| {
                format!(
                    r#"<div class="course-card"><a href="/course/{slug}/?src=search">{slug}</a><a href="/user/someone/">Instructor profile</a></div>"#
                )
            })
            .collect();

        let pager = match self.next {
            Some(n) => {
                let href = page_url(n).replace('&', "&amp;");
                let last_class = if self.exhausted { r#" class="disabled""# } else { "" };
                format!(
                    r#"<ul class="pagination pagination-expanded">
                        <li><a aria-label="Next" href="{href}">Next</a></li>
                        <li{last_class}><span>Last</span></li>
                    </ul>"#
                )
            }
            None => String::new(),
        };

        format!(
            r#"<html><body>{filters}<div data-purpose="search-course-cards">{cards}</div>{pager}</body></html>"#
        )
    }
}

/// Which landing page markup a course is rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Markup {
    Original,
    Revised,
}

#[derive(Debug, Clone)]
pub struct Course {
    pub slug: &'static str,
    pub title: &'static str,
    pub markup: Markup,
    pub enrollment: &'static str,
    pub ratings: &'static str,
    pub language: &'static str,
    pub instructors: Vec<&'static str>,
    pub reviews: Vec<(&'static str, &'static str)>,
    /// Leave out the title, which every course page must have
    pub without_title: bool,
}

impl Course {
    pub fn new(slug: &'static str) -> Self {
        Self {
            slug,
            title: "Machine Learning A-Z",
            markup: Markup::Original,
            enrollment: "1,200",
            ratings: "80",
            language: "English",
            instructors: vec!["Ada Lovelace"],
            reviews: vec![
                ("Grace H.", "Clear explanations."),
                ("Alan T.", "Good exercises."),
            ],
            without_title: false,
        }
    }

    pub fn url(&self) -> String {
        course_url(self.slug)
    }

    pub fn html(&self) -> String {
        let body = match self.markup {
            Markup::Original => self.original(),
            Markup::Revised => self.revised(),
        };
        format!("<html><body>{}{}</body></html>", body, self.reviews_html())
    }

    fn title_html(&self) -> String {
        if self.without_title {
            String::new()
        } else {
            format!("<h1>{}</h1>", self.title)
        }
    }

    fn stats(&self, tag: &str, class: &str) -> String {
        ["4.6 Instructor Rating", "1,000 Reviews", "20,000 Students", "4 Courses"]
            .iter()
            .map(|value| format!(r#"<{tag} class="{class}">{value}</{tag}>"#))
            .collect()
    }

    fn original(&self) -> String {
        let instructors: String = self
            .instructors
            .iter()
            .map(|name| {
                format!(
                    r#"<div class="instructor--instructor--2qudS">
                        <span class="instructor--title__link--1NJ6S">{name}</span>
                        {stats}
                        <div data-purpose="safely-set-inner-html:trusted-html:content"><p>{name} builds models.</p></div>
                    </div>"#,
                    stats = self.stats("span", "instructor--instructor__stat-value--2Kwe1"),
                )
            })
            .collect();

        format!(
            r#"{title}
            <div data-content-group="Landing Page">
                <div data-purpose="enrollment">{enrollment} students</div>
                <div class="rate-count">4.5 ({ratings} ratings)</div>
                <div class="clp-lead__locale">{language}</div>
            </div>
            <ul>
                <li class="what-you-get__text">Regression</li>
                <li class="what-you-get__text">Classification</li>
            </ul>
            <div class="description">
                <div class="description__title">Description</div>
                <div class="description__body">
                    <p>Learn machine learning with Python.</p>
                    <p>Hands-on projects throughout.</p>
                    <button>Show more</button><span>Show</span><span>less</span>
                </div>
            </div>
            <span class="dib">2 lectures</span>
            <span class="curriculum-header-length">1h 5m</span>
            <div data-purpose="course-curriculum">
                <div class="title">Welcome</div><div class="details">05:00</div>
                <div class="title">Linear regression</div><div class="details">01:00:00</div>
            </div>
            <div data-purpose="course-old-price-text"><s><span>$94.99</span></s></div>
            {instructors}"#,
            title = self.title_html(),
            enrollment = self.enrollment,
            ratings = self.ratings,
            language = self.language,
        )
    }

    fn revised(&self) -> String {
        let instructors: String = self
            .instructors
            .iter()
            .map(|name| {
                format!(
                    r#"<div class="styles--instructors--2JsS3">
                        <a class="instructor--instructor__title--34ItB">{name}</a>
                        <div class="instructor--instructor__image-and-stats--1IqE7"><ul>{stats}</ul></div>
                        <div data-purpose="description-content"><p>{name} builds models.</p></div>
                    </div>"#,
                    stats = self.stats("li", "stat"),
                )
            })
            .collect();

        format!(
            r#"<div class="course-landing-page__main-content">
                {title}
                <div data-purpose="enrollment">{enrollment} students</div>
                <div data-purpose="rating">
                    <span>4.6</span>
                    <span>({ratings} ratings)</span>
                </div>
                <div class="clp-lead__locale--abc">{language}</div>
            </div>
            <div class="what-you-will-learn--objectives-list--2cWZN">Regression</div>
            <div class="what-you-will-learn--objectives-list--2cWZN">Classification</div>
            <div data-purpose="safely-set-inner-html:description:description">
                <p>Learn machine learning with Python.</p>
                <p>Show</p><p>more</p><p>less</p>
            </div>
            <div data-purpose="curriculum-stats">2 sections • 2 lectures • 1h 5m total length</div>
            <div class="section--lecture-title-and-description--3lul7">Welcome</div>
            <span class="section--lecture-content--2I4Bi">05:00</span>
            <div class="section--lecture-title-and-description--3lul7">Linear regression</div>
            <span class="section--lecture-content--2I4Bi">01:00:00</span>
            {instructors}"#,
            title = self.title_html(),
            enrollment = self.enrollment,
            ratings = self.ratings,
            language = self.language,
        )
    }

    fn reviews_html(&self) -> String {
        let reviews: String = self
            .reviews
            .iter()
            .map(|(name, comment)| {
                format!(
                    r#"<div class="review">
                        <div data-purpose="review-detail-user-name">{name}</div>
                        <div data-purpose="star-rating-shell" aria-label="Rating: 5.0 out of 5"></div>
                        <div class="individual-review--detail-created--1liJC">a week ago</div>
                        <div data-purpose="review-comment-content"><p>{comment}</p></div>
                    </div>"#
                )
            })
            .collect();
        format!(r#"<div data-purpose="landing-page-review-list">{reviews}</div>"#)
    }
}

/// A site with the given listing pages (page 1 first) and courses
pub fn site(listings: &[Listing<'_>], courses: &[Course]) -> SnapshotClient {
    let mut client = SnapshotClient::new();
    for (index, listing) in listings.iter().enumerate() {
        client = client.with_page(page_url(index + 1), listing.html());
    }
    for course in courses {
        client = client.with_page(course.url(), course.html());
    }
    client
}
