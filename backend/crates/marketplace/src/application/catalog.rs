//! Catalog Use Case
//!
//! Course listing with name search, price ordering and fixed-size pages,
//! plus a small random pick for the dashboard.

use std::sync::Arc;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::application::config::MarketplaceConfig;
use crate::domain::entity::course::Course;
use crate::domain::repository::CourseRepository;
use crate::error::MarketResult;

/// Catalog ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSort {
    /// Alphabetical by name
    #[default]
    Name,
    /// Highest price first
    PriceHighest,
    /// Lowest price first
    PriceLowest,
}

/// Catalog search parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogQuery {
    /// Case-insensitive substring of the course name; empty matches all
    pub text: String,
    pub sort: CatalogSort,
    /// Zero-based page index
    pub page: usize,
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Zero-based index of this page, clamped to the last page
    pub page: usize,
    /// Always at least 1
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    /// Split `items` into pages of `page_size` and return page `page`
    pub fn paginate(items: Vec<T>, page: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total_items = items.len();
        let total_pages = total_items.div_ceil(page_size).max(1);
        let page = page.min(total_pages - 1);

        let items = items
            .into_iter()
            .skip(page * page_size)
            .take(page_size)
            .collect();

        Self {
            items,
            page,
            total_pages,
            total_items,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }
}

pub struct CatalogUseCase<C>
where
    C: CourseRepository,
{
    course_repo: Arc<C>,
    config: Arc<MarketplaceConfig>,
}

impl<C> CatalogUseCase<C>
where
    C: CourseRepository,
{
    pub fn new(course_repo: Arc<C>, config: Arc<MarketplaceConfig>) -> Self {
        Self {
            course_repo,
            config,
        }
    }

    /// Every course, ordered by name
    pub async fn list(&self) -> MarketResult<Vec<Course>> {
        self.course_repo.list_all().await
    }

    /// Up to `count` distinct courses in random order
    pub async fn featured(&self, count: usize) -> MarketResult<Vec<Course>> {
        let courses = self.course_repo.list_all().await?;
        Ok(pick_random(courses, count, &mut rand::rng()))
    }

    pub async fn search(&self, query: &CatalogQuery) -> MarketResult<Page<Course>> {
        let courses = self.course_repo.list_all().await?;
        let matching = filter_and_sort(courses, &query.text, query.sort);

        Ok(Page::paginate(
            matching,
            query.page,
            self.config.catalog_page_size,
        ))
    }
}

fn pick_random<R>(mut courses: Vec<Course>, count: usize, rng: &mut R) -> Vec<Course>
where
    R: Rng + ?Sized,
{
    courses.shuffle(rng);
    courses.truncate(count);
    courses
}

fn filter_and_sort(courses: Vec<Course>, text: &str, sort: CatalogSort) -> Vec<Course> {
    let text = text.trim();
    let mut matching: Vec<Course> = courses
        .into_iter()
        .filter(|c| text.is_empty() || c.name.contains_ignore_case(text))
        .collect();

    // Stable sorts keep name order among equal prices
    match sort {
        CatalogSort::Name => matching.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str())),
        CatalogSort::PriceHighest => matching.sort_by(|a, b| b.price.cmp(&a.price)),
        CatalogSort::PriceLowest => matching.sort_by(|a, b| a.price.cmp(&b.price)),
    }

    matching
}
