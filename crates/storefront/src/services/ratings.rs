//! Ratings service.
//!
//! Fetches and caches reviews per product, handles review submission, and
//! holds the review-viewer modal navigation state.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::instrument;

use orchard_core::ProductId;

use crate::backend::{BackendClient, BackendError, NewRating, Rating};

/// Cached, read-through access to product reviews.
#[derive(Clone)]
pub struct RatingService {
    inner: Arc<RatingServiceInner>,
}

struct RatingServiceInner {
    backend: BackendClient,
    cache: Cache<ProductId, Arc<Vec<Rating>>>,
}

impl RatingService {
    /// Create a new rating service over the given backend client.
    #[must_use]
    pub fn new(backend: BackendClient) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(RatingServiceInner { backend, cache }),
        }
    }

    /// Get the reviews for a product, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn ratings_for(
        &self,
        product_id: ProductId,
    ) -> Result<Arc<Vec<Rating>>, BackendError> {
        if let Some(ratings) = self.inner.cache.get(&product_id).await {
            tracing::debug!("Cache hit for ratings");
            return Ok(ratings);
        }

        let ratings: Vec<Rating> = self
            .inner
            .backend
            .get_with_query("/api/ratings", &[("product_id", product_id)], None)
            .await?;

        let ratings = Arc::new(ratings);
        self.inner.cache.insert(product_id, ratings.clone()).await;
        Ok(ratings)
    }

    /// Submit a review on behalf of the signed-in user and invalidate the
    /// product's cached reviews.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token, rating), fields(product_id = %rating.product_id))]
    pub async fn submit(&self, token: &str, rating: &NewRating) -> Result<Rating, BackendError> {
        let created: Rating = self
            .inner
            .backend
            .post("/api/ratings", rating, Some(token))
            .await?;

        self.inner.cache.invalidate(&rating.product_id).await;
        Ok(created)
    }

    /// Average star rating across the given reviews, if any.
    #[must_use]
    pub fn average_stars(ratings: &[Rating]) -> Option<f64> {
        if ratings.is_empty() {
            return None;
        }
        #[allow(clippy::cast_precision_loss)] // Review counts stay tiny
        let sum: f64 = ratings.iter().map(|r| f64::from(r.stars)).sum();
        #[allow(clippy::cast_precision_loss)]
        Some(sum / ratings.len() as f64)
    }
}

// =============================================================================
// Review Viewer Navigation
// =============================================================================

/// Navigation state for the review-viewer modal.
///
/// Tracks which review is open and which of its photos is showing. Review
/// navigation clamps at the ends and resets the photo index; photo
/// navigation wraps within the open review.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewViewer {
    /// Photo count per review, in display order.
    image_counts: Vec<usize>,
    selected: Option<Selection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Selection {
    review: usize,
    image: usize,
}

impl ReviewViewer {
    /// Create a viewer over reviews with the given photo counts.
    #[must_use]
    pub const fn new(image_counts: Vec<usize>) -> Self {
        Self {
            image_counts,
            selected: None,
        }
    }

    /// Open the modal on a review. Returns false if the index is out of range.
    pub fn open(&mut self, review: usize) -> bool {
        if review >= self.image_counts.len() {
            return false;
        }
        self.selected = Some(Selection { review, image: 0 });
        true
    }

    /// Close the modal.
    pub fn close(&mut self) {
        self.selected = None;
    }

    /// The open (review, image) indices, if the modal is open.
    #[must_use]
    pub fn selection(&self) -> Option<(usize, usize)> {
        self.selected.map(|s| (s.review, s.image))
    }

    /// Move to the next review, clamping at the last one.
    pub fn next_review(&mut self) {
        if let Some(s) = &mut self.selected
            && s.review + 1 < self.image_counts.len()
        {
            s.review += 1;
            s.image = 0;
        }
    }

    /// Move to the previous review, clamping at the first one.
    pub fn prev_review(&mut self) {
        if let Some(s) = &mut self.selected
            && s.review > 0
        {
            s.review -= 1;
            s.image = 0;
        }
    }

    /// Show the next photo of the open review, wrapping around.
    pub fn next_image(&mut self) {
        if let Some(s) = &mut self.selected {
            let count = self.image_counts.get(s.review).copied().unwrap_or(0);
            if count > 0 {
                s.image = (s.image + 1) % count;
            }
        }
    }

    /// Show the previous photo of the open review, wrapping around.
    pub fn prev_image(&mut self) {
        if let Some(s) = &mut self.selected {
            let count = self.image_counts.get(s.review).copied().unwrap_or(0);
            if count > 0 {
                s.image = (s.image + count - 1) % count;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_out_of_range() {
        let mut viewer = ReviewViewer::new(vec![2, 0]);
        assert!(!viewer.open(2));
        assert_eq!(viewer.selection(), None);
    }

    #[test]
    fn test_image_navigation_wraps() {
        let mut viewer = ReviewViewer::new(vec![3]);
        assert!(viewer.open(0));

        viewer.next_image();
        viewer.next_image();
        assert_eq!(viewer.selection(), Some((0, 2)));
        viewer.next_image();
        assert_eq!(viewer.selection(), Some((0, 0)));

        viewer.prev_image();
        assert_eq!(viewer.selection(), Some((0, 2)));
    }

    #[test]
    fn test_review_navigation_clamps_and_resets_image() {
        let mut viewer = ReviewViewer::new(vec![2, 1]);
        assert!(viewer.open(0));
        viewer.next_image();
        assert_eq!(viewer.selection(), Some((0, 1)));

        viewer.next_review();
        assert_eq!(viewer.selection(), Some((1, 0)));

        // Clamped at the last review
        viewer.next_review();
        assert_eq!(viewer.selection(), Some((1, 0)));

        viewer.prev_review();
        viewer.prev_review();
        assert_eq!(viewer.selection(), Some((0, 0)));
    }

    #[test]
    fn test_image_navigation_on_photoless_review() {
        let mut viewer = ReviewViewer::new(vec![0]);
        assert!(viewer.open(0));
        viewer.next_image();
        assert_eq!(viewer.selection(), Some((0, 0)));
    }

    #[test]
    fn test_close() {
        let mut viewer = ReviewViewer::new(vec![1]);
        assert!(viewer.open(0));
        viewer.close();
        assert_eq!(viewer.selection(), None);
    }
}
