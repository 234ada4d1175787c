//! Rating route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use orchard_core::ProductId;

use crate::backend::{NewRating, Rating};
use crate::error::{AppError, FieldError, Result};
use crate::middleware::RequireAuth;
use crate::services::ratings::RatingService;
use crate::state::AppState;

/// Reviews for a product plus the derived average.
#[derive(Debug, Serialize)]
pub struct RatingList {
    pub items: Vec<Rating>,
    pub average: Option<f64>,
}

/// Review submission body.
#[derive(Debug, Deserialize)]
pub struct CreateRatingInput {
    pub stars: i32,
    pub comment: String,
    #[serde(default)]
    pub images: Vec<String>,
}

fn validate(input: &CreateRatingInput) -> Result<()> {
    let mut fields = Vec::new();

    if !(1..=5).contains(&input.stars) {
        fields.push(FieldError::new("stars", "must be between 1 and 5"));
    }
    if input.comment.trim().is_empty() {
        fields.push(FieldError::new("comment", "must not be empty"));
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(fields))
    }
}

/// Reviews for a product, cached per product id.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<RatingList>> {
    let ratings = state.ratings().ratings_for(ProductId::new(id)).await?;
    Ok(Json(RatingList {
        average: RatingService::average_stars(&ratings),
        items: ratings.as_ref().clone(),
    }))
}

/// Submit a review for a product. Requires auth.
#[instrument(skip(state, auth, input))]
pub async fn create(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    RequireAuth(auth): RequireAuth,
    Json(input): Json<CreateRatingInput>,
) -> Result<(StatusCode, Json<Rating>)> {
    validate(&input)?;

    let rating = NewRating {
        product_id: ProductId::new(id),
        stars: input.stars,
        comment: input.comment,
        images: input.images,
    };

    let created = state.ratings().submit(auth.bearer(), &rating).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_out_of_range_stars() {
        let input = CreateRatingInput {
            stars: 0,
            comment: "fine".to_string(),
            images: vec![],
        };
        assert!(matches!(validate(&input), Err(AppError::Validation(_))));

        let input = CreateRatingInput {
            stars: 6,
            comment: "fine".to_string(),
            images: vec![],
        };
        assert!(matches!(validate(&input), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_blank_comment() {
        let input = CreateRatingInput {
            stars: 4,
            comment: "   ".to_string(),
            images: vec![],
        };
        let Err(AppError::Validation(fields)) = validate(&input) else {
            panic!("expected validation error");
        };
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field, "comment");
    }

    #[test]
    fn test_validate_accepts_good_input() {
        let input = CreateRatingInput {
            stars: 5,
            comment: "Lovely grain.".to_string(),
            images: vec![],
        };
        assert!(validate(&input).is_ok());
    }
}
