mod categories;
mod questions;
mod quizzes;

use std::collections::BTreeMap;

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quizzes_router;

use crate::db::Category;

use super::error::ApiError;

pub type ApiResponse<T> = Result<T, ApiError>;

/// `{id: type}` map as the game client expects it.
fn format_categories(categories: Vec<Category>) -> BTreeMap<i64, String> {
    categories.into_iter().map(|c| (c.id, c.kind)).collect()
}
