//! Data Transfer Objects (DTOs).

mod auth_dto;
mod cache_dto;
mod favorite_dto;
mod property_dto;
mod user_dto;

pub use auth_dto::*;
pub use cache_dto::*;
pub use favorite_dto::*;
pub use property_dto::*;
pub use user_dto::*;

use haven_core::PageRequest;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// `?page=&limit=` query for paginated lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Page number, 1-indexed (default 1)
    pub page: Option<u32>,
    /// Items per page (default 10, max 100)
    pub limit: Option<u32>,
}

impl ListQuery {
    #[must_use]
    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_options(self.page, self.limit)
    }
}

/// Simple message response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
