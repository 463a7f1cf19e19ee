use super::blogs::blog_form;
use super::{ApiError, BlogApi};
use crate::http::{PendingRequest, Transport};
use crate::types::{BlogPage, BlogPatch, FeedbackPage, MessageResponse, UserPage};

/// Moderation routes. They need an admin session but share the refresh endpoint
/// with reader routes.
impl<T: Transport> BlogApi<T> {
    pub async fn admin_users(&self, page: u32) -> Result<UserPage, ApiError> {
        self.protected_json(PendingRequest::get(self.paged("/api/admin/list-users/", page)))
            .await
    }

    pub async fn admin_toggle_user(&self, user_id: i64) -> Result<MessageResponse, ApiError> {
        self.protected_message(PendingRequest::patch(format!(
            "/api/admin/block-unblock-user/{user_id}"
        )))
        .await
    }

    pub async fn admin_blogs(&self, page: u32) -> Result<BlogPage, ApiError> {
        self.protected_json(PendingRequest::get(self.paged("/api/admin/landing/", page)))
            .await
    }

    pub async fn admin_update_blog(
        &self,
        blog_id: i64,
        patch: &BlogPatch,
    ) -> Result<MessageResponse, ApiError> {
        let form = blog_form(
            patch.title.as_deref(),
            patch.content.as_deref(),
            patch.image.as_ref(),
        );
        self.protected_message(
            PendingRequest::patch(format!("/api/admin/blogs/{blog_id}")).multipart(form),
        )
        .await
    }

    pub async fn admin_toggle_blog(&self, blog_id: i64) -> Result<MessageResponse, ApiError> {
        self.protected_message(PendingRequest::patch(format!(
            "/api/admin/blogs/{blog_id}/block/"
        )))
        .await
    }

    /// All feedback on a blog, listed or not. The backend serves this listing on PATCH.
    pub async fn admin_feedbacks(&self, blog_id: i64, page: u32) -> Result<FeedbackPage, ApiError> {
        let path = self.paged(&format!("/api/admin/feedbacks/{blog_id}/"), page);
        self.protected_json(PendingRequest::patch(path)).await
    }

    pub async fn admin_toggle_feedback(
        &self,
        feedback_id: i64,
    ) -> Result<MessageResponse, ApiError> {
        self.protected_message(PendingRequest::patch(format!(
            "/api/admin/feedbacks/{feedback_id}/toggle/"
        )))
        .await
    }
}
