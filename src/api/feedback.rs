use super::{ApiError, BlogApi};
use crate::http::{PendingRequest, Transport};
use crate::types::{CommentRequest, FeedbackPage, MessageResponse};

fn comment_body(comment: &str) -> CommentRequest {
    CommentRequest {
        comment: comment.trim().to_string(),
    }
}

impl<T: Transport> BlogApi<T> {
    pub async fn feedbacks(&self, blog_id: i64, page: u32) -> Result<FeedbackPage, ApiError> {
        let path = self.paged(&format!("/api/blogs/{blog_id}/feedbacks"), page);
        self.protected_json(PendingRequest::get(path)).await
    }

    /// The backend allows one feedback per user per blog.
    pub async fn add_feedback(
        &self,
        blog_id: i64,
        comment: &str,
    ) -> Result<MessageResponse, ApiError> {
        let request = PendingRequest::post(format!("/api/blogs/{blog_id}/feedback"))
            .json(&comment_body(comment))?;
        self.protected_message(request).await
    }

    pub async fn edit_feedback(
        &self,
        feedback_id: i64,
        comment: &str,
    ) -> Result<MessageResponse, ApiError> {
        let request = PendingRequest::put(format!("/api/blogs/feedback/{feedback_id}"))
            .json(&comment_body(comment))?;
        self.protected_message(request).await
    }

    pub async fn delete_feedback(&self, feedback_id: i64) -> Result<MessageResponse, ApiError> {
        self.protected_message(PendingRequest::delete(format!(
            "/api/blogs/feedback/{feedback_id}"
        )))
        .await
    }
}
