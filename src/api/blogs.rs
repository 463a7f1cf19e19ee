use super::{ApiError, BlogApi};
use crate::http::{FilePart, MultipartBody, PendingRequest, Transport};
use crate::types::{Blog, BlogDraft, BlogPage, BlogPatch, ImageUpload, MessageResponse};
use serde::Deserialize;

/// Reader listings wrap the page in `{"blogs": {...}}`; older backends send a bare list.
#[derive(Deserialize)]
#[serde(untagged)]
enum BlogsEnvelope {
    Paged { blogs: BlogPage },
    Flat { blogs: Vec<Blog> },
}

impl BlogsEnvelope {
    fn into_page(self, requested: u32) -> BlogPage {
        match self {
            Self::Paged { blogs } => blogs,
            Self::Flat { blogs } => BlogPage {
                blogs,
                page: requested.max(1),
                total_pages: None,
            },
        }
    }
}

#[derive(Deserialize)]
struct BlogEnvelope {
    blog: Blog,
}

pub(super) fn blog_form(
    title: Option<&str>,
    content: Option<&str>,
    image: Option<&ImageUpload>,
) -> MultipartBody {
    let mut form = MultipartBody::new();
    if let Some(title) = title {
        form = form.text("title", title.trim());
    }
    if let Some(content) = content {
        form = form.text("content", content.trim());
    }
    if let Some(image) = image {
        form = form.file(FilePart {
            field: "image".to_string(),
            file_name: image.file_name.clone(),
            mime: image.mime.clone(),
            bytes: image.bytes.clone(),
        });
    }
    form
}

impl<T: Transport> BlogApi<T> {
    /// Everyone's posts.
    pub async fn landing(&self, page: u32) -> Result<BlogPage, ApiError> {
        let envelope: BlogsEnvelope = self
            .protected_json(PendingRequest::get(self.paged("/api/landing/", page)))
            .await?;
        Ok(envelope.into_page(page))
    }

    /// The signed-in user's posts.
    pub async fn my_blogs(&self, page: u32) -> Result<BlogPage, ApiError> {
        let envelope: BlogsEnvelope = self
            .protected_json(PendingRequest::get(self.paged("/api/blogs/", page)))
            .await?;
        Ok(envelope.into_page(page))
    }

    pub async fn view_blog(&self, blog_id: i64) -> Result<Blog, ApiError> {
        let envelope: BlogEnvelope = self
            .protected_json(PendingRequest::get(format!("/api/blog/{blog_id}/view/")))
            .await?;
        Ok(envelope.blog)
    }

    pub async fn create_blog(&self, draft: &BlogDraft) -> Result<MessageResponse, ApiError> {
        let form = blog_form(
            Some(&draft.title),
            Some(&draft.content),
            draft.image.as_ref(),
        );
        self.protected_message(PendingRequest::post("/api/blogs/").multipart(form))
            .await
    }

    pub async fn update_blog(
        &self,
        blog_id: i64,
        patch: &BlogPatch,
    ) -> Result<MessageResponse, ApiError> {
        let form = blog_form(
            patch.title.as_deref(),
            patch.content.as_deref(),
            patch.image.as_ref(),
        );
        self.protected_message(PendingRequest::patch(format!("/api/blogs/{blog_id}")).multipart(form))
            .await
    }

    pub async fn delete_blog(&self, blog_id: i64) -> Result<MessageResponse, ApiError> {
        self.protected_message(PendingRequest::delete(format!("/api/blogs/{blog_id}/delete/")))
            .await
    }

    /// Toggles the caller's like; a second like removes it.
    pub async fn like(&self, blog_id: i64) -> Result<MessageResponse, ApiError> {
        self.protected_message(PendingRequest::post(format!("/api/blogs/{blog_id}/like")))
            .await
    }

    pub async fn dislike(&self, blog_id: i64) -> Result<MessageResponse, ApiError> {
        self.protected_message(PendingRequest::post(format!("/api/blogs/{blog_id}/dislike")))
            .await
    }
}
