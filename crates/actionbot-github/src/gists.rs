//! Gist endpoints: CRUD, forks, stars, comments.

use reqwest::{Method, StatusCode};

use crate::client::{status_error, GithubClient};
use crate::error::GithubError;
use crate::types::{Gist, GistComment, GistListKind, GistUpdate, NewGist};

impl GithubClient {
    pub async fn create_gist(&self, gist: &NewGist) -> Result<Gist, GithubError> {
        let builder = self.request(Method::POST, "/gists")?.json(gist);
        self.send_json(builder).await
    }

    /// List gists of the given kind. `username` only applies to `Public`.
    pub async fn list_gists(
        &self,
        kind: GistListKind,
        username: Option<&str>,
        per_page: u32,
        page: u32,
    ) -> Result<Vec<Gist>, GithubError> {
        let path = match (kind, username) {
            (GistListKind::User, _) => "/gists".to_string(),
            (GistListKind::Starred, _) => "/gists/starred".to_string(),
            (GistListKind::Public, Some(user)) => format!("/users/{user}/gists"),
            (GistListKind::Public, None) => "/gists/public".to_string(),
        };
        let builder = self.request(Method::GET, &path)?.query(&[
            ("per_page", per_page.to_string()),
            ("page", page.to_string()),
        ]);
        self.send_json(builder).await
    }

    pub async fn get_gist(&self, gist_id: &str) -> Result<Gist, GithubError> {
        let builder = self.request(Method::GET, &format!("/gists/{gist_id}"))?;
        self.send_json(builder).await
    }

    pub async fn update_gist(&self, gist_id: &str, update: &GistUpdate) -> Result<Gist, GithubError> {
        let builder = self
            .request(Method::PATCH, &format!("/gists/{gist_id}"))?
            .json(update);
        self.send_json(builder).await
    }

    pub async fn delete_gist(&self, gist_id: &str) -> Result<(), GithubError> {
        let builder = self.request(Method::DELETE, &format!("/gists/{gist_id}"))?;
        self.send_expecting(builder, StatusCode::NO_CONTENT).await?;
        Ok(())
    }

    pub async fn fork_gist(&self, gist_id: &str) -> Result<Gist, GithubError> {
        let builder = self.request(Method::POST, &format!("/gists/{gist_id}/forks"))?;
        self.send_json(builder).await
    }

    pub async fn star_gist(&self, gist_id: &str) -> Result<(), GithubError> {
        let builder = self
            .request(Method::PUT, &format!("/gists/{gist_id}/star"))?
            .header(reqwest::header::CONTENT_LENGTH, "0");
        self.send_expecting(builder, StatusCode::NO_CONTENT).await?;
        Ok(())
    }

    pub async fn unstar_gist(&self, gist_id: &str) -> Result<(), GithubError> {
        let builder = self.request(Method::DELETE, &format!("/gists/{gist_id}/star"))?;
        self.send_expecting(builder, StatusCode::NO_CONTENT).await?;
        Ok(())
    }

    /// `204` means starred, `404` means not starred; anything else is an error.
    pub async fn is_gist_starred(&self, gist_id: &str) -> Result<bool, GithubError> {
        let response = self
            .request(Method::GET, &format!("/gists/{gist_id}/star"))?
            .send()
            .await?;
        match response.status() {
            StatusCode::NO_CONTENT => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(status_error(response).await),
        }
    }

    pub async fn list_gist_comments(
        &self,
        gist_id: &str,
        per_page: u32,
        page: u32,
    ) -> Result<Vec<GistComment>, GithubError> {
        let builder = self
            .request(Method::GET, &format!("/gists/{gist_id}/comments"))?
            .query(&[
                ("per_page", per_page.to_string()),
                ("page", page.to_string()),
            ]);
        self.send_json(builder).await
    }

    pub async fn add_gist_comment(
        &self,
        gist_id: &str,
        body: &str,
    ) -> Result<GistComment, GithubError> {
        let builder = self
            .request(Method::POST, &format!("/gists/{gist_id}/comments"))?
            .json(&serde_json::json!({ "body": body }));
        self.send_json(builder).await
    }

    /// Edit a comment by id. The id is globally unique, so no gist id is needed.
    pub async fn edit_gist_comment(
        &self,
        comment_id: &str,
        body: &str,
    ) -> Result<GistComment, GithubError> {
        let builder = self
            .request(Method::PATCH, &format!("/gists/comments/{comment_id}"))?
            .json(&serde_json::json!({ "body": body }));
        self.send_json(builder).await
    }

    pub async fn delete_gist_comment(&self, comment_id: &str) -> Result<(), GithubError> {
        let builder = self.request(Method::DELETE, &format!("/gists/comments/{comment_id}"))?;
        self.send_expecting(builder, StatusCode::NO_CONTENT).await?;
        Ok(())
    }
}
