//! Auth service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::{
    auth::{
        AuthServiceError, IssuedApiToken, NewApiToken, format_api_token,
        generate_api_token_secret, hash_api_token, is_well_formed_api_token,
        repository::PgAuthRepository,
    },
    domain::users::records::{Requester, UserUuid},
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
        }
    }

    /// Issue a new API token for the given user.
    ///
    /// The raw token is only available in the returned value; storage keeps its hash.
    ///
    /// # Errors
    ///
    /// Returns an error if database insertion fails.
    pub async fn issue_api_token(
        &self,
        user: UserUuid,
    ) -> Result<IssuedApiToken, AuthServiceError> {
        let secret = generate_api_token_secret();
        let token = format_api_token(&secret);

        let metadata = self
            .repository
            .create_api_token(&NewApiToken {
                uuid: Uuid::now_v7(),
                user_uuid: user,
                token_hash: hash_api_token(&token),
            })
            .await?;

        Ok(IssuedApiToken { token, metadata })
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
    ) -> Result<Requester, AuthServiceError> {
        if !is_well_formed_api_token(bearer_token) {
            return Err(AuthServiceError::NotFound);
        }

        let hash = hash_api_token(bearer_token);

        let requester = self
            .repository
            .find_requester_by_token_hash(&hash)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        if let Err(error) = self.repository.touch_api_token_last_used(&hash).await {
            debug!(%error, "failed to record api token use");
        }

        Ok(requester)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn authenticate_bearer(&self, bearer_token: &str)
    -> Result<Requester, AuthServiceError>;
}

#[cfg(test)]
mod tests {
    use sqlx::query;
    use testresult::TestResult;

    use crate::{domain::users::records::UserRole, test::TestContext};

    use super::*;

    #[tokio::test]
    async fn issued_token_authenticates_as_its_user() -> TestResult {
        let ctx = TestContext::new().await;
        let admin = ctx.create_admin().await;

        let issued = ctx.auth.issue_api_token(admin.user).await?;

        assert!(issued.token.starts_with("sk_"));
        assert_eq!(issued.metadata.user_uuid, admin.user);

        let requester = ctx.auth.authenticate_bearer(&issued.token).await?;

        assert_eq!(requester.user, admin.user);
        assert_eq!(requester.role, UserRole::Admin);

        let stored: String =
            sqlx::query_scalar("SELECT token_hash FROM api_tokens WHERE uuid = $1")
                .bind(issued.metadata.uuid)
                .fetch_one(ctx.db.pool())
                .await?;

        assert_eq!(stored, hash_api_token(&issued.token));
        assert_ne!(stored, issued.token);

        Ok(())
    }

    #[tokio::test]
    async fn authenticate_records_last_use() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_customer().await;

        let issued = ctx.auth.issue_api_token(customer.user).await?;

        assert!(issued.metadata.last_used_at.is_none());

        ctx.auth.authenticate_bearer(&issued.token).await?;

        let touched: bool = sqlx::query_scalar(
            "SELECT last_used_at IS NOT NULL FROM api_tokens WHERE uuid = $1",
        )
        .bind(issued.metadata.uuid)
        .fetch_one(ctx.db.pool())
        .await?;

        assert!(touched);

        Ok(())
    }

    #[tokio::test]
    async fn unknown_or_malformed_tokens_are_not_found() {
        let ctx = TestContext::new().await;

        for token in ["", "not-a-token", format!("sk_{}", "0".repeat(64)).as_str()] {
            let result = ctx.auth.authenticate_bearer(token).await;

            assert!(
                matches!(result, Err(AuthServiceError::NotFound)),
                "expected NotFound for {token:?}, got {result:?}"
            );
        }
    }

    #[tokio::test]
    async fn revoked_token_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_customer().await;

        let issued = ctx.auth.issue_api_token(customer.user).await?;

        query("UPDATE api_tokens SET revoked_at = now() WHERE uuid = $1")
            .bind(issued.metadata.uuid)
            .execute(ctx.db.pool())
            .await?;

        let result = ctx.auth.authenticate_bearer(&issued.token).await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn token_of_deleted_user_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_customer().await;

        let issued = ctx.auth.issue_api_token(customer.user).await?;

        query("UPDATE users SET deleted_at = now() WHERE uuid = $1")
            .bind(customer.user.into_uuid())
            .execute(ctx.db.pool())
            .await?;

        let result = ctx.auth.authenticate_bearer(&issued.token).await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }
}
