use std::sync::Arc;

use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use tracing::{error, info, instrument};

use crate::dto::user_dto::{AuthResponse, UpdateProfileRequest, UserDto};
use crate::model::user::{User, ROLE_USER};
use crate::repository::user_repo::{UserRepository, UserRepositoryImpl};
use crate::util::error::ServiceError;
use crate::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl, TokenPair};
use crate::util::password::{PasswordUtils, PasswordUtilsImpl};

#[async_trait]
pub trait UserService: Send + Sync {
    async fn register(&self, name: String, email: String, password: String)
        -> Result<AuthResponse, ServiceError>;
    async fn login(&self, email: String, password: String) -> Result<AuthResponse, ServiceError>;
    async fn refresh_token(&self, refresh_token: String) -> Result<TokenPair, ServiceError>;
    async fn get_profile(&self, id: ObjectId) -> Result<UserDto, ServiceError>;
    async fn update_profile(
        &self,
        target: ObjectId,
        caller: ObjectId,
        request: UpdateProfileRequest,
    ) -> Result<UserDto, ServiceError>;
}

pub struct UserServiceImpl {
    pub user_repo: Arc<UserRepositoryImpl>,
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
}

impl UserServiceImpl {
    pub fn new(user_repo: Arc<UserRepositoryImpl>, jwt_utils: Arc<JwtTokenUtilsImpl>) -> Self {
        Self {
            user_repo,
            jwt_utils,
        }
    }

    fn token_pair_for(&self, user: &User) -> Result<TokenPair, ServiceError> {
        self.jwt_utils
            .generate_token_pair(
                &user.id.as_ref().map(|id| id.to_hex()).unwrap_or_default(),
                &user.email,
                &user.role,
            )
            .map_err(|e| ServiceError::InternalError(format!("JWT error: {}", e)))
    }

    /// Insert a user with the given role; shared by registration and the
    /// first-admin bootstrap.
    pub async fn create_user(
        &self,
        name: String,
        email: String,
        password: String,
        role: &str,
    ) -> Result<User, ServiceError> {
        if let Err(problems) = PasswordUtilsImpl::validate_password_strength(&password) {
            return Err(ServiceError::InvalidInput(problems.join("; ")));
        }
        let hash = PasswordUtilsImpl::hash_password(&password)
            .map_err(|e| ServiceError::InvalidInput(format!("Password hash error: {}", e)))?;

        let user = User {
            id: None,
            name,
            email,
            password_hash: hash,
            role: role.to_string(),
            created_at: None,
            updated_at: None,
        };
        // The unique email index turns a duplicate registration into Conflict.
        let inserted = self.user_repo.insert(user).await.map_err(|e| {
            error!("Failed to insert user: {e}");
            match ServiceError::from(e) {
                ServiceError::Conflict(_) => {
                    ServiceError::Conflict("A user with this email already exists".to_string())
                }
                other => other,
            }
        })?;
        Ok(inserted)
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    #[instrument(skip(self, password), fields(email = %email))]
    async fn register(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> Result<AuthResponse, ServiceError> {
        info!("Registering new user");
        let user = self.create_user(name, email, password, ROLE_USER).await?;
        let tokens = self.token_pair_for(&user)?;
        Ok(AuthResponse {
            user: UserDto::from(user),
            tokens,
        })
    }

    #[instrument(skip(self, password), fields(email = %email))]
    async fn login(&self, email: String, password: String) -> Result<AuthResponse, ServiceError> {
        info!("User login attempt");
        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

        let valid = PasswordUtilsImpl::verify_password(&password, &user.password_hash)
            .map_err(|e| ServiceError::InvalidInput(format!("Password verify error: {}", e)))?;
        if !valid {
            error!("Invalid credentials for user: {}", email);
            return Err(ServiceError::Unauthorized("Invalid credentials".to_string()));
        }

        let tokens = self.token_pair_for(&user)?;
        info!("User logged in successfully");
        Ok(AuthResponse {
            user: UserDto::from(user),
            tokens,
        })
    }

    #[instrument(skip(self, refresh_token))]
    async fn refresh_token(&self, refresh_token: String) -> Result<TokenPair, ServiceError> {
        let claims = self
            .jwt_utils
            .validate_refresh_token(&refresh_token)
            .map_err(|e| ServiceError::InvalidInput(format!("Invalid refresh token: {}", e)))?;
        self.jwt_utils
            .generate_token_pair(&claims.sub, &claims.email, &claims.role)
            .map_err(|e| ServiceError::InternalError(format!("JWT error: {}", e)))
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_profile(&self, id: ObjectId) -> Result<UserDto, ServiceError> {
        let user = self
            .user_repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;
        Ok(UserDto::from(user))
    }

    #[instrument(skip(self, request), fields(target = %target, caller = %caller))]
    async fn update_profile(
        &self,
        target: ObjectId,
        caller: ObjectId,
        request: UpdateProfileRequest,
    ) -> Result<UserDto, ServiceError> {
        let user = self
            .user_repo
            .find_by_id(&target)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

        // Only the account owner may update the profile.
        if target != caller {
            return Err(ServiceError::Forbidden(
                "Not authorized to update this profile".to_string(),
            ));
        }

        let updated = match request.name {
            Some(name) => {
                self.user_repo
                    .update_fields(target, doc! { "name": name })
                    .await?
            }
            None => user,
        };
        Ok(UserDto::from(updated))
    }
}
