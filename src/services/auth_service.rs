use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::{info, warn};
use mongodb::bson::oid::ObjectId;

use crate::config::AppConfig;
use crate::db::repository::TravelRepository;
use crate::error::AppError;
use crate::middleware::auth::Claims;
use crate::models::user::{Credentials, User};

pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    bcrypt::hash(password, cost).map_err(|e| AppError::Storage(format!("Password hashing failed: {}", e)))
}

pub fn generate_token(config: &AppConfig, user: &User) -> Result<String, AppError> {
    let user_id = user
        .id
        .ok_or_else(|| AppError::Storage("User has no id".to_string()))?;
    let now = Utc::now();

    let claims = Claims {
        sub: user.username.clone(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(config.token_ttl_hours)).timestamp() as usize,
        user_id: user_id.to_hex(),
        role: user.role(),
    };

    let header = Header::new(Algorithm::HS256);
    encode(&header, &claims, &EncodingKey::from_secret(config.jwt_secret.as_ref()))
        .map_err(|e| AppError::Storage(format!("Token generation failed: {}", e)))
}

pub fn decode_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.set_required_spec_claims(&["exp", "iat", "sub"]);

    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
}

pub async fn register(
    repo: &dyn TravelRepository,
    config: &AppConfig,
    credentials: &Credentials,
) -> Result<User, AppError> {
    let username = credentials.username.trim();
    if username.is_empty() || credentials.password.is_empty() {
        return Err(AppError::BadRequest("Please fill all fields.".to_string()));
    }

    let user = User {
        id: None,
        username: username.to_string(),
        password_hash: hash_password(&credentials.password, config.bcrypt_cost)?,
        is_admin: false,
        created_at: Some(Utc::now()),
    };
    let user = repo.create_user(user).await?;
    info!("Registered user {}", user.username);
    Ok(user)
}

/// Check credentials. Signing in with the configured admin credentials creates
/// the admin account on first use and always grants the admin role.
pub async fn authenticate(
    repo: &dyn TravelRepository,
    config: &AppConfig,
    credentials: &Credentials,
) -> Result<User, AppError> {
    let username = credentials.username.trim();
    let is_admin_login =
        username == config.admin_username && credentials.password == config.admin_password;

    let user = match repo.find_user_by_username(username).await? {
        Some(user) => {
            if !bcrypt::verify(&credentials.password, &user.password_hash).unwrap_or(false) {
                warn!("Failed sign in for {}", username);
                return Err(AppError::Unauthorized("Invalid username or password.".to_string()));
            }
            user
        }
        None if is_admin_login => register(repo, config, credentials).await?,
        None => {
            return Err(AppError::Unauthorized("Invalid username or password.".to_string()));
        }
    };

    if is_admin_login && !user.is_admin {
        promote(repo, user).await
    } else {
        Ok(user)
    }
}

async fn promote(repo: &dyn TravelRepository, mut user: User) -> Result<User, AppError> {
    let id: ObjectId = user
        .id
        .ok_or_else(|| AppError::Storage("User has no id".to_string()))?;
    repo.set_user_admin(&id, true).await?;
    info!("Granted admin role to {}", user.username);
    user.is_admin = true;
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;

    fn user() -> User {
        User {
            id: Some(ObjectId::new()),
            username: "asha".to_string(),
            password_hash: String::new(),
            is_admin: true,
            created_at: None,
        }
    }

    #[test]
    fn issued_token_round_trips_claims() {
        let config = AppConfig::default();
        let user = user();
        let token = generate_token(&config, &user).unwrap();
        let claims = decode_token(&config.jwt_secret, &token).unwrap();

        assert_eq!(claims.sub, "asha");
        assert_eq!(claims.user_id, user.id.unwrap().to_hex());
        assert_eq!(claims.role, UserRole::Admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let config = AppConfig::default();
        let token = generate_token(&config, &user()).unwrap();
        assert!(decode_token("another_secret", &token).is_err());
    }

    #[test]
    fn hashed_password_verifies() {
        let hash = hash_password("s3cret", 4).unwrap();
        assert!(bcrypt::verify("s3cret", &hash).unwrap());
        assert!(!bcrypt::verify("wrong", &hash).unwrap());
    }
}
