use crate::{
    database::MongoDB,
    models::{User, UserProfile},
    utils::error::AppError,
};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::{doc, oid::ObjectId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

pub const BUCKETLISTS_URL: &str = "/api/v1/bucketlists/";
pub const LOGIN_URL: &str = "/api/v1/auth/login";
pub const REGISTER_URL: &str = "/api/v1/auth/register";

// JWT Claims. The user identifier is the only identity claim; no mutable
// user state is embedded, so logout never requires re-signing anything.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user_id
    pub iat: usize,  // issued at
    pub exp: usize,  // expiration
    pub jti: String, // JWT ID
    pub aud: String, // audience
    pub iss: String, // issuer
}

// Request/Response structures
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub access_token: String,
    pub profile: UserProfile,
    pub bucketlists_url: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RegisterResponse {
    pub success: bool,
    pub profile: UserProfile,
    pub login_url: String,
}

fn get_jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "default-secret-change-me".to_string())
}

fn get_jwt_issuer() -> String {
    std::env::var("JWT_ISSUER").unwrap_or_else(|_| "bucketlist-service".to_string())
}

fn get_jwt_audience() -> String {
    std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "bucketlist-api".to_string())
}

fn get_token_expiration_secs() -> i64 {
    std::env::var("AUTH_TOKEN_EXPIRATION")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3600)
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};
    matches!(
        *err.kind,
        ErrorKind::Write(WriteFailure::WriteError(ref write_error)) if write_error.code == 11000
    )
}

// Generate JWT token
pub fn generate_jwt(user: &User) -> Result<String, AppError> {
    let iat = Utc::now().timestamp() as usize;
    let exp = (Utc::now() + Duration::seconds(get_token_expiration_secs())).timestamp() as usize;

    let claims = Claims {
        sub: user.user_id.clone(),
        iat,
        exp,
        jti: Uuid::new_v4().to_string(),
        aud: get_jwt_audience(),
        iss: get_jwt_issuer(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(get_jwt_secret().as_ref()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
}

// Verify JWT token (signature, structure, expiry, audience, issuer).
// Every failure collapses to the same Unauthorized.
pub fn verify_token(token: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[get_jwt_audience()]);

    let mut issuers = HashSet::new();
    issuers.insert(get_jwt_issuer());
    validation.iss = Some(issuers);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(get_jwt_secret().as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Invalid token".to_string()))
}

/// Resolves the acting identity behind a token: cryptographic validity AND
/// the revocation flag on the current user record. A token whose user is
/// missing or logged out fails exactly like a forged one. The identity-store
/// read this costs per request is what makes logout effective without a
/// token blacklist.
pub async fn resolve_identity(db: &MongoDB, token: &str) -> Result<User, AppError> {
    let claims = verify_token(token)?;

    let collection = db.collection::<User>("users");
    let user = collection
        .find_one(doc! { "user_id": &claims.sub })
        .await?;

    match user {
        Some(user) if user.logged_in => Ok(user),
        _ => Err(AppError::Unauthorized("Invalid token".to_string())),
    }
}

// User login: LoggedOut -> LoggedIn. Wrong email and wrong password are
// indistinguishable from the outside.
pub async fn login(db: &MongoDB, request: &LoginRequest) -> Result<AuthResponse, AppError> {
    let collection = db.collection::<User>("users");

    let user = collection
        .find_one(doc! { "email": &request.email })
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    let valid = verify(&request.password, &user.password_hash)
        .map_err(|e| AppError::Internal(format!("Password verification error: {}", e)))?;

    if !valid {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    // set the logged-in status flag for the authenticated user:
    collection
        .update_one(
            doc! { "user_id": &user.user_id },
            doc! { "$set": { "logged_in": true } },
        )
        .await?;

    let token = generate_jwt(&user)?;

    log::info!("✅ Login successful: {}", user.email);

    Ok(AuthResponse {
        success: true,
        access_token: token,
        profile: user.to_profile(),
        bucketlists_url: BUCKETLISTS_URL.to_string(),
    })
}

// User registration. Creates a LoggedOut user; never auto-authenticates.
pub async fn register(db: &MongoDB, request: &RegisterRequest) -> Result<RegisterResponse, AppError> {
    let (email, password) = match (&request.email, &request.password) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
            (email, password)
        }
        _ => return Err(AppError::BadRequest("missing email or password".to_string())),
    };

    let collection = db.collection::<User>("users");

    if collection.find_one(doc! { "email": email }).await?.is_some() {
        return Err(AppError::Forbidden("email not allowed to register".to_string()));
    }

    let password_hash = hash(password, DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;

    let user = User {
        id: None,
        user_id: ObjectId::new().to_hex(),
        email: email.clone(),
        password_hash,
        username: request.username.clone(),
        date_joined: Utc::now().timestamp(),
        logged_in: false,
    };

    if let Err(e) = collection.insert_one(&user).await {
        // the unique email index backstops a concurrent duplicate registration
        if is_duplicate_key(&e) {
            return Err(AppError::Forbidden("email not allowed to register".to_string()));
        }
        return Err(e.into());
    }

    log::info!("✅ User registered successfully: {}", user.email);

    Ok(RegisterResponse {
        success: true,
        profile: user.to_profile(),
        login_url: LOGIN_URL.to_string(),
    })
}

// Logout: LoggedIn -> LoggedOut. The token that requested this is rejected
// by `resolve_identity` on every later call, including a repeat logout.
pub async fn logout(db: &MongoDB, user_id: &str) -> Result<(), AppError> {
    let collection = db.collection::<User>("users");

    collection
        .update_one(
            doc! { "user_id": user_id },
            doc! { "$set": { "logged_in": false } },
        )
        .await?;

    log::info!("👋 User logged out: {}", user_id);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: None,
            user_id: ObjectId::new().to_hex(),
            email: "somebody@somedomain.com".to_string(),
            password_hash: String::new(),
            username: Some("Somebody".to_string()),
            date_joined: Utc::now().timestamp(),
            logged_in: true,
        }
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let user = sample_user();
        let token = generate_jwt(&user).unwrap();
        let claims = verify_token(&token).unwrap();
        assert_eq!(claims.sub, user.user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let token = generate_jwt(&sample_user()).unwrap();
        let tampered = format!("{}x", token);
        assert_eq!(
            verify_token(&tampered).unwrap_err(),
            AppError::Unauthorized("Invalid token".to_string())
        );
    }

    #[test]
    fn test_malformed_token_is_rejected() {
        assert!(verify_token("not-a-jwt").is_err());
        assert!(verify_token("").is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        // expired well past the default validation leeway
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "someone".to_string(),
            iat: (now - 7200) as usize,
            exp: (now - 3600) as usize,
            jti: Uuid::new_v4().to_string(),
            aud: get_jwt_audience(),
            iss: get_jwt_issuer(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(get_jwt_secret().as_ref()),
        )
        .unwrap();

        assert_eq!(
            verify_token(&token).unwrap_err(),
            AppError::Unauthorized("Invalid token".to_string())
        );
    }

    #[test]
    fn test_foreign_issuer_is_rejected() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "someone".to_string(),
            iat: now as usize,
            exp: (now + 3600) as usize,
            jti: Uuid::new_v4().to_string(),
            aud: get_jwt_audience(),
            iss: "some-other-service".to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(get_jwt_secret().as_ref()),
        )
        .unwrap();

        assert!(verify_token(&token).is_err());
    }

    #[test]
    fn test_password_hash_verifies_and_rejects() {
        let digest = hash("anything", DEFAULT_COST).unwrap();
        assert!(verify("anything", &digest).unwrap());
        assert!(!verify("something-else", &digest).unwrap());
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_logout_revokes_an_otherwise_valid_token() {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/bucketlist-test".to_string());
        let db = MongoDB::new(&uri).await.unwrap();

        let email = format!("{}@somedomain.com", ObjectId::new().to_hex());
        register(
            &db,
            &RegisterRequest {
                email: Some(email.clone()),
                password: Some("anything".to_string()),
                username: None,
            },
        )
        .await
        .unwrap();

        // registration never auto-authenticates: a token minted for the
        // fresh user is rejected until login flips the flag
        let auth = login(
            &db,
            &LoginRequest {
                email: email.clone(),
                password: "anything".to_string(),
            },
        )
        .await
        .unwrap();

        let identity = resolve_identity(&db, &auth.access_token).await.unwrap();
        assert_eq!(identity.email, email);

        logout(&db, &identity.user_id).await.unwrap();

        // the same token is now dead, including for a second logout
        assert_eq!(
            resolve_identity(&db, &auth.access_token).await.unwrap_err(),
            AppError::Unauthorized("Invalid token".to_string())
        );

        crate::services::user_service::deregister(&db, &identity.user_id)
            .await
            .unwrap();
    }
}
