use gatekeep_auth::create_access_token;
use gatekeep_config::JwtConfig;
use gatekeep_core::{AppError, CredentialStore};
use gatekeep_db::TenantRepository;
use gatekeep_models::{LoginRequest, LoginResponse};
use gatekeep_observability::track_login;
use tracing::instrument;

use crate::modules::users::service::UserService;

pub struct AuthService;

impl AuthService {
    /// Verifies the credentials and issues an access token whose scopes are
    /// the user's aggregated permissions at this moment.
    ///
    /// Unknown email, wrong password and an unreadable stored digest all end
    /// in the same `INVALID_CREDENTIALS` error, after exactly one credential
    /// verification.
    #[instrument(skip(repository, credentials, jwt_config, dto), fields(email = %dto.email, application_id = %dto.application_id))]
    pub async fn login(
        repository: &dyn TenantRepository,
        credentials: &dyn CredentialStore,
        jwt_config: &JwtConfig,
        dto: LoginRequest,
    ) -> Result<LoginResponse, AppError> {
        let Some(user) =
            UserService::get_user_by_email(repository, &dto.email, dto.application_id).await?
        else {
            // Spend one verification anyway so response time does not reveal the miss.
            match credentials.decoy_digest().await {
                Ok(decoy) => {
                    let _ = credentials.verify(&dto.password, &decoy).await;
                }
                Err(err) => tracing::warn!(error = %err, "Decoy credential unavailable"),
            }
            track_login(false);
            return Err(AppError::invalid_credentials());
        };

        let verified = match credentials.verify(&dto.password, &user.password_digest).await {
            Ok(matches) => matches,
            Err(err) => {
                tracing::warn!(user_id = %user.id, error = %err, "Stored credential could not be verified");
                false
            }
        };

        if !verified {
            track_login(false);
            return Err(AppError::invalid_credentials());
        }

        let access_token = create_access_token(
            user.id.into_inner(),
            &user.email,
            user.application_id.into_inner(),
            user.permissions,
            jwt_config,
        )?;

        track_login(true);
        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginResponse { access_token })
    }
}
