use tracing::{debug, instrument};

use courseway_core::AppError;
use courseway_lms::Lms;
use courseway_models::{UserFilter, UserSummary};

use crate::utils::host_helpers::host_unavailable;

pub struct UserService;

impl UserService {
    #[instrument(skip(lms))]
    pub async fn list_users(
        lms: &dyn Lms,
        filter: UserFilter,
    ) -> Result<Vec<UserSummary>, AppError> {
        let users = lms.list_users(&filter).await.map_err(host_unavailable)?;
        debug!(count = users.len(), "Users listed");

        Ok(users.iter().map(|user| user.to_summary()).collect())
    }
}
