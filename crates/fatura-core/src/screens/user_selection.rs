//! Subscriber picker

use crate::models::{AccountType, User};
use crate::resource::{RemoteResource, ScreenError};
use crate::service::ApiService;

/// How many subscribers the picker asks for
pub const USER_LIST_LIMIT: u32 = 50;

pub struct UserSelectionScreen {
    service: ApiService,
    account_type: Option<AccountType>,
    users: RemoteResource<Vec<User>>,
}

impl UserSelectionScreen {
    pub fn new(service: ApiService) -> Self {
        Self {
            service,
            account_type: None,
            users: RemoteResource::new(),
        }
    }

    /// Restrict the listing to one account type
    pub fn with_account_type(mut self, account_type: Option<AccountType>) -> Self {
        self.account_type = account_type;
        self
    }

    pub async fn load(&mut self) {
        self.users
            .load(
                self.service
                    .get_all_users(self.account_type, USER_LIST_LIMIT),
                |e| ScreenError::from_error(e, "Could not load users"),
            )
            .await;
    }

    pub fn users(&self) -> &RemoteResource<Vec<User>> {
        &self.users
    }

    /// Find a loaded user by id, for handing over to the navigator
    pub fn find(&self, user_id: i64) -> Option<&User> {
        self.users
            .data()
            .and_then(|users| users.iter().find(|u| u.user_id == user_id))
    }
}
