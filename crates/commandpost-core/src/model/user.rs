use serde::{Deserialize, Serialize};

use crate::change::Change;
use crate::id::UserId;
use crate::meta::RowMeta;
use crate::roles::Role;

/// An operator account. The password is write-only: it is accepted on
/// create and never exposed through the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub access_level: Role,
    pub emergency_contact: Option<String>,
    pub meta: RowMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub access_level: Role,
    pub emergency_contact: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub first_name: Change<String>,
    pub last_name: Change<String>,
    pub email: Change<String>,
    pub access_level: Change<Role>,
    pub emergency_contact: Change<Option<String>>,
}
