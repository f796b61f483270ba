use uuid::Uuid;

use crate::{
    model::error::{DatabaseError, DatabaseResult},
    web::AuthenticatedUser,
};

/// Who, besides admins, may act on a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    /// Personal data of one learner.
    Learner(Uuid),
    /// Course content shared by everybody, edited by admins only.
    Catalog,
}

pub trait HasOwner {
    fn owner(&self) -> Owner;
}

pub fn check_access<T: HasOwner>(actor: &AuthenticatedUser, resource: &T) -> DatabaseResult<()> {
    if actor.is_admin() {
        return Ok(());
    }

    match resource.owner() {
        Owner::Learner(id) if id == actor.user_id() => Ok(()),
        _ => Err(DatabaseError::Forbidden),
    }
}
