//! Role-based authorization.
//!
//! The facade asks the [`Authorizer`] exactly once per operation, before it
//! touches the store.

use innkeep_shared::types::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::HotelError;
use crate::model::Role;

/// What the actor wants to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Read.
    View,
    /// Create.
    Create,
    /// Modify.
    Update,
    /// Delete or archive.
    Delete,
}

impl Action {
    /// Returns the string representation of the action.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Rooms.
    Room,
    /// Customers.
    Customer,
    /// Reservations.
    Reservation,
    /// Catalog services.
    ServiceItem,
    /// Services attached to reservations.
    ServiceLine,
    /// Payments and refunds.
    Payment,
}

impl ResourceKind {
    /// Returns the string representation of the resource kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Room => "room",
            Self::Customer => "customer",
            Self::Reservation => "reservation",
            Self::ServiceItem => "service_item",
            Self::ServiceLine => "service_line",
            Self::Payment => "payment",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated user on whose behalf an operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// User ID.
    pub id: UserId,
    /// Role.
    pub role: Role,
}

impl Actor {
    /// Creates an actor.
    #[must_use]
    pub const fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }
}

/// Decides whether an actor may perform an action.
pub trait Authorizer: Send + Sync {
    /// Returns true if `actor` may perform `action` on `resource`.
    fn can(&self, actor: &Actor, action: Action, resource: ResourceKind) -> bool;
}

/// Default role matrix. Everyone may view.
///
/// | | Create/Update | Delete |
/// |---|---|---|
/// | Reservation | receptionist | manager |
/// | ServiceLine | receptionist | receptionist |
/// | Payment | receptionist | manager |
/// | Customer | receptionist | admin |
/// | ServiceItem | manager | manager |
/// | Room | manager | admin |
#[derive(Debug, Clone, Copy, Default)]
pub struct RolePolicy;

impl RolePolicy {
    /// Minimum role for an action on a resource.
    #[must_use]
    pub const fn required_role(action: Action, resource: ResourceKind) -> Role {
        use ResourceKind as R;
        match (action, resource) {
            (Action::View, _)
            | (Action::Create | Action::Update, R::Reservation | R::Payment | R::Customer)
            | (_, R::ServiceLine) => Role::Receptionist,
            (Action::Delete, R::Reservation | R::Payment)
            | (_, R::ServiceItem)
            | (Action::Create | Action::Update, R::Room) => Role::Manager,
            (Action::Delete, R::Customer | R::Room) => Role::Admin,
        }
    }
}

impl Authorizer for RolePolicy {
    fn can(&self, actor: &Actor, action: Action, resource: ResourceKind) -> bool {
        actor.role.at_least(Self::required_role(action, resource))
    }
}

/// Returns `HotelError::Forbidden` unless `authorizer` allows the action.
pub(crate) fn ensure_allowed(
    authorizer: &dyn Authorizer,
    actor: &Actor,
    action: Action,
    resource: ResourceKind,
) -> Result<(), HotelError> {
    if authorizer.can(actor, action, resource) {
        Ok(())
    } else {
        tracing::warn!(
            actor = %actor.id,
            role = %actor.role,
            action = action.as_str(),
            resource = resource.as_str(),
            "authorization denied"
        );
        Err(HotelError::Forbidden {
            action: action.to_string(),
            resource: resource.to_string(),
        })
    }
}
