//! Catalog maintenance.

use innkeep_shared::types::{Money, ServiceItemId};

use super::ReconciliationFacade;
use super::types::UpdateServiceInput;
use crate::authz::{Action, Actor, ResourceKind};
use crate::catalog::ServiceCatalog;
use crate::error::HotelError;
use crate::model::ServiceItem;
use crate::store::{Store, StoreError, StoreTx, constraints};

fn name_conflict(err: StoreError, name: &str) -> HotelError {
    if err.violates(constraints::SERVICE_NAME_UNIQUE) {
        HotelError::DuplicateName(name.to_string())
    } else {
        err.into()
    }
}

impl<S: Store> ReconciliationFacade<S> {
    /// Adds a service to the catalog.
    ///
    /// # Errors
    ///
    /// - `InvalidName`, `InvalidAmount`
    /// - `DuplicateName` if another service has the same name, ignoring case
    pub async fn create_service(
        &self,
        actor: &Actor,
        name: &str,
        unit_price: Money,
    ) -> Result<ServiceItem, HotelError> {
        self.run("create_service", async {
            self.authorize(actor, Action::Create, ResourceKind::ServiceItem)?;
            let item = ServiceCatalog::prepare_new(self.sanitizer.as_ref(), name, unit_price, self.now())?;

            let mut tx = self.store.begin().await?;
            if tx.find_service_item_by_name(&item.name).await?.is_some() {
                return Err(HotelError::DuplicateName(item.name));
            }
            tx.insert_service_item(&item)
                .await
                .map_err(|e| name_conflict(e, &item.name))?;
            tx.commit().await?;

            self.audit(
                actor,
                "create_service",
                ResourceKind::ServiceItem,
                item.id,
                format!("{} at {}", item.name, item.unit_price),
            );
            Ok(item)
        })
        .await
    }

    /// Renames and/or reprices a service. Attached lines keep their price.
    ///
    /// # Errors
    ///
    /// - `ServiceNotFound`
    /// - `InvalidName`, `InvalidAmount`
    /// - `DuplicateName`
    pub async fn update_service(
        &self,
        actor: &Actor,
        id: ServiceItemId,
        input: UpdateServiceInput,
    ) -> Result<ServiceItem, HotelError> {
        self.run("update_service", async {
            self.authorize(actor, Action::Update, ResourceKind::ServiceItem)?;

            let mut tx = self.store.begin().await?;
            let current = tx
                .find_service_item(id)
                .await?
                .ok_or(HotelError::ServiceNotFound(id))?;
            let updated = ServiceCatalog::apply_update(
                self.sanitizer.as_ref(),
                &current,
                input.name.as_deref(),
                input.unit_price,
                self.now(),
            )?;
            if updated == current {
                return Ok(current);
            }

            if updated.name.to_lowercase() != current.name.to_lowercase() {
                if let Some(other) = tx.find_service_item_by_name(&updated.name).await? {
                    if other.id != id {
                        return Err(HotelError::DuplicateName(updated.name));
                    }
                }
            }
            tx.update_service_item(&updated)
                .await
                .map_err(|e| name_conflict(e, &updated.name))?;
            tx.commit().await?;

            self.audit(
                actor,
                "update_service",
                ResourceKind::ServiceItem,
                id,
                format!(
                    "{} at {} (was {} at {})",
                    updated.name, updated.unit_price, current.name, current.unit_price
                ),
            );
            Ok(updated)
        })
        .await
    }

    /// Renames a service.
    ///
    /// # Errors
    ///
    /// Same as [`Self::update_service`].
    pub async fn rename_service(
        &self,
        actor: &Actor,
        id: ServiceItemId,
        name: &str,
    ) -> Result<ServiceItem, HotelError> {
        let input = UpdateServiceInput {
            name: Some(name.to_string()),
            unit_price: None,
        };
        self.update_service(actor, id, input).await
    }

    /// Changes a service's catalog price.
    ///
    /// # Errors
    ///
    /// Same as [`Self::update_service`].
    pub async fn reprice_service(
        &self,
        actor: &Actor,
        id: ServiceItemId,
        unit_price: Money,
    ) -> Result<ServiceItem, HotelError> {
        let input = UpdateServiceInput {
            name: None,
            unit_price: Some(unit_price),
        };
        self.update_service(actor, id, input).await
    }

    /// Removes a service that no reservation uses.
    ///
    /// # Errors
    ///
    /// - `ServiceNotFound`
    /// - `ServiceInUse` while any service line references it
    pub async fn delete_service(&self, actor: &Actor, id: ServiceItemId) -> Result<(), HotelError> {
        self.run("delete_service", async {
            self.authorize(actor, Action::Delete, ResourceKind::ServiceItem)?;

            let mut tx = self.store.begin().await?;
            let item = tx
                .find_service_item(id)
                .await?
                .ok_or(HotelError::ServiceNotFound(id))?;
            if tx.count_service_lines_for_item(id).await? > 0 {
                return Err(HotelError::ServiceInUse(id));
            }
            tx.delete_service_item(id).await.map_err(|e| {
                if e.violates(constraints::SERVICE_LINE_ITEM_FK) {
                    HotelError::ServiceInUse(id)
                } else {
                    e.into()
                }
            })?;
            tx.commit().await?;

            self.audit(
                actor,
                "delete_service",
                ResourceKind::ServiceItem,
                id,
                item.name,
            );
            Ok(())
        })
        .await
    }

    /// Lists the catalog ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` or a store error.
    pub async fn list_services(&self, actor: &Actor) -> Result<Vec<ServiceItem>, HotelError> {
        self.run("list_services", async {
            self.authorize(actor, Action::View, ResourceKind::ServiceItem)?;
            let mut tx = self.store.begin().await?;
            Ok(tx.list_service_items().await?)
        })
        .await
    }

    /// Returns one catalog entry.
    ///
    /// # Errors
    ///
    /// Returns `ServiceNotFound`.
    pub async fn get_service(
        &self,
        actor: &Actor,
        id: ServiceItemId,
    ) -> Result<ServiceItem, HotelError> {
        self.run("get_service", async {
            self.authorize(actor, Action::View, ResourceKind::ServiceItem)?;
            let mut tx = self.store.begin().await?;
            tx.find_service_item(id)
                .await?
                .ok_or(HotelError::ServiceNotFound(id))
        })
        .await
    }
}
