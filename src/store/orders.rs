//! Order store - the persisted collection of order records.

use super::persist_snapshot;
use crate::entities::Order;
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// On-disk layout of the orders snapshot.
#[derive(Debug, Default, Serialize, Deserialize)]
struct OrdersFile {
    orders: Vec<Order>,
}

/// File-backed order collection keyed by order id.
///
/// All operations take `&self`; mutations serialize behind the internal
/// mutex and persist the whole snapshot before returning.
#[derive(Debug)]
pub struct OrderStore {
    path: PathBuf,
    inner: Mutex<HashMap<String, Order>>,
}

impl OrderStore {
    /// Opens the store, loading an existing snapshot if one is present.
    ///
    /// # Errors
    /// Returns an error when the snapshot exists but cannot be read or
    /// parsed.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let file: OrdersFile = serde_json::from_slice(&bytes)?;
                file.orders
                    .into_iter()
                    .map(|order| (order.order_id.clone(), order))
                    .collect()
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            path,
            inner: Mutex::new(entries),
        })
    }

    /// Inserts a new order and persists the snapshot.
    pub async fn insert(&self, order: Order) -> Result<Order> {
        let mut guard = self.inner.lock().await;
        guard.insert(order.order_id.clone(), order.clone());
        self.persist(&guard).await?;
        Ok(order)
    }

    /// Looks up an order by id.
    pub async fn get(&self, order_id: &str) -> Option<Order> {
        self.inner.lock().await.get(order_id).cloned()
    }

    /// Returns every stored order.
    pub async fn all(&self) -> Vec<Order> {
        self.inner.lock().await.values().cloned().collect()
    }

    /// Applies `mutation` to the order with `order_id` and persists.
    ///
    /// The mutation may reject the update by returning an error; a rejected
    /// update leaves both memory and disk unchanged.
    ///
    /// # Errors
    /// Returns [`Error::OrderNotFound`] for an unknown id, or the mutation's
    /// own error when it rejects.
    pub async fn try_update<F>(&self, order_id: &str, mutation: F) -> Result<Order>
    where
        F: FnOnce(&mut Order) -> Result<()>,
    {
        let mut guard = self.inner.lock().await;
        let entry = guard
            .get_mut(order_id)
            .ok_or_else(|| Error::OrderNotFound {
                order_id: order_id.to_string(),
            })?;
        let mut updated = entry.clone();
        mutation(&mut updated)?;
        *entry = updated.clone();
        self.persist(&guard).await?;
        Ok(updated)
    }

    /// Atomically finds the first order matching `predicate`, applies
    /// `mutation` to it, and persists. Returns `None` when nothing matches.
    ///
    /// The scan and the mutation happen under one lock acquisition, so two
    /// concurrent callers can never claim the same order.
    pub async fn update_first<P, F>(&self, predicate: P, mutation: F) -> Result<Option<Order>>
    where
        P: Fn(&Order) -> bool,
        F: FnOnce(&mut Order),
    {
        let mut guard = self.inner.lock().await;
        let Some(entry) = guard.values_mut().find(|order| predicate(order)) else {
            return Ok(None);
        };
        mutation(entry);
        let updated = entry.clone();
        self.persist(&guard).await?;
        Ok(Some(updated))
    }

    async fn persist(&self, entries: &HashMap<String, Order>) -> Result<()> {
        let mut orders: Vec<Order> = entries.values().cloned().collect();
        orders.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.order_id.cmp(&b.order_id))
        });
        persist_snapshot(&self.path, &OrdersFile { orders }).await
    }
}
