//! Redeem-code store - the persisted collection of single-use codes.

use super::persist_snapshot;
use crate::entities::{PlanDuration, RedeemCode};
use crate::errors::{Error, Result};
use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Characters allowed in generated codes. Visually confusable characters
/// (`I`, `O`, `0`, `1`) are excluded.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of every generated code.
pub const CODE_LENGTH: usize = 10;

/// Upper bound on codes issued per request.
pub const MAX_CODES_PER_BATCH: usize = 50;

/// On-disk layout of the codes snapshot.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CodesFile {
    codes: Vec<RedeemCode>,
}

/// File-backed code collection.
#[derive(Debug)]
pub struct CodeStore {
    path: PathBuf,
    inner: Mutex<Vec<RedeemCode>>,
}

impl CodeStore {
    /// Opens the store, loading an existing snapshot if one is present.
    ///
    /// # Errors
    /// Returns an error when the snapshot exists but cannot be read or
    /// parsed.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<CodesFile>(&bytes)?.codes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            path,
            inner: Mutex::new(entries),
        })
    }

    /// Issues a batch of codes for a plan, clamped to
    /// [`MAX_CODES_PER_BATCH`], and persists the snapshot.
    pub async fn issue(
        &self,
        plan_id: &str,
        duration: PlanDuration,
        count: usize,
        issuer: &str,
    ) -> Result<Vec<RedeemCode>> {
        let count = count.min(MAX_CODES_PER_BATCH);
        let now = Utc::now();
        let mut guard = self.inner.lock().await;
        let mut issued = Vec::with_capacity(count);
        for _ in 0..count {
            let code = RedeemCode {
                code: generate_code(),
                plan_id: plan_id.to_string(),
                duration,
                created_at: now,
                created_by: issuer.to_string(),
                redeemed: false,
                redeemed_by: None,
                redeemed_at: None,
            };
            guard.push(code.clone());
            issued.push(code);
        }
        self.persist(&guard).await?;
        Ok(issued)
    }

    /// Marks `code` as redeemed by `redeemer`.
    ///
    /// The unredeemed check and the mutation happen under one lock
    /// acquisition, so each code redeems at most once even under concurrent
    /// callers.
    ///
    /// # Errors
    /// Returns [`Error::InvalidCode`] when the code does not exist or was
    /// already redeemed.
    pub async fn redeem(&self, code: &str, redeemer: &str) -> Result<RedeemCode> {
        let mut guard = self.inner.lock().await;
        let entry = guard
            .iter_mut()
            .find(|entry| entry.code == code && !entry.redeemed)
            .ok_or(Error::InvalidCode)?;
        entry.redeemed = true;
        entry.redeemed_by = Some(redeemer.to_string());
        entry.redeemed_at = Some(Utc::now());
        let redeemed = entry.clone();
        self.persist(&guard).await?;
        Ok(redeemed)
    }

    /// Lists codes that have not been redeemed yet.
    pub async fn available(&self) -> Vec<RedeemCode> {
        self.inner
            .lock()
            .await
            .iter()
            .filter(|entry| !entry.redeemed)
            .cloned()
            .collect()
    }

    /// Returns every stored code.
    pub async fn all(&self) -> Vec<RedeemCode> {
        self.inner.lock().await.clone()
    }

    async fn persist(&self, entries: &[RedeemCode]) -> Result<()> {
        persist_snapshot(
            &self.path,
            &CodesFile {
                codes: entries.to_vec(),
            },
        )
        .await
    }
}

/// Generates one random code from the unambiguous alphabet.
fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}
