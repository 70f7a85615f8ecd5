//! Face embeddings, the encoder seam, and the enrollment store.
//!
//! The embedding model itself is an external collaborator: the core only
//! consumes a fixed-length vector plus a face count through [`FaceEncoder`].
//! The store keeps one embedding per account and answers the linear
//! nearest-neighbor scan used by the signup uniqueness check; callers never
//! see the scan, so an approximate index can replace it later.

use anyhow::Context;
use base64ct::{Base64, Encoding};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use super::error::AuthError;
use super::now_unix;
use super::similarity::cosine_distance;

/// Fixed-length face embedding vector.
#[derive(Clone, Debug, PartialEq)]
pub struct Embedding(Vec<f32>);

impl Embedding {
    #[must_use]
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Result of running face detection + embedding on an image.
#[derive(Clone, Debug)]
pub struct FaceScan {
    pub embedding: Embedding,
    /// Number of faces the detector found; the flows require exactly one.
    pub face_count: usize,
}

/// The `detect_and_embed` collaborator: maps an image to an embedding and a
/// face count, or fails when the payload is not a usable image.
pub trait FaceEncoder: Send + Sync {
    fn detect_and_embed(&self, image: &str) -> Result<FaceScan, AuthError>;
}

/// Deterministic stand-in encoder for local development and tests.
///
/// Derives a unit vector from a digest of the decoded image bytes, so the
/// same image always yields the same embedding and distinct images are far
/// apart. Real model inference replaces this behind the same trait.
#[derive(Clone, Debug, Default)]
pub struct DevFaceEncoder;

const DEV_EMBEDDING_DIM: usize = 64;

impl FaceEncoder for DevFaceEncoder {
    fn detect_and_embed(&self, image: &str) -> Result<FaceScan, AuthError> {
        // Accept both raw base64 and `data:image/...;base64,` payloads.
        let encoded = image.rsplit(',').next().unwrap_or(image).trim();
        if encoded.is_empty() {
            return Err(AuthError::Validation("Invalid image format".to_string()));
        }
        let bytes = Base64::decode_vec(encoded)
            .map_err(|_| AuthError::Validation("Invalid image format".to_string()))?;
        if bytes.is_empty() {
            return Err(AuthError::NoFaceDetected);
        }

        let mut values = Vec::with_capacity(DEV_EMBEDDING_DIM);
        let mut block = 0u8;
        while values.len() < DEV_EMBEDDING_DIM {
            let mut hasher = Sha256::new();
            hasher.update(&bytes);
            hasher.update([block]);
            let digest = hasher.finalize();
            values.extend(digest.iter().map(|b| (f32::from(*b) - 127.5) / 128.0));
            block = block.wrapping_add(1);
        }
        values.truncate(DEV_EMBEDDING_DIM);

        let norm = values.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut values {
                *value /= norm;
            }
        }

        Ok(FaceScan {
            embedding: Embedding::new(values),
            face_count: 1,
        })
    }
}

/// Enrolled embedding together with its enrollment time.
#[derive(Clone, Debug)]
pub struct Enrollment {
    pub vector: Embedding,
    pub enrolled_at_unix: i64,
}

/// In-memory store of enrolled embeddings, one per account.
#[derive(Default)]
pub struct EmbeddingStore {
    inner: Mutex<HashMap<Uuid, Enrollment>>,
}

impl EmbeddingStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enroll an embedding for an account. Embeddings are immutable once
    /// enrolled; re-enrollment is not an operation of this core.
    pub fn enroll(&self, account_id: Uuid, vector: Embedding) -> Result<(), AuthError> {
        let mut inner = self.lock()?;
        if inner.contains_key(&account_id) {
            return Err(AuthError::DuplicateEnrollment);
        }
        inner.insert(
            account_id,
            Enrollment {
                vector,
                enrolled_at_unix: now_unix(),
            },
        );
        Ok(())
    }

    pub fn fetch(&self, account_id: Uuid) -> Result<Enrollment, AuthError> {
        self.lock()?
            .get(&account_id)
            .cloned()
            .ok_or(AuthError::NotEnrolled)
    }

    /// Closest enrolled embedding to `vector`, skipping `excluding`, or
    /// `None` when nothing is enrolled. Linear scan; fine at thousands of
    /// accounts.
    pub fn nearest_neighbor(
        &self,
        vector: &Embedding,
        excluding: Option<Uuid>,
    ) -> Result<Option<(Uuid, f32)>, AuthError> {
        let inner = self.lock()?;
        let mut best: Option<(Uuid, f32)> = None;
        for (account_id, enrollment) in inner.iter() {
            if excluding == Some(*account_id) {
                continue;
            }
            let distance = cosine_distance(vector, &enrollment.vector);
            if best.map_or(true, |(_, best_distance)| distance < best_distance) {
                best = Some((*account_id, distance));
            }
        }
        Ok(best)
    }

    /// Drop an enrollment. Only used when a stale pending account is replaced
    /// through the signup recovery path.
    pub fn remove(&self, account_id: Uuid) -> Result<(), AuthError> {
        self.lock()?.remove(&account_id);
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, Enrollment>>, AuthError> {
        self.inner
            .lock()
            .map_err(|_| anyhow::anyhow!("embedding store lock poisoned"))
            .context("embedding store unavailable")
            .map_err(AuthError::Internal)
    }
}
