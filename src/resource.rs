//! Ownership of a single native handle.
//!
//! Every wrapper in this crate stores its handle in an [`Owned`], which
//! implements the shared lifecycle: create through a checked native call,
//! hand out the raw handle only while it is live, destroy exactly once.

use std::sync::Arc;

use tracing::{trace, warn};

use crate::error::{Error, Library, Result};
use crate::ffi::{self, RawHandle, StatusCode};

/// A native handle kind together with the entry point that destroys it.
pub(crate) trait Resource: RawHandle {
    /// Function table the handle belongs to.
    type Api;

    /// Name of the wrapper type, reported by `UseAfterDispose`.
    const KIND: &'static str;
    /// Library that owns the handle.
    const LIBRARY: Library;
    /// Destroy entry point name, for logging.
    const DESTROY: &'static str;

    /// Release the handle.
    ///
    /// # Safety
    ///
    /// `self` must be a live handle created through `api`.
    unsafe fn destroy(self, api: &Self::Api) -> StatusCode;
}

/// Exclusive owner of one live native handle.
pub(crate) struct Owned<R: Resource> {
    raw: Option<R>,
    api: Arc<R::Api>,
}

impl<R: Resource> Owned<R> {
    /// Run a native create call and take ownership of the handle it returns.
    ///
    /// `create` receives the out-parameter and returns the native status.
    pub(crate) fn create<F>(api: Arc<R::Api>, op: &'static str, create: F) -> Result<Self>
    where
        F: FnOnce(&R::Api, *mut R) -> StatusCode,
    {
        let mut raw = R::null();
        let code = create(&*api, &mut raw as *mut R);
        ffi::check(R::LIBRARY, op, code)?;
        trace!(kind = R::KIND, handle = ?raw, "created");

        Ok(Self {
            raw: Some(raw),
            api,
        })
    }

    /// The live handle, or `UseAfterDispose`.
    pub(crate) fn raw(&self) -> Result<R> {
        self.raw.ok_or(Error::UseAfterDispose(R::KIND))
    }

    /// Function table this handle was created with, for child objects.
    pub(crate) fn shared_api(&self) -> Arc<R::Api> {
        self.api.clone()
    }

    /// Live handle together with its function table.
    pub(crate) fn get(&self) -> Result<(R, &R::Api)> {
        Ok((self.raw()?, &self.api))
    }

    pub(crate) fn is_disposed(&self) -> bool {
        self.raw.is_none()
    }

    /// Destroy the handle. Only the first call reaches the native layer.
    pub(crate) fn dispose(&mut self) {
        let Some(raw) = self.raw.take() else {
            return;
        };

        let code = unsafe { raw.destroy(&self.api) };
        if code == ffi::STATUS_SUCCESS {
            trace!(kind = R::KIND, op = R::DESTROY, "destroyed");
        } else {
            // Ignore if failing
            warn!(
                kind = R::KIND,
                op = R::DESTROY,
                status = %ffi::status_name(R::LIBRARY, code),
                "destroy failed"
            );
        }
    }
}

impl<R: Resource> Drop for Owned<R> {
    fn drop(&mut self) {
        if self.raw.is_some() {
            warn!(kind = R::KIND, "not disposed before drop, releasing");
            self.dispose();
        }
    }
}
