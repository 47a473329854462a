//! Camera abstraction.
//!
//! The engine never talks to capture hardware directly. Anything that can
//! produce JPEG frames implements [`FrameSource`]; the store encodes each
//! frame into a data URL before inference.

use async_trait::async_trait;

use crate::error::SessionResult;

#[async_trait]
pub trait FrameSource: Send + Sync {
    /// Acquire the device. Failures surface as [`SessionError::Capture`].
    ///
    /// [`SessionError::Capture`]: crate::error::SessionError::Capture
    async fn start(&self) -> SessionResult<()>;

    /// Release the device. Idempotent.
    async fn stop(&self);

    /// Grab one JPEG frame. `None` when the source is not started.
    async fn capture_frame(&self) -> SessionResult<Option<Vec<u8>>>;

    fn name(&self) -> &'static str;
}
