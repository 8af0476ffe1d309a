use crate::error::Result;

/// Handle of a pending frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// The platform's once-per-refresh callback primitive.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> Result<FrameHandle>;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Scheduler driven by hand: frames only fire when the caller takes them.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: i32,
    pending: Vec<FrameHandle>,
    pub cancelled: Vec<FrameHandle>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &[FrameHandle] {
        &self.pending
    }

    /// Remove the oldest pending frame, as if the display refreshed.
    pub fn fire_next(&mut self) -> Option<FrameHandle> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.remove(0))
        }
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> Result<FrameHandle> {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push(handle);
        Ok(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Some(pos) = self.pending.iter().position(|h| *h == handle) {
            self.pending.remove(pos);
            self.cancelled.push(handle);
        }
    }
}

impl<T: FrameScheduler + ?Sized> FrameScheduler for &mut T {
    fn request_frame(&mut self) -> Result<FrameHandle> {
        (**self).request_frame()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        (**self).cancel_frame(handle);
    }
}
