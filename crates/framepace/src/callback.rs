use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// One unit of frame work, invoked with the frame timestamp in nanoseconds.
///
/// Identity is the shared closure, not its contents: clones compare equal, and
/// removing any clone cancels a posting made through another.
#[derive(Clone)]
pub struct FrameCallback {
    inner: Rc<RefCell<dyn FnMut(u64)>>,
}

impl FrameCallback {
    pub fn new<F>(f: F) -> Self
    where
        F: FnMut(u64) + 'static,
    {
        Self {
            inner: Rc::new(RefCell::new(f)),
        }
    }

    /// Runs the callback for the frame at `frame_time_nanos`.
    pub fn do_frame(&self, frame_time_nanos: u64) {
        match self.inner.try_borrow_mut() {
            Ok(mut f) => (&mut *f)(frame_time_nanos),
            Err(_) => log::warn!("frame callback invoked from inside itself; skipped"),
        }
    }

    /// Identity comparison.
    pub fn same_as(&self, other: &FrameCallback) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for FrameCallback {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl Eq for FrameCallback {}

impl fmt::Debug for FrameCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FrameCallback")
            .field(&Rc::as_ptr(&self.inner).cast::<()>())
            .finish()
    }
}
