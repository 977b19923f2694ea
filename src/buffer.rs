use crate::SHELL_NAME;

/// A growable buffer that allocates in fixed-size steps.
///
/// The buffer starts with room for `increment` items and, whenever it is full,
/// grows by another `increment` before the next item is stored. Allocation
/// failure is not recoverable: the process prints `what` and exits.
pub(crate) struct ChunkedBuf<T> {
    items: Vec<T>,
    bufsize: usize,
    increment: usize,
    what: &'static str,
}

impl<T> ChunkedBuf<T> {
    pub(crate) fn new(increment: usize, what: &'static str) -> Self {
        let mut buf = Self {
            items: Vec::new(),
            bufsize: 0,
            increment,
            what,
        };
        buf.grow();
        buf
    }

    pub(crate) fn push(&mut self, item: T) {
        if self.items.len() >= self.bufsize {
            self.grow();
        }
        self.items.push(item);
    }

    /// Number of items the buffer has made room for so far.
    pub(crate) fn capacity(&self) -> usize {
        self.bufsize
    }

    pub(crate) fn into_vec(self) -> Vec<T> {
        self.items
    }

    fn grow(&mut self) {
        let bufsize = self.bufsize + self.increment;
        if self
            .items
            .try_reserve_exact(bufsize - self.items.len())
            .is_err()
        {
            fatal(self.what);
        }
        self.bufsize = bufsize;
    }
}

/// Report an unrecoverable condition and terminate the process.
pub(crate) fn fatal(what: &str) -> ! {
    log::error!("{what}");
    eprintln!("{SHELL_NAME}: {what}");
    std::process::exit(1)
}
