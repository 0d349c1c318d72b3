#![cfg_attr(not(feature = "test"), warn(missing_docs))]
//! Exports a course's modules, assignments, quizzes and files from an LMS REST API (such as
//! Canvas), submits them to an outline generation service, and saves the generated outline.
//!
//! Each kind of content is retrieved completely by following the API's pagination links. Kinds
//! that a course doesn't use, or that can't be retrieved, are replaced by a fallback marker, so
//! that the others are still exported.

pub mod aggregate;
pub mod args;
pub mod config;
pub mod courses;
pub mod delivery;
pub mod entry;
pub mod error;
pub mod http;
pub mod link;
mod notify;
pub mod paginator;
pub mod reporting;
pub mod resource;
pub mod session;
pub mod target;
mod utils;
pub mod world;

#[cfg(feature = "test")]
pub use test_utils::*;

#[cfg(feature = "test")]
mod test_utils {
    use std::io;
    use std::sync::{Arc, Mutex};

    /// A log that keeps everything written to it in memory. Clones share the same buffer.
    #[derive(Debug, Clone, Default)]
    pub struct VecLog(Arc<Mutex<Vec<u8>>>);

    impl VecLog {
        /// Creates an empty log
        pub fn new() -> Self {
            Self::default()
        }

        /// Everything logged so far, replacing invalid UTF-8.
        pub fn get_lossy(&self) -> String {
            let buf = self.0.lock().expect("log buffer is not poisoned");
            String::from_utf8_lossy(&buf).into_owned()
        }
    }

    impl io::Write for VecLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let mut inner = self.0.lock().map_err(|_| io::Error::other("log buffer poisoned"))?;
            inner.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}
