use anyhow::Result;

pub mod dir;
pub mod http;
pub mod memory;

pub use dir::DirPageReader;
pub use http::HttpPageReader;
pub use memory::MemoryPages;

/// Something that can serve the router's status pages as lines of text.
///
/// A failed `read_page` leaves the source closed; callers re-`open` on the
/// next attempt.
pub trait PageSource {
    fn open(&mut self) -> Result<()>;
    fn is_open(&self) -> bool;
    fn close(&mut self);
    fn read_page(&mut self, page: &str) -> Result<Vec<String>>;
}

impl<S: PageSource + ?Sized> PageSource for Box<S> {
    fn open(&mut self) -> Result<()> {
        (**self).open()
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn close(&mut self) {
        (**self).close()
    }

    fn read_page(&mut self, page: &str) -> Result<Vec<String>> {
        (**self).read_page(page)
    }
}

pub(crate) fn split_lines(body: &str) -> Vec<String> {
    body.lines().map(str::to_string).collect()
}
