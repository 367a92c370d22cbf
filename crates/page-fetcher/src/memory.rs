use std::collections::HashMap;

use anyhow::Result;

use routerwatch_core::RouterWatchError;

use crate::{split_lines, PageSource};

/// In-memory page set. Unknown pages read as failures, like a 404.
#[derive(Debug, Default)]
pub struct MemoryPages {
    pages: HashMap<String, String>,
    open: bool,
    reachable: bool,
    pub opens: u32,
    pub reads: u32,
}

impl MemoryPages {
    pub fn new() -> Self {
        Self {
            reachable: true,
            ..Self::default()
        }
    }

    pub fn with_page(mut self, name: &str, body: &str) -> Self {
        self.set_page(name, body);
        self
    }

    pub fn set_page(&mut self, name: &str, body: &str) {
        self.pages.insert(name.to_string(), body.to_string());
    }

    /// While unreachable, both `open` and `read_page` fail.
    pub fn set_reachable(&mut self, reachable: bool) {
        self.reachable = reachable;
    }
}

impl PageSource for MemoryPages {
    fn open(&mut self) -> Result<()> {
        self.opens += 1;
        if !self.reachable {
            return Err(RouterWatchError::Connection("router unreachable".to_string()).into());
        }
        self.open = true;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn read_page(&mut self, page: &str) -> Result<Vec<String>> {
        self.reads += 1;
        if !self.open || !self.reachable {
            self.close();
            return Err(RouterWatchError::Connection("router unreachable".to_string()).into());
        }
        match self.pages.get(page) {
            Some(body) => Ok(split_lines(body)),
            None => {
                self.close();
                Err(RouterWatchError::Connection(format!("{page}: not found")).into())
            }
        }
    }
}
