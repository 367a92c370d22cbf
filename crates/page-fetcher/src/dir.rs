use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use routerwatch_core::RouterWatchError;

use crate::{split_lines, PageSource};

/// Serves pages previously saved from the router's web UI.
pub struct DirPageReader {
    root: PathBuf,
    open: bool,
}

impl DirPageReader {
    pub fn new(root: PathBuf) -> Self {
        Self { root, open: false }
    }
}

impl PageSource for DirPageReader {
    fn open(&mut self) -> Result<()> {
        if !self.root.is_dir() {
            return Err(RouterWatchError::Connection(format!(
                "page directory {} not found",
                self.root.display()
            ))
            .into());
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
        if !self.open {
            return Err(RouterWatchError::Connection("not connected".to_string()).into());
        }
        let path = self.root.join(page.trim_start_matches('/'));
        match fs::read_to_string(&path) {
            Ok(body) => Ok(split_lines(&body)),
            Err(err) => {
                self.close();
                Err(RouterWatchError::Connection(format!("read {}: {err}", path.display())).into())
            }
        }
    }
}
