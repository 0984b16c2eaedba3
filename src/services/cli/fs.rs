use std::io;
use std::path::{Path, PathBuf};

use crate::services::{FileSystem, ProjectData, ServiceError};

pub struct RealFs;

impl FileSystem for RealFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        std::fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect()
    }
}

/// Project rooted at a directory on disk.
pub struct DirProject {
    project_dir: PathBuf,
    platforms_dir: PathBuf,
}

impl DirProject {
    pub fn new(project_dir: PathBuf, platforms_dir: PathBuf) -> Self {
        Self {
            project_dir,
            platforms_dir,
        }
    }
}

impl ProjectData for DirProject {
    fn initialize_project_data(&self) -> Result<(), ServiceError> {
        if !self.project_dir.is_dir() {
            return Err(ServiceError::Validation(format!(
                "No project found at {}",
                self.project_dir.display()
            )));
        }
        Ok(())
    }

    fn platforms_dir(&self) -> PathBuf {
        self.platforms_dir.clone()
    }
}
